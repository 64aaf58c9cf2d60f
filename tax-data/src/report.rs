use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{DeductionRule, GamblingTaxEngine, InvalidInput, TaxResult};
use thiserror::Error;
use tracing::{debug, warn};

use crate::loader::QueryRecord;

/// Why a query row produced no result.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("Negative {0} are not allowed.")]
    NegativeAmount(&'static str),

    #[error(transparent)]
    Calculation(#[from] InvalidInput),
}

/// One line of the batch output.
///
/// Amount columns are empty and `error` is set when the query was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    /// 1-based position of the query in the input file.
    pub row: usize,
    pub tax_year: i32,
    pub winnings: Option<Decimal>,
    pub losses: Option<Decimal>,
    pub max_deductible: Option<Decimal>,
    pub taxable_income: Option<Decimal>,
    pub phantom_income: Option<Decimal>,
    pub tax_owed: Option<Decimal>,
    pub rule_applied: Option<DeductionRule>,
    pub error: Option<String>,
}

impl BatchRow {
    fn from_outcome(
        row: usize,
        tax_year: i32,
        outcome: Result<TaxResult, RowError>,
    ) -> Self {
        match outcome {
            Ok(result) => Self {
                row,
                tax_year,
                winnings: Some(result.winnings),
                losses: Some(result.losses),
                max_deductible: Some(result.max_deductible),
                taxable_income: Some(result.taxable_income),
                phantom_income: Some(result.phantom_income),
                tax_owed: Some(result.tax_owed),
                rule_applied: Some(result.rule_applied),
                error: None,
            },
            Err(error) => Self {
                row,
                tax_year,
                winnings: None,
                losses: None,
                max_deductible: None,
                taxable_income: None,
                phantom_income: None,
                tax_owed: None,
                rule_applied: None,
                error: Some(error.to_string()),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Results for a whole batch of queries, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    rows: Vec<BatchRow>,
}

impl BatchReport {
    /// Runs every record through the engine.
    ///
    /// A rejected query becomes an error row; it never stops the batch.
    /// Negative winnings or losses are rejected before calculation.
    pub fn evaluate(records: &[QueryRecord]) -> Self {
        let engine = GamblingTaxEngine::default();

        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let row = idx + 1;
                let outcome = evaluate_record(&engine, record);
                match &outcome {
                    Ok(result) => debug!(row, tax_owed = %result.tax_owed, "query computed"),
                    Err(error) => warn!(row, %error, "query rejected"),
                }
                BatchRow::from_outcome(row, record.tax_year, outcome)
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[BatchRow] {
        &self.rows
    }

    pub fn failure_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_error()).count()
    }

    /// Sum of tax owed over the successful rows, or `None` if the total
    /// does not fit in a [`Decimal`].
    pub fn total_tax_owed(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .filter_map(|r| r.tax_owed)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Writes the report as CSV with a header row.
    pub fn write_csv<W: Write>(
        &self,
        writer: W,
    ) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn evaluate_record(
    engine: &GamblingTaxEngine<'_>,
    record: &QueryRecord,
) -> Result<TaxResult, RowError> {
    let query = record.to_query();
    if let Some(field) = query.negative_amount() {
        return Err(RowError::NegativeAmount(field));
    }
    Ok(engine.calculate(&query)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        tax_year: i32,
        winnings: Option<Decimal>,
        losses: Option<Decimal>,
        profit: Option<Decimal>,
        roi_percent: Option<Decimal>,
    ) -> QueryRecord {
        QueryRecord {
            tax_year,
            winnings,
            losses,
            profit,
            roi_percent,
        }
    }

    #[test]
    fn test_evaluate_successful_row() {
        let records = [record(
            2026,
            Some(dec!(200000)),
            Some(dec!(210000)),
            None,
            None,
        )];

        let report = BatchReport::evaluate(&records);
        let row = &report.rows()[0];

        assert_eq!(row.row, 1);
        assert_eq!(row.tax_owed, Some(dec!(1100.00)));
        assert_eq!(row.phantom_income, Some(dec!(11000.00)));
        assert_eq!(row.rule_applied, Some(DeductionRule::NinetyPercentLimit));
        assert_eq!(row.error, None);
    }

    #[test]
    fn test_evaluate_error_row_does_not_stop_batch() {
        let records = [
            record(2026, None, None, Some(dec!(100)), Some(dec!(0))),
            record(2025, Some(dec!(1000)), Some(dec!(400)), None, None),
        ];

        let report = BatchReport::evaluate(&records);

        assert_eq!(report.rows().len(), 2);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.rows()[0].error.as_deref(), Some("ROI cannot be zero"));
        assert_eq!(report.rows()[0].tax_owed, None);
        assert_eq!(report.rows()[1].tax_owed, Some(dec!(60.00)));
    }

    #[test]
    fn test_total_tax_owed_skips_errors() {
        let records = [
            record(2026, Some(dec!(100000)), Some(dec!(0)), None, None),
            record(2026, None, None, None, None),
            record(2026, Some(dec!(11000)), Some(dec!(0)), None, None),
        ];

        let report = BatchReport::evaluate(&records);

        assert_eq!(report.total_tax_owed(), Some(dec!(18500.00)));
    }

    #[test]
    fn test_evaluate_negative_amount_becomes_error_row() {
        let records = [
            record(2025, Some(Decimal::MAX), Some(Decimal::MIN), None, None),
            record(2026, Some(dec!(-1)), Some(dec!(10)), None, None),
            record(2025, Some(dec!(1000)), Some(dec!(400)), None, None),
        ];

        let report = BatchReport::evaluate(&records);
        let rows = report.rows();

        assert_eq!(report.failure_count(), 2);
        assert_eq!(rows[0].error.as_deref(), Some("Negative losses are not allowed."));
        assert_eq!(rows[0].tax_owed, None);
        assert_eq!(rows[1].error.as_deref(), Some("Negative winnings are not allowed."));
        assert_eq!(rows[2].tax_owed, Some(dec!(60.00)));
    }

    #[test]
    fn test_total_tax_owed_overflow_is_none() {
        // Each row owes roughly 37% of Decimal::MAX
        let records = [
            record(2025, Some(Decimal::MAX), Some(dec!(0)), None, None),
            record(2025, Some(Decimal::MAX), Some(dec!(0)), None, None),
            record(2025, Some(Decimal::MAX), Some(dec!(0)), None, None),
        ];

        let report = BatchReport::evaluate(&records);

        assert_eq!(report.failure_count(), 0);
        assert_eq!(report.total_tax_owed(), None);
    }

    #[test]
    fn test_write_csv_layout() {
        let records = [
            record(2025, Some(dec!(1000)), Some(dec!(400)), None, None),
            record(2026, None, None, None, None),
        ];
        let report = BatchReport::evaluate(&records);

        let mut out = Vec::new();
        report.write_csv(&mut out).expect("Failed to write CSV");
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "row,tax_year,winnings,losses,max_deductible,taxable_income,phantom_income,tax_owed,rule_applied,error"
        );
        assert_eq!(
            lines[1],
            "1,2025,1000.00,400.00,400.00,600.00,0.00,60.00,Pre-2026 (full deduction),"
        );
        assert_eq!(
            lines[2],
            "2,2026,,,,,,,,Provide either (winnings & losses) or (profit & ROI)"
        );
    }
}
