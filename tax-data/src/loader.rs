use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::TaxQuery;
use tax_core::calculations::common::parse_amount;
use thiserror::Error;

/// Errors that can occur when reading query data.
#[derive(Debug, Error)]
pub enum QueryLoaderError {
    #[error("CSV parse error on row {row}: {message}")]
    CsvParse { row: usize, message: String },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single record from the queries CSV file.
///
/// - `tax_year`: The tax year (e.g., 2026)
/// - `winnings`, `losses`: Gross amounts (leave empty when using profit/ROI)
/// - `profit`: Net result, may be negative
/// - `roi_percent`: ROI as a percentage (e.g., `-5` for -5%)
///
/// Amounts may use `,` as a thousands separator or scientific notation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryRecord {
    pub tax_year: i32,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub winnings: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub losses: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub profit: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub roi_percent: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => parse_amount(&s).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl QueryRecord {
    /// Converts the record into a core query, turning the ROI percentage
    /// into a ratio.
    pub fn to_query(&self) -> TaxQuery {
        TaxQuery {
            tax_year: self.tax_year,
            winnings: self.winnings,
            losses: self.losses,
            profit: self.profit,
            roi: self.roi_percent.map(|pct| pct / Decimal::ONE_HUNDRED),
        }
    }
}

/// Loader for calculator queries from CSV files.
///
/// Headers are matched by name, so column order does not matter and the
/// optional columns may be left out entirely.
pub struct QueryLoader;

impl QueryLoader {
    /// Parse query records from a CSV reader.
    ///
    /// Rows are returned in file order. The reader can be any type that
    /// implements `Read`, such as a file or a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<QueryRecord>, QueryLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        csv_reader
            .deserialize::<QueryRecord>()
            .enumerate()
            .map(|(idx, result)| {
                result.map_err(|e| QueryLoaderError::CsvParse {
                    row: idx + 1,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MIXED_CSV: &str = "\
tax_year,winnings,losses,profit,roi_percent
2025,200000,210000,,
2026,,,-5000,-5
2026,\"1,250.50\", 300 ,,
";

    #[test]
    fn test_parse_csv_mixed_modes() {
        let records = QueryLoader::parse(MIXED_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].winnings, Some(dec!(200000)));
        assert_eq!(records[0].losses, Some(dec!(210000)));
        assert_eq!(records[0].profit, None);
        assert_eq!(records[1].profit, Some(dec!(-5000)));
        assert_eq!(records[1].roi_percent, Some(dec!(-5)));
    }

    #[test]
    fn test_parse_csv_thousands_separator() {
        let records = QueryLoader::parse(MIXED_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[2].winnings, Some(dec!(1250.50)));
        assert_eq!(records[2].losses, Some(dec!(300)));
    }

    #[test]
    fn test_parse_csv_scientific_notation() {
        let csv = "tax_year,winnings,losses\n2026,2e5,1.5E3";

        let records = QueryLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].winnings, Some(dec!(200000)));
        assert_eq!(records[0].losses, Some(dec!(1500)));
    }

    #[test]
    fn test_parse_csv_optional_columns_omitted() {
        let csv = "tax_year,profit,roi_percent\n2026,1000,10";

        let records = QueryLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].winnings, None);
        assert_eq!(records[0].losses, None);
        assert_eq!(records[0].profit, Some(dec!(1000)));
    }

    #[test]
    fn test_parse_csv_missing_tax_year() {
        let csv = "winnings,losses\n100,50";

        let result = QueryLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(QueryLoaderError::CsvParse { row: 1, .. })));
    }

    #[test]
    fn test_parse_csv_bad_decimal_reports_row() {
        let csv = "tax_year,winnings,losses\n2026,100,50\n2026,abc,50";

        let result = QueryLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(QueryLoaderError::CsvParse { row: 2, .. })));
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = "tax_year,winnings,losses,profit,roi_percent\n";

        let records = QueryLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn test_to_query_converts_roi_percent() {
        let record = QueryRecord {
            tax_year: 2026,
            winnings: None,
            losses: None,
            profit: Some(dec!(-5000)),
            roi_percent: Some(dec!(-5)),
        };

        assert_eq!(
            record.to_query(),
            TaxQuery::profit_roi(2026, dec!(-5000), dec!(-0.05))
        );
    }

    #[test]
    fn test_to_query_keeps_winnings_and_losses() {
        let record = QueryRecord {
            tax_year: 2025,
            winnings: Some(dec!(10)),
            losses: Some(dec!(5)),
            profit: None,
            roi_percent: None,
        };

        assert_eq!(
            record.to_query(),
            TaxQuery::winnings_losses(2025, dec!(10), dec!(5))
        );
    }
}
