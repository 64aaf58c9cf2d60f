//! One-shot calculation from command-line flags.

use clap::Args;
use rust_decimal::Decimal;
use tax_core::{GamblingTaxEngine, LIMITED_DEDUCTION_START_YEAR, TaxQuery, TaxResult};

use crate::form::FormError;
use crate::utils::format_currency;

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CalcArgs {
    /// Tax year.
    #[arg(long, default_value_t = LIMITED_DEDUCTION_START_YEAR)]
    pub year: i32,

    /// Total gambling winnings.
    #[arg(long, allow_hyphen_values = true)]
    pub winnings: Option<Decimal>,

    /// Total gambling losses.
    #[arg(long, allow_hyphen_values = true)]
    pub losses: Option<Decimal>,

    /// Net profit (winnings minus losses).
    #[arg(long, allow_hyphen_values = true)]
    pub profit: Option<Decimal>,

    /// Return on investment as a percentage, e.g. `-5` for -5%.
    #[arg(long, allow_hyphen_values = true)]
    pub roi: Option<Decimal>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CalcArgs {
    /// Builds the core query, converting the ROI percentage to a ratio.
    pub fn to_query(&self) -> TaxQuery {
        TaxQuery {
            tax_year: self.year,
            winnings: self.winnings,
            losses: self.losses,
            profit: self.profit,
            roi: self.roi.map(|pct| pct / Decimal::ONE_HUNDRED),
        }
    }

    /// Runs the query through `engine`, rejecting negative winnings or
    /// losses the same way the web form does.
    pub fn calculate(
        &self,
        engine: &GamblingTaxEngine<'_>,
    ) -> Result<TaxResult, FormError> {
        let query = self.to_query();
        if let Some(field) = query.negative_amount() {
            return Err(FormError::NegativeAmount(field));
        }
        Ok(engine.calculate(&query)?)
    }

    /// Renders `result` in the format selected by `--json`.
    pub fn render(
        &self,
        result: &TaxResult,
    ) -> serde_json::Result<String> {
        if self.json {
            serde_json::to_string_pretty(result)
        } else {
            Ok(render_text(result))
        }
    }
}

/// Plain-text breakdown with right-aligned currency amounts.
pub fn render_text(result: &TaxResult) -> String {
    let rows = [
        ("Winnings", result.winnings),
        ("Losses", result.losses),
        ("Maximum Deductible Losses", result.max_deductible),
        ("Taxable Income", result.taxable_income),
        ("Phantom Income", result.phantom_income),
        ("Tax Owed", result.tax_owed),
    ];

    let mut out = format!("Rule Applied: {}\n", result.rule_applied);
    for (label, value) in rows {
        out.push_str(&format!("{label:<26} {:>16}\n", format_currency(value)));
    }
    out
}
