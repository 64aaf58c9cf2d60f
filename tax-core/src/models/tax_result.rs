use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DeductionRule;

/// Outcome of one gambling tax calculation.
///
/// All amounts are non-negative and rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub winnings: Decimal,
    pub losses: Decimal,
    /// Losses actually subtracted from winnings under `rule_applied`.
    pub max_deductible: Decimal,
    pub taxable_income: Decimal,
    /// Taxable income reported although losses met or exceeded winnings.
    pub phantom_income: Decimal,
    pub tax_owed: Decimal,
    pub rule_applied: DeductionRule,
}

impl TaxResult {
    pub fn has_phantom_income(&self) -> bool {
        self.phantom_income > Decimal::ZERO
    }
}
