use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// First tax year in which only part of gambling losses is deductible.
pub const LIMITED_DEDUCTION_START_YEAR: i32 = 2026;

/// Share of losses deductible from [`LIMITED_DEDUCTION_START_YEAR`] onward.
pub const LIMITED_DEDUCTION_FACTOR: Decimal = dec!(0.90);

/// Loss deduction policy in force for a tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductionRule {
    /// Losses are deductible in full, up to the amount of winnings.
    #[serde(rename = "Pre-2026 (full deduction)")]
    FullDeduction,

    /// Only 90% of losses are deductible, up to the amount of winnings.
    #[serde(rename = "Post-2026 (90% deduction limit)")]
    NinetyPercentLimit,
}

impl DeductionRule {
    pub fn for_tax_year(tax_year: i32) -> Self {
        if tax_year >= LIMITED_DEDUCTION_START_YEAR {
            Self::NinetyPercentLimit
        } else {
            Self::FullDeduction
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullDeduction => "Pre-2026 (full deduction)",
            Self::NinetyPercentLimit => "Post-2026 (90% deduction limit)",
        }
    }

    /// Amount of losses this rule allows before the winnings cap.
    pub fn deductible_losses(
        &self,
        losses: Decimal,
    ) -> Decimal {
        match self {
            Self::FullDeduction => losses,
            Self::NinetyPercentLimit => losses * LIMITED_DEDUCTION_FACTOR,
        }
    }

    /// Losses that may be subtracted from winnings; never more than winnings.
    pub fn max_deductible(
        &self,
        winnings: Decimal,
        losses: Decimal,
    ) -> Decimal {
        winnings.min(self.deductible_losses(losses))
    }
}

impl fmt::Display for DeductionRule {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
