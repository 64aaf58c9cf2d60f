use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// A single calculator request as supplied by a caller.
///
/// Exactly one input mode is used per query: either `winnings` and `losses`,
/// or `profit` and `roi`. When both pairs are complete, winnings and losses
/// win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxQuery {
    pub tax_year: i32,

    #[serde(default)]
    pub winnings: Option<Decimal>,
    #[serde(default)]
    pub losses: Option<Decimal>,

    /// Net result (winnings minus losses); may be negative.
    #[serde(default)]
    pub profit: Option<Decimal>,
    /// Return on investment as a ratio of losses, e.g. `-0.05` for -5%.
    #[serde(default)]
    pub roi: Option<Decimal>,
}

/// The resolved input mode of a [`TaxQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamblingInputs {
    WinningsLosses { winnings: Decimal, losses: Decimal },
    ProfitRoi { profit: Decimal, roi: Decimal },
}

impl TaxQuery {
    pub fn winnings_losses(
        tax_year: i32,
        winnings: Decimal,
        losses: Decimal,
    ) -> Self {
        Self {
            tax_year,
            winnings: Some(winnings),
            losses: Some(losses),
            profit: None,
            roi: None,
        }
    }

    pub fn profit_roi(
        tax_year: i32,
        profit: Decimal,
        roi: Decimal,
    ) -> Self {
        Self {
            tax_year,
            winnings: None,
            losses: None,
            profit: Some(profit),
            roi: Some(roi),
        }
    }

    /// Picks the input mode for this query.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::MissingInputs`] when neither pair is complete.
    pub fn inputs(&self) -> Result<GamblingInputs, InvalidInput> {
        match (self.winnings, self.losses, self.profit, self.roi) {
            (Some(winnings), Some(losses), _, _) => {
                Ok(GamblingInputs::WinningsLosses { winnings, losses })
            }
            (_, _, Some(profit), Some(roi)) => Ok(GamblingInputs::ProfitRoi { profit, roi }),
            _ => Err(InvalidInput::MissingInputs),
        }
    }

    /// Name of the first supplied winnings or losses amount that is below
    /// zero.
    ///
    /// The engine accepts negative amounts; adapters use this to reject them
    /// before calculating.
    pub fn negative_amount(&self) -> Option<&'static str> {
        [("winnings", self.winnings), ("losses", self.losses)]
            .into_iter()
            .find(|(_, amount)| amount.is_some_and(|a| a < Decimal::ZERO))
            .map(|(field, _)| field)
    }
}
