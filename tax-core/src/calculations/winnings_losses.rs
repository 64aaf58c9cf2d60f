//! Recovers gross winnings and losses from a profit and an ROI.
//!
//! ROI here is profit relative to the amount lost, so
//! `losses = profit / roi` and `winnings = profit + losses`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;
use crate::error::InvalidInput;

/// Amounts below this are treated as negative rather than rounding noise.
pub const NEGATIVE_TOLERANCE: Decimal = dec!(-0.000001);

/// Converts (profit, ROI ratio) into (winnings, losses).
#[derive(Debug, Clone, Copy, Default)]
pub struct WinningsLossesDeriver;

impl WinningsLossesDeriver {
    /// Returns `(winnings, losses)`, each rounded to cents.
    ///
    /// # Errors
    ///
    /// - [`InvalidInput::ZeroRoi`] when `roi` is zero.
    /// - [`InvalidInput::InvalidProfitRoi`] when the pair implies negative
    ///   winnings or losses, or amounts too large to represent.
    pub fn derive(
        &self,
        profit: Decimal,
        roi: Decimal,
    ) -> Result<(Decimal, Decimal), InvalidInput> {
        if roi.is_zero() {
            return Err(InvalidInput::ZeroRoi);
        }

        let losses = profit
            .checked_div(roi)
            .ok_or(InvalidInput::InvalidProfitRoi)?;
        let winnings = profit
            .checked_add(losses)
            .ok_or(InvalidInput::InvalidProfitRoi)?;

        if winnings < NEGATIVE_TOLERANCE || losses < NEGATIVE_TOLERANCE {
            return Err(InvalidInput::InvalidProfitRoi);
        }

        Ok((round_half_up(winnings), round_half_up(losses)))
    }
}

/// [`WinningsLossesDeriver::derive`] as a free function.
pub fn derive_winnings_losses(
    profit: Decimal,
    roi: Decimal,
) -> Result<(Decimal, Decimal), InvalidInput> {
    WinningsLossesDeriver.derive(profit, roi)
}
