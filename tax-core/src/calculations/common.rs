//! Rounding, clamping and amount-parsing helpers shared by the calculation
//! stages and the adapters.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits every reported amount carries.
pub const CENTS_DP: u32 = 2;

/// Rounds to cents, with midpoints going away from zero.
///
/// The result always carries exactly two fractional digits, so `1000`
/// becomes `1000.00`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1110.004)), dec!(1110.00));
/// assert_eq!(round_half_up(dec!(1110.005)), dec!(1110.01));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CENTS_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CENTS_DP);
    rounded
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-11000)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(11000)), dec!(11000));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Parses user-entered amount text.
///
/// Surrounding whitespace and `,` thousands separators are ignored, and
/// scientific notation such as `2e5` is accepted. Blank text is `None`.
///
/// # Errors
///
/// Returns the [`rust_decimal::Error`] from the scientific-notation attempt
/// when the text is neither a plain nor a scientific number.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::parse_amount;
///
/// assert_eq!(parse_amount(" 1,234.56 "), Ok(Some(dec!(1234.56))));
/// assert_eq!(parse_amount("2e5"), Ok(Some(dec!(200000))));
/// assert_eq!(parse_amount("   "), Ok(None));
/// ```
pub fn parse_amount(text: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
    let normalized = text.trim().replace(',', "");
    if normalized.is_empty() {
        return Ok(None);
    }

    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map(Some)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_keeps_cents() {
        assert_eq!(round_half_up(dec!(1100.00)), dec!(1100.00));
    }

    #[test]
    fn round_half_up_pads_to_two_digits() {
        assert_eq!(round_half_up(dec!(1000)).to_string(), "1000.00");
        assert_eq!(round_half_up(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn round_half_up_rounds_midpoint_up() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn round_half_up_rounds_below_midpoint_down() {
        assert_eq!(round_half_up(dec!(0.1249)), dec!(0.12));
    }

    #[test]
    fn round_half_up_moves_negative_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn round_half_up_trims_long_quotients() {
        let third = dec!(100) / dec!(3);

        assert_eq!(round_half_up(third), dec!(33.33));
    }

    #[test]
    fn floor_at_zero_passes_zero_through() {
        assert_eq!(floor_at_zero(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn floor_at_zero_clamps_small_negatives() {
        assert_eq!(floor_at_zero(dec!(-0.01)), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_strips_separators_and_whitespace() {
        assert_eq!(parse_amount("1,234,567.89"), Ok(Some(dec!(1234567.89))));
        assert_eq!(parse_amount("  -5  "), Ok(Some(dec!(-5))));
    }

    #[test]
    fn parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount("1.5E3"), Ok(Some(dec!(1500))));
    }

    #[test]
    fn parse_amount_blank_is_none() {
        assert_eq!(parse_amount(""), Ok(None));
        assert_eq!(parse_amount(" , "), Ok(None));
    }

    #[test]
    fn parse_amount_rejects_text() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.3.4").is_err());
    }
}
