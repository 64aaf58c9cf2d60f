//! Gambling tax engine.
//!
//! Ties the pipeline together for one query:
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Winnings and losses (given, or derived from profit and ROI) |
//! | 2    | Deduction rule for the tax year |
//! | 3    | Maximum deductible losses (`min(winnings, allowed losses)`) |
//! | 4    | Taxable income (`winnings − max deductible`, minimum 0) |
//! | 5    | Phantom income (taxable income when losses ≥ winnings) |
//! | 6    | Tax owed from the bracket schedule |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{DeductionRule, GamblingTaxEngine, TaxQuery};
//!
//! let engine = GamblingTaxEngine::default();
//! let query = TaxQuery::winnings_losses(2026, dec!(200000), dec!(210000));
//! let result = engine.calculate(&query).unwrap();
//!
//! assert_eq!(result.max_deductible, dec!(189000.00));
//! assert_eq!(result.phantom_income, dec!(11000.00));
//! assert_eq!(result.tax_owed, dec!(1100.00));
//! assert_eq!(result.rule_applied, DeductionRule::NinetyPercentLimit);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::BracketTaxCalculator;
use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::calculations::winnings_losses::WinningsLossesDeriver;
use crate::error::InvalidInput;
use crate::models::{DeductionRule, GamblingInputs, TaxQuery, TaxResult};

/// Computes gambling tax for a query.
#[derive(Debug, Clone, Copy)]
pub struct GamblingTaxEngine<'a> {
    calculator: BracketTaxCalculator<'a>,
    deriver: WinningsLossesDeriver,
}

impl Default for GamblingTaxEngine<'static> {
    fn default() -> Self {
        Self::new(BracketTaxCalculator::default())
    }
}

impl<'a> GamblingTaxEngine<'a> {
    pub fn new(calculator: BracketTaxCalculator<'a>) -> Self {
        Self {
            calculator,
            deriver: WinningsLossesDeriver,
        }
    }

    /// Resolves the query's input mode and computes the result.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] when the query has no complete input pair or
    /// its profit/ROI pair cannot be turned into winnings and losses.
    pub fn calculate(
        &self,
        query: &TaxQuery,
    ) -> Result<TaxResult, InvalidInput> {
        let inputs = query.inputs()?;
        self.compute(query.tax_year, inputs)
    }

    /// Computes the result for already-resolved inputs.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] from the profit/ROI derivation.
    pub fn compute(
        &self,
        tax_year: i32,
        inputs: GamblingInputs,
    ) -> Result<TaxResult, InvalidInput> {
        let (winnings, losses) = self.resolve_amounts(inputs)?;

        let rule = DeductionRule::for_tax_year(tax_year);
        let max_deductible = rule.max_deductible(winnings, losses);
        let taxable_income = self.taxable_income(winnings, max_deductible);
        let phantom_income = self.phantom_income(winnings, losses, taxable_income);
        let tax_owed = self.calculator.compute_tax(taxable_income);

        debug!(
            tax_year,
            rule = %rule,
            %winnings,
            %losses,
            %taxable_income,
            %tax_owed,
            "computed gambling tax"
        );

        Ok(TaxResult {
            winnings: round_half_up(winnings),
            losses: round_half_up(losses),
            max_deductible: round_half_up(max_deductible),
            taxable_income: round_half_up(taxable_income),
            phantom_income: round_half_up(phantom_income),
            tax_owed,
            rule_applied: rule,
        })
    }

    fn resolve_amounts(
        &self,
        inputs: GamblingInputs,
    ) -> Result<(Decimal, Decimal), InvalidInput> {
        match inputs {
            GamblingInputs::WinningsLosses { winnings, losses } => Ok((winnings, losses)),
            GamblingInputs::ProfitRoi { profit, roi } => self.deriver.derive(profit, roi),
        }
    }

    fn taxable_income(
        &self,
        winnings: Decimal,
        max_deductible: Decimal,
    ) -> Decimal {
        floor_at_zero(winnings.saturating_sub(max_deductible))
    }

    /// Taxable income that exists only because losses were capped.
    fn phantom_income(
        &self,
        winnings: Decimal,
        losses: Decimal,
        taxable_income: Decimal,
    ) -> Decimal {
        if losses >= winnings && taxable_income > Decimal::ZERO {
            taxable_income
        } else {
            Decimal::ZERO
        }
    }
}

/// Computes gambling tax over the standard bracket schedule.
///
/// # Errors
///
/// Returns [`InvalidInput`] from the profit/ROI derivation.
pub fn compute_gambling_tax(
    tax_year: i32,
    inputs: GamblingInputs,
) -> Result<TaxResult, InvalidInput> {
    GamblingTaxEngine::default().compute(tax_year, inputs)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn engine() -> GamblingTaxEngine<'static> {
        GamblingTaxEngine::default()
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_deduction() {
        assert_eq!(engine().taxable_income(dec!(1000), dec!(400)), dec!(600));
    }

    #[test]
    fn taxable_income_never_negative() {
        assert_eq!(engine().taxable_income(dec!(-10), dec!(0)), dec!(0));
    }

    #[test]
    fn taxable_income_saturates_instead_of_overflowing() {
        assert_eq!(engine().taxable_income(Decimal::MAX, Decimal::MIN), Decimal::MAX);
    }

    // =========================================================================
    // phantom_income tests
    // =========================================================================

    #[test]
    fn phantom_income_when_losses_exceed_winnings() {
        let result = engine().phantom_income(dec!(200000), dec!(210000), dec!(11000));

        assert_eq!(result, dec!(11000));
    }

    #[test]
    fn phantom_income_when_losses_equal_winnings() {
        let result = engine().phantom_income(dec!(100000), dec!(100000), dec!(10000));

        assert_eq!(result, dec!(10000));
    }

    #[test]
    fn no_phantom_income_when_net_winner() {
        let result = engine().phantom_income(dec!(100000), dec!(0), dec!(100000));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn no_phantom_income_without_taxable_income() {
        let result = engine().phantom_income(dec!(0), dec!(100), dec!(0));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn compute_pre_2026_full_deduction() {
        let inputs = GamblingInputs::WinningsLosses {
            winnings: dec!(200000),
            losses: dec!(210000),
        };

        let result = engine().compute(2025, inputs).unwrap();

        assert_eq!(
            result,
            TaxResult {
                winnings: dec!(200000.00),
                losses: dec!(210000.00),
                max_deductible: dec!(200000.00),
                taxable_income: dec!(0.00),
                phantom_income: dec!(0.00),
                tax_owed: dec!(0.00),
                rule_applied: DeductionRule::FullDeduction,
            }
        );
    }

    #[test]
    fn compute_post_2026_phantom_income() {
        let inputs = GamblingInputs::WinningsLosses {
            winnings: dec!(200000),
            losses: dec!(210000),
        };

        let result = engine().compute(2026, inputs).unwrap();

        assert_eq!(
            result,
            TaxResult {
                winnings: dec!(200000.00),
                losses: dec!(210000.00),
                max_deductible: dec!(189000.00),
                taxable_income: dec!(11000.00),
                phantom_income: dec!(11000.00),
                tax_owed: dec!(1100.00),
                rule_applied: DeductionRule::NinetyPercentLimit,
            }
        );
        assert!(result.has_phantom_income());
    }

    #[test]
    fn compute_post_2026_without_losses() {
        let inputs = GamblingInputs::WinningsLosses {
            winnings: dec!(100000),
            losses: dec!(0),
        };

        let result = engine().compute(2026, inputs).unwrap();

        assert_eq!(result.max_deductible, dec!(0.00));
        assert_eq!(result.taxable_income, dec!(100000.00));
        assert_eq!(result.phantom_income, dec!(0.00));
        assert_eq!(result.tax_owed, dec!(17400.00));
    }

    #[test]
    fn compute_pre_2026_net_winner_has_no_phantom_income() {
        let inputs = GamblingInputs::WinningsLosses {
            winnings: dec!(60000),
            losses: dec!(10000),
        };

        let result = engine().compute(2020, inputs).unwrap();

        assert_eq!(result.taxable_income, dec!(50000.00));
        assert_eq!(result.phantom_income, dec!(0.00));
        // 1100 + 4047 + 5275 × 22%
        assert_eq!(result.tax_owed, dec!(6307.50));
    }

    #[test]
    fn compute_derives_amounts_from_profit_and_roi() {
        let inputs = GamblingInputs::ProfitRoi {
            profit: dec!(-5000),
            roi: dec!(-0.05),
        };

        let result = engine().compute(2026, inputs).unwrap();

        assert_eq!(result.winnings, dec!(95000.00));
        assert_eq!(result.losses, dec!(100000.00));
        assert_eq!(result.max_deductible, dec!(90000.00));
        assert_eq!(result.taxable_income, dec!(5000.00));
        assert_eq!(result.phantom_income, dec!(5000.00));
        assert_eq!(result.tax_owed, dec!(500.00));
    }

    #[test]
    fn compute_propagates_zero_roi() {
        let inputs = GamblingInputs::ProfitRoi {
            profit: dec!(100),
            roi: dec!(0),
        };

        assert_eq!(engine().compute(2026, inputs), Err(InvalidInput::ZeroRoi));
    }

    #[test]
    fn compute_rounds_fractional_deduction() {
        let inputs = GamblingInputs::WinningsLosses {
            winnings: dec!(1000),
            losses: dec!(555.55),
        };

        let result = engine().compute(2026, inputs).unwrap();

        // 555.55 × 0.90 = 499.995
        assert_eq!(result.max_deductible, dec!(500.00));
        assert_eq!(result.taxable_income, dec!(500.01));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_rejects_query_without_inputs() {
        let query = TaxQuery {
            tax_year: 2026,
            winnings: None,
            losses: None,
            profit: None,
            roi: None,
        };

        assert_eq!(
            engine().calculate(&query),
            Err(InvalidInput::MissingInputs)
        );
    }

    #[test]
    fn calculate_matches_compute_gambling_tax() {
        let query = TaxQuery::profit_roi(2025, dec!(5000), dec!(0.10));

        let from_engine = engine().calculate(&query).unwrap();
        let from_fn = compute_gambling_tax(2025, query.inputs().unwrap()).unwrap();

        assert_eq!(from_engine, from_fn);
    }

    #[test]
    fn calculate_extreme_opposite_amounts_does_not_panic() {
        let query = TaxQuery::winnings_losses(2025, Decimal::MAX, Decimal::MIN);

        let result = engine().calculate(&query).unwrap();

        assert_eq!(result.taxable_income, Decimal::MAX);
        assert_eq!(result.phantom_income, Decimal::ZERO);
        assert!(result.tax_owed > Decimal::ZERO);
    }
}
