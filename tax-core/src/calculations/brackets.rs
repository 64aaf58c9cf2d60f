//! Marginal tax computed over a bracket schedule.
//!
//! Each bracket only taxes the slice of income that falls inside it, so the
//! total is the sum of `taxed_amount × rate` over every bracket the income
//! reaches.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::BracketTaxCalculator;
//!
//! let calculator = BracketTaxCalculator::default();
//!
//! // 11000 × 10% + (20000 − 11000) × 12%
//! assert_eq!(calculator.compute_tax(dec!(20000)), dec!(2180.00));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{TAX_BRACKETS, TaxBracket};

/// Applies a marginal-rate schedule to taxable income.
#[derive(Debug, Clone, Copy)]
pub struct BracketTaxCalculator<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl Default for BracketTaxCalculator<'static> {
    fn default() -> Self {
        Self::new(&TAX_BRACKETS)
    }
}

impl<'a> BracketTaxCalculator<'a> {
    /// Creates a calculator over `tax_brackets`.
    ///
    /// Brackets must be sorted by `min_income` ascending and contiguous, with
    /// only the last one unbounded.
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Tax owed on `taxable_income`, rounded to cents.
    ///
    /// Negative income is outside the contract; it is logged and treated as
    /// zero.
    pub fn compute_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let taxable_income = if taxable_income < Decimal::ZERO {
            warn!(%taxable_income, "negative taxable income clamped to zero");
            Decimal::ZERO
        } else {
            taxable_income
        };

        let mut tax = Decimal::ZERO;
        for bracket in self.tax_brackets {
            if taxable_income <= bracket.min_income {
                break;
            }
            tax += bracket.tax_on(taxable_income);
        }

        round_half_up(tax)
    }

    /// Marginal rate that applies to the last dollar of `taxable_income`.
    ///
    /// `None` for zero income or an empty schedule.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Option<Decimal> {
        self.tax_brackets
            .iter()
            .take_while(|b| taxable_income > b.min_income)
            .last()
            .map(|b| b.tax_rate)
    }
}

/// [`BracketTaxCalculator::compute_tax`] over the standard schedule.
pub fn compute_tax(taxable_income: Decimal) -> Decimal {
    BracketTaxCalculator::default().compute_tax(taxable_income)
}
