use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One marginal-rate band of the income tax schedule.
///
/// A bracket covers `[min_income, max_income)`. The top bracket has no
/// upper bound and stores `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    /// Portion of `income` that falls inside this bracket.
    ///
    /// Zero when the income does not reach the bracket's lower bound.
    pub fn taxed_amount(
        &self,
        income: Decimal,
    ) -> Decimal {
        let upper = match self.max_income {
            Some(max_income) => income.min(max_income),
            None => income,
        };
        (upper - self.min_income).max(Decimal::ZERO)
    }

    /// Tax contributed by this bracket alone for the given income.
    pub fn tax_on(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.taxed_amount(income) * self.tax_rate
    }
}

/// The single illustrative federal schedule, lowest bracket first.
pub const TAX_BRACKETS: [TaxBracket; 7] = [
    TaxBracket {
        min_income: dec!(0),
        max_income: Some(dec!(11000)),
        tax_rate: dec!(0.10),
    },
    TaxBracket {
        min_income: dec!(11000),
        max_income: Some(dec!(44725)),
        tax_rate: dec!(0.12),
    },
    TaxBracket {
        min_income: dec!(44725),
        max_income: Some(dec!(95375)),
        tax_rate: dec!(0.22),
    },
    TaxBracket {
        min_income: dec!(95375),
        max_income: Some(dec!(182100)),
        tax_rate: dec!(0.24),
    },
    TaxBracket {
        min_income: dec!(182100),
        max_income: Some(dec!(231250)),
        tax_rate: dec!(0.32),
    },
    TaxBracket {
        min_income: dec!(231250),
        max_income: Some(dec!(578125)),
        tax_rate: dec!(0.35),
    },
    TaxBracket {
        min_income: dec!(578125),
        max_income: None,
        tax_rate: dec!(0.37),
    },
];
