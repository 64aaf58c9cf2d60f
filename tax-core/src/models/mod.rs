mod deduction_rule;
mod tax_bracket;
mod tax_query;
mod tax_result;

pub use deduction_rule::{DeductionRule, LIMITED_DEDUCTION_FACTOR, LIMITED_DEDUCTION_START_YEAR};
pub use tax_bracket::{TAX_BRACKETS, TaxBracket};
pub use tax_query::{GamblingInputs, TaxQuery};
pub use tax_result::TaxResult;
