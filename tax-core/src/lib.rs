pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{
    BracketTaxCalculator, GamblingTaxEngine, WinningsLossesDeriver, compute_gambling_tax,
    compute_tax, derive_winnings_losses,
};
pub use error::InvalidInput;
pub use models::*;
