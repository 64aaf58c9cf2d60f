//! Gambling tax calculation pipeline.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! 1. [`WinningsLossesDeriver`] turns a profit and ROI into winnings and losses.
//! 2. [`GamblingTaxEngine`] applies the deduction rule for the tax year.
//! 3. [`BracketTaxCalculator`] taxes the resulting income marginally.

pub mod brackets;
pub mod common;
pub mod gambling;
pub mod winnings_losses;

pub use brackets::{BracketTaxCalculator, compute_tax};
pub use gambling::{GamblingTaxEngine, compute_gambling_tax};
pub use winnings_losses::{WinningsLossesDeriver, derive_winnings_losses};
