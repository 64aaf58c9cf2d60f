//! CSV batch processing for the gambling tax calculator.
//!
//! [`QueryLoader`] reads calculator queries from CSV and [`BatchReport`]
//! runs each one through the core engine and writes one result row per
//! query.

mod loader;
mod report;

pub use loader::{QueryLoader, QueryLoaderError, QueryRecord};
pub use report::{BatchReport, BatchRow, RowError};
