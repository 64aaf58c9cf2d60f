use thiserror::Error;

/// Rejected calculator input.
///
/// Every failure in the core is an input problem the caller can fix by
/// supplying different values; nothing here is retryable or fatal.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidInput {
    /// Winnings and losses cannot be recovered from a zero ROI.
    #[error("ROI cannot be zero")]
    ZeroRoi,

    /// The profit/ROI pair implies negative winnings or negative losses.
    #[error("Invalid combination of profit and ROI")]
    InvalidProfitRoi,

    /// Neither a complete (winnings, losses) pair nor a complete
    /// (profit, ROI) pair was supplied.
    #[error("Provide either (winnings & losses) or (profit & ROI)")]
    MissingInputs,
}
