use thiserror::Error;

/// Configuration and construction errors raised synchronously at the API
/// boundary, before any worker is dispatched. Ordinary game conditions
/// (draws, mate, timeout, cancellation) are values, never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The requested entry count does not fit a 32-bit signed index space,
    /// or is zero. The table is rejected outright, never truncated.
    #[error("transposition table capacity {0} is outside the addressable index range")]
    TransTableCapacity(usize),

    /// Time-boxed iterative deepening (`search_depth == 0`) needs a budget.
    #[error("time-boxed search requires a non-zero timeout")]
    MissingTimeout,
}
