use thiserror::Error;

/// Failure classes surfaced by a [`Store`](crate::Store).
///
/// Callers treat both variants the same way (the store is unavailable for
/// this operation); the split exists so logs distinguish a refused or broken
/// connection from a round trip that simply ran out of time.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, rejected the command, or replied
    /// with something the client could not decode.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A single round trip exceeded its deadline.
    #[error("store operation `{op}` timed out")]
    Timeout { op: &'static str },
}
