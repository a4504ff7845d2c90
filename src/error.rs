//! Error types shared by the controller and the HTTP layer

use thiserror::Error;

/// Errors raised by timer operations
#[derive(Debug, Error)]
pub enum TimerError {
    /// Custom duration input was not a number of whole minutes in range
    #[error("invalid duration {input:?}: enter between {min} and {max} minutes")]
    InvalidDuration { input: String, min: u64, max: u64 },

    #[error("failed to lock timer session: {0}")]
    LockPoisoned(String),
}
