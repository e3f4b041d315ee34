//! # Core Error Types
//!
//! Validation errors for the foundational types. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations
//! and are returned as structured values, never used for control flow.

use thiserror::Error;

/// Errors raised by the foundational type constructors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Language code failed validation.
    #[error("invalid language code {code:?}: {reason}")]
    InvalidLanguageCode {
        /// The rejected code.
        code: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Timestamp string used a non-Z timezone suffix.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NonUtcTimestamp(String),

    /// Timestamp string is not valid RFC 3339.
    #[error("invalid RFC 3339 timestamp {value:?}: {source}")]
    InvalidTimestamp {
        /// The rejected string.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },
}
