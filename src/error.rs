//! Unified error types for gmkit.
//!
//! This module provides a single [`GmkitError`] enum that covers every failure
//! the toolkit can surface: credential problems, unknown conversations,
//! rejected outbound messages, transport failures and bad filter input.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - Nothing is retried here; transport errors reach the caller unchanged

use std::io;

use thiserror::Error;

use crate::message::ConversationKind;

/// A specialized [`Result`] type for gmkit operations.
///
/// # Example
///
/// ```rust
/// use gmkit::error::Result;
/// use gmkit::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, GmkitError>;

/// The error type for all gmkit operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GmkitError {
    /// Missing or invalid API credential.
    ///
    /// Fatal: raised either before any request is made (no token configured)
    /// or when the service refuses a request with a 4xx status.
    #[error("Not authorized: {message}")]
    Auth {
        /// Description of what went wrong
        message: String,
    },

    /// No group or direct-message thread matches the given name.
    ///
    /// Name lookups are exact and case-sensitive.
    #[error("Could not find the {kind} associated with the name '{name}'. Check spelling and try again.")]
    ConversationNotFound {
        /// Whether a group or a direct chat was looked up
        kind: ConversationKind,
        /// The name that failed to resolve
        name: String,
    },

    /// The service refused an outbound message (HTTP 400).
    ///
    /// Chunks sent before this one are not rolled back.
    #[error("Could not send message chunk {chunk}: rejected with status {status}, there may be forbidden characters")]
    MessageRejected {
        /// HTTP status returned by the service
        status: u16,
        /// Zero-based index of the rejected chunk
        chunk: usize,
    },

    /// Any other unsuccessful HTTP status.
    #[error("Request to '{endpoint}' failed with status {status}")]
    Status {
        /// HTTP status returned by the service
        status: u16,
        /// Endpoint path, relative to the API base URL
        endpoint: String,
    },

    /// Transport-level failure (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid date string in a filter.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The text filter is not a valid regular expression.
    #[error("Invalid text pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Unknown export format, or a format whose feature is disabled.
    #[error("Invalid output format: {message}")]
    InvalidFormat {
        /// Description of what went wrong
        message: String,
    },

    /// An I/O error occurred while writing an export.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<std::string::FromUtf8Error> for GmkitError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        GmkitError::Io(io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl GmkitError {
    /// Creates an authorization error.
    pub fn auth(message: impl Into<String>) -> Self {
        GmkitError::Auth {
            message: message.into(),
        }
    }

    /// Creates the error raised when no token is configured.
    pub fn missing_token() -> Self {
        Self::auth("no auth token provided, set the GROUPME_TOKEN environment variable")
    }

    /// Creates a conversation lookup error.
    pub fn not_found(kind: ConversationKind, name: impl Into<String>) -> Self {
        GmkitError::ConversationNotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        GmkitError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD or DD/MM/YYYY",
        }
    }

    /// Returns `true` if this is an authorization error.
    pub fn is_auth(&self) -> bool {
        matches!(self, GmkitError::Auth { .. })
    }

    /// Returns `true` if a conversation name failed to resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GmkitError::ConversationNotFound { .. })
    }

    /// Returns `true` if an outbound message was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, GmkitError::MessageRejected { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, GmkitError::InvalidDate { .. })
    }

    /// Returns `true` for transport and unexpected-status failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, GmkitError::Http(_) | GmkitError::Status { .. })
    }
}
