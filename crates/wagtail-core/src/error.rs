//! Error types and handling for wagtail-core operations.
//!
//! Every failure the resource client can produce is expressed as an [`Error`]
//! variant. Errors carry a stable [`Error::category`] identifier so that the
//! resource store can record *why* a slot failed without changing the
//! human-readable message it shows to the UI.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: the remote call rejected (network failure, non-success status)
//! - **Absence Errors**: a single resource lookup found nothing (`NotFound`, `NoHomePage`)
//! - **Shape Errors**: the payload does not match the expected contract
//! - **Request Errors**: a descriptor was rejected before any network call
//! - **Configuration Errors**: invalid settings or config files
//!
//! ```rust
//! use wagtail_core::Error;
//!
//! let err = Error::Transport("timeout".to_string());
//! assert_eq!(err.to_string(), "timeout");
//! assert_eq!(err.category(), "transport");
//! ```

use thiserror::Error;

/// The main error type for wagtail-core operations.
///
/// All fallible public functions return `Result<T, Error>`. The resource store
/// never surfaces these to its callers; it folds them into slot state instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The remote call was rejected.
    ///
    /// Used by [`Transport`](crate::Transport) implementations for failures that
    /// are not tied to a `reqwest` error, such as a non-success HTTP status. The
    /// message is displayed verbatim so it can be shown to users as-is.
    #[error("{0}")]
    Transport(String),

    /// Network operation failed inside the HTTP client.
    ///
    /// ## Recoverability
    ///
    /// Connection and timeout errors are typically recoverable, while
    /// malformed URL errors are permanent.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The remote API indicated that a requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The home page listing came back empty.
    #[error("HomePage not found")]
    NoHomePage,

    /// The payload does not match the expected response contract.
    ///
    /// ## Common Causes
    ///
    /// - Collection envelope without an `items` array
    /// - Missing or non-integer `meta.total_count`
    /// - Page objects lacking `id` or `title`
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A resource descriptor was rejected before reaching the network.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if the error might succeed if the same request were issued again.
    ///
    /// The crate itself never retries; this is a hint for callers that want
    /// to offer a "try again" affordance.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Transport(_) => true,
            _ => false,
        }
    }

    /// Get the error category as a stable string identifier.
    ///
    /// - `"transport"` - rejected remote calls (including HTTP client failures)
    /// - `"not_found"` - absent pages and missing home page
    /// - `"malformed_response"` - payload shape mismatch
    /// - `"invalid_request"` - descriptors rejected locally
    /// - `"config"` - configuration and settings
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::Network(_) => "transport",
            Self::NotFound(_) | Self::NoHomePage => "not_found",
            Self::MalformedResponse(_) => "malformed_response",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Config(_) => "config",
        }
    }

    /// Whether this error reports a payload that failed shape validation.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        // Given: Errors whose messages are shown to users
        // Then: Transport messages pass through untouched
        assert_eq!(Error::Transport("timeout".to_string()).to_string(), "timeout");
        assert_eq!(Error::NoHomePage.to_string(), "HomePage not found");
        assert_eq!(
            Error::NotFound("page 5".to_string()).to_string(),
            "Not found: page 5"
        );
        assert!(
            Error::MalformedResponse("items is not an array".to_string())
                .to_string()
                .contains("items is not an array")
        );
    }

    #[test]
    fn test_error_categories() {
        let error_categories = vec![
            (Error::Transport("x".to_string()), "transport"),
            (Error::NotFound("x".to_string()), "not_found"),
            (Error::NoHomePage, "not_found"),
            (Error::MalformedResponse("x".to_string()), "malformed_response"),
            (Error::InvalidRequest("x".to_string()), "invalid_request"),
            (Error::Config("x".to_string()), "config"),
        ];

        for (error, expected_category) in error_categories {
            assert_eq!(error.category(), expected_category);
        }
    }

    #[test]
    fn test_error_recoverability() {
        assert!(Error::Transport("503".to_string()).is_recoverable());

        let permanent = vec![
            Error::NoHomePage,
            Error::NotFound("page 1".to_string()),
            Error::MalformedResponse("bad".to_string()),
            Error::InvalidRequest("id 0".to_string()),
            Error::Config("bad url".to_string()),
        ];
        for error in permanent {
            assert!(!error.is_recoverable(), "Expected {error:?} to be permanent");
        }
    }
}
