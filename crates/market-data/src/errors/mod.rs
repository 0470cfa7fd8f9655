//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers every failure an operation can surface: configuration
//! problems, date parsing, vendor login, empty trading calendars and vendor queries.
//! Operations wrap whatever went wrong in [`MarketDataError::Operation`] so callers see
//! one dataset-specific message together with the original cause.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A required setting is missing or invalid.
    /// Fatal when raised during startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No authentication strategy or provider module is registered for this vendor.
    #[error("Unsupported vendor: {0}")]
    UnsupportedVendor(String),

    /// The input did not match any recognized date layout.
    #[error("Unparseable date: {input}")]
    DateParse {
        /// The original, unmodified input
        input: String,
    },

    /// Logging in to the vendor failed.
    #[error("Authentication failed for {vendor}: {message}")]
    Authentication {
        /// The vendor being logged in to
        vendor: String,
        /// Why the login failed
        message: String,
    },

    /// The trading calendar has no open days between the two bounds.
    #[error("No trading days in range {start_date}..={end_date}")]
    EmptyCalendar {
        /// Normalized lower bound
        start_date: String,
        /// Normalized upper bound
        end_date: String,
    },

    /// A tool argument is missing, unknown or has the wrong type.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The vendor answered with a non-zero status code.
    #[error("Vendor query '{api_name}' failed ({code}): {message}")]
    VendorQuery {
        /// Vendor API endpoint name
        api_name: String,
        /// Status code reported by the vendor
        code: i64,
        /// Message reported by the vendor
        message: String,
    },

    /// The vendor response could not be decoded.
    #[error("Failed to decode vendor response: {0}")]
    Decode(String),

    /// A network error occurred while talking to the vendor.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure of one dataset operation, carrying the underlying cause.
    #[error("{context}: {source}")]
    Operation {
        /// Human-readable description of what was being fetched
        context: String,
        /// The original error
        #[source]
        source: Box<MarketDataError>,
    },
}

impl MarketDataError {
    /// Wraps `self` as the failure of a dataset operation.
    ///
    /// Errors that are already wrapped are returned unchanged so nested
    /// operations never stack prefixes.
    pub fn in_operation(self, context: &str) -> Self {
        match self {
            wrapped @ Self::Operation { .. } => wrapped,
            other => Self::Operation {
                context: context.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, looking through [`MarketDataError::Operation`].
    pub fn root_cause(&self) -> &MarketDataError {
        match self {
            Self::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the error should abort startup rather than a single call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Configuration(_) | Self::UnsupportedVendor(_)
        )
    }
}
