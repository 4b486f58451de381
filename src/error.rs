//! Error types for failure classification.
//!
//! Classification itself almost never fails: every service-side or client-side
//! failure resolves to a [`Category`](crate::Category), with
//! [`Category::Unknown`](crate::Category::Unknown) as the successful fallback.
//! The one exception is a failure of a shape the rule table has no branch for,
//! which surfaces as [`TaxonomyError::UnrecognizedFailure`] so the caller can
//! decide to abort or log-and-skip.
//!
//! # Error Handling Example
//!
//! ```rust
//! use aws_failure_taxonomy::{classify, CloudFailure, TaxonomyError};
//!
//! let failure = CloudFailure::from(anyhow::anyhow!("disk full"));
//! match classify(failure, "s3:ListBuckets") {
//!     Ok(classified) => println!("category: {}", classified.category()),
//!     Err(TaxonomyError::UnrecognizedFailure { type_name, .. }) => {
//!         println!("rule table has no branch for {type_name}");
//!     }
//!     Err(other) => println!("classification failed: {other}"),
//! }
//! ```

use crate::core_types::{CategorizedError, ErrorSeverity, OtherFailure};
use crate::logging::log_error;
use thiserror::Error;

/// Convenient result type for classification operations.
pub type TaxonomyResult<T> = std::result::Result<T, TaxonomyError>;

/// Errors that can occur while classifying failures or configuring the classifier.
///
/// Use the constructor methods, which log automatically:
///
/// ```rust
/// use aws_failure_taxonomy::TaxonomyError;
///
/// let err = TaxonomyError::configuration_error("max_cause_depth must be at least 1");
/// ```
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// The failure is neither a service-side nor a client-side AWS failure.
    ///
    /// This indicates a gap in rule coverage; the original failure is kept
    /// as the source for diagnostics.
    #[error("Unable to categorize failure of type {type_name}: {message}")]
    UnrecognizedFailure {
        /// Concrete type of the original failure.
        type_name: String,
        /// The original failure's message.
        message: String,
        /// The original failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Classifier configuration is invalid.
    #[error("Classifier configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

impl TaxonomyError {
    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    /// Create an unrecognized failure error (logs at ERROR level).
    pub fn unrecognized_failure(failure: OtherFailure) -> Self {
        let message = failure.error.to_string();
        log_error!(
            error_type = "unrecognized_failure",
            failure_type = %failure.type_name,
            message = %message,
            "Unable to categorize exception"
        );
        Self::UnrecognizedFailure {
            type_name: failure.type_name,
            message,
            source: failure.error,
        }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Classifier configuration validation failed"
        );
        Self::ConfigurationError { message }
    }
}

impl CategorizedError for TaxonomyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnrecognizedFailure { .. } => ErrorSeverity::Error,
            Self::ConfigurationError { .. } => ErrorSeverity::Critical,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::UnrecognizedFailure { .. } => {
                "An unexpected failure occurred while calling AWS".to_string()
            }
            Self::ConfigurationError { .. } => {
                "Failure classifier configuration issue. Please check your settings".to_string()
            }
        }
    }
}
