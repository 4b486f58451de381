//! # aws-failure-taxonomy
//!
//! Normalizes vendor-specific AWS API failures into a small, stable taxonomy
//! of retry-relevant categories.
//!
//! ## Key Features
//!
//! - **Ordered rule table**: error codes, messages, HTTP statuses and action
//!   identifiers mapped to categories as auditable data
//! - **Network failure detection**: client-side failures classified by message
//!   and by a depth-bounded walk of their cause chain
//! - **Backoff hints**: every category carries a multiplier the caller applies
//! - **HTTP adapters**: failures extracted from `reqwest` responses and errors
//!
//! The crate only classifies. It never retries, sleeps or schedules.
//!
//! ## Example
//!
//! ```rust
//! use aws_failure_taxonomy::{classify, Category, CloudFailure, ErrorKind, ServiceFailure};
//!
//! # fn example() -> anyhow::Result<()> {
//! let failure = ServiceFailure::new(400, ErrorKind::Client)
//!     .with_code("ThrottlingException")
//!     .with_message("Rate exceeded");
//!
//! let classified = classify(CloudFailure::from(failure), "dynamodb:ListTables")?;
//! assert_eq!(classified.category(), Category::Throttling);
//! assert_eq!(classified.category().backoff_multiplier(), Some(2));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod rules;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use classifier::{classify, Classifier};
pub use config::{BackoffHints, ClassifierConfig};
pub use error::{TaxonomyError, TaxonomyResult};
pub use rules::{ClassificationInput, ClientRule, Rule, RuleGroup, RuleTable};

pub use core_types::{
    CategorizedError,
    // Taxonomy
    Category,
    CauseKind,
    // Classification output
    ClassifiedFailure,
    // Failure shapes
    ClientFailure,
    CloudFailure,
    ErrorKind,
    ErrorSeverity,
    FailureCause,
    FailureSource,
    OtherFailure,
    PageResult,
    ServiceFailure,
};
