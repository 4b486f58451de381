//! Core types for AWS failure classification
//!
//! ## Organization
//! - `category` - The closed category taxonomy and its backoff hints
//! - `failure` - Failure shapes handed to the classifier
//! - `classified` - The record the classifier returns
//! - `page` - Paged call outcome with continuation token normalization
//! - `errors` - Error traits and severity levels

pub mod category;
pub mod classified;
pub mod errors;
pub mod failure;
pub mod page;

// Re-export commonly used types
pub use category::Category;
pub use classified::{ClassifiedFailure, FailureSource};
pub use errors::{CategorizedError, ErrorSeverity};
pub use failure::{
    CauseKind, Causes, ClientFailure, CloudFailure, ErrorKind, FailureCause, OtherFailure,
    ServiceFailure,
};
pub use page::PageResult;
