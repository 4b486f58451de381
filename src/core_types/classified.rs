//! The record the classifier hands back for every classified failure.

use super::category::Category;
use super::failure::ServiceFailure;
use std::fmt;

/// What the classified failure was built from.
///
/// Service failures are kept whole. Client failures are re-expressed as
/// their type name and message, since their cause chains only matter while
/// classifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureSource {
    Service(ServiceFailure),
    Raw {
        type_name: String,
        message: Option<String>,
    },
}

impl FailureSource {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Service(failure) => &failure.type_name,
            Self::Raw { type_name, .. } => type_name,
        }
    }
}

/// A failed call's outcome, created exactly once per failure by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    category: Category,
    action: String,
    source: FailureSource,
}

impl ClassifiedFailure {
    pub(crate) fn new(
        category: Category,
        action: impl Into<String>,
        source: FailureSource,
    ) -> Self {
        Self {
            category,
            action: action.into(),
            source,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The action identifier the failed call was made under, e.g. `ec2:DescribeVpcs`.
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn source(&self) -> &FailureSource {
        &self.source
    }

    /// The original service failure, when the failure came from AWS itself.
    pub fn service_failure(&self) -> Option<&ServiceFailure> {
        match &self.source {
            FailureSource::Service(failure) => Some(failure),
            FailureSource::Raw { .. } => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

impl fmt::Display for ClassifiedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.category, self.action)?;
        match &self.source {
            FailureSource::Service(failure) => write!(f, "{}: {failure}", failure.type_name),
            FailureSource::Raw {
                type_name,
                message: Some(message),
            } => write!(f, "{type_name}: {message}"),
            FailureSource::Raw {
                type_name,
                message: None,
            } => f.write_str(type_name),
        }
    }
}
