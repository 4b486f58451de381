//! The closed taxonomy every classified failure lands in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ErrorSeverity;

/// Outcome class of a failed AWS API call.
///
/// Callers use the category to pick a retry policy: back off and retry,
/// skip a resource that no longer exists, surface a permissions problem,
/// or give up on a failure nobody has seen before.
///
/// | Variant | Multiplier | Retryable |
/// |---------|------------|-----------|
/// | `NoAccess` | 2 | No |
/// | `Throttling` | 2 | Yes |
/// | `ServiceDisabled` | 2 | No |
/// | `ObjectNotFound` | 2 | No |
/// | `TemporaryError` | 1 | Yes |
/// | `NetworkError` | caller-defined | Yes |
/// | `Unknown` | caller-defined | No |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Access denied, unauthorized operation, or invalid credentials.
    NoAccess,
    /// The provider is rate limiting this account.
    Throttling,
    /// Feature, subscription, region or legacy platform unavailable for the account.
    ServiceDisabled,
    /// The resource the call referred to does not exist (any more).
    ObjectNotFound,
    /// Internal provider failure or bare gateway error; retry soon.
    TemporaryError,
    /// The request never produced a structured response (timeouts, DNS, resets).
    NetworkError,
    /// Recognized as a provider failure but matched no rule.
    Unknown,
}

impl Category {
    /// Every category, in rule evaluation order.
    pub const ALL: [Category; 7] = [
        Category::NoAccess,
        Category::Throttling,
        Category::ServiceDisabled,
        Category::ObjectNotFound,
        Category::TemporaryError,
        Category::NetworkError,
        Category::Unknown,
    ];

    /// Fixed backoff multiplier hint.
    ///
    /// `None` for [`NetworkError`](Self::NetworkError) and
    /// [`Unknown`](Self::Unknown): the caller decides those. See
    /// [`ClassifierConfig::multiplier_for`](crate::config::ClassifierConfig::multiplier_for).
    pub const fn backoff_multiplier(self) -> Option<u32> {
        match self {
            Self::NoAccess | Self::Throttling | Self::ServiceDisabled | Self::ObjectNotFound => {
                Some(2)
            }
            Self::TemporaryError => Some(1),
            Self::NetworkError | Self::Unknown => None,
        }
    }

    /// Whether a later attempt of the same call can reasonably succeed.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Throttling | Self::TemporaryError | Self::NetworkError
        )
    }

    /// Severity the caller should log this outcome at.
    pub const fn severity(self) -> ErrorSeverity {
        match self {
            Self::ObjectNotFound => ErrorSeverity::Info,
            Self::Throttling | Self::TemporaryError | Self::NetworkError => ErrorSeverity::Warning,
            Self::NoAccess | Self::ServiceDisabled | Self::Unknown => ErrorSeverity::Error,
        }
    }

    /// Canonical label, identical to the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoAccess => "NO_ACCESS",
            Self::Throttling => "THROTTLING",
            Self::ServiceDisabled => "SERVICE_DISABLED",
            Self::ObjectNotFound => "OBJECT_NOT_FOUND",
            Self::TemporaryError => "TEMPORARY_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown failure category: {s}"))
    }
}
