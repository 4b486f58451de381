//! Shared error traits and severity levels

/// Base trait for errors that carry routing metadata
pub trait CategorizedError: std::error::Error + Send + Sync + 'static {
    /// Severity for logging and alerting
    fn severity(&self) -> ErrorSeverity;

    /// Whether the operation that produced this error should be retried
    fn is_retryable(&self) -> bool {
        false
    }

    /// Convert to an operator-friendly message (strips technical details)
    fn user_message(&self) -> String {
        "An error occurred while calling the cloud provider".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// System is unusable
    Critical,
    /// Action failed but system is stable
    Error,
    /// Unexpected but recoverable
    Warning,
    /// Expected failure (e.g., not found)
    Info,
}
