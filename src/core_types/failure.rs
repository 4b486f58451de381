//! Failure shapes handed to the classifier.
//!
//! A failed AWS call ends in one of three shapes:
//! - [`ServiceFailure`]: the request reached AWS and came back with a
//!   structured error (code, message, HTTP status, error kind)
//! - [`ClientFailure`]: the request never produced a structured error body
//!   (timeouts, DNS failures, connection resets); it carries a cause chain
//! - [`OtherFailure`]: anything else, which the classifier refuses to guess at
//!
//! [`CloudFailure`] is the tagged union over the three.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side AWS blamed for a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The caller sent something AWS rejected (4xx class).
    Client,
    /// AWS failed to process a valid request (5xx class).
    Service,
    /// AWS did not say.
    Unknown,
}

const DEFAULT_SERVICE_TYPE_NAME: &str = "AmazonServiceException";
const DEFAULT_CLIENT_TYPE_NAME: &str = "AmazonClientException";

/// A structured error returned by an AWS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    /// Concrete failure type, e.g. `QueueDoesNotExistException`.
    pub type_name: String,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub status_code: u16,
    pub error_kind: ErrorKind,
    /// Diagnostic only; rules never look at it.
    pub service_name: Option<String>,
    /// Diagnostic only; rules never look at it.
    pub request_id: Option<String>,
}

impl ServiceFailure {
    pub fn new(status_code: u16, error_kind: ErrorKind) -> Self {
        Self {
            type_name: DEFAULT_SERVICE_TYPE_NAME.to_string(),
            error_code: None,
            error_message: None,
            status_code,
            error_kind,
            service_name: None,
            request_id: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_service(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_null = |value: &Option<String>| value.clone().unwrap_or_else(|| "null".to_string());
        write!(
            f,
            "{} (Service: {}; Status Code: {}; Error Code: {}; Request ID: {})",
            or_null(&self.error_message),
            or_null(&self.service_name),
            self.status_code,
            or_null(&self.error_code),
            or_null(&self.request_id),
        )
    }
}

impl std::error::Error for ServiceFailure {}

/// Kind of a link in a client failure's cause chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CauseKind {
    /// Establishing the TCP/TLS connection timed out.
    ConnectTimeout,
    /// A socket read or connect exceeded its timeout.
    SocketTimeout,
    /// The server accepted the connection but sent no HTTP response.
    NoHttpResponse,
    /// DNS resolution failed.
    UnknownHost,
    /// The server refused the connection.
    ConnectionRefused,
    Other,
}

/// One link of a client failure's cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureCause {
    pub kind: CauseKind,
    pub message: Option<String>,
    pub cause: Option<Box<FailureCause>>,
}

impl FailureCause {
    pub fn new(kind: CauseKind) -> Self {
        Self {
            kind,
            message: None,
            cause: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the next, deeper link of the chain.
    pub fn caused_by(mut self, cause: FailureCause) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{:?}: {message}", self.kind),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl std::error::Error for FailureCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// A failure raised on the caller's side before any structured response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFailure {
    pub type_name: String,
    pub message: Option<String>,
    pub cause: Option<Box<FailureCause>>,
}

impl ClientFailure {
    pub fn new() -> Self {
        Self {
            type_name: DEFAULT_CLIENT_TYPE_NAME.to_string(),
            message: None,
            cause: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn caused_by(mut self, cause: FailureCause) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Walk the cause chain outward-in, visiting at most `max_depth` links.
    pub fn causes(&self, max_depth: usize) -> Causes<'_> {
        Causes {
            next: self.cause.as_deref(),
            remaining: max_depth,
        }
    }
}

impl Default for ClientFailure {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.type_name),
            None => f.write_str(&self.type_name),
        }
    }
}

impl std::error::Error for ClientFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Depth-bounded iterator over a [`ClientFailure`]'s cause chain.
pub struct Causes<'a> {
    next: Option<&'a FailureCause>,
    remaining: usize,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a FailureCause;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = current.cause.as_deref();
        Some(current)
    }
}

/// Any failure that is neither a service nor a client failure.
#[derive(Debug)]
pub struct OtherFailure {
    pub type_name: String,
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

impl OtherFailure {
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<E>().to_string(),
            error: Box::new(error),
        }
    }
}

impl From<anyhow::Error> for OtherFailure {
    fn from(error: anyhow::Error) -> Self {
        Self {
            type_name: "anyhow::Error".to_string(),
            error: error.into(),
        }
    }
}

impl fmt::Display for OtherFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for OtherFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// Tagged union over every failure shape a wrapped AWS call can produce.
#[derive(Debug, thiserror::Error)]
pub enum CloudFailure {
    #[error(transparent)]
    Service(ServiceFailure),
    #[error(transparent)]
    Client(ClientFailure),
    #[error(transparent)]
    Other(OtherFailure),
}

impl CloudFailure {
    /// Concrete type name of the underlying failure.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Service(failure) => &failure.type_name,
            Self::Client(failure) => &failure.type_name,
            Self::Other(failure) => &failure.type_name,
        }
    }

    /// The failure's own message, without the type name prefix.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Service(failure) => Some(failure.to_string()),
            Self::Client(failure) => failure.message.clone(),
            Self::Other(failure) => Some(failure.error.to_string()),
        }
    }
}

impl From<ServiceFailure> for CloudFailure {
    fn from(failure: ServiceFailure) -> Self {
        Self::Service(failure)
    }
}

impl From<ClientFailure> for CloudFailure {
    fn from(failure: ClientFailure) -> Self {
        Self::Client(failure)
    }
}

impl From<OtherFailure> for CloudFailure {
    fn from(failure: OtherFailure) -> Self {
        Self::Other(failure)
    }
}

impl From<anyhow::Error> for CloudFailure {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.into())
    }
}
