//! Adapters from `reqwest` outcomes to [`CloudFailure`]s.
//!
//! AWS endpoints report errors in two body formats:
//! - JSON protocol services: `{"__type": "namespace#Code", "message": "..."}`
//! - Query/EC2 protocol services: `<Error><Code>..</Code><Message>..</Message></Error>`
//!
//! Responses whose body carries neither shape become a [`ServiceFailure`] with
//! no code, no message and [`ErrorKind::Unknown`], which is how AWS reports bare
//! gateway errors.

use crate::core_types::{
    CauseKind, ClientFailure, CloudFailure, ErrorKind, FailureCause, ServiceFailure,
};
use crate::logging::{log_debug, log_warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::error::Error as StdError;

const REQUEST_ID_HEADERS: [&str; 2] = ["x-amzn-requestid", "x-amz-request-id"];
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";
const READ_TIMED_OUT: &str = "Unable to execute HTTP request: Read timed out";
const CONNECT_TIMED_OUT: &str = "Unable to execute HTTP request: Connect timed out";
const CONNECTION_RESET: &str = "Unable to execute HTTP request: Connection reset";

static XML_CODE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)<Code>\s*(.*?)\s*</Code>").ok());
static XML_MESSAGE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)<Message>\s*(.*?)\s*</Message>").ok());
static XML_REQUEST_ID: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)<Request(?:Id|ID)>\s*(.*?)\s*</Request(?:Id|ID)>").ok());
static XML_ENTITY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").ok());

/// Build a failure from a non-success AWS response, consuming its body.
pub async fn failure_from_response(response: reqwest::Response) -> CloudFailure {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            log_warn!(
                status_code = status,
                error = %e,
                "Failed to read AWS error response body"
            );
            String::new()
        }
    };

    CloudFailure::Service(service_failure_from_parts(status, &headers, &body))
}

/// Build a [`ServiceFailure`] from an already-read AWS error response.
pub fn service_failure_from_parts(status: u16, headers: &HeaderMap, body: &str) -> ServiceFailure {
    let parsed = parse_json_error(body).or_else(|| parse_xml_error(body));
    let header_code = header_str(headers, ERROR_TYPE_HEADER).map(|raw| strip_error_type(&raw));

    let (code, message, body_request_id) = match parsed {
        Some(parsed) => (parsed.code.or(header_code), parsed.message, parsed.request_id),
        None => (header_code, None, None),
    };

    let error_kind = match (&code, status) {
        (None, _) => ErrorKind::Unknown,
        (Some(_), 500..=599) => ErrorKind::Service,
        (Some(_), 400..=499) => ErrorKind::Client,
        (Some(_), _) => ErrorKind::Unknown,
    };

    let mut failure = ServiceFailure::new(status, error_kind);
    if let Some(code) = code {
        failure = failure.with_type_name(code.clone()).with_code(code);
    }
    if let Some(message) = message {
        failure = failure.with_message(message);
    }
    let request_id = REQUEST_ID_HEADERS
        .iter()
        .find_map(|name| header_str(headers, name))
        .or(body_request_id);
    if let Some(request_id) = request_id {
        failure = failure.with_request_id(request_id);
    }

    log_debug!(
        status_code = status,
        error_code = ?failure.error_code,
        error_kind = ?failure.error_kind,
        "Parsed AWS error response"
    );
    failure
}

/// Build a client-side failure from a transport error.
///
/// An error that carries an HTTP status (from `error_for_status`) never had a
/// readable body and becomes a bare [`ServiceFailure`] instead.
pub fn failure_from_reqwest(error: reqwest::Error) -> CloudFailure {
    if let Some(status) = error.status() {
        return CloudFailure::Service(ServiceFailure::new(status.as_u16(), ErrorKind::Unknown));
    }

    let mut failure = ClientFailure::new().with_type_name("reqwest::Error");

    if error.is_timeout() && error.is_connect() {
        failure = failure.with_message(CONNECT_TIMED_OUT).caused_by(
            FailureCause::new(CauseKind::ConnectTimeout)
                .caused_by(FailureCause::new(CauseKind::SocketTimeout)),
        );
    } else if error.is_timeout() {
        failure = failure.with_message(READ_TIMED_OUT);
    } else if has_io_kind(&error, std::io::ErrorKind::ConnectionReset) {
        failure = failure.with_message(CONNECTION_RESET);
    } else {
        failure = failure.with_message(format!("Unable to execute HTTP request: {error}"));
        if let Some(cause) = connect_cause(&error) {
            failure = failure.caused_by(cause);
        }
    }

    CloudFailure::Client(failure)
}

struct ParsedError {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

fn parse_json_error(body: &str) -> Option<ParsedError> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| object.get(*name).and_then(Value::as_str))
            .map(str::to_string)
    };

    let code = field(&["__type", "code", "Code"]).map(|code| strip_error_type(&code));
    let message = field(&["message", "Message", "errorMessage"]);
    if code.is_none() && message.is_none() {
        return None;
    }
    Some(ParsedError {
        code,
        message,
        request_id: field(&["RequestId", "requestId"]),
    })
}

fn parse_xml_error(body: &str) -> Option<ParsedError> {
    let capture = |regex: &Option<Regex>| {
        regex
            .as_ref()
            .and_then(|regex| regex.captures(body))
            .and_then(|captures| captures.get(1))
            .map(|m| decode_xml_entities(m.as_str()))
    };

    let code = capture(&*XML_CODE);
    let message = capture(&*XML_MESSAGE);
    if code.is_none() && message.is_none() {
        return None;
    }
    Some(ParsedError {
        code,
        message,
        request_id: capture(&*XML_REQUEST_ID),
    })
}

/// Decode the predefined XML entities and numeric character references in one
/// pass, so `&amp;lt;` becomes `&lt;` and not `<`.
fn decode_xml_entities(text: &str) -> String {
    let Some(regex) = (*XML_ENTITY).as_ref() else {
        return text.to_string();
    };
    regex
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let entity = &captures[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .unwrap_or_else(|| entity[1..].parse::<u32>())
                    .ok()
                    .and_then(char::from_u32),
            };
            // Unknown or invalid references are left as written
            decoded.map_or_else(|| captures[0].to_string(), String::from)
        })
        .into_owned()
}

/// `aws.namespace#ThrottlingException:http://...` -> `ThrottlingException`
fn strip_error_type(raw: &str) -> String {
    let without_namespace = raw.rsplit('#').next().unwrap_or(raw);
    without_namespace
        .split(':')
        .next()
        .unwrap_or(without_namespace)
        .trim()
        .to_string()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn sources<'a>(error: &'a reqwest::Error) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(error.source(), |&e| e.source())
}

fn has_io_kind(error: &reqwest::Error, kind: std::io::ErrorKind) -> bool {
    sources(error).any(|e| {
        e.downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == kind)
    })
}

fn connect_cause(error: &reqwest::Error) -> Option<FailureCause> {
    for source in sources(error) {
        let text = source.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return Some(FailureCause::new(CauseKind::UnknownHost).with_message(text));
        }
        if text.contains("connection closed before message completed") {
            return Some(FailureCause::new(CauseKind::NoHttpResponse).with_message(text));
        }
        if let Some(io) = source.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return Some(FailureCause::new(CauseKind::ConnectionRefused).with_message(text));
            }
        }
    }
    sources(error)
        .last()
        .map(|source| FailureCause::new(CauseKind::Other).with_message(source.to_string()))
}
