//! Integration Tests for HTTP Failure Classification
//!
//! UNIT UNDER TEST: http adapters feeding the Classifier
//!
//! BUSINESS RESPONSIBILITY:
//!   - Turn real HTTP error responses from AWS-shaped endpoints into failures
//!   - Classify them into retry-relevant categories with backoff hints
//!   - Treat transport failures (timeouts) as network errors
//!
//! TEST COVERAGE:
//!   - JSON protocol errors (throttling, not found)
//!   - EC2 XML protocol errors (authorization)
//!   - Bodiless gateway errors scoped by action
//!   - Client timeouts, DNS failures, refused and dropped connections
//!   - Paged call results

use aws_failure_taxonomy::{
    classify, Category, CauseKind, Classifier, ClassifierConfig, CloudFailure, ErrorKind,
    FailureSource,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{call_and_capture, closed_port_url, ec2_error, json_error, spawn_hang_up_server};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_json_throttling_is_classified() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(json_error(400, "ThrottlingException", "Rate exceeded"))
        .mount(&server)
        .await;

    // Act
    let failure = call_and_capture(&server.uri(), TIMEOUT).await;
    let classified = classify(failure, "dynamodb:ListTables").unwrap();

    // Assert
    assert_eq!(classified.category(), Category::Throttling);
    assert_eq!(classified.action(), "dynamodb:ListTables");
    assert_eq!(classified.category().backoff_multiplier(), Some(2));
    let service = classified.service_failure().expect("service failure is kept");
    assert_eq!(service.error_code.as_deref(), Some("ThrottlingException"));
    assert_eq!(service.request_id.as_deref(), Some("json-req-1"));
    assert_eq!(service.error_kind, ErrorKind::Client);
}

#[tokio::test]
async fn test_ec2_unauthorized_operation_is_no_access() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ec2_error(
            403,
            "UnauthorizedOperation",
            "You are not authorized to perform this operation.",
        ))
        .mount(&server)
        .await;

    let failure = call_and_capture(&server.uri(), TIMEOUT).await;
    let classified = classify(failure, "ec2:DescribeInstances").unwrap();

    assert_eq!(classified.category(), Category::NoAccess);
    assert_eq!(
        classified
            .service_failure()
            .and_then(|service| service.request_id.as_deref()),
        Some("ec2-req-1")
    );
}

#[tokio::test]
async fn test_lambda_resource_not_found_is_object_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(json_error(
            404,
            "ResourceNotFoundException",
            "Function not found: arn:aws:lambda:us-east-1:123456789012:function:gone",
        ))
        .mount(&server)
        .await;

    let failure = call_and_capture(&server.uri(), TIMEOUT).await;
    let classified = classify(failure, "lambda:GetFunction").unwrap();

    assert_eq!(classified.category(), Category::ObjectNotFound);
    assert!(!classified.is_retryable());
}

#[tokio::test]
async fn test_bare_service_unavailable_is_temporary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let failure = call_and_capture(&server.uri(), TIMEOUT).await;
    let classified = classify(failure, "s3:ListBuckets").unwrap();

    assert_eq!(classified.category(), Category::TemporaryError);
    assert_eq!(classified.category().backoff_multiplier(), Some(1));
}

#[tokio::test]
async fn test_bare_bad_gateway_depends_on_action() {
    // Bodiless 502s are only known to be transient for Lambda listings

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let lambda = classify(
        call_and_capture(&server.uri(), TIMEOUT).await,
        "lambda:ListFunctions",
    )
    .unwrap();
    let ec2 = classify(
        call_and_capture(&server.uri(), TIMEOUT).await,
        "ec2:DescribeVpcs",
    )
    .unwrap();

    assert_eq!(lambda.category(), Category::TemporaryError);
    assert_eq!(ec2.category(), Category::Unknown);
    assert!(matches!(ec2.source(), FailureSource::Service(_)));
}

#[tokio::test]
async fn test_read_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let failure = call_and_capture(&server.uri(), Duration::from_millis(100)).await;
    let classifier = Classifier::new(ClassifierConfig::default()).unwrap();
    let classified = classifier.classify(failure, "sqs:ListQueues").unwrap();

    assert_eq!(classified.category(), Category::NetworkError);
    assert_eq!(classified.category().backoff_multiplier(), None);
    assert_eq!(classifier.multiplier_for(classified.category()), 1);
    match classified.source() {
        FailureSource::Raw { message, .. } => {
            assert!(message.as_deref().unwrap_or_default().contains("Read timed out"));
        }
        other => panic!("Expected raw client record, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_paged_call_failure_and_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(json_error(400, "AccessDeniedException", "User is not authorized"))
        .mount(&server)
        .await;
    let classifier = Classifier::default();

    let failure = call_and_capture(&server.uri(), TIMEOUT).await;
    let failed_page = classifier
        .classify_page(Err(failure), "lambda:ListFunctions")
        .unwrap();
    let last_page = classifier
        .classify_page(Ok(Some(String::new())), "lambda:ListFunctions")
        .unwrap();

    assert_eq!(
        failed_page.exception().map(|exception| exception.category()),
        Some(Category::NoAccess)
    );
    assert_eq!(failed_page.next_page_token(), None);
    assert!(last_page.exception().is_none());
    assert!(!last_page.has_more_pages());
}

fn first_cause_kind(failure: &CloudFailure) -> Option<CauseKind> {
    match failure {
        CloudFailure::Client(client) => client.causes(1).next().map(|cause| cause.kind),
        _ => None,
    }
}

#[tokio::test]
async fn test_unresolvable_host_is_network_error() {
    // Arrange
    let url = "http://does-not-exist.invalid/";

    // Act
    let failure = call_and_capture(url, TIMEOUT).await;
    let cause = first_cause_kind(&failure);
    let classified = classify(failure, "ec2:DescribeRegions").unwrap();

    // Assert
    assert_eq!(cause, Some(CauseKind::UnknownHost));
    assert_eq!(classified.category(), Category::NetworkError);
    assert!(matches!(classified.source(), FailureSource::Raw { .. }));
}

#[tokio::test]
async fn test_refused_connection_is_unknown() {
    // Refusals are not treated as transient network trouble

    let failure = call_and_capture(&closed_port_url(), TIMEOUT).await;
    let cause = first_cause_kind(&failure);
    let classified = classify(failure, "ec2:DescribeRegions").unwrap();

    assert_eq!(cause, Some(CauseKind::ConnectionRefused));
    assert_eq!(classified.category(), Category::Unknown);
    match classified.source() {
        FailureSource::Raw { type_name, message } => {
            assert_eq!(type_name, "reqwest::Error");
            assert!(message.is_some());
        }
        other => panic!("Expected raw client record, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_closed_without_response_is_network_error() {
    let url = spawn_hang_up_server(false).await;

    let failure = call_and_capture(&url, TIMEOUT).await;
    let classified = classify(failure, "s3:ListBuckets").unwrap();

    assert_eq!(classified.category(), Category::NetworkError);
    assert!(matches!(classified.source(), FailureSource::Raw { .. }));
}

#[tokio::test]
async fn test_connection_reset_is_network_error() {
    let url = spawn_hang_up_server(true).await;

    let failure = call_and_capture(&url, TIMEOUT).await;
    let classified = classify(failure, "s3:ListBuckets").unwrap();

    assert_eq!(classified.category(), Category::NetworkError);
}
