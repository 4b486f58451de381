//! Test helper utilities for aws-failure-taxonomy integration tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use aws_failure_taxonomy::http::{failure_from_reqwest, failure_from_response};
use aws_failure_taxonomy::CloudFailure;
use std::time::Duration;
use wiremock::ResponseTemplate;

/// Issue a GET against `url` and turn any non-success outcome into a failure.
///
/// # Panics
///
/// Panics if the call succeeds (test failure is appropriate).
pub async fn call_and_capture(url: &str, timeout: Duration) -> CloudFailure {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("client should build");

    match client.get(url).send().await {
        Ok(response) if !response.status().is_success() => failure_from_response(response).await,
        Ok(response) => panic!("Expected a failed call, got status {}", response.status()),
        Err(error) => failure_from_reqwest(error),
    }
}

/// JSON protocol error body as sent by DynamoDB, Lambda and friends.
pub fn json_error(status: u16, error_type: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("x-amzn-requestid", "json-req-1")
        .set_body_raw(
            format!(r#"{{"__type":"com.amazonaws#{error_type}","message":"{message}"}}"#),
            "application/x-amz-json-1.0",
        )
}

/// EC2 protocol error body.
pub fn ec2_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Response><Errors><Error>\
             <Code>{code}</Code><Message>{message}</Message>\
             </Error></Errors>\
             <RequestID>ec2-req-1</RequestID></Response>"
        ),
        "text/xml",
    )
}

/// Serve one connection per request: read the request head, then hang up
/// without answering. With `reset`, hang up with a TCP RST instead of a FIN.
pub async fn spawn_hang_up_server(reset: bool) -> String {
    use tokio::io::AsyncReadExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            if reset {
                #[allow(deprecated)]
                let _ = stream.set_linger(Some(Duration::ZERO));
            }
            drop(stream);
        }
    });

    format!("http://{address}/")
}

/// Loopback URL whose port has no listener.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().expect("listener has an address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
