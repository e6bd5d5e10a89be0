#![allow(missing_docs, clippy::expect_used)]

//! End-to-end checks of the logging middleware on a real server.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use rstest::rstest;
use tokio::net::TcpListener;
use tracing::subscriber::DefaultGuard;

use bodytap_core::BodyRedactor;
use bodytap_core::middleware::{BodyLogger, log_http_body};

const USER_AGENT: &str = "bodytap-tests/1.0";

const LOGIN: &str = r#"{"username":"alice","password":"secret123"}"#;

/// Collects everything the subscriber writes.
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer lock").clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs a subscriber for the current thread, the test runtime is single threaded.
fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

async fn echo(body: String) -> (StatusCode, String) {
    (StatusCode::OK, body)
}

async fn start(logger: BodyLogger) -> anyhow::Result<SocketAddr> {
    let app = Router::new()
        .route("/echo", post(echo))
        .layer(from_fn_with_state(logger, log_http_body));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("binding test listener")?;
    let addr = listener.local_addr().context("reading local address")?;
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("server should run");
    });

    Ok(addr)
}

async fn post_echo(addr: SocketAddr, content_type: &str, body: &str) -> anyhow::Result<String> {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .header("content-type", content_type)
        .header("user-agent", USER_AGENT)
        .body(body.to_string())
        .send()
        .await
        .context("sending request")?;
    let text = response.text().await.context("reading response")?;
    Ok(text)
}

#[tokio::test]
async fn should_hand_original_body_to_handler() -> anyhow::Result<()> {
    let addr = start(BodyLogger::default()).await?;

    let echoed = post_echo(addr, "application/json", LOGIN).await?;

    assert_eq!(echoed, LOGIN);
    Ok(())
}

#[tokio::test]
async fn should_log_masked_request_body() -> anyhow::Result<()> {
    let (logs, _guard) = capture_logs();
    let addr = start(BodyLogger::default()).await?;

    post_echo(addr, "application/json", LOGIN).await?;

    let logs = logs.contents();
    assert!(logs.contains("HTTP request"), "missing event in {logs}");
    assert!(logs.contains("alice"), "missing body in {logs}");
    assert!(logs.contains("***"), "missing mask in {logs}");
    assert!(!logs.contains("secret123"), "leaked secret in {logs}");
    Ok(())
}

#[tokio::test]
async fn should_log_client_details() -> anyhow::Result<()> {
    let (logs, _guard) = capture_logs();
    let addr = start(BodyLogger::default()).await?;

    post_echo(addr, "application/json", LOGIN).await?;

    let logs = logs.contents();
    assert!(logs.contains(USER_AGENT), "missing user agent in {logs}");
    assert!(logs.contains("client_ip=127.0.0.1"), "missing client ip in {logs}");
    Ok(())
}

#[tokio::test]
async fn should_log_masked_response_body_when_enabled() -> anyhow::Result<()> {
    let (logs, _guard) = capture_logs();
    let logger = BodyLogger::new(BodyRedactor::default()).with_response_body(true);
    let addr = start(logger).await?;

    let echoed = post_echo(addr, "application/json", r#"{"token":"t-1"}"#).await?;

    assert_eq!(echoed, r#"{"token":"t-1"}"#);
    let logs = logs.contents();
    assert!(logs.contains("response_body"), "missing response body in {logs}");
    assert!(logs.contains("***"), "missing mask in {logs}");
    assert!(!logs.contains("t-1"), "leaked token in {logs}");
    Ok(())
}

#[rstest]
#[case::multipart("multipart/form-data; boundary=xyz")]
#[case::binary("application/octet-stream")]
#[tokio::test]
async fn should_not_log_filtered_body(#[case] content_type: &str) -> anyhow::Result<()> {
    let (logs, _guard) = capture_logs();
    let addr = start(BodyLogger::default()).await?;

    let echoed = post_echo(addr, content_type, "raw-content").await?;

    assert_eq!(echoed, "raw-content");
    let logs = logs.contents();
    assert!(logs.contains("HTTP request"), "missing event in {logs}");
    assert!(!logs.contains("raw-content"), "logged filtered body in {logs}");
    Ok(())
}
