//! Axum middleware logging request (and optionally response) bodies, masked.
//!
//! ```rust,no_run
//! use axum::Router;
//! use axum::routing::post;
//! use bodytap_core::BodyRedactor;
//! use bodytap_core::middleware::{BodyLogger, log_http_body};
//!
//! # fn example() -> Result<(), bodytap_core::ConfigError> {
//! let redactor = BodyRedactor::builder().add_field("pin").build()?;
//! let logger = BodyLogger::new(redactor);
//!
//! let app: Router = Router::new()
//!     .route("/login", post(|body: String| async move { body }))
//!     .layer(axum::middleware::from_fn_with_state(logger, log_http_body));
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use crate::{BodyFilter, BodyRedactor, capture_body};

/// Configuration of the [`log_http_body`] middleware.
#[derive(Debug, Clone, Default)]
pub struct BodyLogger {
    redactor: BodyRedactor,
    filter: BodyFilter,
    response_body: bool,
}

impl BodyLogger {
    /// Creates a logger masking with `redactor`, with the default [`BodyFilter`],
    /// logging request bodies only.
    #[must_use]
    pub fn new(redactor: BodyRedactor) -> Self {
        Self {
            redactor,
            ..Self::default()
        }
    }

    /// Sets the filter deciding which bodies are logged.
    #[must_use]
    pub fn with_filter(mut self, filter: BodyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Also captures, masks and logs response bodies.
    #[must_use]
    pub fn with_response_body(mut self, enabled: bool) -> Self {
        self.response_body = enabled;
        self
    }

    /// The redactor used on logged bodies.
    #[must_use]
    pub fn redactor(&self) -> &BodyRedactor {
        &self.redactor
    }

    /// The text to log for a captured body, `None` if empty or filtered out.
    #[must_use]
    pub fn loggable_body(&self, content_type: Option<&str>, text: &str) -> Option<String> {
        if text.is_empty() || !self.filter.should_log(content_type, text) {
            return None;
        }
        Some(self.redactor.redact(text).into_owned())
    }

    async fn capture(&self, headers: &HeaderMap, body: Body) -> (Option<String>, Body) {
        let (text, body) = capture_body(body).await;
        let logged = self.loggable_body(content_type(headers), &text);
        (logged, body)
    }
}

/// Logs each exchange with its masked body, leaving the bodies untouched for
/// the handler and the client.
///
/// Emits one `info` event per request with `method`, `path`, `query`,
/// `status`, `duration`, `user_agent`, and `body` / `response_body` when they
/// are logged. `client_ip` is filled when the server is started with
/// [`axum::Router::into_make_service_with_connect_info`].
/// Install it with [`axum::middleware::from_fn_with_state`].
pub async fn log_http_body(
    State(logger): State<BodyLogger>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let (parts, body) = request.into_parts();
    let (body_log, body) = logger.capture(&parts.headers, body).await;
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().unwrap_or_default().to_string();
    let user_agent = header_str(&parts.headers, &header::USER_AGENT).map(str::to_string);
    let client_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let response = next.run(Request::from_parts(parts, body)).await;

    let (response, response_log) = if logger.response_body {
        let (parts, body) = response.into_parts();
        let (response_log, body) = logger.capture(&parts.headers, body).await;
        (Response::from_parts(parts, body), response_log)
    } else {
        (response, None)
    };

    let duration = start.elapsed();
    info!(
        %method,
        %path,
        %query,
        status = response.status().as_u16(),
        ?duration,
        user_agent = user_agent.as_deref(),
        client_ip = client_ip.map(tracing::field::display),
        body = body_log.as_deref(),
        response_body = response_log.as_deref(),
        "HTTP request"
    );

    response
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, &header::CONTENT_TYPE)
}

fn header_str(headers: &HeaderMap, name: &header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
