//! # Bodytap Core
//!
//! Log HTTP bodies without leaking credentials and without stealing the body
//! from the handler.
//!
//! Two building blocks, used one after the other by a logging middleware:
//!
//! - **[`capture()`]** drains a body stream once, returns its content as text
//!   and a [`Replay`] yielding the exact same bytes for the next reader;
//! - **[`BodyRedactor`]** masks the string values of sensitive fields
//!   (`"password"`, `"token"`, ...) in that text with [`MASK`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Read;
//! use bodytap_core::{BodyRedactor, capture};
//!
//! let incoming = std::io::Cursor::new(r#"{"username":"alice","password":"secret123"}"#);
//! let redactor = BodyRedactor::default();
//!
//! let captured = capture(Some(incoming));
//! let logged = redactor.redact(&captured.text);
//! assert_eq!(logged, r#"{"username":"alice","password":"***"}"#);
//!
//! // the downstream handler still sees the original body
//! let mut body = String::new();
//! captured.replay.expect("a body was sent").read_to_string(&mut body)?;
//! assert_eq!(body, r#"{"username":"alice","password":"secret123"}"#);
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Configuration
//!
//! The sensitive fields are fixed when building the redactor:
//!
//! ```rust
//! use bodytap_core::BodyRedactor;
//!
//! let redactor = BodyRedactor::builder()
//!     .with_fields(["password", "otp"])
//!     .build()?;
//!
//! assert_eq!(redactor.redact(r#"{"OTP":"123456"}"#), r#"{"OTP":"***"}"#);
//! # Ok::<(), bodytap_core::ConfigError>(())
//! ```
//!
//! [`SensitiveFields`] also deserializes from a list of strings, to embed it
//! in an application configuration.
//!
//! ## Features
//!
//! - `async`: [`capture_async`] over [`tokio::io::AsyncRead`], and [`Replay`] implements it
//! - `axum`: [`capture_body`] over [`axum::body::Body`] and the [`middleware`] module
//!
//! ## Limits
//!
//! The redactor does not parse JSON. It masks string values only: a number,
//! a boolean or a nested object after a sensitive field is kept as is. Input
//! it cannot make sense of is never an error, it just stays unmasked.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod capture;
mod error;
mod filter;
mod redaction;
mod summary;

#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
pub mod middleware;

pub use self::capture::{Captured, Replay, capture, try_capture};
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub use self::capture::{capture_async, try_capture_async};
#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
pub use self::capture::{capture_body, try_capture_body};
pub use self::error::{CaptureError, ConfigError};
pub use self::filter::{BodyFilter, DEFAULT_BINARY_TYPES};
pub use self::redaction::{
    BodyRedactor, BodyRedactorBuilder, DEFAULT_SENSITIVE_FIELDS, MASK, SensitiveFields,
};
pub use self::summary::FormSummary;
