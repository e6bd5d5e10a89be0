//! Drain a body once, keep a replay for whoever reads it next.
//!
//! A body stream can only be read once. To log it, the middleware reads it
//! completely, keeps the text for the log, and hands a [`Replay`] of the same
//! bytes back to the request pipeline.
//!
//! The stream is taken by value and dropped (closed) before returning, pass
//! ownership of the stream, not a `&mut` to it.
//!
//! # Failure policy
//!
//! [`capture`] never fails: a read error is logged with `tracing` and gives an
//! empty [`Captured`] without replay. Instrumentation must never be the reason
//! a request fails. The drawback is that the caller cannot tell a broken
//! stream from an absent one, use [`try_capture`] when that matters.
//!
//! # Example
//!
//! ```rust
//! use std::io::Read;
//! use bodytap_core::capture;
//!
//! let stream = std::io::Cursor::new(b"hello world".to_vec());
//!
//! let captured = capture(Some(stream));
//! assert_eq!(captured.text, "hello world");
//!
//! let mut replayed = String::new();
//! captured.replay.expect("stream was present").read_to_string(&mut replayed)?;
//! assert_eq!(replayed, "hello world");
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::Read;

use bytes::Bytes;
use tracing::{trace, warn};

use crate::CaptureError;

mod replay;

pub use self::replay::Replay;

#[cfg(feature = "axum")]
mod body;

#[cfg(feature = "axum")]
pub use self::body::{capture_body, try_capture_body};

/// The outcome of a capture: the content as text and a replay of the raw bytes.
///
/// `replay` is `None` when there was no stream or when reading it failed.
/// A present but empty stream gives an empty text and an exhausted replay.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    /// The content decoded as UTF-8, invalid sequences replaced by `U+FFFD`.
    ///
    /// Only the text is lossy, the replay keeps the original bytes.
    pub text: String,
    /// A fresh stream yielding the captured bytes.
    pub replay: Option<Replay>,
}

impl Captured {
    fn from_bytes(bytes: Bytes) -> Self {
        trace!(len = bytes.len(), "body captured");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let replay = Some(Replay::new(bytes));
        Self { text, replay }
    }

    /// Splits into the text and the replay.
    #[must_use]
    pub fn into_parts(self) -> (String, Option<Replay>) {
        (self.text, self.replay)
    }
}

/// Drains `stream`, returning its content and a replay of it.
///
/// `None` gives an empty text and no replay. See the [module documentation](self)
/// for the failure policy.
pub fn capture<R>(stream: Option<R>) -> Captured
where
    R: Read,
{
    let Some(stream) = stream else {
        return Captured::default();
    };

    try_capture(stream).unwrap_or_else(|error| {
        warn!(?error, "fail to capture body, skipping it");
        Captured::default()
    })
}

/// Drains `stream`, returning its content and a replay of it.
///
/// The stream is dropped before returning, whatever the outcome.
///
/// # Errors
///
/// Fails if reading the stream fails, the bytes read so far are discarded.
pub fn try_capture<R>(mut stream: R) -> Result<Captured, CaptureError>
where
    R: Read,
{
    let mut buffer = Vec::new();
    let read = stream.read_to_end(&mut buffer);
    drop(stream);
    read?;

    Ok(Captured::from_bytes(Bytes::from(buffer)))
}

/// Asynchronous version of [`capture`].
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub async fn capture_async<R>(stream: Option<R>) -> Captured
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return Captured::default();
    };

    match try_capture_async(stream).await {
        Ok(captured) => captured,
        Err(error) => {
            warn!(?error, "fail to capture body, skipping it");
            Captured::default()
        }
    }
}

/// Asynchronous version of [`try_capture`].
///
/// # Errors
///
/// Fails if reading the stream fails, the bytes read so far are discarded.
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub async fn try_capture_async<R>(mut stream: R) -> Result<Captured, CaptureError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut buffer = Vec::new();
    let read = stream.read_to_end(&mut buffer).await;
    drop(stream);
    read?;

    Ok(Captured::from_bytes(Bytes::from(buffer)))
}
