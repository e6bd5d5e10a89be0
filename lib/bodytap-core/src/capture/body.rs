use axum::body::Body;
use tracing::warn;

use super::{Captured, Replay};
use crate::CaptureError;

/// Collects an HTTP body, returning its text and a body to put back in place.
///
/// On failure the text is empty and the returned body is empty too: the
/// original frames are gone and cannot be restored.
pub async fn capture_body(body: Body) -> (String, Body) {
    match try_capture_body(body).await {
        Ok(captured) => captured.into_body_parts(),
        Err(error) => {
            warn!(?error, "fail to capture body, skipping it");
            (String::new(), Body::empty())
        }
    }
}

/// Collects an HTTP body into a [`Captured`].
///
/// # Errors
///
/// Fails if a body frame cannot be polled.
pub async fn try_capture_body(body: Body) -> Result<Captured, CaptureError> {
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;
    Ok(Captured::from_bytes(bytes))
}

impl Captured {
    /// Splits into the text and a body replaying the captured bytes.
    ///
    /// An absent replay becomes an empty body.
    #[must_use]
    pub fn into_body_parts(self) -> (String, Body) {
        let body = self.replay.map_or_else(Body::empty, Replay::into);
        (self.text, body)
    }
}
