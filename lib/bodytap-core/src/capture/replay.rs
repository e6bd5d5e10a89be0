use std::io::{self, BufRead, Cursor, Read};

use bytes::Bytes;

/// A readable stream over bytes captured from another stream.
///
/// Reading it yields exactly the captured bytes, then end of stream.
/// [`as_bytes`](Self::as_bytes) always exposes the whole content, whatever was already read.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    inner: Cursor<Bytes>,
}

impl Replay {
    /// Creates a replay over `bytes`, positioned at the start.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        let inner = Cursor::new(bytes.into());
        Self { inner }
    }

    /// The whole replayed content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    /// Total number of bytes, read or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the replayed content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// Returns the whole content, without copying.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.inner.into_inner()
    }
}

impl Read for Replay {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for Replay {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
    }
}

#[cfg(feature = "async")]
impl tokio::io::AsyncRead for Replay {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        tokio::io::AsyncRead::poll_read(std::pin::Pin::new(&mut self.get_mut().inner), cx, buf)
    }
}

#[cfg(feature = "axum")]
impl From<Replay> for axum::body::Body {
    fn from(value: Replay) -> Self {
        Self::from(value.into_bytes())
    }
}
