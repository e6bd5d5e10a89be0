/// Errors that can occur while draining a body into memory.
///
/// These are only visible through [`try_capture`](crate::try_capture) and its
/// siblings. The lossy [`capture`](crate::capture) entry points log them and
/// return an empty capture instead.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum CaptureError {
    /// Reading the underlying stream failed.
    ///
    /// Occurs when the transport breaks mid-body (connection reset, truncated file, ...).
    #[display("failed to read stream: {_0}")]
    Io(std::io::Error),

    /// Collecting an HTTP body failed.
    ///
    /// Occurs when a body frame cannot be polled, e.g. the client went away.
    #[cfg(feature = "axum")]
    #[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
    #[display("failed to collect body: {_0}")]
    Body(axum::Error),
}

/// Errors raised when building the redaction configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum ConfigError {
    /// A sensitive field name is empty (or only whitespace).
    #[display("sensitive field names must not be empty")]
    EmptyField,

    /// A sensitive field name contains a double quote.
    ///
    /// Field names are matched as `"<field>"`, an embedded quote could never match.
    #[display("sensitive field name {field:?} must not contain a double quote")]
    QuotedField {
        /// The rejected field name.
        field: String,
    },
}
