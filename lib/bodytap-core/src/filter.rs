//! Decide whether a captured body is worth logging at all.
//!
//! File uploads and binary payloads are noise in a log line, and the masking
//! only makes sense for text. The [`BodyFilter`] rejects them based on the
//! content type, and on the share of non-ASCII characters for bodies sent
//! without a helpful content type.

/// Content types that are never logged, matched as substrings of the media type.
pub const DEFAULT_BINARY_TYPES: &[&str] = &[
    "application/octet-stream",
    "image/",
    "video/",
    "audio/",
    "application/pdf",
    "application/zip",
    "application/gzip",
];

const RATIO_CHECK_MIN_LEN: usize = 100;
const DEFAULT_MAX_NON_ASCII_PERCENT: usize = 20;

/// Tells whether a body should be logged.
///
/// # Example
///
/// ```rust
/// use bodytap_core::BodyFilter;
///
/// let filter = BodyFilter::default();
///
/// assert!(filter.should_log(Some("application/json; charset=utf-8"), r#"{"a":1}"#));
/// assert!(!filter.should_log(Some("multipart/form-data; boundary=xyz"), "--xyz"));
/// assert!(!filter.should_log(Some("image/png"), ""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyFilter {
    binary_types: Vec<String>,
    max_non_ascii_percent: usize,
}

impl Default for BodyFilter {
    fn default() -> Self {
        Self {
            binary_types: DEFAULT_BINARY_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_non_ascii_percent: DEFAULT_MAX_NON_ASCII_PERCENT,
        }
    }
}

impl BodyFilter {
    /// Replaces the list of binary content types.
    #[must_use]
    pub fn with_binary_types<I, S>(mut self, binary_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary_types = binary_types
            .into_iter()
            .map(|content_type| content_type.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Adds a binary content type to the current list.
    #[must_use]
    pub fn add_binary_type(mut self, binary_type: impl Into<String>) -> Self {
        self.binary_types.push(binary_type.into().to_ascii_lowercase());
        self
    }

    /// Sets the share of non-ASCII characters, in percent of the body length
    /// in bytes, above which a body longer than 100 bytes is considered binary.
    ///
    /// Values of 100 and above disable the check.
    #[must_use]
    pub fn with_max_non_ascii_percent(mut self, percent: usize) -> Self {
        self.max_non_ascii_percent = percent;
        self
    }

    /// Whether a body with this content type and content should be logged.
    #[must_use]
    pub fn should_log(&self, content_type: Option<&str>, body: &str) -> bool {
        if let Some(content_type) = content_type
            && self.is_excluded_type(content_type)
        {
            return false;
        }

        !self.looks_binary(body)
    }

    fn is_excluded_type(&self, content_type: &str) -> bool {
        let media_type = match content_type.parse::<mime::Mime>() {
            Ok(mime) => mime.essence_str().to_ascii_lowercase(),
            Err(_) => content_type.to_ascii_lowercase(),
        };

        if media_type.contains(mime::MULTIPART_FORM_DATA.essence_str()) {
            return true;
        }
        self.binary_types
            .iter()
            .any(|binary| media_type.contains(binary.as_str()))
    }

    fn looks_binary(&self, body: &str) -> bool {
        if body.len() <= RATIO_CHECK_MIN_LEN || self.max_non_ascii_percent >= 100 {
            return false;
        }
        let non_ascii = body.chars().filter(|ch| !ch.is_ascii()).count();
        non_ascii * 100 > body.len() * self.max_non_ascii_percent
    }
}
