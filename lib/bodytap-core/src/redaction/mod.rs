//! Masking of credential-like values in captured bodies.
//!
//! The [`BodyRedactor`] looks for quoted field names (`"password"`, `"token"`, ...)
//! in arbitrary text, and replaces the content of the string value that follows
//! with [`MASK`]. It does not parse the text: anything that looks like
//! `"<field>" : "<value>"` gets masked, everything else is kept byte for byte.
//!
//! # Scope
//!
//! - field names are matched ignoring ASCII case, the rest of the text keeps its case;
//! - only string values are masked, numbers, booleans, `null`, objects and
//!   arrays that follow a sensitive field are left untouched;
//! - malformed input is never an error, an occurrence that cannot be resolved
//!   (no colon, unterminated string) is simply not masked.
//!
//! # Example
//!
//! ```rust
//! use bodytap_core::BodyRedactor;
//!
//! let redactor = BodyRedactor::default();
//!
//! let masked = redactor.redact(r#"{"username":"alice","Password":"secret123"}"#);
//! assert_eq!(masked, r#"{"username":"alice","Password":"***"}"#);
//! ```

use std::borrow::Cow;
use std::ops::Range;

use crate::ConfigError;

mod fields;
mod scan;

pub use self::fields::{DEFAULT_SENSITIVE_FIELDS, SensitiveFields};

/// The literal put in place of a masked string value.
pub const MASK: &str = "***";

/// Masks the string values of sensitive fields.
///
/// A redactor is immutable, cheap to clone, and can be shared between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyRedactor {
    fields: SensitiveFields,
}

impl BodyRedactor {
    /// Creates a redactor for the given fields.
    #[must_use]
    pub fn new(fields: SensitiveFields) -> Self {
        Self { fields }
    }

    /// Creates a builder starting from [`DEFAULT_SENSITIVE_FIELDS`].
    #[must_use]
    pub fn builder() -> BodyRedactorBuilder {
        BodyRedactorBuilder::default()
    }

    /// The configured fields.
    #[must_use]
    pub fn fields(&self) -> &SensitiveFields {
        &self.fields
    }

    /// Masks the string value of every sensitive field in `text`.
    ///
    /// Fields are processed in configured order, each one on the output of the
    /// previous one. The input is borrowed back when nothing was masked.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::borrow::Cow;
    /// use bodytap_core::BodyRedactor;
    ///
    /// let redactor = BodyRedactor::default();
    ///
    /// assert_eq!(redactor.redact(r#"{"token":"ab\"c"}"#), r#"{"token":"***"}"#);
    /// assert_eq!(redactor.redact(r#"{"phone":13800000000}"#), r#"{"phone":13800000000}"#);
    /// assert!(matches!(redactor.redact("hello world"), Cow::Borrowed(_)));
    /// ```
    #[must_use]
    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(text);
        if text.is_empty() {
            return result;
        }

        for field in self.fields.iter() {
            let edits = scan::field_edits(result.as_bytes(), field);
            if !edits.is_empty() {
                result = Cow::Owned(apply_edits(&result, &edits));
            }
        }

        result
    }
}

/// Builder for [`BodyRedactor`].
///
/// # Example
///
/// ```rust
/// use bodytap_core::BodyRedactor;
///
/// let redactor = BodyRedactor::builder()
///     .add_field("pin")
///     .add_field("cvv")
///     .build()?;
///
/// assert_eq!(redactor.redact(r#"{"cvv":"123"}"#), r#"{"cvv":"***"}"#);
/// assert_eq!(redactor.redact(r#"{"password":"x"}"#), r#"{"password":"***"}"#);
/// # Ok::<(), bodytap_core::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BodyRedactorBuilder {
    fields: Vec<String>,
}

impl Default for BodyRedactorBuilder {
    fn default() -> Self {
        let fields = DEFAULT_SENSITIVE_FIELDS
            .iter()
            .map(ToString::to_string)
            .collect();
        Self { fields }
    }
}

impl BodyRedactorBuilder {
    /// Replaces every field configured so far, including the defaults.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one field after the ones configured so far.
    #[must_use]
    pub fn add_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Builds the redactor.
    ///
    /// # Errors
    ///
    /// Fails if a field name is empty or contains a double quote.
    pub fn build(self) -> Result<BodyRedactor, ConfigError> {
        let fields = SensitiveFields::new(self.fields)?;
        Ok(BodyRedactor::new(fields))
    }
}

fn apply_edits(text: &str, edits: &[Range<usize>]) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in edits {
        if let Some(kept) = text.get(cursor..edit.start) {
            output.push_str(kept);
        }
        output.push_str(MASK);
        cursor = edit.end;
    }
    if let Some(rest) = text.get(cursor..) {
        output.push_str(rest);
    }
    output
}
