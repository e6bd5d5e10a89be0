//! Loggable summary of a multipart form.
//!
//! Multipart bodies are never logged raw (see [`BodyFilter`](crate::BodyFilter)).
//! Once the application has parsed the form, a [`FormSummary`] renders its
//! text fields, masked like any JSON body, and only the name and size of the
//! uploaded files.

use serde_json::Value;

use crate::BodyRedactor;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Field { name: String, value: String },
    File { name: String, file_name: String, size: u64 },
}

impl Part {
    fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Summary of a multipart form, rendered as a JSON-like object.
///
/// Each part is keyed by `<name>[<index>]`, the index counting the parts that
/// share the same name. A text field renders as a one-entry object that goes
/// through the redactor, a file as a short description.
///
/// # Example
///
/// ```rust
/// use bodytap_core::{BodyRedactor, FormSummary};
///
/// let summary = FormSummary::default()
///     .with_field("username", "alice")
///     .with_field("password", "hunter2")
///     .with_file("avatar", "me.png", 2048);
///
/// assert_eq!(
///     summary.render(&BodyRedactor::default()),
///     r#"{"username[0]":{"username":"alice"}, "password[0]":{"password":"***"}, "avatar[0]":"file: me.png (2048 bytes)"}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSummary {
    parts: Vec<Part>,
}

impl FormSummary {
    /// Adds a text field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds an uploaded file, only its name and size will be rendered.
    #[must_use]
    pub fn with_file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        size: u64,
    ) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            file_name: file_name.into(),
            size,
        });
        self
    }

    /// Whether no part was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Renders the summary, masking sensitive text fields with `redactor`.
    #[must_use]
    pub fn render(&self, redactor: &BodyRedactor) -> String {
        let mut seen: Vec<(&str, usize)> = Vec::new();
        let mut rendered = Vec::with_capacity(self.parts.len());

        for part in &self.parts {
            let index = next_index(&mut seen, part.name());
            let key = quote(&format!("{}[{index}]", part.name()));
            let value = match part {
                Part::Field { name, value } => {
                    let pair = format!("{{{}:{}}}", quote(name), quote(value));
                    redactor.redact(&pair).into_owned()
                }
                Part::File {
                    file_name, size, ..
                } => quote(&format!("file: {file_name} ({size} bytes)")),
            };
            rendered.push(format!("{key}:{value}"));
        }

        format!("{{{}}}", rendered.join(", "))
    }
}

fn next_index<'a>(seen: &mut Vec<(&'a str, usize)>, name: &'a str) -> usize {
    if let Some((_, count)) = seen.iter_mut().find(|(seen_name, _)| *seen_name == name) {
        let index = *count;
        *count += 1;
        return index;
    }
    seen.push((name, 1));
    0
}

fn quote(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}
