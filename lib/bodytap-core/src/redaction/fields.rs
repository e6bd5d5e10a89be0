use std::sync::Arc;

use serde::Deserialize;

use crate::ConfigError;

/// Field names masked by [`SensitiveFields::default()`].
pub const DEFAULT_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "old_password",
    "new_password",
    "secret",
    "token",
    "access_token",
    "refresh_token",
    "api_key",
    "apikey",
    "api-key",
    "phone",
    "mobile",
    "telephone",
    "id_card",
    "idcard",
];

/// The ordered, immutable set of field names whose string values get masked.
///
/// Names are stored lowercase. Cloning is cheap, all clones share the same list.
///
/// # Examples
///
/// ```rust
/// use bodytap_core::SensitiveFields;
///
/// let fields = SensitiveFields::new(["Password", "otp", "password"])?;
/// assert_eq!(fields.iter().collect::<Vec<_>>(), ["password", "otp"]);
/// # Ok::<(), bodytap_core::ConfigError>(())
/// ```
///
/// The list can also come from an application config file:
///
/// ```rust
/// use bodytap_core::SensitiveFields;
///
/// let fields: SensitiveFields = serde_json::from_str(r#"["pin", "cvv"]"#)?;
/// assert!(fields.contains("cvv"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct SensitiveFields {
    names: Arc<[Box<str>]>,
}

impl SensitiveFields {
    /// Builds a field set from names, lowercased, deduplicated, in the given order.
    ///
    /// # Errors
    ///
    /// Fails if a name is empty or contains a double quote.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result: Vec<Box<str>> = Vec::new();
        for name in names {
            let name = normalize(name.as_ref())?;
            if !result.contains(&name) {
                result.push(name);
            }
        }

        Ok(Self {
            names: result.into(),
        })
    }

    /// Returns a new set with the extra names appended after the current ones.
    ///
    /// # Errors
    ///
    /// Fails if a name is empty or contains a double quote.
    pub fn extended<I, S>(&self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current = self.iter().map(str::to_string).collect::<Vec<_>>();
        let extra = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect::<Vec<_>>();
        Self::new(current.into_iter().chain(extra))
    }

    /// Iterates over the lowercase names, in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }

    /// Whether `name` is configured, compared case-insensitively.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|field| field.eq_ignore_ascii_case(name))
    }

    /// Number of configured names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no name is configured, in which case redaction is a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SensitiveFields {
    fn default() -> Self {
        let names = DEFAULT_SENSITIVE_FIELDS
            .iter()
            .map(|name| Box::<str>::from(*name))
            .collect();
        Self { names }
    }
}

impl TryFrom<Vec<String>> for SensitiveFields {
    type Error = ConfigError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn normalize(name: &str) -> Result<Box<str>, ConfigError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::EmptyField);
    }
    if name.contains('"') {
        return Err(ConfigError::QuotedField {
            field: name.to_string(),
        });
    }
    Ok(name.to_lowercase().into_boxed_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_the_builtin_list() {
        let fields = SensitiveFields::default();

        assert_eq!(fields.len(), DEFAULT_SENSITIVE_FIELDS.len());
        assert!(fields.contains("password"));
        assert!(fields.contains("API-KEY"));
        assert!(!fields.contains("username"));
    }

    #[test]
    fn should_lowercase_and_dedupe_keeping_first_position() {
        let fields = SensitiveFields::new(["Token", "pin", "TOKEN", " secret "]).expect("valid");

        insta::assert_debug_snapshot!(fields.iter().collect::<Vec<_>>(), @r#"
        [
            "token",
            "pin",
            "secret",
        ]
        "#);
    }

    #[test]
    fn should_reject_empty_name() {
        let result = SensitiveFields::new(["token", "  "]);

        assert_eq!(result, Err(ConfigError::EmptyField));
    }

    #[test]
    fn should_reject_quoted_name() {
        let result = SensitiveFields::new(["to\"ken"]);

        assert_eq!(
            result,
            Err(ConfigError::QuotedField {
                field: "to\"ken".to_string()
            })
        );
    }

    #[test]
    fn should_extend_without_touching_original() {
        let base = SensitiveFields::new(["token"]).expect("valid");

        let extended = base.extended(["cvv", "token"]).expect("valid");

        assert_eq!(base.len(), 1);
        assert_eq!(extended.iter().collect::<Vec<_>>(), ["token", "cvv"]);
    }

    #[test]
    fn should_deserialize_from_list() {
        let fields: SensitiveFields =
            serde_json::from_str(r#"["Pin", "cvv"]"#).expect("valid list");

        assert_eq!(fields.iter().collect::<Vec<_>>(), ["pin", "cvv"]);
    }

    #[test]
    fn should_fail_deserialize_with_invalid_name() {
        let result = serde_json::from_str::<SensitiveFields>(r#"["pin", ""]"#);

        let error = result.expect_err("empty name rejected");
        assert!(
            error
                .to_string()
                .starts_with("sensitive field names must not be empty"),
            "unexpected error: {error}"
        );
    }
}
