//! Compiler configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OqlError, Result};

/// Alias bound to the target entity when none is configured.
pub const DEFAULT_ALIAS: &str = "o";

/// Configuration for one [`crate::compiler::Oql`] instance.
///
/// # Example
///
/// ```ignore
/// let config = OqlConfig::default().with_render_limit(true);
/// assert_eq!(config.alias, "o");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OqlConfig {
    /// Identifier bound to the target entity (`FROM Widget o`).
    pub alias: String,

    /// Render `LIMIT .. OFFSET ..` clauses.
    ///
    /// Off by default so identity and count queries never pick up
    /// pagination syntax by accident.
    pub render_limit: bool,
}

impl Default for OqlConfig {
    fn default() -> Self {
        Self {
            alias: DEFAULT_ALIAS.to_string(),
            render_limit: false,
        }
    }
}

impl OqlConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Sets whether LIMIT clauses are rendered.
    #[must_use]
    pub fn with_render_limit(mut self, render_limit: bool) -> Self {
        self.render_limit = render_limit;
        self
    }

    /// Loads a config from a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if the
    /// decoded config fails [`OqlConfig::validate`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: OqlConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias is not an identifier (ASCII letter or
    /// `_`, followed by ASCII alphanumerics or `_`).
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.alias) {
            return Err(OqlError::ValidationError(format!(
                "alias '{}' is not a valid identifier",
                self.alias
            )));
        }
        Ok(())
    }
}

/// ASCII letter or `_`, followed by ASCII alphanumerics or `_`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OqlConfig::default();
        assert_eq!(config.alias, DEFAULT_ALIAS);
        assert!(!config.render_limit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = OqlConfig::new().with_alias("w").with_render_limit(true);
        assert_eq!(config.alias, "w");
        assert!(config.render_limit);
    }

    #[test]
    fn test_validate_alias() {
        for bad in ["", "1o", "o.p", "a b", "é"] {
            let config = OqlConfig::new().with_alias(bad);
            assert!(config.validate().is_err(), "alias {bad:?} should be rejected");
        }
        for good in ["o", "_w", "widget2"] {
            assert!(OqlConfig::new().with_alias(good).validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json() {
        let config: OqlConfig = serde_json::from_str(r#"{"render_limit": true}"#).unwrap();
        assert_eq!(config.alias, DEFAULT_ALIAS);
        assert!(config.render_limit);
    }
}
