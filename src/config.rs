//! Application preferences that affect fault display.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::math::Color3;

/// Display preferences shared by all fault managers.
///
/// Missing keys fall back to [`Preferences::default`]:
///
/// ```toml
/// default_fault_grid_line_color = { r = 0.0, g = 0.0, b = 0.0 }
/// default_well_label_color = { r = 1.0, g = 1.0, b = 1.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Color of fault mesh lines.
    pub default_fault_grid_line_color: Color3,
    /// Text color of labels when the fault collection sets none.
    pub default_well_label_color: Color3,
    pub default_fault_color: Color3,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_fault_grid_line_color: Color3::BLACK,
            default_well_label_color: Color3::WHITE,
            default_fault_color: Color3::GRAY,
        }
    }
}

impl Preferences {
    /// Parses preferences from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads preferences from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading preferences");
        Self::from_toml(&text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_use_defaults() {
        let prefs = Preferences::from_toml("default_fault_color = { r = 1.0, g = 0.0, b = 0.0 }")
            .unwrap();
        assert_eq!(prefs.default_fault_color, Color3::new(1.0, 0.0, 0.0));
        assert_eq!(prefs.default_fault_grid_line_color, Color3::BLACK);
        assert_eq!(prefs.default_well_label_color, Color3::WHITE);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Preferences::from_toml("default_fault_color = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_well_label_color = {{ r = 0.0, g = 1.0, b = 0.0 }}"
        )
        .unwrap();
        let prefs = Preferences::from_toml_file(file.path()).unwrap();
        assert_eq!(prefs.default_well_label_color, Color3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Preferences::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
