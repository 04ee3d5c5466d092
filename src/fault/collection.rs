use serde::Deserialize;

use crate::error::ConfigError;
use crate::math::Color3;

use super::Fault;

/// Which fault face side, if any, is culled when not in grid mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultFaceCulling {
    NoCulling,
    #[default]
    CullBackFaces,
    CullFrontFaces,
}

/// Collection-level display flags for faults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FaultDisplaySettings {
    pub show_fault_collection: bool,
    pub show_fault_faces: bool,
    pub show_opposite_fault_faces: bool,
    pub show_nncs: bool,
    pub show_fault_label: bool,
    pub show_results_on_faults: bool,
    /// The view shows the whole grid; faults are drawn as part of it.
    pub is_grid_visualization_mode: bool,
    pub fault_result: FaultFaceCulling,
    pub fault_label_color: Option<Color3>,
}

impl Default for FaultDisplaySettings {
    fn default() -> Self {
        Self {
            show_fault_collection: true,
            show_fault_faces: true,
            show_opposite_fault_faces: true,
            show_nncs: false,
            show_fault_label: false,
            show_results_on_faults: true,
            is_grid_visualization_mode: false,
            fault_result: FaultFaceCulling::default(),
            fault_label_color: None,
        }
    }
}

impl FaultDisplaySettings {
    /// Parses display settings from TOML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or mistyped values.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// An ordered set of faults and the flags controlling their display.
#[derive(Debug, Clone, Default)]
pub struct FaultCollection {
    pub faults: Vec<Fault>,
    pub display: FaultDisplaySettings,
}

impl FaultCollection {
    #[must_use]
    pub fn new(faults: Vec<Fault>) -> Self {
        Self {
            faults,
            display: FaultDisplaySettings::default(),
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: FaultDisplaySettings) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Fault> {
        self.faults.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings = FaultDisplaySettings::from_toml(
            r#"
            show_nncs = true
            fault_result = "cull_front_faces"
            fault_label_color = { r = 1.0, g = 0.0, b = 0.0 }
            "#,
        )
        .unwrap();
        assert!(settings.show_nncs);
        assert!(settings.show_fault_faces);
        assert_eq!(settings.fault_result, FaultFaceCulling::CullFrontFaces);
        assert_eq!(settings.fault_label_color, Some(Color3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn unknown_culling_mode_is_rejected() {
        let err = FaultDisplaySettings::from_toml(r#"fault_result = "sideways""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn find_by_name() {
        let collection = FaultCollection::new(vec![Fault::new("A", Vec::new())]);
        assert!(collection.find("A").is_some());
        assert!(collection.find("B").is_none());
    }
}
