//! Tool configuration
//!
//! Visual and behavioural settings of the tools, stored as RON like project
//! files are.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DISC_RADIUS, HIT_THRESHOLD, JOINT_HANDLE_RADIUS, NORMAL_COLOR, SELECTED_COLOR,
};
use crate::params::SharedParameters;

/// Settings of one tool instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Minimum selection accuracy for a hit
    pub hit_threshold: f32,
    /// Radius of bone and joint discs
    pub disc_radius: f32,
    /// Color of unselected affordances (RGBA)
    pub normal_color: [f32; 4],
    /// Color of selected or highlighted affordances (RGBA)
    pub selected_color: [f32; 4],
    /// Whether component affordances are drawn at all
    pub show_gizmos: bool,
    /// Whether bone names are drawn next to their discs
    pub show_names: bool,
    /// Radius of the joint limit arcs
    pub joint_handle_radius: f32,
    /// Clear the bone slots when the mode or kind changes
    pub clear_selection_on_mode_switch: bool,
    /// Initial parameter values
    pub defaults: SharedParameters,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::ragdoll_factory()
    }
}

impl ToolConfig {
    /// Settings of the Ragdoll Factory tool
    pub fn ragdoll_factory() -> Self {
        Self {
            hit_threshold: HIT_THRESHOLD,
            disc_radius: DISC_RADIUS,
            normal_color: NORMAL_COLOR,
            selected_color: SELECTED_COLOR,
            show_gizmos: true,
            show_names: false,
            joint_handle_radius: JOINT_HANDLE_RADIUS,
            clear_selection_on_mode_switch: true,
            defaults: SharedParameters::default(),
        }
    }

    /// Settings of the Collision Builder tool; bone slots survive mode switches
    pub fn collision_builder() -> Self {
        Self {
            clear_selection_on_mode_switch: false,
            ..Self::ragdoll_factory()
        }
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save to a configuration file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_mode_switch_behaviour() {
        assert!(ToolConfig::ragdoll_factory().clear_selection_on_mode_switch);
        assert!(!ToolConfig::collision_builder().clear_selection_on_mode_switch);
        assert_eq!(ToolConfig::default(), ToolConfig::ragdoll_factory());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.ron");

        let mut config = ToolConfig::collision_builder();
        config.show_names = true;
        config.defaults.capsule.radius = 0.25;
        config.save(&path).unwrap();

        let loaded = ToolConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ToolConfig::from_ron_str("(show_names: true)").unwrap();
        assert!(config.show_names);
        assert_eq!(config.hit_threshold, HIT_THRESHOLD);
    }

    #[test]
    fn test_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolConfig::load(dir.path().join("missing.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));

        let err = ToolConfig::from_ron_str("(hit_threshold: \"high\")").unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize(_)));
    }
}
