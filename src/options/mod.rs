//! Centralized display/geometry/sampling options with TOML preset support.
//!
//! All tweakable settings are consolidated here. Options serialize to/from
//! TOML for view presets; UI-exposed sections export a JSON Schema so an
//! external settings panel can be generated from the types.

mod display;
mod geometry;
mod sampling;

use std::path::Path;

pub use display::{ColorMode, DisplayOptions, DisplayStyle};
pub use geometry::{
    cylinder_segments, segments_per_span, sphere_bands, GeometryOptions,
    LodTier,
};
pub use sampling::SamplingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[geometry]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Display style, color mode, and global scale parameters.
    pub display: DisplayOptions,
    /// Ribbon and primitive geometry options.
    pub geometry: GeometryOptions,
    /// Atom-count optimization configuration.
    pub sampling: SamplingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] when the file cannot be read and
    /// [`SceneError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(SceneError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::OptionsParse`] on serialization failure and
    /// [`SceneError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SceneError::Io)?;
        }
        std::fs::write(path, content).map_err(SceneError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[geometry]
ribbon_width = 2.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.geometry.ribbon_width, 2.0);
        // Everything else should be default
        assert_eq!(opts.geometry.bond_radius, 0.12);
        assert_eq!(opts.display.style, DisplayStyle::Ribbon);
        assert_eq!(opts.sampling.max_atoms, 5000);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("display"));
        assert!(props.contains_key("geometry"));
        assert!(props.contains_key("sampling"));

        let display = &props["display"]["properties"];
        assert!(display.get("style").is_some());
        assert!(display.get("transparency").is_some());
    }
}
