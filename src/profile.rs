//! Render profiles
//!
//! A profile bundles a color mapping, layer visibility overrides and
//! compositor options in a TOML file, so a host can switch themes without
//! rebuilding its command line.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::color_map::{ColorMapping, ColorMatch};
use crate::compositor::{CompositorConfig, LayerVisibility};

/// Errors that can occur when loading or parsing profiles
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse profile TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Color, visibility and option overrides loaded from TOML
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// Optional name for the profile
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    pub colors: ColorMapping,
    pub layers: LayerVisibility,
    pub config: CompositorConfig,
}

/// TOML structure for deserializing profiles
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlProfile {
    metadata: Option<TomlMetadata>,
    color_mapping: Option<String>,
    #[serde(default)]
    ignore_case: bool,
    #[serde(default = "default_strict_paths")]
    strict_paths: bool,
    #[serde(default)]
    layers: BTreeMap<String, bool>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Settings given alongside a profile, such as command-line flags
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces the profile's color mapping when set
    pub colors: Option<String>,
    /// Layer ids forced visible
    pub show: Vec<String>,
    /// Layer ids forced hidden; these win over `show`
    pub hide: Vec<String>,
    /// Switches matching to ignore ASCII case
    pub ignore_case: bool,
    /// Switches path errors to warnings
    pub lenient_paths: bool,
}

impl Overrides {
    /// The `show` and `hide` lists as one visibility map
    pub fn visibility(&self) -> LayerVisibility {
        let shown = self.show.iter().map(|id| (id.clone(), true));
        let hidden = self.hide.iter().map(|id| (id.clone(), false));
        shown.chain(hidden).collect()
    }
}

fn default_strict_paths() -> bool {
    true
}

impl Profile {
    /// Load profile from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load profile from TOML string
    pub fn from_str(content: &str) -> Result<Self, ProfileError> {
        let parsed: TomlProfile = toml::from_str(content)?;

        let color_match = if parsed.ignore_case {
            ColorMatch::IgnoreAsciiCase
        } else {
            ColorMatch::Exact
        };

        Ok(Profile {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed
                .color_mapping
                .as_deref()
                .map(ColorMapping::parse)
                .unwrap_or_default(),
            layers: parsed.layers.into_iter().collect(),
            config: CompositorConfig::new()
                .with_color_match(color_match)
                .with_strict_paths(parsed.strict_paths),
        })
    }

    /// Layer `overrides` on top of this profile.
    ///
    /// Colors are replaced wholesale, layer entries are merged with the
    /// overrides taking precedence, and the flags can only switch an option
    /// on.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(colors) = &overrides.colors {
            self.colors = ColorMapping::parse(colors);
        }
        self.layers.extend(&overrides.visibility());
        if overrides.ignore_case {
            self.config.color_match = ColorMatch::IgnoreAsciiCase;
        }
        if overrides.lenient_paths {
            self.config.strict_paths = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_profile() {
        let toml_str = r##"
color_mapping = "#FFAA00=#112233, #000000=#FFFFFF"
ignore_case = true
strict_paths = false

[metadata]
name = "Night"
description = "Dark palette"

[layers]
background = false
labels = true
"##;
        let profile = Profile::from_str(toml_str).expect("Should parse");
        assert_eq!(profile.name, Some("Night".to_string()));
        assert_eq!(profile.description, Some("Dark palette".to_string()));
        assert_eq!(profile.colors.to_string(), "#FFAA00=#112233,#000000=#FFFFFF");
        assert_eq!(profile.layers.get("background"), Some(false));
        assert_eq!(profile.layers.get("labels"), Some(true));
        assert_eq!(profile.config.color_match, ColorMatch::IgnoreAsciiCase);
        assert!(!profile.config.strict_paths);
    }

    #[test]
    fn test_parse_empty_profile_uses_defaults() {
        let profile = Profile::from_str("").expect("Should parse");
        assert_eq!(profile.name, None);
        assert!(profile.colors.is_empty());
        assert!(profile.layers.is_empty());
        assert_eq!(profile.config, CompositorConfig::default());
    }

    #[test]
    fn test_unknown_key_error() {
        let result = Profile::from_str("colour_mapping = \"a=b\"");
        assert!(matches!(result, Err(ProfileError::ParseError(_))));
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        let result = Profile::from_str(invalid);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_merge_onto_profile() {
        let profile = Profile::from_str(
            r#"
color_mapping = "red=blue"

[layers]
sky = false
sun = true
"#,
        )
        .expect("Should parse");

        let overrides = Overrides {
            colors: Some("green=yellow".to_string()),
            show: vec!["sky".to_string(), "cloud".to_string()],
            hide: vec!["sun".to_string()],
            ignore_case: true,
            lenient_paths: true,
        };
        let merged = profile.with_overrides(&overrides);

        assert_eq!(merged.colors.to_string(), "green=yellow");
        assert_eq!(merged.layers.get("sky"), Some(true));
        assert_eq!(merged.layers.get("sun"), Some(false));
        assert_eq!(merged.layers.get("cloud"), Some(true));
        assert_eq!(merged.config.color_match, ColorMatch::IgnoreAsciiCase);
        assert!(!merged.config.strict_paths);
    }

    #[test]
    fn test_empty_overrides_keep_profile() {
        let profile = Profile::from_str(
            r#"
color_mapping = "red=blue"
ignore_case = true
strict_paths = false

[layers]
sky = false
"#,
        )
        .expect("Should parse");

        let merged = profile.clone().with_overrides(&Overrides::default());
        assert_eq!(merged.colors, profile.colors);
        assert_eq!(merged.layers, profile.layers);
        assert_eq!(merged.config, profile.config);
    }

    #[test]
    fn test_hide_wins_over_show() {
        let overrides = Overrides {
            show: vec!["a".to_string()],
            hide: vec!["a".to_string()],
            ..Overrides::default()
        };
        assert_eq!(overrides.visibility().get("a"), Some(false));
    }

    #[test]
    fn test_missing_file_error() {
        let result = Profile::from_file(Path::new("/nonexistent/svg-layers/profile.toml"));
        assert!(matches!(result, Err(ProfileError::IoError(_))));
    }
}
