//! Configuration for the compositor

use crate::color_map::ColorMatch;

/// Configuration options for layer extraction and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositorConfig {
    /// How color mapping tokens are matched against the document text
    pub color_match: ColorMatch,

    /// Fail extraction on an unparsable or missing path `d` attribute.
    /// When false, such paths are skipped with a warning.
    pub strict_paths: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            color_match: ColorMatch::Exact,
            strict_paths: true,
        }
    }
}

impl CompositorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how color tokens are matched
    pub fn with_color_match(mut self, color_match: ColorMatch) -> Self {
        self.color_match = color_match;
        self
    }

    /// Match color tokens ignoring ASCII case
    pub fn ignore_case(self) -> Self {
        self.with_color_match(ColorMatch::IgnoreAsciiCase)
    }

    /// Set whether path errors abort extraction
    pub fn with_strict_paths(mut self, strict: bool) -> Self {
        self.strict_paths = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompositorConfig::default();
        assert_eq!(config.color_match, ColorMatch::Exact);
        assert!(config.strict_paths);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CompositorConfig::new()
            .ignore_case()
            .with_strict_paths(false);

        assert_eq!(config.color_match, ColorMatch::IgnoreAsciiCase);
        assert!(!config.strict_paths);
    }
}
