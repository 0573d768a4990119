//! Generator settings loaded from TOML.
//!
//! ```toml
//! project = "psu"
//! paper = "A3"
//! track_width = 0.5
//!
//! [title]
//! company = "Acme"
//! revision = "B"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::CopperLayer;
use crate::error::{Error, Result};
use crate::metadata::Paper;

pub const BOARD_FORMAT_VERSION: u32 = 20240108;
pub const SCHEMATIC_FORMAT_VERSION: u32 = 20231120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Value of the `generator` header field.
    pub generator: String,
    pub generator_version: String,
    pub board_version: u32,
    pub schematic_version: u32,
    /// Project name used in schematic instance paths.
    pub project: Option<String>,
    pub paper: Paper,
    pub board_thickness: f64,
    /// Width of tracks created by `connect`.
    pub track_width: f64,
    pub trace_layer: CopperLayer,
    pub via_size: f64,
    pub via_drill: f64,
    pub title: TitleDefaults,
}

/// Title-block fields applied to every new document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleDefaults {
    pub company: Option<String>,
    pub revision: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generator: "kisynth".to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            board_version: BOARD_FORMAT_VERSION,
            schematic_version: SCHEMATIC_FORMAT_VERSION,
            project: None,
            paper: Paper::A4,
            board_thickness: 1.6,
            track_width: 0.25,
            trace_layer: CopperLayer::Front,
            via_size: 1.2,
            via_drill: 0.8,
            title: TitleDefaults::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GeneratorConfig =
            toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        log::debug!("loading generator config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check the numeric defaults. Documents call this in `with_config`, so a
    /// config assembled in code gets the same checks as one read from TOML.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.track_width) {
            return Err(Error::Config(format!(
                "track_width must be positive, got {}",
                self.track_width
            )));
        }
        if !is_positive(self.via_drill)
            || !is_positive(self.via_size)
            || self.via_size <= self.via_drill
        {
            return Err(Error::Config(format!(
                "via_size ({}) must exceed a positive via_drill ({})",
                self.via_size, self.via_drill
            )));
        }
        if !is_positive(self.board_thickness) {
            return Err(Error::Config(format!(
                "board_thickness must be positive, got {}",
                self.board_thickness
            )));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.board_version, 20240108);
        assert_eq!(config.schematic_version, 20231120);
    }

    #[test]
    fn overrides_apply() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            project = "psu"
            paper = "A3"
            track_width = 0.5
            trace_layer = "B.Cu"

            [title]
            company = "Acme"
            "#,
        )
        .unwrap();

        assert_eq!(config.project.as_deref(), Some("psu"));
        assert_eq!(config.paper, Paper::A3);
        assert_eq!(config.track_width, 0.5);
        assert_eq!(config.trace_layer, CopperLayer::Back);
        assert_eq!(config.title.company.as_deref(), Some("Acme"));
        assert_eq!(config.via_size, 1.2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("track_width = 0.0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml_str("via_size = 0.5"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml_str("paper = \"B7\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml_str("colour = \"green\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn validate_catches_configs_built_in_code() {
        let config = GeneratorConfig {
            track_width: f64::NAN,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = GeneratorConfig {
            board_thickness: -1.6,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = GeneratorConfig::default().to_toml_string().unwrap();
        assert!(text.contains("paper = \"A4\""));
        assert!(text.contains("trace_layer = \"F.Cu\""));
        assert_eq!(GeneratorConfig::from_toml_str(&text).unwrap(), GeneratorConfig::default());
    }
}
