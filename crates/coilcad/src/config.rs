//! Drawing configuration files.
//!
//! ```toml
//! [parameters]
//! fin_length = 1330
//! fin_height = 1400
//! connection_side = "RHS"
//!
//! [title_block]
//! company_name = "acme coils"
//! ```
//!
//! Both tables are optional; missing keys keep their defaults.

use std::path::Path;

use coilcad_drafting::TitleBlockInfo;
use coilcad_params::{ParamError, RawParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a drawing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for a drawing configuration.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("config write error: {0}")]
    Write(#[from] toml::ser::Error),

    /// An override could not be applied.
    #[error(transparent)]
    Override(#[from] ParamError),

    /// An override was not of the form `key=value`.
    #[error("override `{0}` is not of the form key=value")]
    MalformedOverride(String),
}

/// Everything needed to produce one drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawingConfig {
    /// Raw coil parameters.
    pub parameters: RawParameters,
    /// Title block fields.
    pub title_block: TitleBlockInfo,
}

impl DrawingConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Apply `key=value` parameter overrides in order.
    pub fn apply_overrides<'a>(
        &mut self,
        overrides: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ConfigError> {
        for item in overrides {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedOverride(item.to_string()))?;
            self.parameters.set(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_tables() {
        let config = DrawingConfig::from_toml_str(
            r#"
[parameters]
fin_length = 900
connection_side = "RHS"

[title_block]
company_name = "acme coils"
"#,
        )
        .unwrap();
        assert_eq!(config.parameters.fin_length, 900.0);
        assert_eq!(config.parameters.connection_side, "RHS");
        assert_eq!(config.parameters.fin_height, 1400.0);
        assert_eq!(config.title_block.company_name, "acme coils");
        assert_eq!(config.title_block.scale, "NTS");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(DrawingConfig::from_toml_str("").unwrap(), DrawingConfig::default());
    }

    #[test]
    fn test_unknown_table_rejected() {
        let err = DrawingConfig::from_toml_str("[paper]\nsize = \"A3\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = DrawingConfig::default();
        config
            .apply_overrides(["no_of_rows=4", "connection_side = RHS"])
            .unwrap();
        assert_eq!(config.parameters.no_of_rows, 4);
        assert_eq!(config.parameters.connection_side, "RHS");

        let err = config.apply_overrides(["no_of_rows"]).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedOverride(_)));
        let err = config.apply_overrides(["fin_width=3"]).unwrap_err();
        assert!(matches!(err, ConfigError::Override(ParamError::UnknownField(_))));
    }

    #[test]
    fn test_round_trip() {
        let mut config = DrawingConfig::default();
        config.title_block.quantity = "2 NOS.".to_string();
        let text = config.to_toml_string().unwrap();
        assert_eq!(DrawingConfig::from_toml_str(&text).unwrap(), config);
    }
}
