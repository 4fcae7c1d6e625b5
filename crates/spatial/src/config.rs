//! Index configuration.

use geometry::Aabb;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::SpatialError;
use crate::spatial::DEFAULT_MAX_DEPTH;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, SpatialError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, writing the defaults there if the
    /// file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpatialError> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    pub fn validate(&self) -> Result<(), SpatialError> {
        self.tree.validate()
    }
}

/// Root region and subdivision depth of a tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub min_x: f64,
    #[serde(default)]
    pub min_y: f64,
    #[serde(default = "default_max_coord")]
    pub max_x: f64,
    #[serde(default = "default_max_coord")]
    pub max_y: f64,
    /// Levels of subdivision below the root (0 = never subdivide).
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl TreeConfig {
    pub fn region(&self) -> Aabb {
        Aabb::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// The root region must have a finite, non-zero area.
    pub fn validate(&self) -> Result<(), SpatialError> {
        let area = self.region().area();
        if area == 0.0 || !area.is_finite() {
            return Err(SpatialError::InvalidConfig(format!(
                "tree region {} has no usable area",
                self.region()
            )));
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: default_max_coord(),
            max_y: default_max_coord(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_coord() -> f64 {
    1.0
}
fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.tree.region(), Aabb::unit());
        assert_eq!(config.tree.max_depth, 8);
    }

    #[test]
    fn test_partial_section() {
        let config = Config::from_toml_str("[tree]\nmin_x = -10.0\nmax_depth = 3\n").unwrap();
        assert_eq!(config.tree.region(), Aabb::new(-10.0, 0.0, 1.0, 1.0));
        assert_eq!(config.tree.max_depth, 3);
    }

    #[test]
    fn test_rejects_degenerate_region() {
        let err = Config::from_toml_str("[tree]\nmax_x = 0.0\n").unwrap_err();
        assert!(matches!(err, SpatialError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = Config::from_toml_str("[tree\nmax_x = ").unwrap_err();
        assert!(matches!(err, SpatialError::ConfigParse(_)));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = Config::default();
        config.tree.max_x = 250.0;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed.tree.region(), Aabb::new(0.0, 0.0, 250.0, 1.0));
    }
}
