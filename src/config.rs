//! Generator configuration.
//!
//! A flat struct consumed once when a generator is created. Loaded from JSON
//! (every field optional, missing fields take the defaults below).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted map side.
pub const MIN_MAP_SIZE: usize = 20;
/// Largest accepted map side.
pub const MAX_MAP_SIZE: usize = 500;

/// Base archetype for the soil-growth influence mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskShape {
    /// Uniform influence everywhere
    #[default]
    Full,
    /// Disc in the middle with weak side bands
    CentralIsland,
    /// Western 60% of the map
    WestContinent,
    /// Eastern 60% of the map
    EastContinent,
    /// Northern half of the map
    PartialContinent,
    /// Small core plus a ring
    Annulus,
    /// Random 15% of cells
    Archipelago,
    /// Two opposite quarter discs
    Crescent,
    /// Thresholded fBm noise
    Fractal,
}

impl MaskShape {
    pub fn all() -> &'static [Self] {
        &[
            Self::Full,
            Self::CentralIsland,
            Self::WestContinent,
            Self::EastContinent,
            Self::PartialContinent,
            Self::Annulus,
            Self::Archipelago,
            Self::Crescent,
            Self::Fractal,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::CentralIsland => "central_island",
            Self::WestContinent => "west_continent",
            Self::EastContinent => "east_continent",
            Self::PartialContinent => "partial_continent",
            Self::Annulus => "annulus",
            Self::Archipelago => "archipelago",
            Self::Crescent => "crescent",
            Self::Fractal => "fractal",
        }
    }
}

impl std::fmt::Display for MaskShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MaskShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| ConfigError::UnknownMask(s.to_string()))
    }
}

/// All tunables of the terrain pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Map width in tiles
    pub width: usize,
    /// Map height in tiles
    pub height: usize,

    /// Lower bound of the soil coverage draw (percent)
    pub min_pct: u32,
    /// Upper bound of the soil coverage draw (percent)
    pub max_pct: u32,

    /// Side of the open-water square a large island needs
    pub vast_ocean_size: usize,
    /// Side of the square a large island's walk is confined to
    pub island_bound_size: usize,
    /// Remaining distance under which a transit route closes with a B route
    pub transit_dist: usize,

    /// Initial cliff probability multiplier
    pub cliff_init: f64,
    /// Multiplier decrement after a cliff outcome
    pub cliff_dec: f64,
    /// Multiplier decrement after a shallow outcome
    pub shallow_dec: f64,
    /// Longest coastal path the carver accepts (tiles)
    pub cliff_path_len: i32,
    /// Streak length that forces the opposite outcome (0 disables)
    pub force_switch: u32,

    /// Move the grown landmass to the map center
    pub centering: bool,
    /// Influence mask archetype
    pub mask_shape: MaskShape,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            min_pct: 20,
            max_pct: 28,
            vast_ocean_size: 25,
            island_bound_size: 15,
            transit_dist: 15,
            cliff_init: 10.0,
            cliff_dec: 0.1,
            shallow_dec: 0.25,
            cliff_path_len: 5,
            force_switch: 5,
            centering: true,
            mask_shape: MaskShape::Full,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map size {width}x{height} is outside 20..=500")]
    InvalidSize { width: usize, height: usize },
    #[error("unknown mask shape '{0}'")]
    UnknownMask(String),
    #[error("failed to parse generator config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read generator config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject maps the pipeline cannot lay out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |side: usize| (MIN_MAP_SIZE..=MAX_MAP_SIZE).contains(&side);
        if !ok(self.width) || !ok(self.height) {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Percent range ordered and clamped to 0..=100.
    pub fn soil_pct_range(&self) -> (u32, u32) {
        let (lo, hi) = if self.min_pct > self.max_pct {
            (self.max_pct, self.min_pct)
        } else {
            (self.min_pct, self.max_pct)
        };
        (lo.min(100), hi.min(100))
    }

    /// Carver path length with the fallback for non-positive values.
    pub fn max_cliff_path_len(&self) -> usize {
        if self.cliff_path_len <= 0 {
            5
        } else {
            self.cliff_path_len as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.soil_pct_range(), (20, 28));
        assert_eq!(config.max_cliff_path_len(), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            GeneratorConfig::from_json_str(r#"{ "width": 40, "height": 60, "mask_shape": "annulus" }"#)
                .unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 60);
        assert_eq!(config.mask_shape, MaskShape::Annulus);
        assert_eq!(config.vast_ocean_size, 25);
        assert!(config.centering);
    }

    #[test]
    fn test_size_limits() {
        let too_small = GeneratorConfig { width: 19, ..Default::default() };
        assert!(matches!(too_small.validate(), Err(ConfigError::InvalidSize { .. })));
        let too_large = GeneratorConfig { height: 501, ..Default::default() };
        assert!(too_large.validate().is_err());
        let edge = GeneratorConfig { width: 20, height: 500, ..Default::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_reversed_percent_range_is_swapped() {
        let config = GeneratorConfig { min_pct: 40, max_pct: 10, ..Default::default() };
        assert_eq!(config.soil_pct_range(), (10, 40));
        let clamped = GeneratorConfig { min_pct: 90, max_pct: 150, ..Default::default() };
        assert_eq!(clamped.soil_pct_range(), (90, 100));
    }

    #[test]
    fn test_mask_shape_parsing() {
        assert_eq!("crescent".parse::<MaskShape>().unwrap(), MaskShape::Crescent);
        assert!(matches!("blob".parse::<MaskShape>(), Err(ConfigError::UnknownMask(_))));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            GeneratorConfig::from_json_str("{ width: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
