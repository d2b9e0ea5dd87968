use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config_error::ConfigError;

// ---------------------------------------------------------------------------
// Generation tuning
// ---------------------------------------------------------------------------

pub const DEFAULT_WORLD_SIZE: usize = 1024;
pub const DEFAULT_WORLD_EDGE: usize = 200;
pub const DEFAULT_SEED: u64 = 6;
pub const DEFAULT_FADE_TIME_MS: u64 = 1500;
pub const DEFAULT_RESET_INTERVAL_MS: u64 = 30 * 60 * 1000;

/// Smallest world the street layout still fits into.
pub const MIN_WORLD_SIZE: usize = 64;

/// Streets are spaced `STREET_SPACING_MIN + rng(STREET_SPACING_JITTER)` apart.
pub const STREET_SPACING_MIN: i32 = 25;
pub const STREET_SPACING_JITTER: i32 = 25;
/// Ordinary street cross-section: `STREET_WIDTH_MIN + rng(STREET_WIDTH_JITTER)`.
pub const STREET_WIDTH_MIN: i32 = 6;
pub const STREET_WIDTH_JITTER: i32 = 6;
pub const MAIN_AVENUE_WIDTH: i32 = 19;
/// The main avenue goes in at the first street past `world_half - MAIN_AVENUE_LEAD`.
pub const MAIN_AVENUE_LEAD: i32 = 20;

/// Narrower cross-sections cannot fit two lanes and two sidewalks.
pub const MIN_ROAD_CROSS_SECTION: i32 = 4;
pub const MAX_TRAFFIC_LANES: i32 = 10;

pub const MIN_PLOT_SIDE: i32 = 10;
pub const MAX_PLOT_AREA: i32 = 800;
pub const MIN_PLOT_AREA: i32 = 100;
/// Plots whose sides differ by less than this count as square.
pub const SQUARE_TOLERANCE: i32 = 10;
pub const MODERN_MIN_WIDTH: i32 = 20;
pub const HEIGHT_JITTER: i32 = 10;

pub const SKYSCRAPER_TARGET: u32 = 50;
pub const DOWNTOWN_ATTEMPTS: u32 = 350;

pub const FILL_SIZE_MIN: i32 = 12;
pub const FILL_SIZE_JITTER: i32 = 20;
/// Candidate fill lots shrink while both sides stay above this.
pub const FILL_MIN_SIDE: i32 = 8;
pub const FILL_EDGE_MARGIN: i32 = 30;
pub const FILL_EDGE_HEIGHT: i32 = 35;
pub const FILL_ROW_STRIDE: i32 = 32;
pub const FILL_COLUMN_STRIDE: i32 = 28;

pub const LIGHT_STRIP_MIN_LENGTH: i32 = 10;
pub const LIGHT_STRIP_SIZE_ADJUST: f32 = 2.5;
pub const LIGHT_STRIP_TIER: u32 = 2;

// ---------------------------------------------------------------------------
// CityConfig resource
// ---------------------------------------------------------------------------

/// Runtime configuration for the generator and the fade lifecycle.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Side of the square claim grid, in cells.
    pub world_size: usize,
    /// Width of the sparse band along the map border.
    pub world_edge: usize,
    pub seed: u64,
    /// Reseed with `seed` on every regeneration (same city each cycle).
    pub fixed_seed: bool,
    pub fade_time_ms: u64,
    /// How long a city stays on display before regenerating on its own.
    pub reset_interval_ms: u64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            world_size: DEFAULT_WORLD_SIZE,
            world_edge: DEFAULT_WORLD_EDGE,
            seed: DEFAULT_SEED,
            fixed_seed: false,
            fade_time_ms: DEFAULT_FADE_TIME_MS,
            reset_interval_ms: DEFAULT_RESET_INTERVAL_MS,
        }
    }
}

impl CityConfig {
    /// A scaled-down world, convenient for tests and quick previews.
    pub fn small(world_size: usize) -> Self {
        Self {
            world_size,
            world_edge: world_size / 5,
            ..Self::default()
        }
    }

    pub fn world_half(&self) -> i32 {
        (self.world_size / 2) as i32
    }

    pub fn size_i32(&self) -> i32 {
        self.world_size as i32
    }

    pub fn edge_i32(&self) -> i32 {
        self.world_edge as i32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_size < MIN_WORLD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "world_size {} is below the minimum of {}",
                self.world_size, MIN_WORLD_SIZE
            )));
        }
        if self.world_edge * 2 >= self.world_size {
            return Err(ConfigError::Invalid(format!(
                "world_edge {} leaves no interior in a world of {}",
                self.world_edge, self.world_size
            )));
        }
        if self.fade_time_ms == 0 {
            return Err(ConfigError::Invalid("fade_time_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CityConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
