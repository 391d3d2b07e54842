//! Run configuration
//!
//! Screen geometry, RNG seed, audio levels and difficulty tuning. Every field
//! has a default, so a partial JSON document is enough.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Geometry (points) ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub character_width: f32,
    pub character_height: f32,
    /// Gap between the character's bottom edge and the screen bottom
    pub character_bottom_margin: f32,
    pub obstacle_height: f32,
    /// Obstacle width as a fraction of lane width (0, 1]
    pub obstacle_width_ratio: f32,

    /// Lane RNG seed; drawn at run start when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            character_width: CHARACTER_WIDTH,
            character_height: CHARACTER_HEIGHT,
            character_bottom_margin: CHARACTER_BOTTOM_MARGIN,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_width_ratio: OBSTACLE_WIDTH_RATIO,

            seed: None,

            master_volume: 0.8,
            music_volume: 0.7,
            muted: false,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Settings with a fixed seed (reproducible runs)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Lane width (the screen is split into two equal lanes)
    pub fn lane_width(&self) -> f32 {
        self.screen_width / 2.0
    }

    /// Top edge of the character box
    pub fn character_top(&self) -> f32 {
        self.screen_height - self.character_bottom_margin - self.character_height
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("obstacle_height", self.obstacle_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSettings(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !(self.obstacle_width_ratio > 0.0 && self.obstacle_width_ratio <= 1.0) {
            return Err(Error::InvalidSettings(format!(
                "obstacle_width_ratio must be in (0, 1], got {}",
                self.obstacle_width_ratio
            )));
        }
        if self.character_width > self.lane_width() {
            return Err(Error::InvalidSettings(format!(
                "character ({}) is wider than a lane ({})",
                self.character_width,
                self.lane_width()
            )));
        }
        if !self.character_bottom_margin.is_finite()
            || self.character_bottom_margin < 0.0
            || self.character_top() < 0.0
        {
            return Err(Error::InvalidSettings(
                "character does not fit on screen".to_string(),
            ));
        }

        self.tuning.validate()
    }
}
