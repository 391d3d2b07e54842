//! Tap Dodge - a two-lane tap-to-dodge arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic game loop (difficulty, obstacles, timer, state machine)
//! - `platform`: Collaborator traits for rendering, navigation and input
//! - `audio`: Music cue selection and the audio collaborator
//! - `settings`: Run configuration
//! - `tuning`: Data-driven difficulty balance

pub mod audio;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use settings::Settings;
pub use tuning::{TierTuning, Tuning};

use std::time::Duration;

/// Game configuration constants
pub mod consts {
    /// Fixed physics substep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Points added on every timer tick
    pub const SCORE_INCREMENT: u32 = 2;

    /// Reference screen (points)
    pub const SCREEN_WIDTH: f32 = 375.0;
    pub const SCREEN_HEIGHT: f32 = 812.0;

    /// Character box, resting near the bottom edge
    pub const CHARACTER_WIDTH: f32 = 60.0;
    pub const CHARACTER_HEIGHT: f32 = 60.0;
    pub const CHARACTER_BOTTOM_MARGIN: f32 = 120.0;

    /// Obstacle height; width is a fraction of a lane
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    pub const OBSTACLE_WIDTH_RATIO: f32 = 0.6;

    /// Same lane may be picked at most this many times in a row
    pub const MAX_LANE_STREAK: u32 = 3;
}

/// Convert a float seconds value to a `Duration`, clamping negatives to zero
#[inline]
pub fn secs(value: f32) -> Duration {
    Duration::from_secs_f32(value.max(0.0))
}
