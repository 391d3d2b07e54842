//! Deterministic game loop module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (no wall time)
//! - Seeded RNG only
//! - One writer: every mutation goes through the controller
//! - No rendering or platform dependencies

pub mod board;
pub mod bounds;
pub mod controller;
pub mod difficulty;
pub mod field;
pub mod scheduler;
pub mod state;

pub use board::{BoardManager, LaneGeometry};
pub use bounds::Bounds;
pub use controller::GameLoopController;
pub use difficulty::{
    CueId, CueTracker, DifficultyTable, DifficultyTier, SCORE_BANDS, ScoreBand, TierId, cue_for,
};
pub use field::{Obstacle, ObstacleField};
pub use scheduler::{Firing, ManualScheduler, Scheduler, TaskHandle};
pub use state::{GameEvent, Lane, LoopPhase, RunState};
