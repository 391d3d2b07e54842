//! Run state and the events the loop emits
//!
//! Everything here is owned by the game loop controller; collaborators only
//! ever see `GameEvent`s.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::difficulty::{CueId, DifficultyTier, TierId};

/// Current phase of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopPhase {
    /// No run (before start, or after abandoning)
    Idle,
    /// Timer ticking, physics stepping
    Running,
    /// Timer cancelled, obstacles frozen in place
    Paused,
    /// Collision happened (terminal for the run)
    Ended,
}

/// One of the two horizontal character positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub fn opposite(self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
        }
    }
}

/// Mutable state of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u32,
    pub tier: DifficultyTier,
    /// Interval the spawn timer is (or was last) scheduled at
    pub timer_interval: Duration,
    pub lane: Lane,
    /// Character's left edge
    pub character_x: f32,
    /// Seed the lane RNG was built from
    pub seed: u64,
}

impl RunState {
    pub fn new(tier: DifficultyTier, lane: Lane, character_x: f32, seed: u64) -> Self {
        Self {
            score: 0,
            tier,
            timer_interval: tier.spawn_interval,
            lane,
            character_x,
            seed,
        }
    }
}

/// Something collaborators should react to, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted {
        seed: u64,
    },
    ObstacleSpawned {
        id: u32,
        lane: Lane,
        width: f32,
        fall_acceleration: f32,
    },
    ScoreChanged {
        score: u32,
    },
    TierChanged {
        from: TierId,
        to: TierId,
    },
    /// Spawn timer (re)started at this interval
    TimerScheduled {
        interval: Duration,
    },
    CueTriggered {
        cue: CueId,
    },
    CharacterMoved {
        lane: Lane,
        target_x: f32,
    },
    PhysicsFrozen,
    PhysicsResumed,
    MusicStopped,
    MusicResumed {
        tier: TierId,
    },
    PausePresented,
    PauseDismissed,
    GameOver {
        final_score: u32,
    },
    RunAbandoned {
        score: u32,
    },
}
