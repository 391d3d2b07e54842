//! Data-driven difficulty balance
//!
//! Magnitudes of the five tiers. The tier boundaries themselves are fixed by
//! the difficulty table; only spawn cadence and fall acceleration are tunable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spawn cadence and fall acceleration for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTuning {
    /// Seconds between obstacle spawns
    pub spawn_interval_secs: f32,
    /// Downward acceleration of obstacles spawned in this tier (points/s²)
    pub fall_acceleration: f32,
}

impl TierTuning {
    pub const fn new(spawn_interval_secs: f32, fall_acceleration: f32) -> Self {
        Self {
            spawn_interval_secs,
            fall_acceleration,
        }
    }
}

/// Tuning for all tiers, easiest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub tiers: [TierTuning; 5],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tiers: [
                TierTuning::new(1.0, 300.0),
                TierTuning::new(0.85, 400.0),
                TierTuning::new(0.7, 500.0),
                TierTuning::new(0.55, 650.0),
                TierTuning::new(0.4, 800.0),
            ],
        }
    }
}

impl Tuning {
    /// Check that the five tiers are distinct and escalate strictly
    pub fn validate(&self) -> Result<()> {
        for (i, tier) in self.tiers.iter().enumerate() {
            if !tier.spawn_interval_secs.is_finite() || tier.spawn_interval_secs <= 0.0 {
                return Err(Error::InvalidTuning(format!(
                    "tier {} spawn interval must be positive, got {}",
                    i, tier.spawn_interval_secs
                )));
            }
            if !tier.fall_acceleration.is_finite() || tier.fall_acceleration <= 0.0 {
                return Err(Error::InvalidTuning(format!(
                    "tier {} fall acceleration must be positive, got {}",
                    i, tier.fall_acceleration
                )));
            }
        }

        for (i, pair) in self.tiers.windows(2).enumerate() {
            let (easier, harder) = (pair[0], pair[1]);
            if harder.spawn_interval_secs >= easier.spawn_interval_secs {
                return Err(Error::InvalidTuning(format!(
                    "tier {} must spawn faster than tier {}",
                    i + 1,
                    i
                )));
            }
            if harder.fall_acceleration <= easier.fall_acceleration {
                return Err(Error::InvalidTuning(format!(
                    "tier {} must fall faster than tier {}",
                    i + 1,
                    i
                )));
            }
        }

        Ok(())
    }
}
