//! Score-driven difficulty tiers and one-shot music cues
//!
//! Score bands partition the non-negative integers. Each band names a tier
//! and a single cue score strictly inside it. Cue scores match exactly: with
//! a +2 increment from 0 only even values are ever observed, and every cue
//! score is even, so all five are reachable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::secs;
use crate::tuning::Tuning;

/// Difficulty level, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierId {
    Easiest,
    Easy,
    Normal,
    Hard,
    Hardest,
}

impl TierId {
    pub const ALL: [TierId; 5] = [
        TierId::Easiest,
        TierId::Easy,
        TierId::Normal,
        TierId::Hard,
        TierId::Hardest,
    ];

    /// Tier for a score (pure, total)
    pub fn for_score(score: u32) -> TierId {
        band_for(score).tier
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One-shot audio cue fired when score first enters a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CueId {
    EnterEasiest,
    EnterEasy,
    EnterNormal,
    EnterHard,
    EnterHardest,
}

impl CueId {
    /// Cue announcing a tier
    pub fn for_tier(tier: TierId) -> CueId {
        match tier {
            TierId::Easiest => CueId::EnterEasiest,
            TierId::Easy => CueId::EnterEasy,
            TierId::Normal => CueId::EnterNormal,
            TierId::Hard => CueId::EnterHard,
            TierId::Hardest => CueId::EnterHardest,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Inclusive score range mapped to a tier, with its cue score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    pub lower: u32,
    /// `None` = unbounded
    pub upper: Option<u32>,
    pub tier: TierId,
    pub cue_at: u32,
    pub cue: CueId,
}

impl ScoreBand {
    pub fn contains(&self, score: u32) -> bool {
        score >= self.lower && self.upper.is_none_or(|upper| score <= upper)
    }
}

pub static SCORE_BANDS: [ScoreBand; 5] = [
    ScoreBand {
        lower: 0,
        upper: Some(50),
        tier: TierId::Easiest,
        cue_at: 0,
        cue: CueId::EnterEasiest,
    },
    ScoreBand {
        lower: 51,
        upper: Some(100),
        tier: TierId::Easy,
        cue_at: 52,
        cue: CueId::EnterEasy,
    },
    ScoreBand {
        lower: 101,
        upper: Some(200),
        tier: TierId::Normal,
        cue_at: 102,
        cue: CueId::EnterNormal,
    },
    ScoreBand {
        lower: 201,
        upper: Some(350),
        tier: TierId::Hard,
        cue_at: 202,
        cue: CueId::EnterHard,
    },
    ScoreBand {
        lower: 351,
        upper: None,
        tier: TierId::Hardest,
        cue_at: 352,
        cue: CueId::EnterHardest,
    },
];

fn band_for(score: u32) -> ScoreBand {
    SCORE_BANDS
        .iter()
        .rev()
        .find(|band| score >= band.lower)
        .copied()
        .unwrap_or(SCORE_BANDS[0])
}

/// Cue for an exact sentinel score, `None` otherwise
pub fn cue_for(score: u32) -> Option<CueId> {
    SCORE_BANDS
        .iter()
        .find(|band| band.cue_at == score)
        .map(|band| band.cue)
}

/// A difficulty level with its magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub id: TierId,
    pub spawn_interval: Duration,
    pub fall_acceleration: f32,
}

/// Score → tier lookup with tuned magnitudes
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyTable {
    tiers: [DifficultyTier; 5],
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl DifficultyTable {
    /// Build from tuning (expects `Tuning::validate` to have passed)
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let tiers = TierId::ALL.map(|id| {
            let t = tuning.tiers[id.index()];
            DifficultyTier {
                id,
                spawn_interval: secs(t.spawn_interval_secs),
                fall_acceleration: t.fall_acceleration,
            }
        });
        Self { tiers }
    }

    pub fn tier(&self, id: TierId) -> DifficultyTier {
        self.tiers[id.index()]
    }

    pub fn tier_for(&self, score: u32) -> DifficultyTier {
        self.tier(TierId::for_score(score))
    }
}

/// Remembers which cues already fired this run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CueTracker {
    fired: u8,
}

impl CueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue to fire for this score, at most once per cue per run
    pub fn fire(&mut self, score: u32) -> Option<CueId> {
        let cue = cue_for(score)?;
        if self.fired & cue.bit() != 0 {
            return None;
        }
        self.fired |= cue.bit();
        Some(cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCORE_INCREMENT;
    use proptest::prelude::*;

    #[test]
    fn test_band_boundaries() {
        for s in 0..=50 {
            assert_eq!(TierId::for_score(s), TierId::Easiest);
        }
        assert_eq!(TierId::for_score(51), TierId::Easy);
        assert_eq!(TierId::for_score(100), TierId::Easy);
        assert_eq!(TierId::for_score(101), TierId::Normal);
        assert_eq!(TierId::for_score(200), TierId::Normal);
        assert_eq!(TierId::for_score(201), TierId::Hard);
        assert_eq!(TierId::for_score(350), TierId::Hard);
        assert_eq!(TierId::for_score(351), TierId::Hardest);
        assert_eq!(TierId::for_score(u32::MAX), TierId::Hardest);
    }

    #[test]
    fn test_bands_partition_without_gaps() {
        for pair in SCORE_BANDS.windows(2) {
            assert_eq!(pair[0].upper.map(|u| u + 1), Some(pair[1].lower));
        }
        for band in &SCORE_BANDS {
            assert!(band.contains(band.cue_at));
        }
        assert_eq!(SCORE_BANDS[0].lower, 0);
    }

    #[test]
    fn test_cue_sentinels() {
        let hits: Vec<_> = (0..1000).filter_map(|s| cue_for(s).map(|c| (s, c))).collect();
        assert_eq!(
            hits,
            vec![
                (0, CueId::EnterEasiest),
                (52, CueId::EnterEasy),
                (102, CueId::EnterNormal),
                (202, CueId::EnterHard),
                (352, CueId::EnterHardest),
            ]
        );
    }

    #[test]
    fn test_every_sentinel_reachable_with_increment() {
        for band in &SCORE_BANDS {
            assert_eq!(band.cue_at % SCORE_INCREMENT, 0);
        }
    }

    #[test]
    fn test_tracker_fires_once() {
        let mut tracker = CueTracker::new();
        assert_eq!(tracker.fire(52), Some(CueId::EnterEasy));
        assert_eq!(tracker.fire(52), None);
        assert_eq!(tracker.fire(53), None);
        assert_eq!(tracker.fire(102), Some(CueId::EnterNormal));
    }

    #[test]
    fn test_table_tiers_escalate() {
        let table = DifficultyTable::default();
        for pair in TierId::ALL.windows(2) {
            let (a, b) = (table.tier(pair[0]), table.tier(pair[1]));
            assert!(b.spawn_interval < a.spawn_interval);
            assert!(b.fall_acceleration > a.fall_acceleration);
        }
        assert_eq!(table.tier_for(120).id, TierId::Normal);
    }

    proptest! {
        #[test]
        fn prop_tier_monotonic(a in 0u32..2000, b in 0u32..2000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(TierId::for_score(lo) <= TierId::for_score(hi));
        }

        #[test]
        fn prop_each_cue_fires_once_on_ascending_scores(ticks in 0u32..400) {
            let mut tracker = CueTracker::new();
            let mut fired = Vec::new();
            for i in 0..=ticks {
                if let Some(cue) = tracker.fire(i * SCORE_INCREMENT) {
                    fired.push(cue);
                }
                // revisiting an earlier score never refires
                prop_assert_eq!(tracker.fire(0), None);
            }
            let mut deduped = fired.clone();
            deduped.dedup();
            prop_assert_eq!(fired, deduped);
        }
    }
}
