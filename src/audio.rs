//! Music selection and the audio collaborator
//!
//! The loop only emits cues; which track a cue starts is decided here.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::CueId;

/// Audio collaborator driven by the game loop
pub trait AudioSink {
    /// Start the music for a cue (fire-and-forget)
    fn play_cue(&mut self, cue: CueId);
    /// Stop any playing music
    fn stop(&mut self);
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Intro,
    Easy,
    Medium,
}

impl MusicTrack {
    pub fn for_cue(cue: CueId) -> Self {
        match cue {
            CueId::EnterEasiest => MusicTrack::Intro,
            CueId::EnterEasy => MusicTrack::Easy,
            CueId::EnterNormal | CueId::EnterHard | CueId::EnterHardest => MusicTrack::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicTrack::Intro => "intro",
            MusicTrack::Easy => "easy",
            MusicTrack::Medium => "medium",
        }
    }
}

/// Tracks what should be playing and at what level
#[derive(Debug, Clone)]
pub struct MusicManager {
    master_volume: f32,
    music_volume: f32,
    muted: bool,
    current: Option<MusicTrack>,
    /// Number of tracks started
    started: u32,
}

impl Default for MusicManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            music_volume: 0.7,
            muted: false,
            current: None,
            started: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut manager = Self::new();
        manager.set_master_volume(settings.master_volume);
        manager.set_music_volume(settings.music_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current
    }

    pub fn tracks_started(&self) -> u32 {
        self.started
    }
}

impl AudioSink for MusicManager {
    fn play_cue(&mut self, cue: CueId) {
        let track = MusicTrack::for_cue(cue);
        self.current = Some(track);
        self.started += 1;
        log::info!(
            "Music: {} (cue {:?}, volume {:.2})",
            track.as_str(),
            cue,
            self.effective_volume()
        );
    }

    fn stop(&mut self) {
        if let Some(track) = self.current.take() {
            log::info!("Music stopped: {}", track.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_tracks() {
        assert_eq!(MusicTrack::for_cue(CueId::EnterEasiest), MusicTrack::Intro);
        assert_eq!(MusicTrack::for_cue(CueId::EnterEasy), MusicTrack::Easy);
        assert_eq!(MusicTrack::for_cue(CueId::EnterHard), MusicTrack::Medium);
    }

    #[test]
    fn test_play_and_stop() {
        let mut music = MusicManager::new();
        music.play_cue(CueId::EnterEasy);
        assert_eq!(music.current_track(), Some(MusicTrack::Easy));
        music.stop();
        assert_eq!(music.current_track(), None);
        assert_eq!(music.tracks_started(), 1);
    }

    #[test]
    fn test_volume_from_settings() {
        let mut settings = Settings::default();
        settings.master_volume = 2.0;
        settings.music_volume = 0.5;
        let music = MusicManager::from_settings(&settings);
        assert_eq!(music.effective_volume(), 0.5);

        settings.muted = true;
        assert_eq!(MusicManager::from_settings(&settings).effective_volume(), 0.0);
    }
}
