//! Platform abstraction layer
//!
//! The collaborators the game loop talks to:
//! - Render surface (obstacles, character, physics freeze)
//! - Navigation (pause and game-over screens)
//! - Input (discrete taps delivered as `InputEvent`s)
//!
//! The loop never calls these directly. It emits `GameEvent`s, and
//! `Collaborators` routes them.

pub mod headless;

use crate::audio::AudioSink;
use crate::sim::{CueId, GameEvent, Lane};

/// Drawing and animation side of the game screen
pub trait RenderSurface {
    fn render_obstacle(&mut self, lane: Lane, width: f32, fall_acceleration: f32);
    /// Animate the character to a new left edge
    fn reposition_character(&mut self, target_x: f32);
    fn freeze_physics(&mut self);
    fn resume_physics(&mut self);
    fn show_score(&mut self, _score: u32) {}
}

/// Screen presentation for pause and game over
pub trait Navigator {
    fn present_game_over(&mut self, final_score: u32);
    fn present_pause(&mut self);
    fn dismiss_pause(&mut self);
}

/// Discrete input delivered to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    PauseRequested,
    ResumeRequested,
}

/// Receives game events in emission order
pub trait EventHandler {
    fn handle(&mut self, event: &GameEvent);
}

impl EventHandler for Vec<GameEvent> {
    fn handle(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Routes game events to the render, audio and navigation collaborators
#[derive(Debug, Default)]
pub struct Collaborators<R, A, N> {
    pub render: R,
    pub audio: A,
    pub nav: N,
}

impl<R, A, N> Collaborators<R, A, N> {
    pub fn new(render: R, audio: A, nav: N) -> Self {
        Self { render, audio, nav }
    }
}

impl<R: RenderSurface, A: AudioSink, N: Navigator> EventHandler for Collaborators<R, A, N> {
    fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::ObstacleSpawned {
                lane,
                width,
                fall_acceleration,
                ..
            } => self.render.render_obstacle(lane, width, fall_acceleration),
            GameEvent::ScoreChanged { score } => self.render.show_score(score),
            GameEvent::CharacterMoved { target_x, .. } => {
                self.render.reposition_character(target_x)
            }
            GameEvent::PhysicsFrozen => self.render.freeze_physics(),
            GameEvent::PhysicsResumed => self.render.resume_physics(),
            GameEvent::CueTriggered { cue } => self.audio.play_cue(cue),
            GameEvent::MusicResumed { tier } => self.audio.play_cue(CueId::for_tier(tier)),
            GameEvent::MusicStopped => self.audio.stop(),
            GameEvent::PausePresented => self.nav.present_pause(),
            GameEvent::PauseDismissed => self.nav.dismiss_pause(),
            GameEvent::GameOver { final_score } => self.nav.present_game_over(final_score),
            GameEvent::RunStarted { .. }
            | GameEvent::TierChanged { .. }
            | GameEvent::TimerScheduled { .. }
            | GameEvent::RunAbandoned { .. } => {}
        }
    }
}
