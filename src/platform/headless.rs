//! Headless collaborators: record what a real screen would show, and log it

use super::{Navigator, RenderSurface};
use crate::sim::Lane;

/// Render surface without a screen
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub obstacles_rendered: u32,
    pub character_x: Option<f32>,
    pub score: u32,
    pub frozen: bool,
}

impl RenderSurface for HeadlessSurface {
    fn render_obstacle(&mut self, lane: Lane, width: f32, fall_acceleration: f32) {
        self.obstacles_rendered += 1;
        log::debug!(
            "Obstacle #{} in {:?} lane (width {:.1}, accel {:.0})",
            self.obstacles_rendered,
            lane,
            width,
            fall_acceleration
        );
    }

    fn reposition_character(&mut self, target_x: f32) {
        self.character_x = Some(target_x);
    }

    fn freeze_physics(&mut self) {
        self.frozen = true;
    }

    fn resume_physics(&mut self) {
        self.frozen = false;
    }

    fn show_score(&mut self, score: u32) {
        self.score = score;
    }
}

/// Navigator without screens
#[derive(Debug, Clone, Default)]
pub struct HeadlessNavigator {
    pub pause_visible: bool,
    pub game_over: Option<u32>,
}

impl Navigator for HeadlessNavigator {
    fn present_game_over(&mut self, final_score: u32) {
        log::info!("GAME OVER - final score {}", final_score);
        self.game_over = Some(final_score);
    }

    fn present_pause(&mut self) {
        self.pause_visible = true;
    }

    fn dismiss_pause(&mut self) {
        self.pause_visible = false;
    }
}
