//! Falling obstacles and their collision test against the character
//!
//! Each obstacle keeps the acceleration it was spawned with. Obstacles whose
//! top edge passes the bottom of the field are pruned on the step that moves
//! them there, so the live set stays bounded.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::state::Lane;

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Run time at spawn
    pub spawn_time: Duration,
    /// Top edge (grows downward)
    pub vertical_position: f32,
    pub velocity: f32,
    pub fall_acceleration: f32,
}

impl Obstacle {
    /// New obstacle resting just above the visible area
    pub fn new(
        id: u32,
        lane: Lane,
        x: f32,
        width: f32,
        height: f32,
        fall_acceleration: f32,
        spawn_time: Duration,
    ) -> Self {
        Self {
            id,
            lane,
            x,
            width,
            height,
            spawn_time,
            vertical_position: -height,
            velocity: 0.0,
            fall_acceleration,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(
            Vec2::new(self.x, self.vertical_position),
            Vec2::new(self.width, self.height),
        )
    }

    /// Uniformly accelerated motion over `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.vertical_position += self.velocity * dt + 0.5 * self.fall_acceleration * dt * dt;
        self.velocity += self.fall_acceleration * dt;
    }
}

/// Live obstacles and their simulation
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Obstacles whose top edge is past this are removed
    bottom: f32,
    frozen: bool,
    /// Some obstacle overlapped the character at the last collision check
    touching: bool,
}

impl ObstacleField {
    pub fn new(bottom: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            bottom,
            frozen: false,
            touching: false,
        }
    }

    /// Start simulating an obstacle
    pub fn spawn(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Advance all obstacles, then drop the ones past the bottom
    pub fn step(&mut self, elapsed: Duration) {
        if self.frozen {
            return;
        }
        let dt = elapsed.as_secs_f32();
        for obstacle in &mut self.obstacles {
            obstacle.advance(dt);
        }
        let bottom = self.bottom;
        self.obstacles.retain(|o| o.vertical_position <= bottom);
    }

    /// True only at the check where the character goes from clear to overlapped
    pub fn check_collision(&mut self, character: &Bounds) -> bool {
        let touching = self
            .obstacles
            .iter()
            .any(|o| o.bounds().intersects(character));
        let hit = touching && !self.touching;
        self.touching = touching;
        hit
    }

    /// Obstacles stay in place until `resume`
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn resume(&mut self) {
        self.frozen = false;
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
