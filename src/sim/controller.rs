//! Game loop controller
//!
//! Central state machine: Idle → Running ⇄ Paused → Ended. Owns the spawn
//! timer, the run state, the board and the obstacle field. A tick runs, in
//! order: spawn → score → difficulty → (reschedule) → (cue). Every later step
//! sees the score and tier written by the earlier ones.

use std::time::Duration;

use glam::Vec2;

use super::board::BoardManager;
use super::bounds::Bounds;
use super::difficulty::CueTracker;
use super::field::{Obstacle, ObstacleField};
use super::scheduler::{ManualScheduler, Scheduler, TaskHandle};
use super::state::{GameEvent, Lane, LoopPhase, RunState};
use crate::consts::*;
use crate::error::{Error, Result};
use crate::platform::{EventHandler, InputEvent};
use crate::secs;
use crate::settings::Settings;

/// Everything that lives exactly as long as one run
#[derive(Debug)]
struct Session {
    run: RunState,
    board: BoardManager,
    field: ObstacleField,
    cues: CueTracker,
    /// Active spawn timer; `None` while paused or ended
    timer: Option<TaskHandle>,
    /// Physics has been simulated up to this clock time
    sim_time: Duration,
    next_obstacle_id: u32,
}

/// Drives a run from start to game over
#[derive(Debug)]
pub struct GameLoopController<S: Scheduler = ManualScheduler> {
    settings: Settings,
    scheduler: S,
    phase: LoopPhase,
    session: Option<Session>,
    events: Vec<GameEvent>,
}

impl GameLoopController<ManualScheduler> {
    /// Controller on a virtual clock
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_scheduler(settings, ManualScheduler::new())
    }
}

impl<S: Scheduler> GameLoopController<S> {
    pub fn with_scheduler(settings: Settings, scheduler: S) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            scheduler,
            phase: LoopPhase::Idle,
            session: None,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// State of the current (or just-ended) run
    pub fn run(&self) -> Option<&RunState> {
        self.session.as_ref().map(|s| &s.run)
    }

    pub fn score(&self) -> Option<u32> {
        self.run().map(|r| r.score)
    }

    pub fn board(&self) -> Option<&BoardManager> {
        self.session.as_ref().map(|s| &s.board)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.session
            .as_ref()
            .map(|s| s.field.obstacles())
            .unwrap_or(&[])
    }

    /// Handle of the spawn timer, if one is scheduled
    pub fn active_timer(&self) -> Option<TaskHandle> {
        self.session.as_ref().and_then(|s| s.timer)
    }

    pub fn character_bounds(&self) -> Option<Bounds> {
        self.run()
            .map(|r| character_bounds(&self.settings, r.character_x))
    }

    /// Begin a fresh run (from Idle, or after a game over)
    pub fn start(&mut self) -> Result<()> {
        if matches!(self.phase, LoopPhase::Running | LoopPhase::Paused) {
            return Err(Error::InvalidPhase {
                action: "start a run",
                phase: self.phase,
            });
        }
        if let Some(timer) = self.session.take().and_then(|s| s.timer) {
            self.scheduler.cancel(timer);
        }

        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let board = BoardManager::from_settings(&self.settings, seed);
        let tier = board.difficulty();
        let lane = Lane::Left;
        let character_x = board.geometry().character_x(lane);

        let mut session = Session {
            run: RunState::new(tier, lane, character_x, seed),
            board,
            field: ObstacleField::new(self.settings.screen_height),
            cues: CueTracker::new(),
            timer: Some(self.scheduler.schedule(tier.spawn_interval)),
            sim_time: self.scheduler.now(),
            next_obstacle_id: 1,
        };

        self.events.push(GameEvent::RunStarted { seed });
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::TimerScheduled {
            interval: tier.spawn_interval,
        });
        if let Some(cue) = session.cues.fire(0) {
            self.events.push(GameEvent::CueTriggered { cue });
        }

        log::info!(
            "Run started (seed {}, tier {:?}, interval {:?})",
            seed,
            tier.id,
            tier.spawn_interval
        );
        self.session = Some(session);
        self.phase = LoopPhase::Running;
        Ok(())
    }

    /// Stop the timer and freeze obstacles
    pub fn pause(&mut self) -> Result<()> {
        self.require(LoopPhase::Running, "pause")?;
        let session = self.session.as_mut().ok_or(Error::RunNotStarted)?;

        if let Some(timer) = session.timer.take() {
            self.scheduler.cancel(timer);
        }
        session.field.freeze();
        self.phase = LoopPhase::Paused;

        self.events.push(GameEvent::PhysicsFrozen);
        self.events.push(GameEvent::MusicStopped);
        self.events.push(GameEvent::PausePresented);
        log::info!("Paused at score {}", session.run.score);
        Ok(())
    }

    /// Unfreeze obstacles and restart the timer at the current tier's interval
    pub fn resume(&mut self) -> Result<()> {
        self.require(LoopPhase::Paused, "resume")?;
        let session = self.session.as_mut().ok_or(Error::RunNotStarted)?;

        session.field.resume();
        // Frozen time is not simulated
        session.sim_time = self.scheduler.now();

        let tier = session.run.tier;
        session.timer = Some(self.scheduler.schedule(tier.spawn_interval));
        session.run.timer_interval = tier.spawn_interval;
        self.phase = LoopPhase::Running;

        self.events.push(GameEvent::PauseDismissed);
        self.events.push(GameEvent::PhysicsResumed);
        self.events.push(GameEvent::TimerScheduled {
            interval: tier.spawn_interval,
        });
        self.events.push(GameEvent::MusicResumed { tier: tier.id });
        log::info!(
            "Resumed at score {} (tier {:?}, interval {:?})",
            session.run.score,
            tier.id,
            tier.spawn_interval
        );
        Ok(())
    }

    /// Move the character toward a lane; returns the new left edge
    pub fn move_character(&mut self, lane: Lane) -> Result<f32> {
        self.require(LoopPhase::Running, "move the character")?;
        let session = self.session.as_mut().ok_or(Error::RunNotStarted)?;

        let target = session
            .board
            .compute_lane_target(lane, session.run.character_x)?;
        session.run.character_x = target;
        session.run.lane = session.board.geometry().lane_at(target);

        self.events.push(GameEvent::CharacterMoved {
            lane: session.run.lane,
            target_x: target,
        });
        Ok(target)
    }

    /// Apply one discrete input
    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        let result = match input {
            InputEvent::MoveLeft => self.move_character(Lane::Left).map(|_| ()),
            InputEvent::MoveRight => self.move_character(Lane::Right).map(|_| ()),
            InputEvent::PauseRequested => self.pause(),
            InputEvent::ResumeRequested => self.resume(),
        };
        if let Err(err) = &result {
            log::warn!("Rejected {:?}: {}", input, err);
        }
        result
    }

    /// Timer callback. Returns false (and changes nothing) for stale handles.
    pub fn on_tick(&mut self, handle: TaskHandle) -> bool {
        if self.phase != LoopPhase::Running {
            log::debug!("Ignoring tick {:?} while {:?}", handle, self.phase);
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.timer != Some(handle) {
            log::debug!("Ignoring stale tick {:?}", handle);
            return false;
        }

        // 1. Spawn with the tier active before this tick's score change
        let (lane, width) = session.board.generate_obstacle();
        let spawn_tier = session.board.difficulty();
        let geometry = *session.board.geometry();
        let id = session.next_obstacle_id;
        session.next_obstacle_id += 1;
        session.field.spawn(Obstacle::new(
            id,
            lane,
            geometry.obstacle_x(lane, width),
            width,
            self.settings.obstacle_height,
            spawn_tier.fall_acceleration,
            self.scheduler.now(),
        ));
        self.events.push(GameEvent::ObstacleSpawned {
            id,
            lane,
            width,
            fall_acceleration: spawn_tier.fall_acceleration,
        });

        // 2. Score
        session.run.score = session.run.score.saturating_add(SCORE_INCREMENT);
        let score = session.run.score;
        self.events.push(GameEvent::ScoreChanged { score });

        // 3. Difficulty
        let tier = session.board.set_difficulty(score);
        if tier.id != session.run.tier.id {
            log::info!(
                "Score {}: tier {:?} -> {:?}",
                score,
                session.run.tier.id,
                tier.id
            );
            self.events.push(GameEvent::TierChanged {
                from: session.run.tier.id,
                to: tier.id,
            });
        }
        session.run.tier = tier;

        // 4. Reschedule (full restart at the new interval)
        if tier.spawn_interval != session.run.timer_interval {
            self.scheduler.cancel(handle);
            session.timer = Some(self.scheduler.schedule(tier.spawn_interval));
            session.run.timer_interval = tier.spawn_interval;
            self.events.push(GameEvent::TimerScheduled {
                interval: tier.spawn_interval,
            });
            log::debug!("Timer rescheduled at {:?}", tier.spawn_interval);
        }

        // 5. Cue
        if let Some(cue) = session.cues.fire(score) {
            self.events.push(GameEvent::CueTriggered { cue });
        }

        true
    }

    /// Advance the clock by `dt`, interleaving physics and timer ticks
    pub fn advance(&mut self, dt: Duration) -> Result<()> {
        let until = self.scheduler.now() + dt;
        match self.phase {
            LoopPhase::Idle => return Err(Error::RunNotStarted),
            LoopPhase::Paused | LoopPhase::Ended => {
                self.scheduler.advance_to(until);
                return Ok(());
            }
            LoopPhase::Running => {}
        }

        while self.phase == LoopPhase::Running {
            let Some(firing) = self.scheduler.poll(until) else {
                break;
            };
            self.simulate_until(firing.at);
            if self.phase == LoopPhase::Running {
                self.on_tick(firing.handle);
            }
        }
        if self.phase == LoopPhase::Running {
            self.simulate_until(until);
        }
        self.scheduler.advance_to(until);
        Ok(())
    }

    /// Collision reported by an external physics host
    pub fn report_collision(&mut self) -> Result<()> {
        self.require(LoopPhase::Running, "report a collision")?;
        self.end_run();
        Ok(())
    }

    /// Leave the game screen: drop the run and return to Idle
    pub fn abandon(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(Error::RunNotStarted)?;
        if let Some(timer) = session.timer {
            self.scheduler.cancel(timer);
        }
        match self.phase {
            // Music already stopped when the pause overlay went up
            LoopPhase::Paused => self.events.push(GameEvent::PauseDismissed),
            LoopPhase::Running => self.events.push(GameEvent::MusicStopped),
            LoopPhase::Idle | LoopPhase::Ended => {}
        }
        self.events.push(GameEvent::RunAbandoned {
            score: session.run.score,
        });
        log::info!("Run abandoned at score {}", session.run.score);
        self.phase = LoopPhase::Idle;
        Ok(())
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain events into a handler, in order
    pub fn pump(&mut self, handler: &mut impl EventHandler) {
        for event in self.events.drain(..) {
            handler.handle(&event);
        }
    }

    fn require(&self, expected: LoopPhase, action: &'static str) -> Result<()> {
        match self.phase {
            phase if phase == expected => Ok(()),
            LoopPhase::Idle => Err(Error::RunNotStarted),
            phase => Err(Error::InvalidPhase { action, phase }),
        }
    }

    /// Step physics in fixed chunks up to `time`, ending the run on contact
    fn simulate_until(&mut self, time: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let character = character_bounds(&self.settings, session.run.character_x);
        let max_step = secs(SIM_DT);

        let mut collided = false;
        while session.sim_time < time {
            let step = (time - session.sim_time).min(max_step);
            session.field.step(step);
            session.sim_time += step;
            if session.field.check_collision(&character) {
                collided = true;
                break;
            }
        }

        if collided {
            self.end_run();
        }
    }

    fn end_run(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(timer) = session.timer.take() {
            self.scheduler.cancel(timer);
        }
        self.phase = LoopPhase::Ended;
        let final_score = session.run.score;
        self.events.push(GameEvent::GameOver { final_score });
        log::info!("Game over - final score {}", final_score);
    }
}

fn character_bounds(settings: &Settings, character_x: f32) -> Bounds {
    Bounds::from_origin_size(
        Vec2::new(character_x, settings.character_top()),
        Vec2::new(settings.character_width, settings.character_height),
    )
}
