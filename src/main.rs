//! Tap Dodge headless runner
//!
//! Plays one run with a dodging bot on a virtual clock and logs the result.
//!
//! Usage: `tap-dodge [settings.json]` (set `RUST_LOG=debug` for per-tick detail)

use std::process::ExitCode;
use std::time::Duration;

use tap_dodge::Settings;
use tap_dodge::audio::MusicManager;
use tap_dodge::platform::headless::{HeadlessNavigator, HeadlessSurface};
use tap_dodge::platform::{Collaborators, InputEvent};
use tap_dodge::sim::{GameLoopController, Lane, LoopPhase};

/// Frame length of the simulated host (60 Hz)
const FRAME: Duration = Duration::from_micros(16_667);
/// Give up after this much simulated time
const MAX_RUN: Duration = Duration::from_secs(600);
/// How far above the character the bot starts worrying
const LOOKAHEAD: f32 = 220.0;

/// Pick an input for this frame: leave the lane if something is about to land on us
fn bot_input(controller: &GameLoopController) -> Option<InputEvent> {
    let run = controller.run()?;
    let settings = controller.settings();
    let top = settings.character_top();
    let bottom = top + settings.character_height;

    let danger_in = |lane| {
        controller
            .obstacles()
            .iter()
            .filter(|o| o.lane == lane && o.vertical_position < bottom)
            .map(|o| top - (o.vertical_position + o.height))
            .fold(f32::INFINITY, f32::min)
    };

    let here = danger_in(run.lane);
    let there = danger_in(run.lane.opposite());
    // Only switch when the other lane is clearly safer
    if here < LOOKAHEAD && there > here {
        Some(match run.lane.opposite() {
            Lane::Left => InputEvent::MoveLeft,
            Lane::Right => InputEvent::MoveRight,
        })
    } else {
        None
    }
}

fn run(settings: Settings) -> tap_dodge::Result<u32> {
    let mut collaborators = Collaborators::new(
        HeadlessSurface::default(),
        MusicManager::from_settings(&settings),
        HeadlessNavigator::default(),
    );
    let mut controller = GameLoopController::new(settings)?;
    controller.start()?;
    controller.pump(&mut collaborators);

    let mut elapsed = Duration::ZERO;
    while controller.phase() == LoopPhase::Running && elapsed < MAX_RUN {
        if let Some(input) = bot_input(&controller) {
            controller.handle_input(input)?;
        }
        controller.advance(FRAME)?;
        controller.pump(&mut collaborators);
        elapsed += FRAME;
    }

    if controller.phase() == LoopPhase::Running {
        log::info!("Bot survived {:?}, stopping", MAX_RUN);
        controller.abandon()?;
        controller.pump(&mut collaborators);
    }

    log::info!(
        "{} obstacles rendered, {:?} simulated",
        collaborators.render.obstacles_rendered,
        elapsed
    );
    Ok(controller.score().unwrap_or(collaborators.render.score))
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Failed to load {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    match run(settings) {
        Ok(score) => {
            println!("Final score: {}", score);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
