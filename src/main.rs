//! Flood entry point
//!
//! The core is headless; a renderer is expected to drive `App` per frame and
//! draw from its read-only queries. Until one is wired up, this binary runs
//! a scripted session so the whole loop can be exercised from a terminal.

use flood::consts::*;
use flood::profile::ProfileStore;
use flood::sim::TickInput;
use flood::{App, AppState, Command};

fn main() {
    env_logger::init();
    log::info!("Flood (headless) starting...");

    let store = ProfileStore::new("flood.json");
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut app = App::new(store, seed);

    log::info!(
        "Profile: {} coins, best {:.1}s",
        app.profile().coins,
        app.profile().high_score
    );

    app.handle(Command::StartRun);
    app.handle(Command::DeployDrone);

    // Fly toward the rooftops and let the run play out
    let input = TickInput {
        up: true,
        right: true,
        ..Default::default()
    };
    while app.state() == AppState::Playing {
        app.frame(&input, SIM_DT);
    }

    match app.state() {
        AppState::LevelComplete => {
            log::info!("Level complete: +{} coins", app.last_award());
        }
        AppState::GameOver => {
            log::info!("Game over after {:.1}s", app.last_survival());
        }
        _ => {}
    }
    app.handle(Command::ReturnToMenu);
    app.handle(Command::Quit);
}
