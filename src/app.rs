//! Top-level application state machine
//!
//! menu -> shop -> playing -> game_over / level_complete -> menu.
//! Commands invalid in the current state are silent no-ops. While playing,
//! each frame is delegated to the run session; terminal run phases persist
//! their outcome (coin award or high score) and transition out.

use crate::consts::*;
use crate::profile::{Profile, ProfileStore, UpgradeKind};
use crate::sim::{RunConfig, RunPhase, RunState, TickInput, tick};

/// Top-level application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Shop,
    Playing,
    /// Water reached the base roof
    GameOver,
    /// Every artifact collected
    LevelComplete,
}

/// Discrete user actions, validated against the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartRun,
    OpenShop,
    Purchase(UpgradeKind),
    DeployDrone,
    RecallDrone,
    ReturnToMenu,
    Quit,
}

/// The application: owns the profile, its store, and the active run
pub struct App {
    state: AppState,
    profile: Profile,
    store: ProfileStore,
    run: Option<RunState>,
    /// Coins awarded by the most recent completed run (results screen)
    last_award: u32,
    /// Survival time of the most recent lost run (results screen)
    last_survival: f32,
    should_quit: bool,
    next_seed: u64,
}

impl App {
    /// Load the profile from `store` and start at the menu
    pub fn new(store: ProfileStore, seed: u64) -> Self {
        let profile = store.load();
        Self {
            state: AppState::Menu,
            profile,
            store,
            run: None,
            last_award: 0,
            last_survival: 0.0,
            should_quit: false,
            next_seed: seed,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Read-only view of the active run for the renderer
    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    pub fn last_award(&self) -> u32 {
        self.last_award
    }

    pub fn last_survival(&self) -> f32 {
        self.last_survival
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle a discrete user action. Anything not valid in the current
    /// state is ignored.
    pub fn handle(&mut self, command: Command) {
        match (self.state, command) {
            (_, Command::Quit) => {
                self.should_quit = true;
            }
            (AppState::Menu, Command::StartRun) => {
                let tuning = self.store.load_tuning();
                let config = RunConfig::derive(&tuning, &self.profile);
                let seed = self.advance_seed();
                log::info!("Starting run (seed {seed})");
                self.run = Some(RunState::new(seed, config));
                self.state = AppState::Playing;
            }
            (AppState::Menu, Command::OpenShop) => {
                self.state = AppState::Shop;
            }
            (AppState::Shop, Command::Purchase(kind)) => {
                // Persist immediately so the purchase survives a crash
                if self.profile.purchase(kind) {
                    self.store.save(&self.profile);
                }
            }
            (AppState::Shop, Command::ReturnToMenu) => {
                self.state = AppState::Menu;
            }
            (AppState::Playing, Command::DeployDrone) => {
                if let Some(run) = &mut self.run {
                    run.deploy_drone();
                }
            }
            (AppState::Playing, Command::RecallDrone) => {
                if let Some(run) = &mut self.run {
                    run.recall_drone();
                }
            }
            (AppState::GameOver | AppState::LevelComplete, Command::ReturnToMenu) => {
                self.state = AppState::Menu;
            }
            (state, command) => {
                log::debug!("Ignoring {command:?} in {state:?}");
            }
        }
    }

    /// Advance one rendered frame. The delta is clamped so a stalled frame
    /// cannot fast-forward the water.
    pub fn frame(&mut self, input: &TickInput, dt: f32) {
        if self.state != AppState::Playing {
            return;
        }
        let Some(run) = &mut self.run else {
            return;
        };

        tick(run, input, dt.min(MAX_FRAME_DT));

        match run.phase {
            RunPhase::Active => {}
            RunPhase::Won => {
                self.last_award = run.coins_earned;
                self.profile.award_coins(self.last_award);
                self.store.save(&self.profile);
                self.run = None;
                self.state = AppState::LevelComplete;
            }
            RunPhase::Lost => {
                self.last_survival = run.elapsed;
                if self.profile.record_survival(self.last_survival) {
                    log::info!("New high score: {:.1}s", self.last_survival);
                    self.store.save(&self.profile);
                }
                self.run = None;
                self.state = AppState::GameOver;
            }
        }
    }

    fn advance_seed(&mut self) -> u64 {
        let seed = self.next_seed;
        // LCG step so consecutive runs get distinct seeds
        self.next_seed = self
            .next_seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed
    }
}
