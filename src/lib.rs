//! Flood - a rooftop survival arcade game core
//!
//! The last computer sits on a skyscraper roof while the water rises. A
//! remote drone scouts the neighboring rooftops for artifacts before they
//! go under.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (water, drone, lightning, run session)
//! - `app`: Top-level state machine (menu/shop/playing/game_over/level_complete)
//! - `profile`: Persistent player profile (coins, high score, upgrades)
//!
//! Rendering, windowing and audio are external collaborators: the core only
//! exposes read-only state queries each tick.

pub mod app;
pub mod profile;
pub mod sim;

pub use app::{App, AppState, Command};
pub use profile::{Profile, ProfileStore, UpgradeKind};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frame delta clamp to prevent spiral of death on long stalls
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Hazard field dimensions (the scrollable panel the drone flies in)
    pub const FIELD_WIDTH: f32 = 720.0;
    pub const FIELD_HEIGHT: f32 = 700.0;
    /// Water starts this fraction of the way down the field
    pub const WATER_START_FRACTION: f32 = 0.75;
    /// The base roof sits this fraction of the way down the field
    pub const ROOF_FRACTION: f32 = 0.15;
    /// Rise speed floor applied when deriving a run
    pub const MIN_RISE_SPEED: f32 = 10.0;

    /// Drone defaults
    pub const DRONE_RADIUS: f32 = 18.0;
    pub const DRONE_MAX_HEALTH: i32 = 100;
    /// Pixels/sec per configured speed unit
    pub const DRONE_SPEED_SCALE: f32 = 57.6;
    /// Deployment spawn height above the base roof
    pub const DRONE_SPAWN_OFFSET: f32 = 35.0;

    /// Wind follows a mean-reverting random walk
    pub const WIND_DAMPING: f32 = 0.05;
    pub const WIND_RESPONSE: f32 = 25.0;
    /// Displacement gain applied to wind velocity
    pub const WIND_GAIN: f32 = 20.0;

    /// Energy economy
    pub const ENERGY_BASE_MAX: f32 = 100.0;
    pub const ENERGY_PER_UPGRADE: f32 = 20.0;
    pub const DEPLOY_COST: f32 = 15.0;
    /// Restored on each artifact collected
    pub const COLLECT_ENERGY: f32 = 15.0;

    /// Lightning
    pub const LIGHTNING_DAMAGE: i32 = 35;
    /// Flash lifetime in seconds
    pub const LIGHTNING_FLASH_SECS: f32 = 0.15;
    /// Delay before the first strike of a run
    pub const LIGHTNING_FIRST_DELAY: f32 = 2.0;
    /// Extra reach around the flash column when testing the drone
    pub const LIGHTNING_PROXIMITY: f32 = 15.0;
    pub const LIGHTNING_WIDTH: f32 = 8.0;
    /// Placement margin inside the field bounds
    pub const LIGHTNING_MARGIN: f32 = 50.0;

    /// Rooftops generated per run
    pub const BUILDING_COUNT: usize = 14;
    pub const BUILDINGS_PER_ROW: usize = 5;

    /// Slow-duration upgrade grants this many extra seconds per level
    pub const SLOW_SECS_PER_UPGRADE: f32 = 5.0;
    /// Drone-speed upgrade grants this many speed units per level
    pub const SPEED_PER_UPGRADE: f32 = 1.0;
}
