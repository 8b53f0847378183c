//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, explicit run-elapsed time (never wall clock)
//! - Seeded RNG only (one generator per run)
//! - No rendering or platform dependencies

pub mod field;
pub mod state;
pub mod tick;

pub use field::Rect;
pub use state::{
    ArtifactKind, Building, Drone, Lightning, RunConfig, RunPhase, RunState, Tuning, Water,
};
pub use tick::{Key, TickInput, generate_buildings, tick};
