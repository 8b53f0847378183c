//! Run state and core simulation types
//!
//! Everything that evolves during a run lives here: the rising water, the
//! deployed drone, rooftop buildings with artifacts, and lightning flashes.
//! Time is always passed in explicitly (run-elapsed seconds) so the
//! simulation never touches a wall clock.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::Rect;
use crate::consts::*;
use crate::profile::Profile;

/// Outcome of a run session, evaluated once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Run in progress
    Active,
    /// All artifacts collected
    Won,
    /// Water breached the base roof
    Lost,
}

/// Base gameplay tuning, loadable from the persisted store
///
/// Defaults match the shipped balance; unknown fields in the store are
/// ignored and missing fields fall back individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub water_rise_speed: f32,
    pub water_slow_duration: f32,
    pub water_slow_factor: f32,
    /// Drone speed in abstract units (scaled to px/s by `DRONE_SPEED_SCALE`)
    pub drone_speed: f32,
    pub wind_strength: f32,
    pub lightning_interval_min: f32,
    pub lightning_interval_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            water_rise_speed: 18.0,
            water_slow_duration: 10.0,
            water_slow_factor: 0.3,
            drone_speed: 4.0,
            wind_strength: 2.0,
            lightning_interval_min: 1.5,
            lightning_interval_max: 4.0,
        }
    }
}

/// Per-run configuration: base tuning combined with permanent upgrades.
/// Immutable once a run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rise_speed: f32,
    pub slow_factor: f32,
    /// Includes the slow-duration upgrade bonus
    pub slow_duration: f32,
    /// Effective drone speed in px/s, includes the speed upgrade bonus
    pub drone_speed: f32,
    pub wind_strength: f32,
    /// Includes the energy upgrade bonus
    pub energy_max: f32,
    pub lightning_interval: (f32, f32),
}

impl RunConfig {
    /// Derive a run configuration from base tuning and the player's profile
    pub fn derive(tuning: &Tuning, profile: &Profile) -> Self {
        Self {
            rise_speed: tuning.water_rise_speed.max(MIN_RISE_SPEED),
            slow_factor: tuning.water_slow_factor,
            slow_duration: tuning.water_slow_duration
                + profile.slow_duration_bonus as f32 * SLOW_SECS_PER_UPGRADE,
            drone_speed: (tuning.drone_speed
                + profile.drone_speed_bonus as f32 * SPEED_PER_UPGRADE)
                * DRONE_SPEED_SCALE,
            wind_strength: tuning.wind_strength,
            energy_max: ENERGY_BASE_MAX + profile.energy_max_bonus as f32 * ENERGY_PER_UPGRADE,
            lightning_interval: (tuning.lightning_interval_min, tuning.lightning_interval_max),
        }
    }
}

/// The rising water hazard clock
///
/// `level` is a screen-space Y coordinate: Y grows downward, so the water
/// rises as `level` decreases. It never increases.
#[derive(Debug, Clone)]
pub struct Water {
    pub level: f32,
    pub rise_speed: f32,
    pub slow_factor: f32,
    pub slow_duration: f32,
    /// End of the active slowdown window (run-elapsed seconds), if any
    pub slow_until: Option<f32>,
}

impl Water {
    pub fn new(config: &RunConfig, field_height: f32) -> Self {
        Self {
            level: field_height * WATER_START_FRACTION,
            rise_speed: config.rise_speed,
            slow_factor: config.slow_factor,
            slow_duration: config.slow_duration,
            slow_until: None,
        }
    }

    /// Advance the water by `dt` seconds at run-elapsed time `now`
    pub fn advance(&mut self, dt: f32, now: f32) {
        let speed = if self.slow_until.is_some_and(|until| now < until) {
            self.rise_speed * self.slow_factor
        } else {
            self.rise_speed
        };
        self.level -= speed * dt;
    }

    /// Start (or reset forward) the slowdown window. Re-triggering while
    /// already slowed does not stack.
    pub fn apply_slowdown(&mut self, now: f32) {
        self.slow_until = Some(now + self.slow_duration);
    }

    /// True once the water has reached the base roof
    pub fn is_breach(&self, roof_y: f32) -> bool {
        self.level <= roof_y
    }
}

/// Kind of artifact a rooftop may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtifactKind {
    #[default]
    None,
    SolarPanel,
    Seeds,
    Blueprints,
}

impl ArtifactKind {
    /// Coins awarded when collected
    pub fn coin_reward(&self) -> u32 {
        match self {
            ArtifactKind::None => 0,
            ArtifactKind::SolarPanel => 15,
            ArtifactKind::Seeds => 8,
            ArtifactKind::Blueprints => 25,
        }
    }

    /// Seconds of water slowdown granted when collected (0 = none)
    pub fn slow_secs(&self) -> f32 {
        match self {
            ArtifactKind::SolarPanel => 10.0,
            _ => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::None => "Empty",
            ArtifactKind::SolarPanel => "Solar panel",
            ArtifactKind::Seeds => "Seeds",
            ArtifactKind::Blueprints => "Blueprints",
        }
    }
}

/// A neighboring rooftop, target for the drone
#[derive(Debug, Clone)]
pub struct Building {
    pub rect: Rect,
    pub artifact: ArtifactKind,
    pub collected: bool,
}

impl Building {
    pub fn new(rect: Rect, artifact: ArtifactKind) -> Self {
        Self {
            rect,
            artifact,
            collected: false,
        }
    }

    /// Fully under water once the roof's top edge is at or below the level
    pub fn is_submerged(&self, water_level: f32) -> bool {
        self.rect.top() >= water_level
    }

    /// Eligible for collection: above water and not yet taken
    pub fn is_collectible(&self, water_level: f32) -> bool {
        !self.collected && !self.is_submerged(water_level)
    }
}

/// The player's remote drone
#[derive(Debug, Clone)]
pub struct Drone {
    pub pos: Vec2,
    /// Wind-induced velocity (mean-reverting random walk)
    pub wind: Vec2,
    pub health: i32,
    /// Effective speed in px/s
    pub speed: f32,
    pub wind_strength: f32,
    pub radius: f32,
}

impl Drone {
    pub fn new(start_pos: Vec2, config: &RunConfig) -> Self {
        Self {
            pos: start_pos,
            wind: Vec2::ZERO,
            health: DRONE_MAX_HEALTH,
            speed: config.drone_speed,
            wind_strength: config.wind_strength,
            radius: DRONE_RADIUS,
        }
    }

    /// Advance the drone by one step.
    ///
    /// `dir` is the raw held-key direction (components in {-1, 0, 1}); it is
    /// normalized so diagonal flight is no faster than axis flight. Wind
    /// nudges toward a random target and is damped back toward zero. The
    /// position is clamped to `bounds` shrunk by the drone radius.
    pub fn advance(&mut self, dt: f32, dir: Vec2, bounds: &Rect, rng: &mut Pcg32) {
        self.pos += dir.normalize_or_zero() * self.speed * dt;

        let gust = Vec2::new(
            rng.random_range(-1.0..=1.0f32),
            rng.random_range(-1.0..=1.0f32),
        ) * self.wind_strength;
        self.wind += (gust - self.wind * WIND_DAMPING) * WIND_RESPONSE * dt;
        self.pos += self.wind * WIND_GAIN * dt;

        self.pos = bounds.clamp_point(self.pos, self.radius);
    }

    /// Apply damage, flooring health at zero
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    /// True once health is exhausted (the run session removes the drone)
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Bounding box used for rooftop overlap tests
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// A short-lived lightning flash that damages an overlapping drone once
#[derive(Debug, Clone)]
pub struct Lightning {
    pub rect: Rect,
    /// Run-elapsed time after which the flash is purged
    pub active_until: f32,
    pub damage_applied: bool,
}

impl Lightning {
    /// Spawn a flash at a random spot inside `field` at run-elapsed `now`
    pub fn spawn(field: &Rect, now: f32, rng: &mut Pcg32) -> Self {
        let x = field.left() + rng.random_range(LIGHTNING_MARGIN..=field.size.x - LIGHTNING_MARGIN);
        let y = field.top() + rng.random_range(LIGHTNING_MARGIN..=field.size.y - LIGHTNING_MARGIN);
        let h = rng.random_range(80.0..=180.0f32);
        Self {
            rect: Rect::new(x, y, LIGHTNING_WIDTH, h),
            active_until: now + LIGHTNING_FLASH_SECS,
            damage_applied: false,
        }
    }

    pub fn is_expired(&self, now: f32) -> bool {
        now > self.active_until
    }

    /// Proximity test against the drone (flash column plus a reach margin)
    pub fn overlaps_drone(&self, drone: &Drone) -> bool {
        let center = self.rect.center();
        let reach = drone.radius + LIGHTNING_PROXIMITY;
        (drone.pos.x - center.x).abs() < reach
            && (drone.pos.y - center.y).abs() < self.rect.size.y / 2.0 + reach
    }

    /// Damage the drone if overlapping and not already resolved. The flash
    /// keeps rendering until expiry but never strikes twice.
    pub fn try_strike(&mut self, drone: &mut Drone) {
        if !self.damage_applied && self.overlaps_drone(drone) {
            drone.take_damage(LIGHTNING_DAMAGE);
            self.damage_applied = true;
        }
    }
}

/// Complete per-run session state (deterministic given the seed)
///
/// Created on entering `playing`, discarded on leaving it. The renderer
/// reads the public fields; mutation happens only through `tick()` and the
/// deploy/recall commands.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: RunConfig,
    /// Hazard field bounds the drone is confined to
    pub field: Rect,
    /// Y coordinate of the base roof - the water must not reach it
    pub roof_y: f32,
    pub water: Water,
    /// At most one drone is deployed at a time
    pub drone: Option<Drone>,
    pub buildings: Vec<Building>,
    pub lightnings: Vec<Lightning>,
    /// Run-elapsed time of the next lightning spawn
    pub next_lightning_at: f32,
    pub energy: f32,
    /// Accumulated simulated seconds (never wall clock)
    pub elapsed: f32,
    pub coins_earned: u32,
    pub phase: RunPhase,
    pub(crate) rng: Pcg32,
}

impl RunState {
    /// Start a new run with the given seed and derived configuration
    pub fn new(seed: u64, config: RunConfig) -> Self {
        let field = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
        let roof_y = FIELD_HEIGHT * ROOF_FRACTION;
        let mut rng = Pcg32::seed_from_u64(seed);
        let buildings = super::tick::generate_buildings(&field, &mut rng);
        let water = Water::new(&config, field.size.y);
        let energy = config.energy_max;

        Self {
            seed,
            config,
            field,
            roof_y,
            water,
            drone: None,
            buildings,
            lightnings: Vec::new(),
            next_lightning_at: LIGHTNING_FIRST_DELAY,
            energy,
            elapsed: 0.0,
            coins_earned: 0,
            phase: RunPhase::Active,
            rng,
        }
    }

    /// Deploy a drone above the base roof, spending energy.
    /// No-op (returns false) if one is already out or energy is short.
    pub fn deploy_drone(&mut self) -> bool {
        if self.drone.is_some() || self.energy < DEPLOY_COST {
            return false;
        }
        self.energy -= DEPLOY_COST;
        let start = Vec2::new(self.field.center().x, self.roof_y - DRONE_SPAWN_OFFSET);
        self.drone = Some(Drone::new(start, &self.config));
        log::info!("Drone deployed ({:.0} energy left)", self.energy);
        true
    }

    /// Recall the active drone. Energy already spent is not refunded and
    /// collected artifacts are kept.
    pub fn recall_drone(&mut self) {
        if self.drone.take().is_some() {
            log::info!("Drone recalled");
        }
    }

    /// True once every rooftop's artifact has been collected
    pub fn all_collected(&self) -> bool {
        self.buildings.iter().all(|b| b.collected)
    }
}
