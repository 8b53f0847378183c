//! Persistent player profile
//!
//! Coins, best survival time and permanent upgrade levels, stored as a flat
//! JSON object on disk. Loads are total: a missing or malformed store falls
//! back to defaults and is never fatal. Saves are a merge over whatever the
//! file already holds, so unrelated keys (e.g. tuning overrides living in
//! the same file) survive a profile write.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sim::Tuning;

/// A permanent upgrade purchasable in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// +1 drone speed unit per level
    DroneSpeed,
    /// +20 max energy per level
    EnergyMax,
    /// +5 s water slowdown per level
    SlowDuration,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::DroneSpeed,
        UpgradeKind::EnergyMax,
        UpgradeKind::SlowDuration,
    ];

    /// Coin price per level
    pub fn price(&self) -> u32 {
        match self {
            UpgradeKind::DroneSpeed => 50,
            UpgradeKind::EnergyMax => 40,
            UpgradeKind::SlowDuration => 60,
        }
    }

    /// Maximum purchasable level
    pub fn max_level(&self) -> u8 {
        match self {
            UpgradeKind::DroneSpeed => 3,
            UpgradeKind::EnergyMax => 5,
            UpgradeKind::SlowDuration => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeKind::DroneSpeed => "Drone speed +1",
            UpgradeKind::EnergyMax => "Max energy +20",
            UpgradeKind::SlowDuration => "Water slowdown +5 s",
        }
    }
}

/// The player's persistent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub coins: u32,
    /// Best survival time in seconds
    pub high_score: f32,
    pub drone_speed_bonus: u8,
    pub energy_max_bonus: u8,
    pub slow_duration_bonus: u8,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            coins: 0,
            high_score: 0.0,
            drone_speed_bonus: 0,
            energy_max_bonus: 0,
            slow_duration_bonus: 0,
        }
    }
}

impl Profile {
    /// Current level of an upgrade
    pub fn level(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::DroneSpeed => self.drone_speed_bonus,
            UpgradeKind::EnergyMax => self.energy_max_bonus,
            UpgradeKind::SlowDuration => self.slow_duration_bonus,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u8 {
        match kind {
            UpgradeKind::DroneSpeed => &mut self.drone_speed_bonus,
            UpgradeKind::EnergyMax => &mut self.energy_max_bonus,
            UpgradeKind::SlowDuration => &mut self.slow_duration_bonus,
        }
    }

    /// Affordable and below its level cap
    pub fn can_purchase(&self, kind: UpgradeKind) -> bool {
        self.level(kind) < kind.max_level() && self.coins >= kind.price()
    }

    /// Spend coins and bump the level. Returns false (unchanged) if the
    /// purchase is over the cap or unaffordable.
    pub fn purchase(&mut self, kind: UpgradeKind) -> bool {
        if !self.can_purchase(kind) {
            return false;
        }
        self.coins -= kind.price();
        *self.level_mut(kind) += 1;
        log::info!(
            "Purchased {} (level {}/{}, {} coins left)",
            kind.label(),
            self.level(kind),
            kind.max_level(),
            self.coins
        );
        true
    }

    pub fn award_coins(&mut self, amount: u32) {
        self.coins += amount;
    }

    /// Record a survival time; the high score only moves upward.
    /// Returns true if it improved.
    pub fn record_survival(&mut self, seconds: f32) -> bool {
        if seconds > self.high_score {
            self.high_score = seconds;
            return true;
        }
        false
    }
}

/// JSON-file-backed store for the profile (and optional tuning overrides)
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the profile, falling back to defaults on any failure.
    /// Missing fields default individually; unknown fields are ignored.
    pub fn load(&self) -> Profile {
        match fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(profile) => {
                    log::info!("Loaded profile from {}", self.path.display());
                    profile
                }
                Err(err) => {
                    log::warn!("Malformed profile store ({err}), using defaults");
                    Profile::default()
                }
            },
            Err(_) => {
                log::info!("No profile store found, using defaults");
                Profile::default()
            }
        }
    }

    /// Load base tuning from the same store (the file may carry balance
    /// overrides next to the profile fields)
    pub fn load_tuning(&self) -> Tuning {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Save the profile as a merge over the existing stored object:
    /// profile fields are overwritten, everything else is kept.
    pub fn save(&self, profile: &Profile) {
        let mut root = fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str::<Value>(&json).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        match serde_json::to_value(profile) {
            Ok(Value::Object(fields)) => root.extend(fields),
            _ => return,
        }

        match serde_json::to_string_pretty(&Value::Object(root)) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    log::warn!("Failed to write {}: {err}", self.path.display());
                } else {
                    log::info!("Profile saved");
                }
            }
            Err(err) => log::warn!("Failed to serialize profile: {err}"),
        }
    }
}
