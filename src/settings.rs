//! Game tuning and runtime settings
//!
//! Every value here is a compile-time default that can be overridden from JSON
//! or poked at runtime by key (the debug "config setting" hook). Keys use the
//! SCREAMING_SNAKE_CASE names the game has always used, e.g. `"MAX_SPEED"`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Errors from loading or updating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Who has to react to an applied setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingTarget {
    /// Stored, picked up on next use
    Runner,
    /// Stored and the session's current speed must change now
    Speed,
    /// Belongs to the player entity; forward it
    Player,
}

/// Settings owned by the player entity. Recognised so updates can be forwarded.
pub const PLAYER_SETTINGS: [&str; 4] = [
    "GRAVITY",
    "INITIAL_JUMP_VELOCITY",
    "MIN_JUMP_HEIGHT",
    "SPEED_DROP_COEFFICIENT",
];

/// Game balance and world tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RunnerSettings {
    // === Speed ===
    /// Speed added every tick while below `max_speed`
    pub acceleration: f64,
    /// Starting speed (px per frame)
    pub speed: f64,
    /// Speed cap
    pub max_speed: f64,
    /// Nominal cloud speed (clouds scroll at a fixed step regardless)
    pub bg_cloud_speed: f64,

    // === Timing (ms) ===
    /// Grace period after the start with no obstacles
    pub clear_time: f64,
    /// Delay after a crash before the jump action may restart
    pub gameover_clear_time: f64,

    // === Obstacles ===
    /// Multiplier on each type's minimum gap
    pub gap_coefficient: f64,
    /// Upper bound of the random size multiplier
    pub max_obstacle_length: u32,
    /// Use the mobile candidate heights
    pub mobile: bool,
    /// Collision count at which the final marker obstacle spawns
    pub terminal_collisions: u32,
    /// A collectible spawns at every positive multiple of this collision count
    pub collectible_interval: u32,
    /// Number of distinct collectible identities
    pub collectible_pool_size: u32,

    // === Progress ===
    /// Collision count that ends the session
    pub goal: u32,
    /// Score step that raises the achievement cue
    pub achievement_interval: u32,

    // === World ===
    pub width: i32,
    pub height: i32,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            acceleration: 0.001,
            speed: 3.0,
            max_speed: 13.0,
            bg_cloud_speed: 0.2,

            clear_time: 500.0,
            gameover_clear_time: 750.0,

            gap_coefficient: 0.6,
            max_obstacle_length: 1,
            mobile: false,
            terminal_collisions: 712,
            collectible_interval: 80,
            collectible_pool_size: 8,

            goal: 93712,
            achievement_interval: 100,

            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl RunnerSettings {
    /// Parse settings from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Apply a single setting by key.
    ///
    /// Values are taken as-is; only the key is checked.
    pub fn update_setting(&mut self, key: &str, value: f64) -> Result<SettingTarget, ConfigError> {
        match key {
            "ACCELERATION" => self.acceleration = value,
            "SPEED" => {
                self.speed = value;
                return Ok(SettingTarget::Speed);
            }
            "MAX_SPEED" => self.max_speed = value,
            "BG_CLOUD_SPEED" => self.bg_cloud_speed = value,
            "CLEAR_TIME" => self.clear_time = value,
            "GAMEOVER_CLEAR_TIME" => self.gameover_clear_time = value,
            "GAP_COEFFICIENT" => self.gap_coefficient = value,
            "MAX_OBSTACLE_LENGTH" => self.max_obstacle_length = value as u32,
            "MOBILE" => self.mobile = value != 0.0,
            "TERMINAL_COLLISIONS" => self.terminal_collisions = value as u32,
            "COLLECTIBLE_INTERVAL" => self.collectible_interval = value as u32,
            "COLLECTIBLE_POOL_SIZE" => self.collectible_pool_size = value as u32,
            "GOAL" => self.goal = value as u32,
            "ACHIEVEMENT_INTERVAL" => self.achievement_interval = value as u32,
            "WIDTH" => self.width = value as i32,
            "HEIGHT" => self.height = value as i32,
            _ if PLAYER_SETTINGS.contains(&key) => return Ok(SettingTarget::Player),
            _ => return Err(ConfigError::UnknownSetting(key.to_string())),
        }
        Ok(SettingTarget::Runner)
    }
}
