//! Horizon Runner - simulation core of a side-scrolling runner game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, clouds, horizon, collisions, game state)
//! - `renderer`: Sprite draw commands handed to the host's drawing primitive
//! - `settings`: Tunable game balance and runtime config updates
//!
//! The player character, asset loading, audio playback and input devices are
//! collaborators owned by the host. The core reads the player through
//! [`sim::PlayerEntity`] and reports everything else as [`sim::GameEvent`]s.

pub mod renderer;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::{ConfigError, RunnerSettings, SettingTarget};
pub use sim::{GameEvent, GamePhase, GameState, PlayerEntity, PlayerStatus, RunnerInput};

/// Game configuration constants
pub mod consts {
    /// Frames per second the speed values are expressed in
    pub const FPS: f64 = 60.0;
    /// Milliseconds per frame at [`FPS`]
    pub const MS_PER_FRAME: f64 = 1000.0 / FPS;

    /// Default canvas dimensions
    pub const DEFAULT_WIDTH: i32 = 600;
    pub const DEFAULT_HEIGHT: i32 = 150;

    /// Cloud scroll step per update (px). Clouds ignore the global speed.
    pub const CLOUD_SCROLL_STEP: i32 = 1;
}

/// Displacement for one update at `speed` (px per frame) over `delta_ms`.
///
/// Shared by obstacles and the horizon line so both scroll in lockstep.
#[inline]
pub fn scroll_increment(speed: f64, delta_ms: f64) -> i32 {
    (speed * consts::FPS / 1000.0 * delta_ms).floor() as i32
}
