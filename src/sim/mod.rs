//! Game simulation
//!
//! All gameplay logic lives here. Hosts feed timestamps and a player view in,
//! and get draw commands and events out:
//! - Seeded RNG only (one `Pcg32` per session)
//! - Spawn order is screen order
//! - No canvas, audio or input device access

pub mod cloud;
pub mod collision;
pub mod horizon;
pub mod obstacle;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use cloud::Cloud;
pub use collision::{CollisionBox, box_compare, check_for_collision};
pub use horizon::{Horizon, HorizonLine, ObstacleCatalog};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleTypeConfig};
pub use player::{PlayerEntity, PlayerRequest, PlayerSnapshot, PlayerStatus};
pub use score::ScoreMeter;
pub use state::{GameEvent, GamePhase, GameState, RunnerInput, SoundCue};
pub use tick::{apply_input, game_over, restart, set_visible, tick};
