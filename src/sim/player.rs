//! The player character as seen by the simulation
//!
//! Jump physics and animation belong to the host. The core only reads where
//! the player is and what it is doing, and asks for state changes through
//! [`PlayerRequest`] events.

use serde::{Deserialize, Serialize};

use super::collision::CollisionBox;

/// What the player character is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Idle before the first jump
    #[default]
    Waiting,
    Running,
    Jumping,
    Ducking,
    Crashed,
}

/// Read-only view of the player entity
pub trait PlayerEntity {
    /// Outer box in world space (position + full sprite size)
    fn bounds(&self) -> CollisionBox;

    /// Sub-boxes relative to the top-left of [`PlayerEntity::bounds`]
    fn collision_boxes(&self) -> &[CollisionBox];

    fn status(&self) -> PlayerStatus;

    /// Jumps started since the last reset
    fn jump_count(&self) -> u32;

    fn is_jumping(&self) -> bool {
        self.status() == PlayerStatus::Jumping
    }
}

/// State changes the core asks the player entity to make
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerRequest {
    /// Begin a jump at the given game speed
    StartJump { speed: f64 },
    /// Switch to running
    Run,
    /// Show the crashed pose
    Crash,
    /// Back to the start position, jump count cleared
    Reset,
    /// A player-owned setting changed
    Configure { key: String, value: f64 },
}

/// Plain-data player, filled in by the host every frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub bounds: CollisionBox,
    pub boxes: Vec<CollisionBox>,
    pub status: PlayerStatus,
    pub jump_count: u32,
}

impl PlayerEntity for PlayerSnapshot {
    fn bounds(&self) -> CollisionBox {
        self.bounds
    }

    fn collision_boxes(&self) -> &[CollisionBox] {
        &self.boxes
    }

    fn status(&self) -> PlayerStatus {
        self.status
    }

    fn jump_count(&self) -> u32 {
        self.jump_count
    }
}
