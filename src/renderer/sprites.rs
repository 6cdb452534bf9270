//! Sprite sheet layout and image identifiers

use serde::Serialize;

/// Main sprite sheet (obstacles, ground, digits)
pub const SPRITE_IMAGE: &str = "inseong-resources-1x";
/// Collectible portraits
pub const MEMBERS_IMAGE: &str = "members";

/// Background segment images, in scroll order. Each image is shown twice.
pub const BACKGROUNDS: [&str; 8] = [
    "background-1",
    "background-1",
    "background-2",
    "background-2",
    "background-3",
    "background-3",
    "background-4",
    "background-4",
];

/// Top-left of a sprite inside its image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpritePos {
    pub x: i32,
    pub y: i32,
}

impl SpritePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Where each element lives in the sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpriteSheet {
    pub cactus_small: SpritePos,
    pub cloud: SpritePos,
    pub horizon: SpritePos,
    pub member: SpritePos,
    pub final_marker: SpritePos,
    pub text: SpritePos,
}

impl SpriteSheet {
    /// Low-DPI layout (the only one the game ships)
    pub const LDPI: SpriteSheet = SpriteSheet {
        cactus_small: SpritePos::new(228, 12),
        cloud: SpritePos::new(0, 0),
        horizon: SpritePos::new(2, 70),
        member: SpritePos::new(10, 50),
        final_marker: SpritePos::new(280, 20),
        text: SpritePos::new(655, 13),
    };
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::LDPI
    }
}
