//! Scrolling background segments ("clouds")
//!
//! A cloud slides in from the right edge until it reaches x = 0, then stays
//! put and scrolls its texture instead. Once enough texture has scrolled by
//! the cloud reports the screen is no longer filled, which is the cue for the
//! horizon to queue the next segment behind it.

use rand::Rng;
use serde::Serialize;

use crate::consts::CLOUD_SCROLL_STEP;
use crate::renderer::sprites::{BACKGROUNDS, SpritePos};
use crate::renderer::{Rect, Renderer, SpriteDraw};

/// Texture size of one background segment
pub const CLOUD_WIDTH: i32 = 1800;
pub const CLOUD_HEIGHT: i32 = 150;
/// Texture offset past which the visible area is no longer covered
pub const SCREEN_FILL_OFFSET: i32 = 1200;
pub const MIN_CLOUD_GAP: i32 = 1199;
pub const MAX_CLOUD_GAP: i32 = 1200;
pub const SKY_LEVEL: i32 = 0;

/// One background segment
#[derive(Debug, Clone, Serialize)]
pub struct Cloud {
    pub x_pos: i32,
    pub y_pos: i32,
    /// Texture scroll offset, only advances once `x_pos` hits 0
    pub x_img: i32,
    /// Index into the background catalog
    pub background: usize,
    pub remove: bool,
    pub screen_filled: bool,
    pub cloud_gap: i32,
    pub sprite: SpritePos,
}

impl Cloud {
    /// New segment at the right edge, or already in place when `initial`
    pub fn spawn(
        world_width: i32,
        background: usize,
        initial: bool,
        sprite: SpritePos,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            x_pos: if initial { 0 } else { world_width },
            y_pos: SKY_LEVEL,
            x_img: 0,
            background: background % BACKGROUNDS.len(),
            remove: false,
            screen_filled: true,
            cloud_gap: rng.random_range(MIN_CLOUD_GAP..=MAX_CLOUD_GAP),
            sprite,
        }
    }

    /// Advance by the fixed scroll step (global speed does not apply)
    pub fn update(&mut self) {
        if self.remove {
            return;
        }

        if self.x_pos > 0 {
            self.x_pos = (self.x_pos - CLOUD_SCROLL_STEP).max(0);
        } else {
            self.x_img += CLOUD_SCROLL_STEP;
        }

        if !self.is_visible() {
            self.remove = true;
        }
        if !self.is_screen_filled() {
            self.screen_filled = false;
        }
    }

    pub fn is_screen_filled(&self) -> bool {
        self.x_img < SCREEN_FILL_OFFSET
    }

    pub fn is_visible(&self) -> bool {
        self.x_img < CLOUD_WIDTH
    }

    pub fn image(&self) -> &'static str {
        BACKGROUNDS[self.background]
    }

    pub fn draw(&self, renderer: &mut impl Renderer) {
        renderer.draw_image(SpriteDraw {
            image: self.image(),
            src: Rect::new(self.x_img, self.sprite.y, CLOUD_WIDTH, CLOUD_HEIGHT),
            dest: Rect::new(self.x_pos, self.y_pos, CLOUD_WIDTH, CLOUD_HEIGHT),
        });
    }
}
