//! Sprite drawing interface
//!
//! The simulation never touches a canvas. Each visible entity emits one
//! [`SpriteDraw`]: copy `src` out of an already-loaded image and paint it at
//! `dest`. The host maps that onto its own blit (canvas `drawImage`, a GPU
//! quad, a terminal cell grid...).

pub mod sprites;

use serde::Serialize;

pub use sprites::SpriteSheet;

/// Integer rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// One "draw this part of that image here" command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteDraw {
    /// Identifier of a loaded image
    pub image: &'static str,
    /// Source rectangle inside the image
    pub src: Rect,
    /// Destination rectangle on screen
    pub dest: Rect,
}

/// The host's drawing primitive
pub trait Renderer {
    fn draw_image(&mut self, draw: SpriteDraw);
}

/// Collects draw commands for a frame (tests, wasm bridge, replays)
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawList {
    pub draws: Vec<SpriteDraw>,
}

impl DrawList {
    pub fn new() -> Self {
        Self { draws: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.draws.clear();
    }

    /// Draws that use the given image
    pub fn with_image<'a>(&'a self, image: &'a str) -> impl Iterator<Item = &'a SpriteDraw> + 'a {
        self.draws.iter().filter(move |d| d.image == image)
    }
}

impl Renderer for DrawList {
    fn draw_image(&mut self, draw: SpriteDraw) {
        self.draws.push(draw);
    }
}
