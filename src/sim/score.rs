//! Score display with milestone flashing
//!
//! Crossing every `interval`-th point raises the achievement cue once and
//! blinks the digits for a few iterations.

use serde::Serialize;

use crate::renderer::sprites::{SPRITE_IMAGE, SpritePos};
use crate::renderer::{Rect, Renderer, SpriteDraw};

/// Digits shown (zero-padded)
pub const MAX_SCORE_UNITS: usize = 5;
/// Digit glyph size in the text sprite
pub const DIGIT_WIDTH: i32 = 10;
pub const DIGIT_HEIGHT: i32 = 13;
/// Horizontal advance per digit on screen
pub const DEST_WIDTH: i32 = 11;
pub const SCORE_Y: i32 = 5;
/// Half of one blink cycle (ms)
pub const FLASH_DURATION: f64 = 250.0;
pub const FLASH_ITERATIONS: u32 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreMeter {
    pub score: u32,
    pub high_score: u32,
    /// Currently flashing for a milestone
    pub achievement: bool,
    interval: u32,
    last_milestone: u32,
    flash_timer: f64,
    flash_iterations: u32,
    x_pos: i32,
    text_sprite: SpritePos,
}

impl ScoreMeter {
    pub fn new(text_sprite: SpritePos, canvas_width: i32, interval: u32) -> Self {
        Self {
            score: 0,
            high_score: 0,
            achievement: false,
            interval,
            last_milestone: 0,
            flash_timer: 0.0,
            flash_iterations: 0,
            x_pos: canvas_width - DEST_WIDTH * (MAX_SCORE_UNITS as i32 + 1),
            text_sprite,
        }
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
    }

    /// Re-anchor the digits to the right edge of a resized canvas
    pub fn set_canvas_width(&mut self, canvas_width: i32) {
        self.x_pos = canvas_width - DEST_WIDTH * (MAX_SCORE_UNITS as i32 + 1);
    }

    /// Update the shown score. Returns true when a milestone was just crossed.
    pub fn update(&mut self, delta_ms: f64, score: u32) -> bool {
        self.score = score;

        let milestone = if self.interval > 0 {
            score / self.interval
        } else {
            0
        };
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            self.achievement = true;
            self.flash_timer = 0.0;
            self.flash_iterations = 0;
            return true;
        }

        if self.achievement {
            if self.flash_iterations < FLASH_ITERATIONS {
                self.flash_timer += delta_ms;
                if self.flash_timer >= FLASH_DURATION * 2.0 {
                    self.flash_timer = 0.0;
                    self.flash_iterations += 1;
                }
            } else {
                self.achievement = false;
                self.flash_timer = 0.0;
                self.flash_iterations = 0;
            }
        }

        false
    }

    /// Digits hidden during the first half of each blink
    pub fn digits_visible(&self) -> bool {
        !self.achievement || self.flash_timer >= FLASH_DURATION
    }

    /// Record a finished run's score. Returns true if it is a new best.
    pub fn submit_high_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// New run: clear score and milestones, keep the best
    pub fn reset(&mut self) {
        self.score = 0;
        self.achievement = false;
        self.last_milestone = 0;
        self.flash_timer = 0.0;
        self.flash_iterations = 0;
    }

    pub fn draw(&self, renderer: &mut impl Renderer) {
        if self.digits_visible() {
            self.draw_number(renderer, self.score, self.x_pos);
        }
        if self.high_score > 0 {
            let x = self.x_pos - DEST_WIDTH * (MAX_SCORE_UNITS as i32 + 2);
            self.draw_number(renderer, self.high_score, x);
        }
    }

    fn draw_number(&self, renderer: &mut impl Renderer, value: u32, x: i32) {
        let text = format!("{:0>width$}", value, width = MAX_SCORE_UNITS);
        for (i, digit) in text.bytes().enumerate() {
            let digit = (digit - b'0') as i32;
            renderer.draw_image(SpriteDraw {
                image: SPRITE_IMAGE,
                src: Rect::new(
                    self.text_sprite.x + digit * DIGIT_WIDTH,
                    self.text_sprite.y,
                    DIGIT_WIDTH,
                    DIGIT_HEIGHT,
                ),
                dest: Rect::new(x + i as i32 * DEST_WIDTH, SCORE_Y, DIGIT_WIDTH, DIGIT_HEIGHT),
            });
        }
    }
}
