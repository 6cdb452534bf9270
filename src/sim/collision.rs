//! Axis-aligned box collision between the player and an obstacle
//!
//! Both entities carry a set of sub-boxes relative to their top-left corner.
//! A cheap test of the padded outer boxes runs first; only when those overlap
//! are the sub-boxes compared pairwise.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::player::PlayerEntity;

/// Padding shaved off every side of an entity's outer box
pub const COLLISION_PADDING: i32 = 1;

/// An axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CollisionBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Bottom-right corner (exclusive)
    #[inline]
    pub fn max(&self) -> IVec2 {
        IVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Zero or negative extent on either axis
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// This box moved by `offset`'s position
    pub fn offset_by(&self, offset: &CollisionBox) -> CollisionBox {
        CollisionBox::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// This box with `pad` removed from every side
    pub fn shrink(&self, pad: i32) -> CollisionBox {
        CollisionBox::new(
            self.x + pad,
            self.y + pad,
            self.width - pad * 2,
            self.height - pad * 2,
        )
    }
}

/// Separating-axis overlap test. Empty boxes never overlap anything.
pub fn box_compare(a: &CollisionBox, b: &CollisionBox) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.min().cmplt(b.max()).all() && a.max().cmpgt(b.min()).all()
}

/// Test a set of sub-boxes against another, each placed at its owner's outer box.
///
/// Returns the first overlapping pair in world space.
pub fn check_box_sets(
    a_outer: &CollisionBox,
    a_boxes: &[CollisionBox],
    b_outer: &CollisionBox,
    b_boxes: &[CollisionBox],
) -> Option<(CollisionBox, CollisionBox)> {
    if !box_compare(a_outer, b_outer) {
        return None;
    }

    // An entity without sub-boxes collides with its whole outer box
    let a_fallback = [CollisionBox::new(0, 0, a_outer.width, a_outer.height)];
    let b_fallback = [CollisionBox::new(0, 0, b_outer.width, b_outer.height)];
    let a_boxes = if a_boxes.is_empty() { &a_fallback[..] } else { a_boxes };
    let b_boxes = if b_boxes.is_empty() { &b_fallback[..] } else { b_boxes };

    for a_box in a_boxes {
        let a_world = a_box.offset_by(a_outer);
        for b_box in b_boxes {
            let b_world = b_box.offset_by(b_outer);
            if box_compare(&a_world, &b_world) {
                return Some((a_world, b_world));
            }
        }
    }

    None
}

/// Check whether the player touches an obstacle.
///
/// Returns the colliding (player, obstacle) box pair for debug drawing;
/// callers that only need a yes/no use `.is_some()`.
pub fn check_for_collision(
    obstacle: &Obstacle,
    player: &impl PlayerEntity,
) -> Option<(CollisionBox, CollisionBox)> {
    let player_outer = player.bounds().shrink(COLLISION_PADDING);
    let obstacle_outer = obstacle.bounds().shrink(COLLISION_PADDING);

    check_box_sets(
        &player_outer,
        player.collision_boxes(),
        &obstacle_outer,
        &obstacle.collision_boxes,
    )
}
