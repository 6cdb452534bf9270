//! Obstacles: the hazards (and collectibles) scrolling toward the player
//!
//! Each obstacle is spawned from an [`ObstacleTypeConfig`] template. The
//! template's collision boxes are copied into the instance, so resizing one
//! obstacle's boxes never leaks into the template or its siblings.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::CollisionBox;
use crate::renderer::sprites::{MEMBERS_IMAGE, SPRITE_IMAGE, SpritePos};
use crate::renderer::{Rect, Renderer, SpriteDraw};
use crate::scroll_increment;

/// Maximum gap is the minimum gap times this
pub const MAX_GAP_COEFFICIENT: f64 = 1.5;

/// Obstacle catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// The everyday hazard
    CactusSmall,
    /// Collectible: hitting it records its identity
    Member,
    /// One-shot end-of-game marker
    Final,
}

/// How an obstacle type picks its y position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerticalPlacement {
    Fixed(i32),
    /// Uniform pick from a candidate list (separate list on mobile)
    Random { default: Vec<i32>, mobile: Vec<i32> },
}

/// Template describing one obstacle type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTypeConfig {
    pub kind: ObstacleKind,
    pub width: i32,
    pub height: i32,
    pub y_pos: VerticalPlacement,
    /// Speed from which groups of more than one are allowed
    pub multiple_speed: f64,
    /// Minimum gap in px before `gap_coefficient` scaling
    pub min_gap: f64,
    /// Slowest game speed this type may appear at
    pub min_speed: f64,
    /// Speed difference from the ground (0 = moves with the ground)
    pub speed_offset: f64,
    /// Animation frames (0 = static)
    pub num_frames: u32,
    /// Milliseconds per animation frame
    pub frame_rate: f64,
    pub collision_boxes: Vec<CollisionBox>,
}

impl ObstacleTypeConfig {
    pub fn cactus_small() -> Self {
        Self {
            kind: ObstacleKind::CactusSmall,
            width: 23,
            height: 25,
            y_pos: VerticalPlacement::Random {
                default: vec![110, 80, 35],
                mobile: vec![100, 30],
            },
            multiple_speed: 4.0,
            min_gap: 3.0,
            min_speed: 1.0,
            speed_offset: 0.0,
            num_frames: 0,
            frame_rate: 0.0,
            collision_boxes: vec![CollisionBox::new(0, 0, 23, 25)],
        }
    }

    pub fn member() -> Self {
        Self {
            kind: ObstacleKind::Member,
            width: 38,
            height: 60,
            y_pos: VerticalPlacement::Random {
                default: vec![80],
                mobile: vec![80],
            },
            multiple_speed: 4.0,
            min_gap: 600.0,
            min_speed: 1.0,
            speed_offset: 0.0,
            num_frames: 0,
            frame_rate: 0.0,
            collision_boxes: vec![CollisionBox::new(0, 0, 40, 60)],
        }
    }

    pub fn final_marker() -> Self {
        Self {
            kind: ObstacleKind::Final,
            width: 46,
            height: 40,
            y_pos: VerticalPlacement::Fixed(90),
            multiple_speed: 4.0,
            min_gap: 120.0,
            min_speed: 0.0,
            speed_offset: 0.0,
            num_frames: 0,
            frame_rate: 0.0,
            collision_boxes: vec![CollisionBox::new(0, 0, 46, 40)],
        }
    }

    /// Small cactus with no speed gate; spawned when nothing else qualifies
    pub fn fallback() -> Self {
        Self {
            min_speed: 0.0,
            ..Self::cactus_small()
        }
    }

    /// Whether this type may spawn at `speed`
    #[inline]
    pub fn allowed_at(&self, speed: f64) -> bool {
        speed >= self.min_speed
    }
}

/// Inclusive (min, max) gap for an obstacle of `width` at `speed`
pub fn gap_bounds(width: i32, type_min_gap: f64, gap_coefficient: f64, speed: f64) -> (i32, i32) {
    let min_gap = (width as f64 * speed * 0.25 + type_min_gap * gap_coefficient).round();
    let max_gap = (min_gap * MAX_GAP_COEFFICIENT).round();
    (min_gap as i32, (max_gap as i32).max(min_gap as i32))
}

/// Everything an obstacle needs from the world at spawn time
#[derive(Debug, Clone)]
pub struct SpawnParams {
    /// Sprite location in `image`
    pub sprite: SpritePos,
    pub image: &'static str,
    pub world_width: i32,
    pub gap_coefficient: f64,
    pub speed: f64,
    /// Extra distance past the right edge to spawn at
    pub x_offset: i32,
    /// Collectible identity
    pub identity: Option<u32>,
    /// Upper bound of the size multiplier
    pub max_size: u32,
    pub mobile: bool,
}

/// A spawned obstacle
#[derive(Debug, Clone, Serialize)]
pub struct Obstacle {
    pub config: ObstacleTypeConfig,
    pub sprite: SpritePos,
    pub image: &'static str,
    /// Size multiplier (group count)
    pub size: u32,
    pub width: i32,
    pub x_pos: i32,
    pub y_pos: i32,
    /// Distance to keep clear before the next obstacle
    pub gap: i32,
    /// Per-instance copy of the template boxes
    pub collision_boxes: Vec<CollisionBox>,
    /// Signed speed offset picked at spawn
    pub speed_offset: f64,
    pub following_obstacle_created: bool,
    pub remove: bool,
    pub identity: Option<u32>,
    pub current_frame: u32,
    #[serde(skip)]
    timer: f64,
}

impl Obstacle {
    /// Spawn an obstacle of the given type.
    ///
    /// The caller must have checked `config.allowed_at(params.speed)`.
    pub fn spawn(config: &ObstacleTypeConfig, params: &SpawnParams, rng: &mut impl Rng) -> Self {
        debug_assert!(config.allowed_at(params.speed));

        let mut size = rng.random_range(1..=params.max_size.max(1));
        // Only allow groups once we're fast enough
        if size > 1 && config.multiple_speed > params.speed {
            size = 1;
        }
        let width = config.width * size as i32;

        let y_pos = match &config.y_pos {
            VerticalPlacement::Fixed(y) => *y,
            VerticalPlacement::Random { default, mobile } => {
                let candidates = if params.mobile { mobile } else { default };
                match candidates.len() {
                    0 => 0,
                    n => candidates[rng.random_range(0..n)],
                }
            }
        };

        let mut collision_boxes = config.collision_boxes.clone();
        // Grouped obstacles stretch the middle box so the hull spans the full width:
        //      ____        ______        ________
        //    _|   |-|    _|     |-|    _|       |-|
        //   | |<->| |   | |<--->| |   | |<----->| |
        //   | | 1 | |   | |  2  | |   | |   3   | |
        //   |_|___|_|   |_|_____|_|   |_|_______|_|
        if size > 1 && collision_boxes.len() == 3 {
            collision_boxes[1].width =
                width - collision_boxes[0].width - collision_boxes[2].width;
            collision_boxes[2].x = width - collision_boxes[2].width;
        }

        let speed_offset = if config.speed_offset != 0.0 {
            if rng.random::<f64>() > 0.5 {
                config.speed_offset
            } else {
                -config.speed_offset
            }
        } else {
            0.0
        };

        let mut obstacle = Self {
            config: config.clone(),
            sprite: params.sprite,
            image: params.image,
            size,
            width,
            x_pos: params.world_width + params.x_offset,
            y_pos,
            gap: 0,
            collision_boxes,
            speed_offset,
            following_obstacle_created: false,
            remove: false,
            identity: params.identity,
            current_frame: 0,
            timer: 0.0,
        };
        obstacle.gap = obstacle.compute_gap(params.gap_coefficient, params.speed, rng);
        obstacle
    }

    pub fn kind(&self) -> ObstacleKind {
        self.config.kind
    }

    /// Random gap in [min, max]; wider and faster obstacles need more room
    pub fn compute_gap(&self, gap_coefficient: f64, speed: f64, rng: &mut impl Rng) -> i32 {
        let (min_gap, max_gap) = gap_bounds(self.width, self.config.min_gap, gap_coefficient, speed);
        rng.random_range(min_gap..=max_gap)
    }

    /// Advance one frame. Removed obstacles are frozen.
    pub fn update(&mut self, delta_ms: f64, speed: f64) {
        if self.remove {
            return;
        }

        self.x_pos -= scroll_increment(speed + self.speed_offset, delta_ms);

        if self.config.num_frames > 0 {
            self.timer += delta_ms;
            if self.timer >= self.config.frame_rate {
                self.current_frame = (self.current_frame + 1) % self.config.num_frames;
                self.timer = 0.0;
            }
        }

        if !self.is_visible() {
            self.remove = true;
        }
    }

    /// Right edge still on screen
    pub fn is_visible(&self) -> bool {
        self.x_pos + self.width > 0
    }

    /// Right edge in world space
    pub fn right_edge(&self) -> i32 {
        self.x_pos + self.width
    }

    /// Outer box in world space
    pub fn bounds(&self) -> CollisionBox {
        CollisionBox::new(self.x_pos, self.y_pos, self.width, self.config.height)
    }

    /// Emit the sprite, cropped to the group size and current frame
    pub fn draw(&self, renderer: &mut impl Renderer) {
        let source_width = self.config.width;
        let source_height = self.config.height;
        let size = self.size as i32;

        let mut source_x =
            ((source_width * size) as f64 * (0.5 * (size - 1) as f64)) as i32 + self.sprite.x;
        if self.current_frame > 0 {
            source_x += source_width * self.current_frame as i32;
        }

        renderer.draw_image(SpriteDraw {
            image: self.image,
            src: Rect::new(source_x, self.sprite.y, source_width * size, source_height),
            dest: Rect::new(self.x_pos, self.y_pos, self.width, source_height),
        });
    }
}

/// Sprite position of a collectible identity in the members image
pub fn member_sprite(identity: u32) -> SpritePos {
    SpritePos::new(identity as i32 * 40 + 10, 50)
}

/// Image a given obstacle kind is drawn from
pub fn image_for(kind: ObstacleKind) -> &'static str {
    match kind {
        ObstacleKind::Member => MEMBERS_IMAGE,
        ObstacleKind::CactusSmall | ObstacleKind::Final => SPRITE_IMAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn params(speed: f64) -> SpawnParams {
        SpawnParams {
            sprite: SpritePos::new(228, 12),
            image: SPRITE_IMAGE,
            world_width: 600,
            gap_coefficient: 0.6,
            speed,
            x_offset: 23,
            identity: None,
            max_size: 1,
            mobile: false,
        }
    }

    /// Three-box template like the large cacti, groupable at any speed
    fn three_box_type() -> ObstacleTypeConfig {
        ObstacleTypeConfig {
            width: 25,
            height: 50,
            multiple_speed: 0.0,
            collision_boxes: vec![
                CollisionBox::new(0, 12, 7, 38),
                CollisionBox::new(8, 0, 7, 49),
                CollisionBox::new(13, 10, 10, 38),
            ],
            ..ObstacleTypeConfig::cactus_small()
        }
    }

    #[test]
    fn test_gap_bounds_rounding() {
        // 23 * 3 * 0.25 + 3 * 0.6 = 19.05 -> 19; 19 * 1.5 = 28.5 -> 29
        assert_eq!(gap_bounds(23, 3.0, 0.6, 3.0), (19, 29));
        // 38 * 3 * 0.25 + 600 * 0.6 = 388.5 -> 389; 583.5 -> 584
        assert_eq!(gap_bounds(38, 600.0, 0.6, 3.0), (389, 584));
    }

    #[test]
    fn test_spawn_position_and_gap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let obstacle = Obstacle::spawn(&ObstacleTypeConfig::cactus_small(), &params(3.0), &mut rng);

        assert_eq!(obstacle.x_pos, 623);
        assert_eq!(obstacle.width, 23);
        assert!([110, 80, 35].contains(&obstacle.y_pos));
        assert!((19..=29).contains(&obstacle.gap));
        assert!(!obstacle.remove);
    }

    #[test]
    fn test_mobile_heights() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut p = params(3.0);
        p.mobile = true;
        for _ in 0..20 {
            let obstacle = Obstacle::spawn(&ObstacleTypeConfig::cactus_small(), &p, &mut rng);
            assert!([100, 30].contains(&obstacle.y_pos));
        }
    }

    #[test]
    fn test_size_forced_to_one_below_multiple_speed() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut p = params(3.0);
        p.max_size = 3;
        for _ in 0..20 {
            // cactus_small needs speed 4 for groups
            let obstacle = Obstacle::spawn(&ObstacleTypeConfig::cactus_small(), &p, &mut rng);
            assert_eq!(obstacle.size, 1);
            assert_eq!(obstacle.width, 23);
        }
    }

    #[test]
    fn test_grouped_boxes_span_full_width() {
        let template = three_box_type();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut p = params(6.0);
        p.max_size = 3;

        let mut saw_group = false;
        for _ in 0..50 {
            let obstacle = Obstacle::spawn(&template, &p, &mut rng);
            let boxes = &obstacle.collision_boxes;
            if obstacle.size > 1 {
                saw_group = true;
                assert_eq!(obstacle.width, 25 * obstacle.size as i32);
                assert_eq!(
                    boxes[1].width,
                    obstacle.width - boxes[0].width - boxes[2].width
                );
                assert_eq!(boxes[2].x, obstacle.width - boxes[2].width);
                assert_eq!(
                    boxes[0].width + boxes[1].width + boxes[2].width,
                    obstacle.width
                );
            }
        }
        assert!(saw_group);
        // Template untouched
        assert_eq!(template.collision_boxes[1].width, 7);
        assert_eq!(template.collision_boxes[2].x, 13);
    }

    #[test]
    fn test_instances_own_their_boxes() {
        let template = three_box_type();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut a = Obstacle::spawn(&template, &params(6.0), &mut rng);
        let b = Obstacle::spawn(&template, &params(6.0), &mut rng);
        a.collision_boxes[0].width = 99;
        assert_eq!(b.collision_boxes[0].width, 7);
    }

    #[test]
    fn test_update_moves_left_and_retires() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut obstacle = Obstacle::spawn(&ObstacleTypeConfig::cactus_small(), &params(3.0), &mut rng);

        obstacle.update(1000.0 / 60.0, 3.0);
        // floor(3 * 60 / 1000 * 16.666..) = 3
        assert_eq!(obstacle.x_pos, 620);

        obstacle.update(100.0, 3.0);
        assert_eq!(obstacle.x_pos, 602);

        obstacle.x_pos = -20;
        obstacle.update(100.0, 3.0);
        assert!(obstacle.remove);

        let frozen = obstacle.x_pos;
        obstacle.update(100.0, 3.0);
        assert_eq!(obstacle.x_pos, frozen);
    }

    #[test]
    fn test_speed_offset_sign_fixed_at_spawn() {
        let template = ObstacleTypeConfig {
            speed_offset: 0.8,
            ..ObstacleTypeConfig::cactus_small()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut obstacle = Obstacle::spawn(&template, &params(3.0), &mut rng);
        assert_eq!(obstacle.speed_offset.abs(), 0.8);

        let start = obstacle.x_pos;
        obstacle.update(100.0, 3.0);
        let expected = ((3.0 + obstacle.speed_offset) * 60.0 / 1000.0 * 100.0_f64).floor() as i32;
        assert_eq!(start - obstacle.x_pos, expected);
    }

    #[test]
    fn test_animation_wraps() {
        let template = ObstacleTypeConfig {
            num_frames: 2,
            frame_rate: 100.0,
            ..ObstacleTypeConfig::cactus_small()
        };
        let mut rng = Pcg32::seed_from_u64(8);
        let mut obstacle = Obstacle::spawn(&template, &params(3.0), &mut rng);

        obstacle.update(50.0, 0.0);
        assert_eq!(obstacle.current_frame, 0);
        obstacle.update(50.0, 0.0);
        assert_eq!(obstacle.current_frame, 1);
        obstacle.update(100.0, 0.0);
        assert_eq!(obstacle.current_frame, 0);
    }

    #[test]
    fn test_draw_crops_sprite() {
        let mut rng = Pcg32::seed_from_u64(9);
        let obstacle = Obstacle::spawn(&ObstacleTypeConfig::cactus_small(), &params(3.0), &mut rng);
        let mut list = DrawList::new();
        obstacle.draw(&mut list);

        assert_eq!(list.draws.len(), 1);
        let draw = &list.draws[0];
        assert_eq!(draw.image, SPRITE_IMAGE);
        assert_eq!(draw.src, Rect::new(228, 12, 23, 25));
        assert_eq!(draw.dest, Rect::new(623, obstacle.y_pos, 23, 25));
    }

    #[test]
    fn test_member_sprite_from_identity() {
        assert_eq!(member_sprite(0), SpritePos::new(10, 50));
        assert_eq!(member_sprite(7), SpritePos::new(290, 50));
        assert_eq!(image_for(ObstacleKind::Member), MEMBERS_IMAGE);
    }

    proptest! {
        #[test]
        fn prop_gap_within_bounds(
            speed in 1.0f64..13.0,
            coefficient in 0.1f64..2.0,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut p = params(speed);
            p.gap_coefficient = coefficient;
            let obstacle = Obstacle::spawn(&ObstacleTypeConfig::member(), &p, &mut rng);

            let (min_gap, max_gap) = gap_bounds(38, 600.0, coefficient, speed);
            prop_assert_eq!(max_gap, (min_gap as f64 * 1.5).round() as i32);
            prop_assert!(obstacle.gap >= min_gap && obstacle.gap <= max_gap);
        }

        #[test]
        fn prop_position_never_increases(
            deltas in proptest::collection::vec(0.0f64..50.0, 1..60),
            speed in 1.0f64..13.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(10);
            let mut obstacle = Obstacle::spawn(&ObstacleTypeConfig::cactus_small(), &params(speed), &mut rng);
            for delta in deltas {
                let before = obstacle.x_pos;
                let was_removed = obstacle.remove;
                obstacle.update(delta, speed);
                prop_assert!(obstacle.x_pos <= before);
                if was_removed {
                    prop_assert_eq!(obstacle.x_pos, before);
                }
            }
        }
    }
}
