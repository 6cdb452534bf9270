//! Horizon layer: ground line, background segments and the obstacle stream
//!
//! Obstacles are kept in spawn order, which is also left-to-right order on
//! screen. A follower is only queued behind the trailing obstacle once that
//! obstacle's right edge plus its gap is inside the visible width, so two
//! obstacles never end up closer than the leader's gap.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::cloud::Cloud;
use super::obstacle::{
    Obstacle, ObstacleKind, ObstacleTypeConfig, SpawnParams, image_for, member_sprite,
};
use crate::renderer::sprites::{BACKGROUNDS, SPRITE_IMAGE, SpritePos, SpriteSheet};
use crate::renderer::{Rect, Renderer, SpriteDraw};
use crate::scroll_increment;
use crate::settings::RunnerSettings;

/// Ground line segment size and placement
pub const HORIZON_LINE_WIDTH: i32 = 600;
pub const HORIZON_LINE_HEIGHT: i32 = 12;
pub const HORIZON_LINE_Y: i32 = 127;
/// Chance threshold for a flat (vs bumpy) ground segment
pub const BUMPY_THRESHOLD: f64 = 0.3;

/// Two ground segments leapfrogging each other
#[derive(Debug, Clone, Serialize)]
pub struct HorizonLine {
    pub source_x: [i32; 2],
    pub x_pos: [i32; 2],
    pub y_pos: i32,
    sprite: SpritePos,
}

impl HorizonLine {
    pub fn new(sprite: SpritePos) -> Self {
        Self {
            source_x: [sprite.x, sprite.x + HORIZON_LINE_WIDTH],
            x_pos: [0, HORIZON_LINE_WIDTH],
            y_pos: HORIZON_LINE_Y,
            sprite,
        }
    }

    pub fn update(&mut self, delta_ms: f64, speed: f64, rng: &mut impl Rng) {
        let increment = scroll_increment(speed, delta_ms);
        if self.x_pos[0] <= 0 {
            self.update_x_pos(0, increment, rng);
        } else {
            self.update_x_pos(1, increment, rng);
        }
    }

    fn update_x_pos(&mut self, lead: usize, increment: i32, rng: &mut impl Rng) {
        let trail = 1 - lead;
        self.x_pos[lead] -= increment;
        self.x_pos[trail] = self.x_pos[lead] + HORIZON_LINE_WIDTH;

        // Lead segment fully off screen: move it behind the other one
        if self.x_pos[lead] <= -HORIZON_LINE_WIDTH {
            self.x_pos[lead] += HORIZON_LINE_WIDTH * 2;
            self.x_pos[trail] = self.x_pos[lead] - HORIZON_LINE_WIDTH;
            self.source_x[lead] = Self::random_type(rng) + self.sprite.x;
        }
    }

    /// Flat or bumpy ground section
    fn random_type(rng: &mut impl Rng) -> i32 {
        if rng.random::<f64>() > BUMPY_THRESHOLD {
            HORIZON_LINE_WIDTH
        } else {
            0
        }
    }

    pub fn reset(&mut self) {
        self.x_pos = [0, HORIZON_LINE_WIDTH];
    }

    pub fn draw(&self, renderer: &mut impl Renderer) {
        for i in 0..2 {
            renderer.draw_image(SpriteDraw {
                image: SPRITE_IMAGE,
                src: Rect::new(self.source_x[i], self.sprite.y, HORIZON_LINE_WIDTH, HORIZON_LINE_HEIGHT),
                dest: Rect::new(self.x_pos[i], self.y_pos, HORIZON_LINE_WIDTH, HORIZON_LINE_HEIGHT),
            });
        }
    }
}

/// Obstacle types the horizon can pick from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleCatalog {
    /// Spawned by default
    pub hazard: ObstacleTypeConfig,
    /// Spawned at collectible intervals
    pub collectible: ObstacleTypeConfig,
    /// Spawned once at the terminal collision count
    pub terminal: ObstacleTypeConfig,
    /// Used when the chosen type is gated out by speed
    pub fallback: ObstacleTypeConfig,
}

impl Default for ObstacleCatalog {
    fn default() -> Self {
        Self {
            hazard: ObstacleTypeConfig::cactus_small(),
            collectible: ObstacleTypeConfig::member(),
            terminal: ObstacleTypeConfig::final_marker(),
            fallback: ObstacleTypeConfig::fallback(),
        }
    }
}

/// Spawn-related settings, copied from [`RunnerSettings`]
#[derive(Debug, Clone, Serialize)]
struct SpawnRules {
    width: i32,
    gap_coefficient: f64,
    max_obstacle_length: u32,
    mobile: bool,
    terminal_collisions: u32,
    collectible_interval: u32,
    collectible_pool_size: u32,
}

impl From<&RunnerSettings> for SpawnRules {
    fn from(settings: &RunnerSettings) -> Self {
        Self {
            width: settings.width,
            gap_coefficient: settings.gap_coefficient,
            max_obstacle_length: settings.max_obstacle_length,
            mobile: settings.mobile,
            terminal_collisions: settings.terminal_collisions,
            collectible_interval: settings.collectible_interval,
            collectible_pool_size: settings.collectible_pool_size,
        }
    }
}

/// Owns everything scrolling behind and toward the player
#[derive(Debug, Clone, Serialize)]
pub struct Horizon {
    /// Active obstacles, oldest (leftmost) first
    pub obstacles: VecDeque<Obstacle>,
    /// Active background segments, at most two
    pub clouds: Vec<Cloud>,
    pub horizon_line: HorizonLine,
    /// Collisions so far, drives the spawn policy
    pub collisions: u32,
    /// Collectible identities not yet spawned
    pub remaining_members: Vec<u32>,
    pub catalog: ObstacleCatalog,
    sprites: SpriteSheet,
    rules: SpawnRules,
    terminal_spawned: bool,
}

impl Horizon {
    /// New horizon with the ground line and one in-place background segment
    pub fn new(settings: &RunnerSettings, sprites: SpriteSheet, rng: &mut impl Rng) -> Self {
        let rules = SpawnRules::from(settings);
        let mut horizon = Self {
            obstacles: VecDeque::new(),
            clouds: Vec::new(),
            horizon_line: HorizonLine::new(sprites.horizon),
            collisions: 0,
            remaining_members: (0..rules.collectible_pool_size).collect(),
            catalog: ObstacleCatalog::default(),
            sprites,
            rules,
            terminal_spawned: false,
        };
        horizon.add_cloud(0, true, rng);
        horizon
    }

    /// Pick up changed settings
    pub fn apply_settings(&mut self, settings: &RunnerSettings) {
        self.rules = SpawnRules::from(settings);
    }

    /// Advance one frame.
    ///
    /// `update_obstacles` is false during the intro and the grace period:
    /// the ground and background still move, but no obstacles spawn or move.
    pub fn update(&mut self, delta_ms: f64, speed: f64, update_obstacles: bool, rng: &mut impl Rng) {
        self.horizon_line.update(delta_ms, speed, rng);
        self.update_clouds(rng);

        if update_obstacles {
            self.update_obstacles(delta_ms, speed, rng);
        }
    }

    /// Background segment currently in front
    pub fn current_background(&self) -> usize {
        self.clouds.first().map(|c| c.background).unwrap_or(0)
    }

    fn update_clouds(&mut self, rng: &mut impl Rng) {
        if self.clouds.is_empty() {
            self.add_cloud(0, true, rng);
        }

        for cloud in self.clouds.iter_mut().rev() {
            cloud.update();
        }

        // Lead segment scrolled past the fill point: queue the next one
        if !self.clouds[0].screen_filled && self.clouds.len() < 2 {
            let next = (self.clouds[0].background + 1) % BACKGROUNDS.len();
            self.add_cloud(next, false, rng);
        }

        self.clouds.retain(|c| !c.remove);
    }

    fn update_obstacles(&mut self, delta_ms: f64, speed: f64, rng: &mut impl Rng) {
        for obstacle in &mut self.obstacles {
            obstacle.update(delta_ms, speed);
        }

        // Spawn order is position order, so expired obstacles are at the front
        let expired = self.obstacles.iter().take_while(|o| o.remove).count();
        if expired > 0 {
            self.obstacles.drain(..expired);
            log::debug!("Retired {} obstacle(s), {} active", expired, self.obstacles.len());
        }

        match self.obstacles.back() {
            Some(last) => {
                let needs_follower = !last.following_obstacle_created
                    && last.is_visible()
                    && last.right_edge() + last.gap < self.rules.width;
                if needs_follower {
                    let last_index = self.obstacles.len() - 1;
                    self.add_new_obstacle(speed, rng);
                    self.obstacles[last_index].following_obstacle_created = true;
                }
            }
            None => {
                self.add_new_obstacle(speed, rng);
            }
        }
    }

    /// Drop the leading obstacle (it was hit)
    pub fn remove_first_obstacle(&mut self) -> Option<Obstacle> {
        self.obstacles.pop_front()
    }

    /// Whether the end-of-game marker has been spawned this session
    pub fn terminal_spawned(&self) -> bool {
        self.terminal_spawned
    }

    /// Append one obstacle chosen by the spawn policy.
    ///
    /// Returns the kind spawned, or `None` once the terminal marker is out.
    pub fn add_new_obstacle(&mut self, speed: f64, rng: &mut impl Rng) -> Option<ObstacleKind> {
        if self.terminal_spawned {
            return None;
        }

        if self.collisions >= self.rules.terminal_collisions {
            let config = if self.catalog.terminal.allowed_at(speed) {
                self.catalog.terminal.clone()
            } else {
                self.fallback_type(speed)
            };
            let sprite = match config.kind {
                ObstacleKind::Final => self.sprites.final_marker,
                _ => self.sprites.cactus_small,
            };
            self.terminal_spawned = true;
            log::info!("Collision count {} reached, spawning final marker", self.collisions);
            return Some(self.push_obstacle(&config, sprite, None, speed, rng));
        }

        let interval = self.rules.collectible_interval;
        let collectible_due = interval > 0
            && self.collisions != 0
            && self.collisions.is_multiple_of(interval)
            && !self.remaining_members.is_empty();

        let chosen = if collectible_due {
            &self.catalog.collectible
        } else {
            &self.catalog.hazard
        };

        if !chosen.allowed_at(speed) {
            let config = self.fallback_type(speed);
            let sprite = self.sprites.cactus_small;
            return Some(self.push_obstacle(&config, sprite, None, speed, rng));
        }

        let config = chosen.clone();
        if collectible_due {
            self.remaining_members.shuffle(rng);
            let identity = self.remaining_members.pop();
            let sprite = identity.map(member_sprite).unwrap_or(self.sprites.member);
            log::debug!("Spawning collectible {:?}", identity);
            Some(self.push_obstacle(&config, sprite, identity, speed, rng))
        } else {
            let sprite = self.sprites.cactus_small;
            Some(self.push_obstacle(&config, sprite, None, speed, rng))
        }
    }

    fn fallback_type(&self, speed: f64) -> ObstacleTypeConfig {
        log::warn!(
            "No obstacle type allowed at speed {:.3}, spawning fallback",
            speed
        );
        self.catalog.fallback.clone()
    }

    fn push_obstacle(
        &mut self,
        config: &ObstacleTypeConfig,
        sprite: SpritePos,
        identity: Option<u32>,
        speed: f64,
        rng: &mut impl Rng,
    ) -> ObstacleKind {
        let params = SpawnParams {
            sprite,
            image: image_for(config.kind),
            world_width: self.rules.width,
            gap_coefficient: self.rules.gap_coefficient,
            speed,
            x_offset: config.width,
            identity,
            max_size: self.rules.max_obstacle_length,
            mobile: self.rules.mobile,
        };
        let obstacle = Obstacle::spawn(config, &params, rng);
        log::debug!(
            "Spawned {:?} at x={} y={} gap={}",
            obstacle.kind(),
            obstacle.x_pos,
            obstacle.y_pos,
            obstacle.gap
        );
        self.obstacles.push_back(obstacle);
        config.kind
    }

    /// Clear obstacles and rewind the ground. Clouds, collisions and the
    /// collectible pool are left to the caller.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.horizon_line.reset();
        self.terminal_spawned = false;
    }

    /// Replace the background with a single in-place first segment
    pub fn reset_clouds(&mut self, rng: &mut impl Rng) {
        self.clouds.clear();
        self.add_cloud(0, true, rng);
    }

    /// Put every collectible identity back in the pool
    pub fn refill_collectibles(&mut self) {
        self.remaining_members = (0..self.rules.collectible_pool_size).collect();
    }

    fn add_cloud(&mut self, background: usize, initial: bool, rng: &mut impl Rng) {
        self.clouds.push(Cloud::spawn(
            self.rules.width,
            background,
            initial,
            self.sprites.cloud,
            rng,
        ));
    }

    /// Paint back to front: background, ground, obstacles
    pub fn draw(&self, renderer: &mut impl Renderer) {
        for cloud in &self.clouds {
            cloud.draw(renderer);
        }
        self.horizon_line.draw(renderer);
        for obstacle in &self.obstacles {
            obstacle.draw(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;
    use crate::renderer::sprites::MEMBERS_IMAGE;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f64 = 1000.0 / 60.0;

    fn horizon(seed: u64) -> (Horizon, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let horizon = Horizon::new(&RunnerSettings::default(), SpriteSheet::LDPI, &mut rng);
        (horizon, rng)
    }

    #[test]
    fn test_new_horizon_has_one_cloud_no_obstacles() {
        let (h, _) = horizon(1);
        assert!(h.obstacles.is_empty());
        assert_eq!(h.clouds.len(), 1);
        assert_eq!(h.clouds[0].x_pos, 0);
        assert_eq!(h.remaining_members, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_obstacles_suppressed_when_disabled() {
        let (mut h, mut rng) = horizon(2);
        for _ in 0..100 {
            h.update(DT, 3.0, false, &mut rng);
        }
        assert!(h.obstacles.is_empty());
        // Background still moved
        assert_eq!(h.clouds[0].x_img, 100);
    }

    #[test]
    fn test_first_obstacle_spawns_off_screen() {
        let (mut h, mut rng) = horizon(3);
        h.update(DT, 3.0, true, &mut rng);
        assert_eq!(h.obstacles.len(), 1);
        assert_eq!(h.obstacles[0].kind(), ObstacleKind::CactusSmall);
        assert_eq!(h.obstacles[0].x_pos, 600 + 23);
    }

    #[test]
    fn test_followers_keep_gap_and_order() {
        let (mut h, mut rng) = horizon(4);
        let mut max_seen = 0;
        for _ in 0..3000 {
            let before = h.obstacles.len();
            h.update(DT, 3.0, true, &mut rng);
            // Never more than one new obstacle per update
            assert!(h.obstacles.len() <= before + 1);
            max_seen = max_seen.max(h.obstacles.len());

            for (lead, next) in h.obstacles.iter().zip(h.obstacles.iter().skip(1)) {
                assert!(lead.x_pos < next.x_pos);
                assert!(next.x_pos >= lead.right_edge() + lead.gap);
            }
        }
        assert!(max_seen >= 2);
    }

    #[test]
    fn test_retired_obstacles_leave_from_front() {
        let (mut h, mut rng) = horizon(5);
        h.add_new_obstacle(3.0, &mut rng);
        h.add_new_obstacle(3.0, &mut rng);
        h.obstacles[0].x_pos = -100;
        h.obstacles[1].x_pos = 300;
        h.obstacles[1].following_obstacle_created = true;

        h.update(DT, 3.0, true, &mut rng);
        assert_eq!(h.obstacles.len(), 1);
        assert_eq!(h.obstacles[0].x_pos, 297);
    }

    #[test]
    fn test_hit_removes_from_front() {
        let (mut h, mut rng) = horizon(18);
        h.add_new_obstacle(3.0, &mut rng);
        h.add_new_obstacle(3.0, &mut rng);
        h.obstacles[0].x_pos = 100;
        h.obstacles[1].x_pos = 400;

        let removed = h.remove_first_obstacle().unwrap();
        assert_eq!(removed.x_pos, 100);
        assert_eq!(h.obstacles.len(), 1);
        assert_eq!(h.obstacles[0].x_pos, 400);

        h.remove_first_obstacle();
        assert!(h.remove_first_obstacle().is_none());
    }

    #[test]
    fn test_collectible_at_interval() {
        let (mut h, mut rng) = horizon(6);
        h.collisions = 80;
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::Member));

        let member = h.obstacles.back().unwrap();
        let identity = member.identity.unwrap();
        assert!(identity < 8);
        assert_eq!(member.image, MEMBERS_IMAGE);
        assert_eq!(member.sprite, member_sprite(identity));
        assert_eq!(h.remaining_members.len(), 7);
        assert!(!h.remaining_members.contains(&identity));
    }

    #[test]
    fn test_collectibles_drawn_without_replacement() {
        let (mut h, mut rng) = horizon(7);
        h.collisions = 160;
        let mut seen = Vec::new();
        for _ in 0..8 {
            assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::Member));
            seen.push(h.obstacles.back().unwrap().identity.unwrap());
        }
        seen.sort();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());

        // Pool empty: back to hazards
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::CactusSmall));
    }

    #[test]
    fn test_no_collectible_at_zero_or_off_interval() {
        let (mut h, mut rng) = horizon(8);
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::CactusSmall));
        h.collisions = 81;
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::CactusSmall));
        assert_eq!(h.remaining_members.len(), 8);
    }

    #[test]
    fn test_terminal_marker_is_one_shot() {
        let (mut h, mut rng) = horizon(9);
        h.collisions = 712;
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::Final));
        assert!(h.terminal_spawned());

        let marker = &h.obstacles[0];
        assert_eq!(marker.sprite, SpriteSheet::LDPI.final_marker);
        assert_eq!(marker.x_pos, 600 + 46);

        assert_eq!(h.add_new_obstacle(3.0, &mut rng), None);

        // Marker scrolls away and nothing replaces it
        for _ in 0..1000 {
            h.update(DT, 3.0, true, &mut rng);
            assert!(h.obstacles.iter().all(|o| o.kind() == ObstacleKind::Final));
        }
        assert!(h.obstacles.is_empty());
    }

    #[test]
    fn test_terminal_beats_collectible_interval() {
        let (mut h, mut rng) = horizon(10);
        h.collisions = 720;
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::Final));
        assert_eq!(h.remaining_members.len(), 8);
    }

    #[test]
    fn test_speed_gate_uses_fallback() {
        let (mut h, mut rng) = horizon(11);
        h.catalog.hazard.min_speed = 5.0;
        assert_eq!(h.add_new_obstacle(3.0, &mut rng), Some(ObstacleKind::CactusSmall));
        assert_eq!(h.obstacles[0].config.min_speed, 0.0);

        // Gated collectible does not consume an identity
        h.catalog.collectible.min_speed = 5.0;
        h.collisions = 80;
        h.add_new_obstacle(3.0, &mut rng);
        assert_eq!(h.remaining_members.len(), 8);
        assert_eq!(h.obstacles[1].kind(), ObstacleKind::CactusSmall);
    }

    #[test]
    fn test_next_segment_queued_when_screen_unfilled() {
        let (mut h, mut rng) = horizon(12);
        h.clouds[0].x_img = 1199;
        h.update(DT, 3.0, false, &mut rng);

        assert_eq!(h.clouds.len(), 2);
        assert_eq!(h.clouds[1].background, 1);
        assert_eq!(h.clouds[1].x_pos, 600);
        assert_eq!(h.current_background(), 0);
    }

    #[test]
    fn test_segment_index_wraps() {
        let (mut h, mut rng) = horizon(13);
        h.clouds[0].background = BACKGROUNDS.len() - 1;
        h.clouds[0].x_img = 1199;
        h.update(DT, 3.0, false, &mut rng);
        assert_eq!(h.clouds[1].background, 0);
    }

    #[test]
    fn test_segments_chain_continuously() {
        let (mut h, mut rng) = horizon(14);
        // 1200 updates to unfill the first segment, 600 more to retire it
        for _ in 0..1800 {
            h.update(DT, 3.0, false, &mut rng);
            assert!(!h.clouds.is_empty());
            assert!(h.clouds.len() <= 2);
        }
        assert_eq!(h.clouds.len(), 1);
        assert_eq!(h.current_background(), 1);
        assert_eq!(h.clouds[0].x_pos, 0);
    }

    #[test]
    fn test_horizon_line_leapfrogs() {
        let mut rng = Pcg32::seed_from_u64(15);
        let mut line = HorizonLine::new(SpritePos::new(2, 70));
        // 18 px per 100 ms at speed 3
        for _ in 0..33 {
            line.update(100.0, 3.0, &mut rng);
        }
        assert_eq!(line.x_pos, [-594, 6]);

        line.update(100.0, 3.0, &mut rng);
        assert_eq!(line.x_pos, [588, -12]);
        assert!(line.source_x[0] == 2 || line.source_x[0] == 602);

        line.reset();
        assert_eq!(line.x_pos, [0, 600]);
    }

    #[test]
    fn test_reset_keeps_clouds_and_counters() {
        let (mut h, mut rng) = horizon(16);
        for _ in 0..200 {
            h.update(DT, 3.0, true, &mut rng);
        }
        h.collisions = 712;
        h.add_new_obstacle(3.0, &mut rng);
        let clouds = h.clouds.len();

        h.reset();
        assert!(h.obstacles.is_empty());
        assert!(!h.terminal_spawned());
        assert_eq!(h.horizon_line.x_pos, [0, 600]);
        assert_eq!(h.clouds.len(), clouds);
        assert_eq!(h.collisions, 712);
    }

    #[test]
    fn test_draw_order() {
        let (mut h, mut rng) = horizon(17);
        h.update(DT, 3.0, true, &mut rng);
        let mut list = DrawList::new();
        h.draw(&mut list);

        assert_eq!(list.draws.len(), 1 + 2 + 1);
        assert_eq!(list.draws[0].image, "background-1");
        assert_eq!(list.draws[3].dest.x, h.obstacles[0].x_pos);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let (mut a, mut rng_a) = horizon(42);
        let (mut b, mut rng_b) = horizon(42);
        for _ in 0..2000 {
            a.update(DT, 5.0, true, &mut rng_a);
            b.update(DT, 5.0, true, &mut rng_b);
        }
        let sig = |h: &Horizon| {
            h.obstacles
                .iter()
                .map(|o| (o.x_pos, o.y_pos, o.gap))
                .collect::<Vec<_>>()
        };
        assert_eq!(sig(&a), sig(&b));
    }
}
