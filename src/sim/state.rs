//! Game session state
//!
//! One [`GameState`] is one game: it owns the horizon, the counters, the RNG
//! and the outgoing event queue. Nothing is global; hosts create a session
//! and pass it to [`super::tick`] every frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::horizon::Horizon;
use super::obstacle::ObstacleKind;
use super::player::PlayerRequest;
use super::score::ScoreMeter;
use crate::renderer::sprites::{MEMBERS_IMAGE, SpriteSheet};
use crate::renderer::{Rect, Renderer, SpriteDraw};
use crate::settings::{ConfigError, RunnerSettings, SettingTarget};

/// Splash image shown while waiting for the first jump
pub const START_IMAGE: &str = "start";

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Idle, waiting for the first jump
    Waiting,
    /// Running (includes the intro)
    Playing,
    /// Stopped by focus loss or the pause action
    Paused,
    /// Run ended, waiting for restart
    Crashed,
}

/// Sounds the host should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundCue {
    ButtonPress,
    Hit,
    /// Score milestone reached
    Score,
}

/// Things that happened during a tick, for the host to act on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Sound(SoundCue),
    Player(PlayerRequest),
    /// The player ran into the lead obstacle
    ObstacleHit { kind: ObstacleKind },
    /// A collectible identity was recorded
    Collected { identity: u32 },
    GameOver { collisions: u32, distance: f64 },
}

/// Abstract player actions (device wiring is up to the host)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerInput {
    /// Jump key / tap
    Jump,
    /// Restart after a crash
    Restart,
    /// Pause a running game
    Pause,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: RunnerSettings,
    pub phase: GamePhase,
    pub horizon: Horizon,
    pub score_meter: ScoreMeter,
    pub current_speed: f64,
    /// Obstacles hit this run (the score)
    pub collisions: u32,
    pub distance_ran: f64,
    /// Best distance over all runs
    pub highest_distance: u32,
    /// Collectible identities hit this run, in order
    pub members_collected: Vec<u32>,
    /// Time since the run (re)started, ms
    pub running_time: f64,
    /// Timestamp of the previous tick
    pub time: Option<f64>,
    /// First jump done, intro played
    pub activated: bool,
    pub playing_intro: bool,
    pub play_count: u32,
    /// Timestamp of the last crash
    pub crash_time: f64,
    assets_ready: bool,
    sprites: SpriteSheet,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed and settings
    pub fn new(seed: u64, settings: RunnerSettings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let sprites = SpriteSheet::LDPI;
        let horizon = Horizon::new(&settings, sprites, &mut rng);
        let score_meter = ScoreMeter::new(sprites.text, settings.width, settings.achievement_interval);

        Self {
            seed,
            rng,
            current_speed: settings.speed,
            settings,
            phase: GamePhase::Waiting,
            horizon,
            score_meter,
            collisions: 0,
            distance_ran: 0.0,
            highest_distance: 0,
            members_collected: Vec::new(),
            running_time: 0.0,
            time: None,
            activated: false,
            playing_intro: false,
            play_count: 0,
            crash_time: 0.0,
            assets_ready: false,
            sprites,
            events: Vec::new(),
        }
    }

    /// Session with default settings
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, RunnerSettings::default())
    }

    /// Images are loaded; the game may start
    pub fn set_assets_ready(&mut self, ready: bool) {
        self.assets_ready = ready;
    }

    pub fn assets_ready(&self) -> bool {
        self.assets_ready
    }

    pub fn sprites(&self) -> &SpriteSheet {
        &self.sprites
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.current_speed = speed;
    }

    /// Apply a runtime setting by key. Unknown keys are ignored.
    pub fn update_config_setting(&mut self, key: &str, value: f64) {
        match self.settings.update_setting(key, value) {
            Ok(SettingTarget::Runner) => {}
            Ok(SettingTarget::Speed) => self.set_speed(value),
            Ok(SettingTarget::Player) => {
                self.push_event(GameEvent::Player(PlayerRequest::Configure {
                    key: key.to_string(),
                    value,
                }));
            }
            Err(ConfigError::UnknownSetting(key)) => {
                log::debug!("Ignoring unknown setting {}", key);
                return;
            }
            Err(e) => {
                log::warn!("Setting {} not applied: {}", key, e);
                return;
            }
        }
        self.horizon.apply_settings(&self.settings);
        self.score_meter.set_interval(self.settings.achievement_interval);
        self.score_meter.set_canvas_width(self.settings.width);
    }

    /// Emit this frame's draw commands
    pub fn render(&self, renderer: &mut impl Renderer) {
        if self.phase == GamePhase::Waiting {
            renderer.draw_image(SpriteDraw {
                image: START_IMAGE,
                src: Rect::new(0, 0, self.settings.width, self.settings.height),
                dest: Rect::new(0, 0, self.settings.width, self.settings.height),
            });
            return;
        }

        self.horizon.draw(renderer);
        self.score_meter.draw(renderer);

        for &identity in &self.members_collected {
            let id = identity as i32;
            renderer.draw_image(SpriteDraw {
                image: MEMBERS_IMAGE,
                src: Rect::new(10 + id * 40, 10, 35, 35),
                dest: Rect::new(320 + id * 25, 7, 40, 40),
            });
        }
    }
}
