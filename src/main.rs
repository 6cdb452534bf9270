//! Horizon Runner entry point
//!
//! The browser build is driven through the library's wasm bindings. Natively
//! this runs a headless session with a scripted player and logs what happens
//! (`RUST_LOG=info cargo run`).

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use horizon_runner::consts::MS_PER_FRAME;
    use horizon_runner::renderer::DrawList;
    use horizon_runner::sim::{
        CollisionBox, GameEvent, GamePhase, GameState, PlayerEntity, PlayerRequest,
        PlayerStatus, RunnerInput, apply_input, tick,
    };

    const GROUND_Y: i32 = 93;
    /// Jump length in frames
    const JUMP_FRAMES: u32 = 36;
    const JUMP_HEIGHT: f64 = 60.0;

    /// Minimal player: runs on the ground, jumps on request
    #[derive(Debug, Default)]
    struct ScriptedPlayer {
        status: PlayerStatus,
        jump_count: u32,
        jump_frame: u32,
        y: i32,
    }

    impl ScriptedPlayer {
        fn new() -> Self {
            Self {
                y: GROUND_Y,
                ..Default::default()
            }
        }

        fn handle(&mut self, request: &PlayerRequest) {
            match request {
                PlayerRequest::StartJump { .. } => {
                    self.status = PlayerStatus::Jumping;
                    self.jump_count += 1;
                    self.jump_frame = 0;
                }
                PlayerRequest::Run => self.status = PlayerStatus::Running,
                PlayerRequest::Crash => self.status = PlayerStatus::Crashed,
                PlayerRequest::Reset => {
                    self.status = PlayerStatus::Running;
                    self.jump_count = 0;
                    self.y = GROUND_Y;
                }
                PlayerRequest::Configure { key, value } => {
                    log::debug!("Player setting {} = {}", key, value);
                }
            }
        }

        fn update(&mut self) {
            if self.status != PlayerStatus::Jumping {
                return;
            }
            self.jump_frame += 1;
            let t = self.jump_frame as f64 / JUMP_FRAMES as f64;
            self.y = GROUND_Y - (JUMP_HEIGHT * 4.0 * t * (1.0 - t)) as i32;
            if self.jump_frame >= JUMP_FRAMES {
                self.y = GROUND_Y;
                self.status = PlayerStatus::Running;
            }
        }
    }

    impl PlayerEntity for ScriptedPlayer {
        fn bounds(&self) -> CollisionBox {
            CollisionBox::new(50, self.y, 44, 47)
        }

        fn collision_boxes(&self) -> &[CollisionBox] {
            &[]
        }

        fn status(&self) -> PlayerStatus {
            self.status
        }

        fn jump_count(&self) -> u32 {
            self.jump_count
        }
    }

    pub fn run(seed: u64, seconds: u32) {
        let mut state = GameState::with_seed(seed);
        state.set_assets_ready(true);
        let mut player = ScriptedPlayer::new();
        let mut draws = DrawList::new();
        let mut now = 0.0;

        apply_input(&mut state, RunnerInput::Jump, &player, now);

        let frames = (seconds as f64 * 1000.0 / MS_PER_FRAME) as u32;
        for _ in 0..frames {
            now += MS_PER_FRAME;
            player.update();
            tick(&mut state, &player, now);

            for event in state.drain_events() {
                match &event {
                    GameEvent::Player(request) => player.handle(request),
                    GameEvent::Collected { identity } => {
                        log::info!("Member {} joined at {:.0} ms", identity, now);
                    }
                    GameEvent::GameOver { .. } => log::info!("{:?}", event),
                    _ => log::trace!("{:?}", event),
                }
            }

            draws.clear();
            state.render(&mut draws);

            if state.phase == GamePhase::Crashed {
                break;
            }
        }

        log::info!(
            "Session seed {}: {} collisions, distance {:.0}, speed {:.2}, {} members, {} draws last frame",
            seed,
            state.collisions,
            state.distance_ran,
            state.current_speed,
            state.members_collected.len(),
            draws.draws.len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Horizon Runner (native, headless) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    headless::run(seed, 120);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point lives in the library's wasm module
}
