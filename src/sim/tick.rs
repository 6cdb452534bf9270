//! Per-frame update and session transitions
//!
//! The host calls [`tick`] once per animation frame with a timestamp and the
//! current player view. Discrete actions go through [`apply_input`].

use super::collision::check_for_collision;
use super::obstacle::ObstacleKind;
use super::player::{PlayerEntity, PlayerRequest};
use super::state::{GameEvent, GamePhase, GameState, RunnerInput, SoundCue};
use crate::consts::MS_PER_FRAME;

/// Advance the session to timestamp `now` (ms)
pub fn tick(state: &mut GameState, player: &impl PlayerEntity, now: f64) {
    let delta = state.time.map_or(0.0, |t| now - t).max(0.0);
    state.time = Some(now);

    if state.phase != GamePhase::Playing {
        return;
    }

    // First jump kicks off the intro, landing ends it
    if player.jump_count() == 1 && !state.playing_intro && !state.activated {
        play_intro(state);
    }
    if state.playing_intro && !player.is_jumping() {
        start_game(state);
    }

    state.running_time += delta;
    let has_obstacles = state.activated
        && !state.playing_intro
        && state.running_time > state.settings.clear_time;

    let horizon_delta = if state.playing_intro || !state.activated {
        0.0
    } else {
        delta
    };
    // Nothing moves between the start input and the first jump
    let delta = if !state.activated && !state.playing_intro {
        0.0
    } else {
        delta
    };
    state.horizon.update(
        horizon_delta,
        state.current_speed,
        has_obstacles,
        &mut state.rng,
    );

    let hit = has_obstacles
        && state
            .horizon
            .obstacles
            .front()
            .is_some_and(|o| check_for_collision(o, player).is_some());
    if hit {
        record_hit(state);
    }

    state.distance_ran += state.current_speed * delta / MS_PER_FRAME;

    if state.current_speed < state.settings.max_speed {
        state.current_speed =
            (state.current_speed + state.settings.acceleration).min(state.settings.max_speed);
    }

    if state.settings.goal > 0 && state.collisions >= state.settings.goal {
        game_over(state, now);
    }

    if state.score_meter.update(delta, state.collisions) {
        state.push_event(GameEvent::Sound(SoundCue::Score));
    }
}

fn record_hit(state: &mut GameState) {
    let Some(obstacle) = state.horizon.remove_first_obstacle() else {
        return;
    };
    let kind = obstacle.kind();

    if kind == ObstacleKind::Member
        && let Some(identity) = obstacle.identity
    {
        state.members_collected.push(identity);
        state.push_event(GameEvent::Collected { identity });
        log::info!("Collected member {}", identity);
    }

    state.collisions += 1;
    state.horizon.collisions += 1;
    state.push_event(GameEvent::ObstacleHit { kind });
}

fn play_intro(state: &mut GameState) {
    state.playing_intro = true;
    log::debug!("Intro started");
}

fn start_game(state: &mut GameState) {
    state.playing_intro = false;
    state.activated = true;
    state.running_time = 0.0;
    state.play_count += 1;
    log::info!("Game started (play {})", state.play_count);
}

/// End the run: crash cue, crashed pose, high score
pub fn game_over(state: &mut GameState, now: f64) {
    state.phase = GamePhase::Crashed;
    state.crash_time = now;
    state.push_event(GameEvent::Sound(SoundCue::Hit));
    state.push_event(GameEvent::Player(PlayerRequest::Crash));

    let distance = state.distance_ran.ceil() as u32;
    if distance > state.highest_distance {
        state.highest_distance = distance;
    }
    if state.score_meter.submit_high_score(state.collisions) {
        log::info!("New high score {}", state.collisions);
    }

    state.push_event(GameEvent::GameOver {
        collisions: state.collisions,
        distance: state.distance_ran,
    });
    log::info!(
        "Game over: {} collisions, distance {:.1}",
        state.collisions,
        state.distance_ran
    );
}

/// Handle a discrete player action at timestamp `now`
pub fn apply_input(
    state: &mut GameState,
    input: RunnerInput,
    player: &impl PlayerEntity,
    now: f64,
) {
    match input {
        RunnerInput::Jump => match state.phase {
            GamePhase::Waiting => {
                if !state.assets_ready() {
                    log::debug!("Jump ignored, assets not loaded");
                    return;
                }
                state.phase = GamePhase::Playing;
                state.time = Some(now);
                state.push_event(GameEvent::Sound(SoundCue::ButtonPress));
                state.push_event(GameEvent::Player(PlayerRequest::StartJump {
                    speed: state.current_speed,
                }));
            }
            GamePhase::Playing => {
                if !player.is_jumping() {
                    state.push_event(GameEvent::Player(PlayerRequest::StartJump {
                        speed: state.current_speed,
                    }));
                }
            }
            GamePhase::Crashed => {
                if now - state.crash_time >= state.settings.gameover_clear_time {
                    restart(state, now);
                }
            }
            GamePhase::Paused => resume(state, now),
        },
        RunnerInput::Restart => {
            if state.phase == GamePhase::Crashed {
                restart(state, now);
            }
        }
        RunnerInput::Pause => match state.phase {
            GamePhase::Playing => stop(state),
            GamePhase::Paused => resume(state, now),
            _ => {}
        },
    }
}

/// Pause a running game
pub fn stop(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        state.phase = GamePhase::Paused;
        log::debug!("Paused");
    }
}

/// Resume a paused game; the elapsed pause is not counted
pub fn resume(state: &mut GameState, now: f64) {
    if state.phase != GamePhase::Paused {
        return;
    }
    state.phase = GamePhase::Playing;
    state.time = Some(now);
    state.push_event(GameEvent::Player(PlayerRequest::Reset));
    state.push_event(GameEvent::Player(PlayerRequest::Run));
    log::debug!("Resumed");
}

/// Page visibility or focus changed
pub fn set_visible(state: &mut GameState, visible: bool, now: f64) {
    if visible {
        resume(state, now);
    } else {
        stop(state);
    }
}

/// Start a fresh run. Only allowed from a crashed or paused session.
///
/// Returns false when the session is not in a restartable phase.
pub fn restart(state: &mut GameState, now: f64) -> bool {
    if !matches!(state.phase, GamePhase::Crashed | GamePhase::Paused) {
        log::debug!("Restart ignored in phase {:?}", state.phase);
        return false;
    }

    state.horizon.reset_clouds(&mut state.rng);
    state.horizon.refill_collectibles();
    state.horizon.collisions = 0;
    state.horizon.reset();
    state.members_collected.clear();
    state.collisions = 0;
    state.distance_ran = 0.0;
    state.running_time = 0.0;
    state.current_speed = state.settings.speed;
    state.time = Some(now);
    state.score_meter.reset();
    state.play_count += 1;
    state.phase = GamePhase::Playing;

    state.push_event(GameEvent::Sound(SoundCue::ButtonPress));
    state.push_event(GameEvent::Player(PlayerRequest::Reset));
    log::info!("Restarted (play {})", state.play_count);
    true
}
