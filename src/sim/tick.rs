//! Per-frame simulation tick
//!
//! Core game loop. One call runs the whole pipeline in a fixed order:
//!
//! 1. triggers (lock toggle, attack, reset)
//! 2. locomotion
//! 3. camera
//! 4. enemy AI
//! 5. timed effects (mid-swing hit check, swing end, flash and fade reverts)
//! 6. lock validation
//!
//! The host then drains [`SimState::events`] and renders.

use glam::Vec2;

use super::camera::CameraFrame;
use super::collision::OcclusionProbe;
use super::state::{GameEvent, GamePhase, SimState};
use super::timers::TimedEvent;
use super::{combat, enemy, lock, locomotion};
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Jump (held is fine, only fires when grounded)
    pub jump: bool,
    /// Edge-triggered actions
    pub attack: bool,
    pub toggle_lock: bool,
    pub reset: bool,
    /// Pointer movement this frame (pixels)
    pub orbit: Vec2,
    /// Wheel zoom this frame (positive pulls out)
    pub zoom: f32,
}

/// Advance the game by one rendered frame.
///
/// `scene` answers the camera's occlusion rays; without one the collision
/// world stands in for the rendered scene.
pub fn tick(
    state: &mut SimState,
    input: &TickInput,
    scene: Option<&dyn OcclusionProbe>,
    dt: f32,
) {
    // Frozen after defeat; the camera stays where it was
    if state.phase == GamePhase::GameOver || state.player.is_none() {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time += dt as f64;

    if input.orbit != Vec2::ZERO {
        state
            .camera
            .orbit(input.orbit.x, input.orbit.y, &state.tuning.camera);
    }
    if input.zoom != 0.0 {
        state.camera.zoom(input.zoom, &state.tuning.camera);
    }

    // Triggers
    if input.toggle_lock {
        lock::toggle_lock(state);
    }
    if input.attack {
        combat::attack(state);
    }
    if input.reset {
        locomotion::reset_position(state);
    }

    let report = locomotion::update_player(state, input, dt);

    update_camera(state, scene, report.landed, dt);

    enemy::update_enemies(state, dt);

    for event in state.timers.drain_due(state.time) {
        match event {
            TimedEvent::AttackHitCheck => combat::resolve_hits(state),
            TimedEvent::SwingEnd => combat::end_swing(state),
            TimedEvent::FlashEnd(id) => combat::end_flash(state, id),
            TimedEvent::RestoreNode(node) => {
                if state.camera.restore(node) {
                    state.emit(GameEvent::NodeRestored { node });
                }
            }
        }
    }

    lock::release_if_missing(state);
    state.normalize_order();
}

fn update_camera(
    state: &mut SimState,
    scene: Option<&dyn OcclusionProbe>,
    landed: Option<f32>,
    dt: f32,
) {
    let Some(player) = state.player.as_ref() else {
        return;
    };
    let frame = CameraFrame {
        subject: player.position,
        target: state.lock_target().map(|t| t.position),
        attacking: player.attacking,
        landed,
        now: state.time,
        dt,
    };

    let SimState {
        camera,
        world,
        rng,
        timers,
        events,
        tuning,
        ..
    } = state;
    let probe: &dyn OcclusionProbe = match scene {
        Some(scene) => scene,
        None => &*world,
    };
    camera.update(&tuning.camera, &frame, probe, rng, timers, events);
}
