//! Player locomotion
//!
//! Input flags become a horizontal move, resolved against the collision world
//! with a fixed fallback chain:
//!
//! 1. full move
//! 2. X only (keep current Z)
//! 3. Z only (keep current X)
//! 4. full move raised by the step height
//!
//! The first clear candidate wins; if none is clear the player stays put.
//! Vertical motion is a two-state machine (`Grounded`/`Airborne`) with a
//! single jump impulse and constant gravity.

use glam::Vec3;

use super::collision::CollisionWorld;
use super::lock::movement_basis;
use super::state::{GameEvent, MotionState, SimState};
use super::tick::TickInput;
use crate::tuning::LocomotionTuning;

/// What happened to the player this tick (consumed by the camera)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Horizontal displacement actually committed
    pub displacement: Vec3,
    /// Vertical velocity at touchdown, if the player landed this tick
    pub landed: Option<f32>,
}

/// First collision-free candidate from the fallback chain
pub fn resolve_movement(
    world: &CollisionWorld,
    current: Vec3,
    candidate: Vec3,
    radius: f32,
    step_height: f32,
) -> Option<Vec3> {
    let attempts = [
        candidate,
        Vec3::new(candidate.x, candidate.y, current.z),
        Vec3::new(current.x, candidate.y, candidate.z),
        candidate + Vec3::Y * step_height,
    ];
    attempts
        .into_iter()
        .find(|pos| !world.query_collision(*pos, radius))
}

/// Advance the player one tick. No-op without a player.
pub fn update_player(state: &mut SimState, input: &TickInput, dt: f32) -> StepReport {
    let mut report = StepReport::default();
    let target = state.lock_target().map(|t| t.position);
    let camera_yaw = state.camera.yaw;

    let SimState {
        player,
        world,
        tuning,
        ..
    } = state;
    let Some(player) = player.as_mut() else {
        return report;
    };
    let loco: &LocomotionTuning = &tuning.locomotion;

    let (forward, right) = movement_basis(camera_yaw, player.position, target);

    let mut dir = Vec3::ZERO;
    if input.forward {
        dir += forward;
    }
    if input.backward {
        dir -= forward;
    }
    if input.right {
        dir += right;
    }
    if input.left {
        dir -= right;
    }

    if let Some(target) = target {
        player.face_toward(target);
    }

    if dir.length_squared() > 1e-8 {
        let step = dir.normalize() * loco.speed * dt;
        let current = player.position;
        let candidate = current + step;
        if let Some(resolved) =
            resolve_movement(world, current, candidate, player.radius, loco.step_height)
        {
            player.position = resolved;
            report.displacement = crate::planar(resolved - current);
            if target.is_none() && report.displacement.length_squared() > 1e-8 {
                player.yaw = crate::yaw_from_direction(report.displacement);
            }
        }
    }

    // A step-up can leave the player hanging above the ground
    if player.motion == MotionState::Grounded && player.position.y > loco.ground_height {
        player.motion = MotionState::Airborne;
    }

    if input.jump && player.motion == MotionState::Grounded {
        player.velocity.y = loco.jump_impulse;
        player.motion = MotionState::Airborne;
    }

    if player.motion == MotionState::Airborne {
        player.velocity.y += loco.gravity * dt;
        player.position.y += player.velocity.y * dt;
        if player.position.y <= loco.ground_height {
            report.landed = Some(player.velocity.y);
            player.position.y = loco.ground_height;
            player.velocity.y = 0.0;
            player.motion = MotionState::Grounded;
        }
    }

    let grounded = player.is_grounded();
    let position = player.position;
    let interval = loco.footstep_interval;

    if grounded && interval > 0.0 {
        state.stride += report.displacement.length();
        if state.stride >= interval {
            state.stride -= interval;
            state.emit(GameEvent::FootstepDust { position });
        }
    }

    report
}

/// Teleport the player to the first clear spawn point, or lift them out of
/// trouble when every spawn point is blocked.
pub fn reset_position(state: &mut SimState) {
    let loco = &state.tuning.locomotion;
    let Some(player) = state.player.as_mut() else {
        return;
    };

    let clear = loco
        .spawn_points
        .iter()
        .map(|p| Vec3::from_array(*p))
        .find(|p| !state.world.query_collision(*p, player.radius));

    match clear {
        Some(spawn) => {
            player.position = spawn;
            player.motion = if spawn.y > loco.ground_height {
                MotionState::Airborne
            } else {
                MotionState::Grounded
            };
        }
        None => {
            log::warn!("All spawn points blocked, lifting player");
            player.position.y += loco.reset_elevation;
            player.motion = MotionState::Airborne;
        }
    }
    player.velocity = Vec3::ZERO;
    let position = player.position;

    log::info!("Player reset to {:?}", position);
    state.camera.snap_to(position);
    state.stride = 0.0;
    state.emit(GameEvent::PlayerReset { position });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::collision::Collidable;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn state_with(collidables: Vec<Collidable>) -> SimState {
        let mut state = SimState::new(3, Tuning::default());
        for c in collidables {
            state.add_collidable(c);
        }
        state.spawn_player(Vec3::ZERO);
        state
    }

    fn player(state: &SimState) -> &crate::sim::Actor {
        state.player.as_ref().unwrap()
    }

    #[test]
    fn test_x_slide_preferred() {
        // Tree ahead on +Z blocks the diagonal and the Z slide, X stays clear
        let world = CollisionWorld::from_collidables(vec![Collidable::radial(
            Vec3::new(0.0, 0.0, 1.4),
            1.0,
        )]);
        let current = Vec3::ZERO;
        let candidate = Vec3::new(0.1414, 0.0, 0.1414);
        let resolved = resolve_movement(&world, current, candidate, 0.5, STEP_HEIGHT);
        assert_eq!(resolved, Some(Vec3::new(0.1414, 0.0, 0.0)));
    }

    #[test]
    fn test_z_slide_when_x_blocked() {
        let world = CollisionWorld::from_collidables(vec![Collidable::radial(
            Vec3::new(1.4, 0.0, 0.0),
            1.0,
        )]);
        let current = Vec3::ZERO;
        let candidate = Vec3::new(0.1414, 0.0, 0.1414);
        let resolved = resolve_movement(&world, current, candidate, 0.5, STEP_HEIGHT);
        assert_eq!(resolved, Some(Vec3::new(0.0, 0.0, 0.1414)));
    }

    #[test]
    fn test_step_up_only_clears_above_ceiling() {
        let world = CollisionWorld::from_collidables(vec![Collidable::radial(
            Vec3::new(0.0, 0.0, 0.5),
            1.0,
        )]);
        // Grounded: raising by the step height still collides
        let blocked = resolve_movement(&world, Vec3::ZERO, Vec3::new(0.0, 0.0, 0.1), 0.5, STEP_HEIGHT);
        assert_eq!(blocked, None);
        // Near the top of a jump the raised candidate escapes
        let high = Vec3::new(0.0, 2.8, 0.0);
        let resolved = resolve_movement(&world, high, high + Vec3::Z * 0.1, 0.5, STEP_HEIGHT);
        assert_eq!(resolved, Some(high + Vec3::Z * 0.1 + Vec3::Y * STEP_HEIGHT));
    }

    #[test]
    fn test_wall_stop() {
        // Wall just behind the camera-forward direction (-Z at yaw 0)
        let mut state = state_with(vec![Collidable::boxed(
            Vec3::new(0.0, 0.0, -1.05),
            Vec3::new(5.0, 1.0, 0.5),
        )]);
        let input = TickInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..10 {
            let report = update_player(&mut state, &input, DT);
            assert_eq!(report.displacement, Vec3::ZERO);
        }
        assert_eq!(player(&state).position, Vec3::ZERO);
    }

    #[test]
    fn test_free_move_follows_camera_and_turns_facing() {
        let mut state = state_with(vec![]);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        update_player(&mut state, &input, DT);
        let p = player(&state);
        // Yaw 0: right is +X
        assert!((p.position.x - PLAYER_SPEED * DT).abs() < 0.0001);
        assert!(p.forward().distance(Vec3::X) < 0.0001);
    }

    #[test]
    fn test_locked_forward_closes_distance() {
        let mut state = state_with(vec![]);
        state.spawn_enemy(Vec3::new(-6.0, 0.0, 0.0));
        crate::sim::lock::toggle_lock(&mut state);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        update_player(&mut state, &input, DT);
        let p = player(&state);
        // Strafing keeps facing locked on the target
        assert!(p.position.z > 0.0);
        assert!(p.forward().distance(Vec3::NEG_X) < 0.02);
        let input = TickInput {
            forward: true,
            ..Default::default()
        };
        let before = p.position.x;
        update_player(&mut state, &input, DT);
        assert!(player(&state).position.x < before);
    }

    #[test]
    fn test_grounded_is_fixed_point() {
        let mut state = state_with(vec![]);
        for _ in 0..120 {
            update_player(&mut state, &TickInput::default(), DT);
        }
        let p = player(&state);
        assert_eq!(p.position.y, GROUND_HEIGHT);
        assert_eq!(p.velocity.y, 0.0);
        assert!(p.is_grounded());
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut state = state_with(vec![]);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        update_player(&mut state, &jump, DT);
        assert!(!player(&state).is_grounded());
        assert!(player(&state).position.y > 0.0);

        // Holding jump mid-air doesn't re-launch
        let vy = player(&state).velocity.y;
        update_player(&mut state, &jump, DT);
        assert!(player(&state).velocity.y < vy);

        let mut landed = None;
        for _ in 0..200 {
            let report = update_player(&mut state, &TickInput::default(), DT);
            if report.landed.is_some() {
                landed = report.landed;
                break;
            }
        }
        assert!(landed.unwrap() < 0.0);
        assert!(player(&state).is_grounded());
        assert_eq!(player(&state).position.y, GROUND_HEIGHT);
    }

    #[test]
    fn test_footstep_dust_cadence() {
        let mut state = state_with(vec![]);
        let input = TickInput {
            forward: true,
            ..Default::default()
        };
        // One second of walking covers PLAYER_SPEED units
        for _ in 0..60 {
            update_player(&mut state, &input, DT);
        }
        let puffs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::FootstepDust { .. }))
            .count();
        assert_eq!(puffs, (PLAYER_SPEED / FOOTSTEP_INTERVAL) as usize);
    }

    #[test]
    fn test_reset_picks_first_clear_spawn() {
        // First spawn point (origin) sits inside a rock
        let mut state = state_with(vec![Collidable::radial(Vec3::ZERO, 2.0)]);
        reset_position(&mut state);
        assert_eq!(player(&state).position, Vec3::new(5.0, 0.0, 5.0));
        assert!(matches!(state.events.last(), Some(GameEvent::PlayerReset { .. })));
    }

    #[test]
    fn test_reset_lifts_when_all_blocked() {
        let mut state = state_with(vec![Collidable::radial(Vec3::ZERO, 20.0)]);
        reset_position(&mut state);
        let p = player(&state);
        assert_eq!(p.position.y, RESET_ELEVATION);
        assert!(!p.is_grounded());
    }
}
