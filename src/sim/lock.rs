//! Target lock and combat geometry
//!
//! While locked, "forward" means "toward the target" for both movement and
//! facing. The lock is only ever changed by [`toggle_lock`] or force-released
//! when its target leaves the live enemy set.

use glam::Vec3;

use super::state::{ActorId, GameEvent, GamePhase, SimState};
use crate::planar_distance;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetLock {
    target: Option<ActorId>,
}

impl TargetLock {
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.target.is_some()
    }

    #[inline]
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    #[inline]
    pub fn is_target(&self, id: ActorId) -> bool {
        self.target == Some(id)
    }

    pub fn set(&mut self, id: ActorId) {
        self.target = Some(id);
    }

    pub fn clear(&mut self) {
        self.target = None;
    }
}

/// Lock onto the nearest enemy in range, or release the current lock.
///
/// Returns the lock state afterwards.
pub fn toggle_lock(state: &mut SimState) -> bool {
    if state.phase == GamePhase::GameOver {
        return state.is_locked();
    }
    if state.lock.is_locked() {
        release(state);
        return false;
    }

    let Some(player) = state.player.as_ref() else {
        return false;
    };
    let range = state.tuning.lock.range;
    let nearest = state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| (e.id, e.position, planar_distance(player.position, e.position)))
        .filter(|(_, _, dist)| *dist <= range)
        .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    let Some((id, position, dist)) = nearest else {
        log::debug!("Lock-on: no enemies within {:.1} units", range);
        return false;
    };

    state.lock.set(id);
    if let Some(player) = state.player.as_mut() {
        player.face_toward(position);
    }
    log::debug!("Lock-on: enemy {:?} at {:.2} units", id, dist);
    state.emit(GameEvent::LockAcquired { enemy: id });
    true
}

/// Drop the lock (no-op when unlocked)
pub fn release(state: &mut SimState) {
    if state.lock.is_locked() {
        state.lock.clear();
        state.emit(GameEvent::LockReleased);
    }
}

/// Force-release a lock whose target is no longer in the live set
pub fn release_if_missing(state: &mut SimState) {
    if let Some(id) = state.lock.target()
        && state.enemy(id).is_none()
    {
        log::debug!("Lock-on: target {:?} gone, releasing", id);
        release(state);
    }
}

/// Horizontal basis derived from the camera's orbit yaw.
/// Forward points from the camera toward the subject.
pub fn camera_basis(camera_yaw: f32) -> (Vec3, Vec3) {
    let forward = Vec3::new(-camera_yaw.sin(), 0.0, -camera_yaw.cos());
    (forward, forward.cross(Vec3::Y))
}

/// Movement basis: toward the target when locked, camera-relative otherwise
pub fn movement_basis(camera_yaw: f32, actor: Vec3, target: Option<Vec3>) -> (Vec3, Vec3) {
    if let Some(target) = target {
        let forward = crate::planar(target - actor).normalize_or_zero();
        if forward != Vec3::ZERO {
            return (forward, forward.cross(Vec3::Y));
        }
    }
    camera_basis(camera_yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn arena() -> SimState {
        let mut state = SimState::new(7, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        state
    }

    #[test]
    fn test_lock_picks_nearest_in_range() {
        let mut state = arena();
        let _far = state.spawn_enemy(Vec3::new(0.0, 0.0, 10.0));
        let near = state.spawn_enemy(Vec3::new(4.0, 0.0, 0.0));
        assert!(toggle_lock(&mut state));
        assert_eq!(state.lock.target(), Some(near));
        // Player now faces +X toward the target
        let forward = state.player.as_ref().unwrap().forward();
        assert!(forward.distance(Vec3::X) < 0.0001);
        assert!(state.events.contains(&GameEvent::LockAcquired { enemy: near }));
    }

    #[test]
    fn test_lock_noop_when_all_out_of_range() {
        let mut state = arena();
        state.spawn_enemy(Vec3::new(20.0, 0.0, 0.0));
        state.spawn_enemy(Vec3::new(0.0, 0.0, -16.0));
        assert!(!toggle_lock(&mut state));
        assert!(!state.is_locked());
        assert_eq!(state.lock.target(), None);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_toggle_releases() {
        let mut state = arena();
        state.spawn_enemy(Vec3::new(2.0, 0.0, 0.0));
        assert!(toggle_lock(&mut state));
        assert!(!toggle_lock(&mut state));
        assert!(!state.is_locked());
        assert_eq!(state.events.last(), Some(&GameEvent::LockReleased));
    }

    #[test]
    fn test_release_if_missing() {
        let mut state = arena();
        let id = state.spawn_enemy(Vec3::new(2.0, 0.0, 0.0));
        toggle_lock(&mut state);
        state.enemies.retain(|e| e.id != id);
        release_if_missing(&mut state);
        assert!(!state.is_locked());
    }

    #[test]
    fn test_locked_basis_points_at_target() {
        let (forward, right) = movement_basis(0.0, Vec3::ZERO, Some(Vec3::new(0.0, 3.0, 5.0)));
        assert!(forward.distance(Vec3::Z) < 0.0001);
        assert!(right.distance(Vec3::NEG_X) < 0.0001);
        assert!(forward.dot(right).abs() < 0.0001);
    }

    #[test]
    fn test_camera_basis_looks_away_from_camera() {
        // Yaw 0 puts the camera on +Z, so forward is -Z and right is +X
        let (forward, right) = camera_basis(0.0);
        assert!(forward.distance(Vec3::NEG_Z) < 0.0001);
        assert!(right.distance(Vec3::X) < 0.0001);
    }
}
