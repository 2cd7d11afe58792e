//! Enemy behaviour
//!
//! Enemies idle until the player comes within aggro range (or hits them),
//! then close in on foot and swing on a cooldown once within melee reach.

use super::state::{GamePhase, SimState};
use crate::planar;

/// Advance every live enemy one tick
pub fn update_enemies(state: &mut SimState, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    let Some(player) = state.player.as_ref() else {
        return;
    };
    let player_pos = player.position;
    let tuning = state.tuning.enemy.clone();
    let now = state.time;

    let mut strikes = 0u8;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        let to = planar(player_pos - enemy.position);
        let dist = to.length();

        if dist <= tuning.aggro_range {
            enemy.aggro = true;
        }
        if !enemy.aggro {
            continue;
        }
        enemy.face_toward(player_pos);

        if dist > tuning.attack_range {
            let step = (tuning.speed * dt).min(dist - tuning.attack_range);
            if step > 1e-4 {
                let candidate = enemy.position + to.normalize_or_zero() * step;
                if !state.world.query_collision(candidate, enemy.radius) {
                    enemy.position = candidate;
                }
            }
            continue;
        }

        let ready = enemy
            .last_attack_at
            .is_none_or(|last| now - last >= tuning.attack_cooldown as f64);
        if ready {
            enemy.last_attack_at = Some(now);
            log::debug!("Enemy {:?} strikes the player", enemy.id);
            strikes = strikes.saturating_add(1);
        }
    }

    for _ in 0..strikes {
        state.damage_player(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::collision::Collidable;
    use crate::sim::state::GameEvent;
    use crate::tuning::Tuning;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn run(state: &mut SimState, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            state.time += DT as f64;
            update_enemies(state, DT);
        }
    }

    #[test]
    fn test_idle_out_of_range() {
        let mut state = SimState::new(2, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        let id = state.spawn_enemy(Vec3::new(ENEMY_AGGRO_RANGE + 2.0, 0.0, 0.0));
        run(&mut state, 1.0);
        let enemy = state.enemy(id).unwrap();
        assert!(!enemy.aggro);
        assert_eq!(enemy.position.x, ENEMY_AGGRO_RANGE + 2.0);
    }

    #[test]
    fn test_approach_stops_at_reach() {
        let mut state = SimState::new(2, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        let id = state.spawn_enemy(Vec3::new(5.0, 0.0, 0.0));
        run(&mut state, 3.0);
        let enemy = state.enemy(id).unwrap();
        assert!(enemy.aggro);
        assert!((enemy.position.x - ENEMY_ATTACK_RANGE).abs() < 0.01);
        // Facing the player (-X)
        assert!(enemy.forward().distance(Vec3::NEG_X) < 0.0001);
    }

    #[test]
    fn test_blocked_by_obstacle() {
        let mut state = SimState::new(2, Tuning::default());
        state.add_collidable(Collidable::boxed(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.5, 1.0, 3.0),
        ));
        state.spawn_player(Vec3::ZERO);
        let id = state.spawn_enemy(Vec3::new(5.0, 0.0, 0.0));
        run(&mut state, 3.0);
        assert!(state.enemy(id).unwrap().position.x > 3.5);
    }

    #[test]
    fn test_strikes_on_cooldown() {
        let mut state = SimState::new(2, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        state.spawn_enemy(Vec3::new(1.0, 0.0, 0.0));

        run(&mut state, 0.1);
        assert_eq!(state.player.as_ref().unwrap().health, PLAYER_MAX_HEALTH - 1);

        // Still cooling down
        run(&mut state, ENEMY_ATTACK_COOLDOWN * 0.5);
        assert_eq!(state.player.as_ref().unwrap().health, PLAYER_MAX_HEALTH - 1);

        run(&mut state, ENEMY_ATTACK_COOLDOWN);
        assert_eq!(state.player.as_ref().unwrap().health, PLAYER_MAX_HEALTH - 2);
    }

    #[test]
    fn test_game_over_once() {
        let mut state = SimState::new(2, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        state.spawn_enemy(Vec3::new(1.0, 0.0, 0.0));
        state.spawn_enemy(Vec3::new(-1.0, 0.0, 0.0));
        run(&mut state, ENEMY_ATTACK_COOLDOWN * 4.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.as_ref().unwrap().health, 0);
        let overs = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::GameOver)
            .count();
        assert_eq!(overs, 1);
    }
}
