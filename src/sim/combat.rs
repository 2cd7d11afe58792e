//! Sword attacks
//!
//! [`attack`] starts a swing and schedules two timed events: the hit test,
//! which lands partway through the swing, and the end of the swing, which
//! re-arms the attack. The hit test runs once per swing and checks each live
//! enemy exactly once, so no enemy can be hit or killed twice by one swing.
//!
//! An enemy is hit when ANY of these hold:
//! - it is the locked target and within the locked reach
//! - it is within the default reach and inside the forward cone
//! - the sword tip is close enough to it

use glam::{Quat, Vec3};

use super::state::{ActorId, GameEvent, GamePhase, SimState};
use super::timers::TimedEvent;
use crate::planar;
use crate::tuning::CombatTuning;

/// Why an enemy was hit (several may hold at once)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitTest {
    pub locked_reach: bool,
    pub cone: bool,
    pub sword_tip: bool,
}

impl HitTest {
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.locked_reach || self.cone || self.sword_tip
    }
}

/// World-space sword tip for an actor at `position` facing `yaw`
pub fn sword_tip(position: Vec3, yaw: f32, local_offset: Vec3) -> Vec3 {
    position + Quat::from_rotation_y(yaw) * local_offset
}

/// Evaluate the three hit conditions for one enemy
pub fn hit_test(
    tuning: &CombatTuning,
    attacker: Vec3,
    yaw: f32,
    enemy: Vec3,
    is_locked_target: bool,
) -> HitTest {
    let to_enemy = planar(enemy - attacker);
    let distance = to_enemy.length();
    let forward = crate::facing_from_yaw(yaw);

    let dir = to_enemy.normalize_or_zero();
    let angle = if dir == Vec3::ZERO {
        0.0
    } else {
        forward.angle_between(dir)
    };

    let tip = sword_tip(attacker, yaw, Vec3::from_array(tuning.tip_offset));

    HitTest {
        locked_reach: is_locked_target && distance <= tuning.locked_range,
        cone: distance <= tuning.attack_range && angle <= tuning.cone,
        sword_tip: tip.distance(enemy) < tuning.tip_reach,
    }
}

/// Start a swing. Returns false if one is already in progress.
pub fn attack(state: &mut SimState) -> bool {
    if state.phase == GamePhase::GameOver {
        return false;
    }
    let target = state.lock_target().map(|t| t.position);
    let Some(player) = state.player.as_mut() else {
        return false;
    };
    if player.attacking {
        return false;
    }

    player.attacking = true;
    if let Some(target) = target {
        player.face_toward(target);
    }
    let origin = player.position;
    let yaw = player.yaw;

    let combat = &state.tuning.combat;
    let now = state.time;
    state
        .timers
        .schedule(now + combat.hit_delay as f64, TimedEvent::AttackHitCheck);
    state
        .timers
        .schedule(now + combat.swing_duration as f64, TimedEvent::SwingEnd);
    state.emit(GameEvent::SwingStarted { origin, yaw });
    true
}

/// Mid-swing hit test against every live enemy
pub fn resolve_hits(state: &mut SimState) {
    let Some(player) = state.player.as_ref() else {
        return;
    };
    let attacker = player.position;
    let yaw = player.yaw;
    let combat = state.tuning.combat.clone();
    let now = state.time;

    let mut cues = Vec::new();
    let mut dead: Vec<ActorId> = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        let test = hit_test(
            &combat,
            attacker,
            yaw,
            enemy.position,
            state.lock.is_target(enemy.id),
        );
        if !test.is_hit() {
            continue;
        }

        enemy.health = enemy.health.saturating_sub(1);

        let mut away = planar(enemy.position - attacker).normalize_or_zero();
        if away == Vec3::ZERO {
            away = crate::facing_from_yaw(yaw);
        }
        let knockback = away * combat.knockback_distance;
        enemy.knockback = knockback;
        enemy.position += knockback;
        enemy.position.y = enemy.position.y.max(combat.enemy_min_height);
        enemy.aggro = true;

        log::debug!("Hit enemy {:?} ({:?}), health {}", enemy.id, test, enemy.health);
        cues.push(GameEvent::HitSpark {
            position: enemy.position,
        });
        cues.push(GameEvent::EnemyFlash {
            enemy: enemy.id,
            lit: true,
        });
        state
            .timers
            .schedule(now + combat.flash_duration as f64, TimedEvent::FlashEnd(enemy.id));

        if enemy.health == 0 {
            dead.push(enemy.id);
        }
    }

    state.events.extend(cues);

    for id in dead {
        kill_enemy(state, id);
    }
}

/// Death path: cue, remove from the live set, cancel its timers, drop the lock
fn kill_enemy(state: &mut SimState, id: ActorId) {
    let Some(index) = state.enemies.iter().position(|e| e.id == id) else {
        return;
    };
    let enemy = state.enemies.remove(index);
    log::debug!("Enemy {:?} defeated", id);

    state.emit(GameEvent::DeathBurst {
        position: enemy.position,
    });
    state.emit(GameEvent::EnemyRemoved { enemy: id });
    state.timers.cancel_actor(id);
    if state.lock.is_target(id) {
        super::lock::release(state);
    }
}

/// Swing animation finished
pub fn end_swing(state: &mut SimState) {
    if let Some(player) = state.player.as_mut() {
        player.attacking = false;
    }
}

/// Turn off an enemy's highlight if it is still around
pub fn end_flash(state: &mut SimState, id: ActorId) {
    if state.enemy(id).is_some() {
        state.emit(GameEvent::EnemyFlash { enemy: id, lit: false });
    }
}
