//! Simulation state and core types
//!
//! Everything a tick reads or writes hangs off [`SimState`]. Actors are plain
//! records keyed by [`ActorId`]; nothing here knows about scene nodes.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::collision::{Collidable, CollisionWorld, NodeId};
use super::lock::TargetLock;
use super::timers::TimerQueue;
use crate::facing_from_yaw;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Stable actor identifier (never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Player died; the session stays frozen until the page reloads
    GameOver,
}

/// Vertical motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Grounded,
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy,
}

/// Player or enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub position: Vec3,
    /// Facing angle around +Y (0 faces +Z)
    pub yaw: f32,
    /// Only `y` is integrated
    pub velocity: Vec3,
    pub motion: MotionState,
    pub radius: f32,
    pub health: u8,
    pub max_health: u8,
    /// Sim time of this actor's last melee attempt
    pub last_attack_at: Option<f64>,
    /// Enemy is chasing the player
    pub aggro: bool,
    /// Mid-swing; blocks new attacks
    pub attacking: bool,
    /// Last knockback this actor received
    pub knockback: Vec3,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, position: Vec3, radius: f32, health: u8) -> Self {
        Self {
            id,
            kind,
            position,
            yaw: 0.0,
            velocity: Vec3::ZERO,
            motion: MotionState::Grounded,
            radius,
            health,
            max_health: health,
            last_attack_at: None,
            aggro: false,
            attacking: false,
            knockback: Vec3::ZERO,
        }
    }

    /// Horizontal unit forward vector
    #[inline]
    pub fn forward(&self) -> Vec3 {
        facing_from_yaw(self.yaw)
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Rotate to face `point` on the horizontal plane (no-op when on top of it)
    pub fn face_toward(&mut self, point: Vec3) {
        let dir = crate::planar(point - self.position);
        if dir.length_squared() > 1e-8 {
            self.yaw = crate::yaw_from_direction(dir);
        }
    }
}

/// Cues for the visual/UI collaborators, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    SwingStarted { origin: Vec3, yaw: f32 },
    HitSpark { position: Vec3 },
    EnemyFlash { enemy: ActorId, lit: bool },
    DeathBurst { position: Vec3 },
    /// Detach the enemy's visual representation
    EnemyRemoved { enemy: ActorId },
    FootstepDust { position: Vec3 },
    LockAcquired { enemy: ActorId },
    LockReleased,
    NodeFaded { node: NodeId, opacity: f32 },
    NodeRestored { node: NodeId },
    PlayerDamaged { health: u8 },
    PlayerHealed { health: u8 },
    PlayerReset { position: Vec3 },
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed for the jitter RNG
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Seconds simulated so far
    pub time: f64,
    pub phase: GamePhase,
    /// None until the world builder spawns the player
    pub player: Option<Actor>,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Actor>,
    pub world: CollisionWorld,
    pub lock: TargetLock,
    pub camera: CameraRig,
    pub timers: TimerQueue,
    /// Pending cues for the host
    pub events: Vec<GameEvent>,
    /// Distance walked since the last footstep cue
    pub stride: f32,
    next_id: u32,
}

impl SimState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let camera = CameraRig::new(&tuning.camera);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time: 0.0,
            phase: GamePhase::Playing,
            player: None,
            enemies: Vec::new(),
            world: CollisionWorld::new(),
            lock: TargetLock::default(),
            camera,
            timers: TimerQueue::default(),
            events: Vec::new(),
            stride: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new actor ID
    pub fn next_actor_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place the player (replaces any previous player)
    pub fn spawn_player(&mut self, position: Vec3) -> ActorId {
        let id = self.next_actor_id();
        let loco = &self.tuning.locomotion;
        let mut player = Actor::new(id, ActorKind::Player, position, loco.radius, loco.max_health);
        if position.y > loco.ground_height {
            player.motion = MotionState::Airborne;
        }
        self.camera.snap_to(position);
        self.player = Some(player);
        id
    }

    pub fn spawn_enemy(&mut self, position: Vec3) -> ActorId {
        let id = self.next_actor_id();
        let tuning = &self.tuning.enemy;
        let enemy = Actor::new(id, ActorKind::Enemy, position, tuning.radius, tuning.health);
        self.enemies.push(enemy);
        id
    }

    pub fn add_collidable(&mut self, collidable: Collidable) -> NodeId {
        self.world.add(collidable)
    }

    pub fn enemy(&self, id: ActorId) -> Option<&Actor> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// The locked enemy, if the lock points at a live one
    pub fn lock_target(&self) -> Option<&Actor> {
        self.lock.target().and_then(|id| self.enemy(id))
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending cues to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Restore player health, capped at max
    pub fn heal(&mut self, amount: u8) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.health = player.health.saturating_add(amount).min(player.max_health);
        let health = player.health;
        self.emit(GameEvent::PlayerHealed { health });
    }

    /// Apply damage to the player; enters game over at zero health
    pub fn damage_player(&mut self, amount: u8) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.health = player.health.saturating_sub(amount);
        let health = player.health;
        self.emit(GameEvent::PlayerDamaged { health });
        if health == 0 {
            log::info!("Player defeated at t={:.2}s", self.time);
            self.phase = GamePhase::GameOver;
            self.emit(GameEvent::GameOver);
        }
    }

    /// Push player preferences into the camera rig
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.camera.prefs = settings.camera_prefs();
    }

    /// Ensure enemies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut state = SimState::new(1, Tuning::default());
        let p = state.spawn_player(Vec3::ZERO);
        let a = state.spawn_enemy(Vec3::new(3.0, 0.0, 0.0));
        let b = state.spawn_enemy(Vec3::new(4.0, 0.0, 0.0));
        assert_ne!(p, a);
        assert_ne!(a, b);
        assert_eq!(state.enemy(b).map(|e| e.health), Some(crate::consts::ENEMY_HEALTH));
    }

    #[test]
    fn test_heal_capped_at_max() {
        let mut state = SimState::new(1, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        state.damage_player(2);
        state.heal(5);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = SimState::new(1, Tuning::default());
        state.spawn_player(Vec3::ZERO);
        state.damage_player(3);
        state.damage_player(1);
        assert_eq!(state.phase, GamePhase::GameOver);
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::GameOver)
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_face_toward() {
        let mut actor = Actor::new(ActorId(1), ActorKind::Player, Vec3::ZERO, 0.5, 3);
        actor.face_toward(Vec3::new(0.0, 0.0, -4.0));
        assert!(actor.forward().distance(Vec3::NEG_Z) < 0.0001);
        // Standing on the point keeps the old yaw
        let yaw = actor.yaw;
        actor.face_toward(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(actor.yaw, yaw);
    }
}
