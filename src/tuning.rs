//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Player movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionTuning {
    pub speed: f32,
    pub radius: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub step_height: f32,
    pub ground_height: f32,
    pub footstep_interval: f32,
    pub max_health: u8,
    pub reset_elevation: f32,
    /// Reset candidates, tried in order
    pub spawn_points: Vec<[f32; 3]>,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            radius: PLAYER_RADIUS,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            step_height: STEP_HEIGHT,
            ground_height: GROUND_HEIGHT,
            footstep_interval: FOOTSTEP_INTERVAL,
            max_health: PLAYER_MAX_HEALTH,
            reset_elevation: RESET_ELEVATION,
            spawn_points: vec![
                [0.0, 0.0, 0.0],
                [5.0, 0.0, 5.0],
                [-5.0, 0.0, 5.0],
                [5.0, 0.0, -5.0],
                [-5.0, 0.0, -5.0],
            ],
        }
    }
}

/// Lock-on acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockTuning {
    pub range: f32,
}

impl Default for LockTuning {
    fn default() -> Self {
        Self { range: LOCK_RANGE }
    }
}

/// Sword swing and hit resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub attack_range: f32,
    pub locked_range: f32,
    pub cone: f32,
    pub tip_offset: [f32; 3],
    pub tip_reach: f32,
    pub hit_delay: f32,
    pub swing_duration: f32,
    pub knockback_distance: f32,
    pub enemy_min_height: f32,
    pub flash_duration: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            attack_range: ATTACK_RANGE,
            locked_range: LOCKED_ATTACK_RANGE,
            cone: ATTACK_CONE,
            tip_offset: SWORD_TIP_OFFSET,
            tip_reach: SWORD_TIP_REACH,
            hit_delay: ATTACK_HIT_DELAY,
            swing_duration: SWING_DURATION,
            knockback_distance: KNOCKBACK_DISTANCE,
            enemy_min_height: ENEMY_MIN_HEIGHT,
            flash_duration: FLASH_DURATION,
        }
    }
}

/// Third-person camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pitch: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub look_height: f32,
    pub lag: f32,
    pub smoothing: f32,
    pub eye_height: f32,
    pub occlusion_margin: f32,
    pub occlusion_opacity: f32,
    pub fade_restore_delay: f32,
    pub lock_back_distance: f32,
    pub lock_height: f32,
    pub lock_height_per_unit: f32,
    pub lock_shoulder: f32,
    pub lock_look_base_weight: f32,
    pub lock_look_max_weight: f32,
    pub lock_shake: f32,
    pub lock_smoothing: f32,
    pub lock_fast_smoothing: f32,
    pub fast_target_speed: f32,
    pub landing_shake_threshold: f32,
    pub landing_shake_scale: f32,
    pub landing_shake_decay: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            distance: CAMERA_DISTANCE,
            min_distance: CAMERA_MIN_DISTANCE,
            max_distance: CAMERA_MAX_DISTANCE,
            pitch: CAMERA_PITCH,
            min_pitch: CAMERA_MIN_PITCH,
            max_pitch: CAMERA_MAX_PITCH,
            look_height: CAMERA_LOOK_HEIGHT,
            lag: CAMERA_LAG,
            smoothing: CAMERA_SMOOTHING,
            eye_height: CAMERA_EYE_HEIGHT,
            occlusion_margin: OCCLUSION_MARGIN,
            occlusion_opacity: OCCLUSION_OPACITY,
            fade_restore_delay: FADE_RESTORE_DELAY,
            lock_back_distance: LOCK_BACK_DISTANCE,
            lock_height: LOCK_HEIGHT,
            lock_height_per_unit: LOCK_HEIGHT_PER_UNIT,
            lock_shoulder: LOCK_SHOULDER,
            lock_look_base_weight: LOCK_LOOK_BASE_WEIGHT,
            lock_look_max_weight: LOCK_LOOK_MAX_WEIGHT,
            lock_shake: LOCK_SHAKE,
            lock_smoothing: LOCK_SMOOTHING,
            lock_fast_smoothing: LOCK_FAST_SMOOTHING,
            fast_target_speed: FAST_TARGET_SPEED,
            landing_shake_threshold: LANDING_SHAKE_THRESHOLD,
            landing_shake_scale: LANDING_SHAKE_SCALE,
            landing_shake_decay: LANDING_SHAKE_DECAY,
        }
    }
}

/// Enemy behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub radius: f32,
    pub health: u8,
    pub speed: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: ENEMY_RADIUS,
            health: ENEMY_HEALTH,
            speed: ENEMY_SPEED,
            aggro_range: ENEMY_AGGRO_RANGE,
            attack_range: ENEMY_ATTACK_RANGE,
            attack_cooldown: ENEMY_ATTACK_COOLDOWN,
        }
    }
}

/// Complete tuning table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub locomotion: LocomotionTuning,
    pub lock: LockTuning,
    pub combat: CombatTuning,
    pub camera: CameraTuning,
    pub enemy: EnemyTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        if loco.speed < 0.0 {
            return Err(ConfigError::invalid("locomotion.speed", "must not be negative"));
        }
        if loco.radius <= 0.0 {
            return Err(ConfigError::invalid("locomotion.radius", "must be positive"));
        }
        if loco.gravity >= 0.0 {
            return Err(ConfigError::invalid("locomotion.gravity", "must pull downward"));
        }
        if loco.max_health == 0 {
            return Err(ConfigError::invalid("locomotion.max_health", "must be at least 1"));
        }
        if loco.spawn_points.is_empty() {
            return Err(ConfigError::invalid("locomotion.spawn_points", "need at least one"));
        }

        let combat = &self.combat;
        if combat.hit_delay > combat.swing_duration {
            return Err(ConfigError::invalid(
                "combat.hit_delay",
                format!(
                    "{} lands after the swing ends at {}",
                    combat.hit_delay, combat.swing_duration
                ),
            ));
        }

        let cam = &self.camera;
        if cam.min_distance > cam.max_distance {
            return Err(ConfigError::invalid(
                "camera.min_distance",
                format!("{} exceeds max_distance {}", cam.min_distance, cam.max_distance),
            ));
        }
        if cam.min_pitch > cam.max_pitch {
            return Err(ConfigError::invalid(
                "camera.min_pitch",
                format!("{} exceeds max_pitch {}", cam.min_pitch, cam.max_pitch),
            ));
        }
        if !(0.0..=1.0).contains(&cam.landing_shake_decay) {
            return Err(ConfigError::invalid("camera.landing_shake_decay", "must be within 0..=1"));
        }

        if self.enemy.health == 0 {
            return Err(ConfigError::invalid("enemy.health", "must be at least 1"));
        }

        Ok(())
    }
}
