//! Glenblade - third-person action core for a browser 3D adventure demo
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (locomotion, collision, lock-on, combat, camera)
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Player preferences (persisted on web)
//! - `layout`: World layouts handed over by the scenery builder
//! - `web`: wasm-bindgen surface for the JavaScript renderer

pub mod error;
pub mod layout;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ConfigError;
pub use layout::WorldLayout;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Largest frame delta the simulation accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ground reference height
    pub const GROUND_HEIGHT: f32 = 0.0;
    /// Above this height nothing blocks movement (jumping over obstacles)
    pub const COLLISION_CEILING: f32 = 3.0;
    /// Radial obstacles are shrunk so actors can graze small props
    pub const RADIAL_FOOTPRINT_SCALE: f32 = 0.8;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    pub const JUMP_IMPULSE: f32 = 8.0;
    pub const GRAVITY: f32 = -20.0;
    pub const STEP_HEIGHT: f32 = 0.5;
    /// Distance travelled between footstep dust puffs
    pub const FOOTSTEP_INTERVAL: f32 = 1.2;
    /// Lift applied by a reset when every spawn point is blocked
    pub const RESET_ELEVATION: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 0.5;
    pub const ENEMY_HEALTH: u8 = 2;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_AGGRO_RANGE: f32 = 10.0;
    pub const ENEMY_ATTACK_RANGE: f32 = 1.2;
    pub const ENEMY_ATTACK_COOLDOWN: f32 = 1.5;
    /// Enemies never sink below this height (knockback can't push them under)
    pub const ENEMY_MIN_HEIGHT: f32 = 0.0;

    /// Lock-on acquisition radius
    pub const LOCK_RANGE: f32 = 15.0;

    /// Sword swing
    pub const ATTACK_RANGE: f32 = 2.0;
    pub const LOCKED_ATTACK_RANGE: f32 = 3.0;
    /// Half-angle of the forward hit cone (radians, 45 degrees)
    pub const ATTACK_CONE: f32 = std::f32::consts::FRAC_PI_4;
    /// Sword tip in actor-local space (+Z is forward)
    pub const SWORD_TIP_OFFSET: [f32; 3] = [0.0, 0.5, 1.5];
    pub const SWORD_TIP_REACH: f32 = 1.2;
    /// Hit test fires this far into the swing
    pub const ATTACK_HIT_DELAY: f32 = 0.15;
    pub const SWING_DURATION: f32 = 0.4;
    pub const KNOCKBACK_DISTANCE: f32 = 0.5;
    pub const FLASH_DURATION: f32 = 0.1;

    /// Camera orbit
    pub const CAMERA_DISTANCE: f32 = 6.0;
    pub const CAMERA_MIN_DISTANCE: f32 = 2.0;
    pub const CAMERA_MAX_DISTANCE: f32 = 12.0;
    pub const CAMERA_PITCH: f32 = 0.35;
    pub const CAMERA_MIN_PITCH: f32 = -0.2;
    pub const CAMERA_MAX_PITCH: f32 = 1.2;
    pub const CAMERA_LOOK_HEIGHT: f32 = 1.5;
    /// Seconds of actor velocity the free camera trails behind
    pub const CAMERA_LAG: f32 = 0.1;
    pub const CAMERA_SMOOTHING: f32 = 5.0;
    /// Eye height the occlusion ray starts from
    pub const CAMERA_EYE_HEIGHT: f32 = 1.5;
    pub const OCCLUSION_MARGIN: f32 = 0.3;
    pub const OCCLUSION_OPACITY: f32 = 0.3;
    pub const FADE_RESTORE_DELAY: f32 = 0.5;

    /// Combat framing
    pub const LOCK_BACK_DISTANCE: f32 = 4.0;
    pub const LOCK_HEIGHT: f32 = 2.0;
    pub const LOCK_HEIGHT_PER_UNIT: f32 = 0.15;
    pub const LOCK_SHOULDER: f32 = 1.0;
    /// Look-at weight toward the target at one unit away (falls off with distance)
    pub const LOCK_LOOK_BASE_WEIGHT: f32 = 1.2;
    pub const LOCK_LOOK_MAX_WEIGHT: f32 = 0.6;
    pub const LOCK_SHAKE: f32 = 0.15;
    pub const LOCK_SMOOTHING: f32 = 4.0;
    pub const LOCK_FAST_SMOOTHING: f32 = 8.0;
    /// Target speed (units/s) above which locked framing tightens
    pub const FAST_TARGET_SPEED: f32 = 3.0;

    /// Landing shake
    pub const LANDING_SHAKE_THRESHOLD: f32 = 10.0;
    pub const LANDING_SHAKE_SCALE: f32 = 0.02;
    pub const LANDING_SHAKE_DECAY: f32 = 0.85;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Horizontal forward vector for a yaw angle (yaw 0 faces +Z)
#[inline]
pub fn facing_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw that faces along `dir` on the horizontal plane
#[inline]
pub fn yaw_from_direction(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Drop the vertical component
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance on the X/Z plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(b - a).length()
}
