//! Third-person camera rig
//!
//! Two framings, picked by the lock state:
//! - free: orbit on yaw/pitch/distance around the player, trailing fast motion
//! - locked: over-the-shoulder behind the player on the player→target axis
//!
//! The rig eases toward the framing's desired position, then pulls in
//! in front of anything between the player's eyes and the lens. Shake
//! (combat jitter, landing thump) is kept apart from the smoothed position
//! so it never feeds back into the smoothing.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{NodeId, OcclusionProbe};
use super::state::GameEvent;
use super::timers::{TimedEvent, TimerQueue};
use crate::normalize_angle;
use crate::planar;
use crate::tuning::CameraTuning;

/// Per-player camera preferences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPrefs {
    /// Radians per pixel of orbit input
    pub look_sensitivity: f32,
    pub invert_y: bool,
    /// Combat jitter and landing shake
    pub shake: bool,
}

impl Default for CameraPrefs {
    fn default() -> Self {
        Self {
            look_sensitivity: 0.005,
            invert_y: false,
            shake: true,
        }
    }
}

/// What the camera follows this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub subject: Vec3,
    /// Locked enemy position
    pub target: Option<Vec3>,
    pub attacking: bool,
    /// Touchdown vertical velocity, if the subject landed this tick
    pub landed: Option<f32>,
    pub now: f64,
    pub dt: f32,
}

#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Smoothed, occlusion-clamped position
    pub position: Vec3,
    pub look_at: Vec3,
    /// Transient jitter on top of `position`
    pub shake: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub prefs: CameraPrefs,
    prev_subject: Option<Vec3>,
    prev_target: Option<Vec3>,
    landing_shake: f32,
    faded: Vec<NodeId>,
    snap: bool,
}

impl CameraRig {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            shake: Vec3::ZERO,
            distance: tuning.distance,
            yaw: 0.0,
            pitch: tuning.pitch,
            prefs: CameraPrefs::default(),
            prev_subject: None,
            prev_target: None,
            landing_shake: 0.0,
            faded: Vec::new(),
            snap: true,
        }
    }

    /// Jump straight to the framing on the next update (spawn, teleport)
    pub fn snap_to(&mut self, subject: Vec3) {
        self.prev_subject = Some(subject);
        self.prev_target = None;
        self.snap = true;
    }

    /// Final eye position for the renderer
    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.position + self.shake
    }

    /// Unit offset from the subject for the current yaw/pitch
    pub fn orbit_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Apply pointer movement (pixels)
    pub fn orbit(&mut self, dx: f32, dy: f32, tuning: &CameraTuning) {
        let sens = self.prefs.look_sensitivity;
        let dy = if self.prefs.invert_y { -dy } else { dy };
        self.yaw = normalize_angle(self.yaw - dx * sens);
        self.pitch = (self.pitch + dy * sens).clamp(tuning.min_pitch, tuning.max_pitch);
    }

    /// Apply wheel zoom (positive pulls out)
    pub fn zoom(&mut self, delta: f32, tuning: &CameraTuning) {
        self.distance = (self.distance + delta).clamp(tuning.min_distance, tuning.max_distance);
    }

    pub fn is_faded(&self, node: NodeId) -> bool {
        self.faded.contains(&node)
    }

    /// Forget a faded node; true if it was faded
    pub fn restore(&mut self, node: NodeId) -> bool {
        let before = self.faded.len();
        self.faded.retain(|n| *n != node);
        self.faded.len() != before
    }

    /// Advance one frame
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        tuning: &CameraTuning,
        frame: &CameraFrame,
        probe: &dyn OcclusionProbe,
        rng: &mut Pcg32,
        timers: &mut TimerQueue,
        events: &mut Vec<GameEvent>,
    ) {
        let dt = frame.dt;
        let subject = frame.subject;

        if let Some(impact) = frame.landed {
            if impact < -tuning.landing_shake_threshold && self.prefs.shake {
                self.landing_shake = self
                    .landing_shake
                    .max(impact.abs() * tuning.landing_shake_scale);
            }
        }

        let mut jitter = Vec3::ZERO;
        let (desired, look_at, rate) = match frame.target {
            Some(target) => {
                let to_target = planar(target - subject);
                let dist = to_target.length();
                let toward = if dist > 1e-4 {
                    to_target / dist
                } else {
                    -planar(self.orbit_direction()).normalize_or(Vec3::Z)
                };
                let right = toward.cross(Vec3::Y);
                let height = tuning.lock_height + dist * tuning.lock_height_per_unit;
                let desired = subject - toward * tuning.lock_back_distance
                    + Vec3::Y * height
                    + right * tuning.lock_shoulder;

                let weight = (tuning.lock_look_base_weight / dist.max(0.1))
                    .min(tuning.lock_look_max_weight);
                let look_at = subject.lerp(target, weight) + Vec3::Y * tuning.look_height;

                if frame.attacking && self.prefs.shake {
                    let amp = tuning.lock_shake / dist.max(1.0);
                    if amp > 0.0 {
                        jitter = Vec3::new(
                            rng.random_range(-amp..=amp),
                            rng.random_range(-amp..=amp),
                            rng.random_range(-amp..=amp),
                        );
                    }
                }

                let target_speed = match self.prev_target {
                    Some(prev) if dt > 0.0 => (target - prev).length() / dt,
                    _ => 0.0,
                };
                let rate = if target_speed > tuning.fast_target_speed {
                    tuning.lock_fast_smoothing
                } else {
                    tuning.lock_smoothing
                };
                (desired, look_at, rate)
            }
            None => {
                let lag = match self.prev_subject {
                    Some(prev) if dt > 0.0 => -(subject - prev) / dt * tuning.lag,
                    _ => Vec3::ZERO,
                };
                let desired = subject + self.orbit_direction() * self.distance + lag;
                let look_at = subject + Vec3::Y * tuning.look_height;
                (desired, look_at, tuning.smoothing)
            }
        };

        let (mut position, look_at) = if self.snap {
            (desired, look_at)
        } else {
            let alpha = (rate * dt).clamp(0.0, 1.0);
            (
                self.position.lerp(desired, alpha),
                self.look_at.lerp(look_at, alpha),
            )
        };

        // Pull in front of whatever blocks the view
        let eye = subject + Vec3::Y * tuning.eye_height;
        let to_camera = position - eye;
        let reach = to_camera.length();
        if reach > 1e-4 {
            let dir = to_camera / reach;
            if let Some(hit) = probe.raycast(eye, dir, reach) {
                if hit.distance < reach {
                    position = eye + dir * (hit.distance - tuning.occlusion_margin).max(0.0);
                    if !self.is_faded(hit.node) {
                        self.faded.push(hit.node);
                        events.push(GameEvent::NodeFaded {
                            node: hit.node,
                            opacity: tuning.occlusion_opacity,
                        });
                        timers.schedule(
                            frame.now + tuning.fade_restore_delay as f64,
                            TimedEvent::RestoreNode(hit.node),
                        );
                    }
                }
            }
        }

        if self.landing_shake > 0.0 {
            let s = self.landing_shake;
            jitter.y += rng.random_range(-s..=s);
            self.landing_shake *= tuning.landing_shake_decay;
            if self.landing_shake < 0.001 {
                self.landing_shake = 0.0;
            }
        }

        self.position = position;
        self.look_at = look_at;
        self.shake = jitter;
        self.prev_subject = Some(subject);
        self.prev_target = frame.target;
        self.snap = false;
    }
}
