//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay renderer-free:
//! - Seeded RNG only (camera jitter)
//! - Stable iteration order (by actor ID)
//! - Scene access only through [`OcclusionProbe`] and [`GameEvent`] cues

pub mod camera;
pub mod collision;
pub mod combat;
pub mod enemy;
pub mod lock;
pub mod locomotion;
pub mod state;
pub mod tick;
pub mod timers;

pub use camera::{CameraFrame, CameraPrefs, CameraRig};
pub use collision::{Collidable, CollisionWorld, NoOcclusion, NodeId, OcclusionProbe, RayHit, Shape};
pub use combat::{HitTest, attack, hit_test};
pub use lock::{TargetLock, toggle_lock};
pub use locomotion::{StepReport, reset_position, resolve_movement};
pub use state::{Actor, ActorId, ActorKind, GameEvent, GamePhase, MotionState, SimState};
pub use tick::{TickInput, tick};
pub use timers::{TimedEvent, TimerQueue};
