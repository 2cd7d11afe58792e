//! Static obstacle collision
//!
//! Obstacles are reduced to footprints on the X/Z plane. Movement queries are
//! deliberately 2D with one vertical escape: above [`COLLISION_CEILING`] nothing
//! blocks, which is what lets the player jump over low props.
//!
//! The same obstacles double as the camera's occlusion geometry, so
//! [`CollisionWorld`] also answers ray casts (vertical cylinders and boxes).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{COLLISION_CEILING, RADIAL_FOOTPRINT_SCALE};
use crate::planar_distance;

/// Scene node identifier (index of the collidable in its world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Obstacle footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Trees, rocks, barrels
    Radial { radius: f32 },
    /// Houses, walls, fences (axis-aligned)
    Box { half_extents: Vec3 },
}

/// A static obstacle. `position` is where it meets the ground: the foot of a
/// trunk, the centre of a building's floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collidable {
    pub position: Vec3,
    pub shape: Shape,
    /// Visual height above `position.y` for both shapes, only used for occlusion rays
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_height() -> f32 {
    4.0
}

impl Collidable {
    pub fn radial(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            shape: Shape::Radial { radius },
            height: default_height(),
        }
    }

    /// Box resting on `position`, as tall as its extents
    pub fn boxed(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            shape: Shape::Box { half_extents },
            height: half_extents.y * 2.0,
        }
    }

    /// Would an actor of `actor_radius` standing at `candidate` overlap this obstacle?
    pub fn blocks(&self, candidate: Vec3, actor_radius: f32) -> bool {
        match self.shape {
            Shape::Radial { radius } => {
                planar_distance(candidate, self.position)
                    < actor_radius + radius * RADIAL_FOOTPRINT_SCALE
            }
            Shape::Box { half_extents } => {
                let dx = (candidate.x - self.position.x).abs();
                let dz = (candidate.z - self.position.z).abs();
                dx < half_extents.x + actor_radius && dz < half_extents.z + actor_radius
            }
        }
    }

    /// Distance along a unit ray to this obstacle's visual volume
    fn ray_distance(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        match self.shape {
            Shape::Radial { radius } => {
                ray_cylinder(origin, dir, self.position, radius, self.height)
            }
            Shape::Box { half_extents } => {
                let min = Vec3::new(-half_extents.x, 0.0, -half_extents.z);
                let max = Vec3::new(half_extents.x, self.height, half_extents.z);
                ray_aabb(origin, dir, self.position + min, self.position + max)
            }
        }
    }
}

/// Result of a ray cast against scene geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
}

/// Ray queries against the rendered scene (the camera's occlusion test)
pub trait OcclusionProbe {
    /// Closest hit along unit `dir` within `max_distance`
    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Probe for scenes with nothing to hide behind
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcclusion;

impl OcclusionProbe for NoOcclusion {
    fn raycast(&self, _origin: Vec3, _dir: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}

/// The set of static obstacles, fixed once the world is populated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionWorld {
    collidables: Vec<Collidable>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collidables(collidables: Vec<Collidable>) -> Self {
        Self { collidables }
    }

    pub fn add(&mut self, collidable: Collidable) -> NodeId {
        self.collidables.push(collidable);
        NodeId(self.collidables.len() as u32 - 1)
    }

    pub fn len(&self) -> usize {
        self.collidables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collidables.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<&Collidable> {
        self.collidables.get(node.0 as usize)
    }

    /// True if an actor of `actor_radius` can't stand at `candidate`
    pub fn query_collision(&self, candidate: Vec3, actor_radius: f32) -> bool {
        if candidate.y > COLLISION_CEILING {
            return false;
        }
        self.collidables
            .iter()
            .any(|c| c.blocks(candidate, actor_radius))
    }
}

impl OcclusionProbe for CollisionWorld {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
        self.collidables
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                c.ray_distance(origin, dir).map(|distance| RayHit {
                    node: NodeId(i as u32),
                    distance,
                })
            })
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Ray against the side of a vertical cylinder standing on `base`.
/// Rays starting inside the cylinder never hit it.
fn ray_cylinder(origin: Vec3, dir: Vec3, base: Vec3, radius: f32, height: f32) -> Option<f32> {
    let m = Vec3::new(origin.x - base.x, 0.0, origin.z - base.z);
    let d = Vec3::new(dir.x, 0.0, dir.z);
    let a = d.length_squared();
    if a < 1e-8 {
        return None; // Vertical ray never crosses the side wall
    }
    let b = 2.0 * m.dot(d);
    let c = m.length_squared() - radius * radius;
    if c < 0.0 {
        return None;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if t < 0.0 {
        return None;
    }
    let y = origin.y + dir.y * t;
    (y >= base.y && y <= base.y + height).then_some(t)
}

/// Slab test against an axis-aligned box. Rays starting inside never hit.
fn ray_aabb(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
        if t_near > t_far {
            return None;
        }
    }

    (t_near >= 0.0 && t_far >= 0.0).then_some(t_near)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree_world() -> CollisionWorld {
        CollisionWorld::from_collidables(vec![Collidable::radial(Vec3::ZERO, 1.0)])
    }

    #[test]
    fn test_radial_uses_shrunk_footprint() {
        let world = tree_world();
        // Envelope = 0.5 + 1.0 * 0.8 = 1.3
        assert!(world.query_collision(Vec3::new(1.25, 0.0, 0.0), 0.5));
        assert!(!world.query_collision(Vec3::new(1.35, 0.0, 0.0), 0.5));
    }

    #[test]
    fn test_box_expanded_by_actor_radius() {
        let world = CollisionWorld::from_collidables(vec![Collidable::boxed(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(2.0, 1.5, 1.0),
        )]);
        assert!(world.query_collision(Vec3::new(12.4, 0.0, 0.0), 0.5));
        assert!(world.query_collision(Vec3::new(10.0, 0.0, 1.4), 0.5));
        assert!(!world.query_collision(Vec3::new(12.6, 0.0, 0.0), 0.5));
        assert!(!world.query_collision(Vec3::new(10.0, 0.0, 1.6), 0.5));
    }

    #[test]
    fn test_high_positions_never_blocked() {
        let world = tree_world();
        assert!(world.query_collision(Vec3::new(0.0, 3.0, 0.0), 0.5));
        assert!(!world.query_collision(Vec3::new(0.0, 3.01, 0.0), 0.5));
    }

    #[test]
    fn test_empty_world_blocks_nothing() {
        assert!(!CollisionWorld::new().query_collision(Vec3::ZERO, 0.5));
    }

    #[test]
    fn test_raycast_hits_nearest() {
        let mut world = CollisionWorld::new();
        let far = world.add(Collidable::radial(Vec3::new(0.0, 0.0, 8.0), 1.0));
        let near = world.add(Collidable::radial(Vec3::new(0.0, 0.0, 4.0), 1.0));
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 20.0)
            .unwrap();
        assert_eq!(hit.node, near);
        assert_ne!(hit.node, far);
        assert!((hit.distance - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_raycast_respects_height_and_range() {
        let world = tree_world();
        // Passes over the top of a 4-unit trunk
        let origin = Vec3::new(0.0, 5.0, -5.0);
        assert!(world.raycast(origin, Vec3::Z, 20.0).is_none());
        // Too short to reach it
        let origin = Vec3::new(0.0, 1.0, -5.0);
        assert!(world.raycast(origin, Vec3::Z, 3.0).is_none());
        assert!(world.raycast(origin, Vec3::Z, 5.0).is_some());
    }

    #[test]
    fn test_raycast_box() {
        let world = CollisionWorld::from_collidables(vec![Collidable::boxed(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(2.0, 1.5, 1.0),
        )]);
        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_raycast_box_stands_on_its_base() {
        // Ground-level house described the way layouts do it
        let house = Collidable {
            position: Vec3::new(0.0, 0.0, 5.0),
            shape: Shape::Box {
                half_extents: Vec3::new(2.0, 1.0, 1.0),
            },
            height: 3.0,
        };
        let tree = Collidable::radial(Vec3::new(0.0, 0.0, 5.0), 1.0);

        for obstacle in [house, tree] {
            let world = CollisionWorld::from_collidables(vec![obstacle]);
            let hit = world.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::Z, 10.0).unwrap();
            assert!((hit.distance - 4.0).abs() < 0.001);
        }

        // Over the roof, below the floor
        let world = CollisionWorld::from_collidables(vec![house]);
        assert!(world.raycast(Vec3::new(0.0, 3.5, 0.0), Vec3::Z, 10.0).is_none());
        assert!(world.raycast(Vec3::new(0.0, -0.5, 0.0), Vec3::Z, 10.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_radial_containment(
            angle in 0.0f32..std::f32::consts::TAU,
            frac in 0.0f32..0.99,
            y in -1.0f32..3.0,
            radius in 0.2f32..3.0,
            actor_radius in 0.1f32..1.0,
        ) {
            let world = CollisionWorld::from_collidables(vec![Collidable::radial(Vec3::ZERO, radius)]);
            let envelope = actor_radius + radius * RADIAL_FOOTPRINT_SCALE;
            let dir = Vec3::new(angle.cos(), 0.0, angle.sin());

            let inside = dir * envelope * frac + Vec3::Y * y;
            prop_assert!(world.query_collision(inside, actor_radius));

            let outside = dir * envelope * (1.01 + frac) + Vec3::Y * y;
            prop_assert!(!world.query_collision(outside, actor_radius));

            let lifted = Vec3::new(inside.x, 3.0 + frac + 0.01, inside.z);
            prop_assert!(!world.query_collision(lifted, actor_radius));
        }
    }
}
