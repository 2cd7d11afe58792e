//! World layouts
//!
//! The scenery builder describes the level as JSON: where the player starts,
//! which obstacles block movement, and where enemies stand.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::collision::{Collidable, Shape};
use crate::sim::state::SimState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldLayout {
    pub player_spawn: Vec3,
    pub collidables: Vec<Collidable>,
    pub enemies: Vec<Vec3>,
}

impl WorldLayout {
    /// Parse and validate a layout
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: WorldLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.player_spawn.is_finite() {
            return Err(ConfigError::invalid("player_spawn", "must be finite"));
        }
        for (i, c) in self.collidables.iter().enumerate() {
            if !c.position.is_finite() {
                return Err(ConfigError::invalid("collidables", format!("#{i} position must be finite")));
            }
            let ok = match c.shape {
                Shape::Radial { radius } => radius > 0.0,
                Shape::Box { half_extents } => half_extents.cmpgt(Vec3::ZERO).all(),
            };
            if !ok {
                return Err(ConfigError::invalid("collidables", format!("#{i} has a non-positive extent")));
            }
        }
        if let Some(i) = self.enemies.iter().position(|e| !e.is_finite()) {
            return Err(ConfigError::invalid("enemies", format!("#{i} position must be finite")));
        }
        Ok(())
    }

    /// Load obstacles, enemies and the player into `state`
    pub fn populate(&self, state: &mut SimState) {
        for c in &self.collidables {
            state.add_collidable(*c);
        }
        for pos in &self.enemies {
            state.spawn_enemy(*pos);
        }
        state.spawn_player(self.player_spawn);
        log::info!(
            "World populated: {} collidables, {} enemies",
            self.collidables.len(),
            self.enemies.len()
        );
    }
}
