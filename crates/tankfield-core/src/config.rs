//! Simulation configuration.
//!
//! [`ArenaConfig`] gathers every tunable of the arena: map size, spawn
//! points, speeds, weapon numbers, respawn placement and effect lifetimes.
//! All fields have defaults matching the stock game, and any subset can be
//! supplied as JSON:
//!
//! ```
//! use tankfield_core::config::ArenaConfig;
//!
//! let config = ArenaConfig::from_json_str(r#"{ "seed": 9, "enemy_count": 3 }"#).unwrap();
//! assert_eq!(config.seed, 9);
//! assert_eq!(config.enemy_count, 3);
//! assert_eq!(config.map_size, 15);
//! ```

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Tunables for one arena simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Seed for the simulation RNG.
    pub seed: u64,
    /// Side length of the square grid, walls included.
    pub map_size: u32,
    /// Where the player tank starts.
    pub player_spawn: Vec3,
    /// Initial camera position. The camera follows the player on x/y only.
    pub camera_start: Vec3,
    /// Player speed in units per second.
    pub player_move_speed: f32,
    /// Player turn rate in radians per second.
    pub turn_rate: f32,
    /// Enemy speed in units per second.
    pub enemy_move_speed: f32,
    /// Seconds an enemy must cruise unblocked before firing.
    pub enemy_fire_interval: f32,
    /// Starting enemy health.
    pub enemy_health: i32,
    /// Number of enemies placed at setup.
    pub enemy_count: u32,
    /// Bullet speed in units per second.
    pub bullet_speed: f32,
    /// Damage a bullet deals on impact.
    pub bullet_damage: i32,
    /// Optional maximum bullet age in seconds. `None` keeps bullets alive
    /// until they hit something.
    pub bullet_max_lifetime: Option<f32>,
    /// Horizontal muzzle offset along the heading.
    pub muzzle_distance: f32,
    /// Vertical muzzle offset.
    pub muzzle_height: f32,
    /// Scale applied to the tank model's bounding sphere.
    pub tank_collider_scale: f32,
    /// Bullet collider radius.
    pub bullet_radius: f32,
    /// Minimum horizontal distance between a spawn cell and any live tank.
    pub respawn_min_distance: f32,
    /// Lowest grid coordinate considered for enemy placement.
    pub spawn_cell_min: i32,
    /// Highest grid coordinate considered for enemy placement (inclusive).
    pub spawn_cell_max: i32,
    /// Random probes before falling back to an ordered scan.
    pub respawn_max_attempts: u32,
    /// Muzzle flash lifetime in seconds.
    pub muzzle_flash_lifetime: f32,
    /// Explosion lifetime in seconds, multiplied by the explosion scale.
    pub explosion_lifetime: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            map_size: 15,
            player_spawn: Vec3::new(7.0, 7.0, 0.0),
            camera_start: Vec3::new(7.0, 7.0, 15.0),
            player_move_speed: 2.0,
            turn_rate: PI,
            enemy_move_speed: 1.0,
            enemy_fire_interval: 3.0,
            enemy_health: 100,
            enemy_count: 1,
            bullet_speed: 9.0,
            bullet_damage: 20,
            bullet_max_lifetime: None,
            muzzle_distance: 0.45,
            muzzle_height: 0.5,
            tank_collider_scale: 0.75,
            bullet_radius: 0.085,
            respawn_min_distance: 2.0,
            spawn_cell_min: 2,
            spawn_cell_max: 12,
            respawn_max_attempts: 256,
            muzzle_flash_lifetime: 0.15,
            explosion_lifetime: 0.5,
        }
    }
}

impl ArenaConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the JSON is malformed and
    /// [`SimError::InvalidConfig`] if a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.map_size < 3 {
            return Err(SimError::InvalidConfig(format!(
                "map_size must be at least 3, got {}",
                self.map_size
            )));
        }
        if self.spawn_cell_min > self.spawn_cell_max {
            return Err(SimError::InvalidConfig(format!(
                "spawn_cell_min {} exceeds spawn_cell_max {}",
                self.spawn_cell_min, self.spawn_cell_max
            )));
        }
        let positive = [
            ("player_move_speed", self.player_move_speed),
            ("enemy_move_speed", self.enemy_move_speed),
            ("bullet_speed", self.bullet_speed),
            ("tank_collider_scale", self.tank_collider_scale),
            ("bullet_radius", self.bullet_radius),
            ("muzzle_flash_lifetime", self.muzzle_flash_lifetime),
            ("explosion_lifetime", self.explosion_lifetime),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.enemy_health <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "enemy_health must be positive, got {}",
                self.enemy_health
            )));
        }
        if matches!(self.bullet_max_lifetime, Some(t) if t.is_nan() || t <= 0.0) {
            return Err(SimError::InvalidConfig(
                "bullet_max_lifetime must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Index of the last row/column, where the boundary walls sit.
    #[must_use]
    pub fn edge(&self) -> u32 {
        self.map_size - 1
    }
}
