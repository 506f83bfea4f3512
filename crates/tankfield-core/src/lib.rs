//! # Tankfield Core
//!
//! Deterministic simulation core for Tankfield, a top-down tank arena.
//!
//! A player tank drives around a walled square grid and shoots at enemy
//! tanks that wander, bounce off obstacles and fire back. Destroyed enemies
//! are replaced on a free cell so the enemy count stays constant.
//!
//! ## Architecture
//!
//! The crate follows the Entity-Plugin-Resolver pattern:
//!
//! - **Entities**: player, enemies, bullets, walls, ground tiles, effects
//! - **Plugins**: per-kind update logic that reads a scoped [`WorldView`]
//!   and emits outputs
//! - **Resolvers**: physics, spawning, combat and event logging, applied
//!   immediately after each plugin runs
//!
//! Rendering, input devices and the score display are collaborators behind
//! traits ([`collaborators::SceneGraph`], [`collaborators::Scoreboard`]).
//!
//! ## Usage
//!
//! ```
//! use tankfield_core::{ArenaConfig, Intent, Simulation};
//!
//! let mut sim = Simulation::new(ArenaConfig::default().with_seed(7)).unwrap();
//! sim.populate().unwrap();
//!
//! sim.press(Intent::MoveForward);
//! for _ in 0..30 {
//!     sim.step(1.0 / 60.0);
//! }
//! assert_eq!(sim.score(), Some(0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod assets;
pub mod collaborators;
pub mod collider;
pub mod config;
pub mod entity;
pub mod error;
pub mod input;
pub mod output;
pub mod plugin;
pub mod plugins;
pub mod population;
pub mod resolver;
pub mod simulation;
pub mod spawn;
pub mod world_setup;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use config::ArenaConfig;
pub use entity::{Entity, EntityId, EntityTag};
pub use error::{Result, SimError};
pub use input::Intent;
pub use simulation::Simulation;
pub use spawn::Blueprint;
pub use world_view::WorldView;
