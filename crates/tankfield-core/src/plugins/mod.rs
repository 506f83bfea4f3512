//! Stock plugins for the arena.
//!
//! - [`PlayerPlugin`]: intent-driven turning, driving and firing
//! - [`EnemyPlugin`]: wandering, re-heading when blocked, cooldown firing
//! - [`ProjectilePlugin`]: bullet flight and impact
//! - [`EffectPlugin`]: muzzle flash and explosion expiry
//!
//! # Architecture
//!
//! Plugins follow the Entity-Plugin-Resolver pattern:
//! - Plugins read from an immutable [`WorldView`](crate::world_view::WorldView)
//! - Plugins emit [`Output`](crate::output::Output)s describing state changes
//! - Resolvers apply those outputs before the next entity updates
//!
//! # Registration
//!
//! Use [`PluginRegistry::default_bundles()`](crate::plugin::PluginRegistry::default_bundles)
//! to create a registry with every stock plugin registered for its kind.

mod effect;
mod enemy;
mod player;
mod projectile;

pub use effect::EffectPlugin;
pub use enemy::EnemyPlugin;
pub use player::PlayerPlugin;
pub use projectile::ProjectilePlugin;
