//! Resolver module for the Entity-Plugin-Resolver architecture.
//!
//! Resolvers turn plugin outputs into state changes. The simulation routes
//! every output to the resolvers whose [`Resolver::handles()`] lists its
//! kind, immediately after the plugin that produced it returns. Later
//! entities in the same tick therefore see the result.
//!
//! # Invariants
//!
//! - Outputs targeting an entity flagged for disposal are ignored
//! - Resolvers MUST be deterministic given the same inputs and output order
//! - Every entity insertion goes through [`ResolveContext::spawn`], so the
//!   arena only ever holds attached entities
//!
//! # Available Resolvers
//!
//! - [`PhysicsResolver`]: heading, translation and timer commands
//! - [`SpawnResolver`]: firing and effect spawning
//! - [`CombatResolver`]: damage, kills, scoring and disposal flags
//! - [`EventResolver`]: records plugin events in the event log

mod combat;
mod event;
mod physics;
mod spawn;

pub use combat::CombatResolver;
pub use event::EventResolver;
pub use physics::PhysicsResolver;
pub use spawn::{muzzle_point, SpawnResolver};

pub(crate) use combat::apply_damage;

use tracing::{debug, info};

use crate::arena::Arena;
use crate::assets::AssetCatalog;
use crate::collaborators::{Camera, SceneGraph, Scoreboard};
use crate::config::ArenaConfig;
use crate::entity::EntityId;
use crate::error::{Result, SimError};
use crate::output::{Event, EventRecord, OutputEnvelope, OutputKind};
use crate::spawn::{Attached, Blueprint};

// =============================================================================
// Resolve Context
// =============================================================================

/// Mutable access to everything a resolver may change.
///
/// Built by the simulation from disjoint borrows of its own fields.
pub struct ResolveContext<'a> {
    /// The entity store.
    pub arena: &'a mut Arena,
    /// Asset lookups for attaching new entities.
    pub assets: &'a dyn AssetCatalog,
    /// Representation sink.
    pub scene: &'a mut dyn SceneGraph,
    /// Score sink.
    pub scoreboard: &'a mut dyn Scoreboard,
    /// Overhead camera.
    pub camera: &'a mut Camera,
    /// Simulation tunables.
    pub config: &'a ArenaConfig,
    /// Event log.
    pub events: &'a mut Vec<EventRecord>,
    /// Tick being resolved.
    pub tick: u64,
}

impl ResolveContext<'_> {
    /// Attaches a blueprint and inserts the result.
    ///
    /// The new entity is visible to collision queries at once and gets its
    /// representation attached to the scene graph.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`] if attaching fails. Nothing is
    /// inserted in that case.
    pub fn spawn(&mut self, blueprint: Blueprint) -> Result<EntityId> {
        let Attached {
            inner,
            representation,
        } = blueprint.attach(self.assets, self.config)?;
        let id = self.arena.spawn(inner, representation);
        if let Some(entity) = self.arena.get(id) {
            self.scene
                .attach(id, entity.representation(), entity.position(), entity.heading());
            debug!(entity = %id, kind = %entity.tag(), "spawned");
        }
        Ok(id)
    }

    /// Sets a player's score and forwards it to the scoreboard.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownEntity`] if `player` is not a player in
    /// the arena.
    pub fn set_score(&mut self, player: EntityId, value: u32) -> Result<()> {
        let components = self
            .arena
            .get_mut(player)
            .and_then(|e| e.inner_mut().as_player_mut())
            .ok_or(SimError::UnknownEntity(player))?;
        components.score = value;
        self.scoreboard.set_score(value);
        info!(player = %player, score = value, "score changed");
        self.record(Event::ScoreChanged {
            player,
            score: value,
        });
        Ok(())
    }

    /// Appends an event to the log, stamped with the current tick.
    pub fn record(&mut self, event: Event) {
        debug!(tick = self.tick, ?event, "event");
        self.events.push(EventRecord {
            tick: self.tick,
            event,
        });
    }
}

// =============================================================================
// Resolver Trait
// =============================================================================

/// Applies outputs to the arena and its collaborators.
///
/// # Implementation Guidelines
///
/// 1. **Determinism**: given the same arena and output order, produce the
///    same result.
/// 2. **Skip the flagged**: flagged entities are not updated again.
/// 3. **Ignore what you don't handle**: several resolvers may share an
///    output kind; each matches only the variants it owns.
///
/// # Example
///
/// ```
/// use tankfield_core::resolver::{ResolveContext, Resolver};
/// use tankfield_core::output::{OutputEnvelope, OutputKind};
///
/// struct Quiet;
///
/// impl Resolver for Quiet {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Event]
///     }
///
///     fn resolve(&self, _envelope: &OutputEnvelope, _ctx: &mut ResolveContext<'_>) {}
/// }
///
/// assert_eq!(Quiet.handles(), &[OutputKind::Event]);
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the output kinds this resolver handles.
    fn handles(&self) -> &[OutputKind];

    /// Applies one output.
    ///
    /// # Arguments
    ///
    /// * `envelope` - The output with its provenance
    /// * `ctx` - Arena, collaborators and event log
    fn resolve(&self, envelope: &OutputEnvelope, ctx: &mut ResolveContext<'_>);
}

/// The stock resolver set, in routing order.
#[must_use]
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(PhysicsResolver::new()),
        Box::new(SpawnResolver::new()),
        Box::new(CombatResolver::new()),
        Box::new(EventResolver::new()),
    ]
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::entity::{EffectKind, EntityTag};
    use crate::tests::ResolveFixture;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn default_resolvers_cover_every_kind() {
        let resolvers = default_resolvers();
        for kind in [OutputKind::Command, OutputKind::Modifier, OutputKind::Event] {
            assert!(resolvers.iter().any(|r| r.handles().contains(&kind)), "{kind}");
        }
    }

    mod context_tests {
        use super::*;

        #[test]
        fn spawn_attaches_to_scene() {
            let mut fixture = ResolveFixture::new();
            let id = fixture
                .ctx()
                .spawn(Blueprint::Wall {
                    cell: Vec3::new(0.0, 3.0, 0.0),
                })
                .unwrap();
            assert!(fixture.arena.is_live(id));
            assert_eq!(
                fixture.scene.node(id).map(|n| n.position),
                Some(Vec3::new(0.0, 3.0, 0.0))
            );
        }

        #[test]
        fn failed_spawn_inserts_nothing() {
            let mut fixture = ResolveFixture::new();
            fixture.assets.remove_texture("explosion");
            let result = fixture.ctx().spawn(Blueprint::Effect {
                kind: EffectKind::Explosion,
                position: Vec3::ZERO,
                heading: 0.0,
                scale: 1.0,
            });
            assert!(matches!(result, Err(SimError::MissingAsset { .. })));
            assert!(fixture.arena.is_empty());
            assert!(fixture.scene.is_empty());
        }

        #[test]
        fn set_score_updates_player_and_scoreboard() {
            let mut fixture = ResolveFixture::new();
            let player = fixture.spawn_player(Vec3::new(7.0, 7.0, 0.0));
            fixture.ctx().set_score(player, 3).unwrap();
            assert_eq!(fixture.score(player), 3);
            assert_eq!(fixture.scoreboard.last(), Some(3));
            assert_eq!(
                fixture.events.last().map(|r| &r.event),
                Some(&Event::ScoreChanged { player, score: 3 })
            );
        }

        #[test]
        fn set_score_rejects_non_player() {
            let mut fixture = ResolveFixture::new();
            let enemy = fixture.spawn_enemy(Vec3::new(3.0, 3.0, 0.0), 0.0);
            assert!(matches!(
                fixture.ctx().set_score(enemy, 1),
                Err(SimError::UnknownEntity(id)) if id == enemy
            ));
            assert_eq!(fixture.scoreboard.updates(), 0);
        }

        #[test]
        fn record_stamps_tick() {
            let mut fixture = ResolveFixture::new();
            fixture.tick = 12;
            fixture.ctx().record(Event::RespawnSkipped { attempts: 4 });
            assert_eq!(fixture.events[0].tick, 12);
            assert!(fixture
                .arena
                .live_with_tag(EntityTag::Enemy)
                .next()
                .is_none());
        }
    }
}
