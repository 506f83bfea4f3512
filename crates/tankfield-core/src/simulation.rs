//! Simulation module with the per-tick update loop.
//!
//! The `Simulation` struct orchestrates the Entity-Plugin-Resolver
//! architecture through a deterministic, sequential loop:
//!
//! 1. **ADVANCE**: increment the tick and the simulated clock
//! 2. **UPDATE**: for each entity in registry order that is still live, run
//!    its plugins and resolve their outputs immediately
//! 3. **SWEEP**: remove every flagged entity, detach its representation and
//!    emit a `Disposed` event
//! 4. **LIFECYCLE**: hand the `Disposed` events to the lifecycle policies
//!
//! # Determinism
//!
//! - Entities are iterated in ID order (via `BTreeMap`)
//! - All randomness comes from one `ChaCha8Rng` seeded from the config
//! - Entities spawned during a tick first update on the next one
//!
//! # Example
//!
//! ```
//! use tankfield_core::config::ArenaConfig;
//! use tankfield_core::entity::EntityTag;
//! use tankfield_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(ArenaConfig::default().with_seed(42)).unwrap();
//! sim.populate().unwrap();
//!
//! for _ in 0..10 {
//!     sim.step(1.0 / 60.0);
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.arena().count_live(EntityTag::Enemy), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::assets::{AssetCatalog, AssetLibrary};
use crate::collaborators::{Camera, NullScoreboard, SceneGraph, SceneTree, Scoreboard};
use crate::config::ArenaConfig;
use crate::entity::{Entity, EntityId};
use crate::error::{Result, SimError};
use crate::input::{InputState, Intent};
use crate::output::{Event, EventRecord, OutputEnvelope, PluginInstanceId};
use crate::plugin::{Plugin, PluginContext, PluginRegistry};
use crate::population::{EnemyPopulation, LifecyclePolicy};
use crate::resolver::{apply_damage, default_resolvers, ResolveContext, Resolver};
use crate::spawn::Blueprint;
use crate::world_setup;
use crate::world_view::WorldView;

// =============================================================================
// Simulation
// =============================================================================

/// The world registry and tick orchestrator.
///
/// `Simulation` owns:
/// - The arena (ordered entity store)
/// - Plugin registry, resolvers and lifecycle policies
/// - The seeded RNG
/// - The collaborators: asset catalog, scene graph, scoreboard and camera
/// - The event log
pub struct Simulation {
    arena: Arena,
    config: ArenaConfig,
    rng: ChaCha8Rng,
    plugins: PluginRegistry,
    resolvers: Vec<Box<dyn Resolver>>,
    policies: Vec<Box<dyn LifecyclePolicy>>,
    assets: Box<dyn AssetCatalog>,
    scene: Box<dyn SceneGraph>,
    scoreboard: Box<dyn Scoreboard>,
    camera: Camera,
    events: Vec<EventRecord>,
}

/// Borrows of the simulation fields that a [`ResolveContext`] leaves free.
struct Lanes<'a> {
    resolvers: &'a [Box<dyn Resolver>],
    policies: &'a mut [Box<dyn LifecyclePolicy>],
    rng: &'a mut ChaCha8Rng,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("config", &self.config)
            .field("plugins", &self.plugins)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("policies", &format!("[{} policies]", self.policies.len()))
            .field("camera", &self.camera)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// The simulation starts at tick 0 with an empty arena, the stock
    /// plugins, resolvers and enemy population policy, the standard asset
    /// library, a recording scene tree and a scoreboard that discards
    /// updates. Call [`populate`](Self::populate) to build the map.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the configuration fails
    /// validation.
    ///
    /// # Example
    ///
    /// ```
    /// use tankfield_core::config::ArenaConfig;
    /// use tankfield_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new(ArenaConfig::default()).unwrap();
    /// assert_eq!(sim.tick(), 0);
    /// assert!(sim.arena().is_empty());
    /// ```
    pub fn new(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            arena: Arena::new(config.map_size),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            plugins: PluginRegistry::default_bundles(),
            resolvers: default_resolvers(),
            policies: vec![Box::new(EnemyPopulation::new())],
            assets: Box::new(AssetLibrary::standard()),
            scene: Box::new(SceneTree::new()),
            scoreboard: Box::new(NullScoreboard),
            camera: Camera::new(config.camera_start),
            events: Vec::new(),
            config,
        })
    }

    /// Replaces the asset catalog.
    #[must_use]
    pub fn with_assets(mut self, assets: impl AssetCatalog + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    /// Replaces the scene graph.
    #[must_use]
    pub fn with_scene(mut self, scene: impl SceneGraph + 'static) -> Self {
        self.scene = Box::new(scene);
        self
    }

    /// Replaces the scoreboard.
    #[must_use]
    pub fn with_scoreboard(mut self, scoreboard: impl Scoreboard + 'static) -> Self {
        self.scoreboard = Box::new(scoreboard);
        self
    }

    /// Replaces the plugin registry.
    #[must_use]
    pub fn with_registry(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    /// Builds the map: ground tiles, the player, the initial enemies and the
    /// boundary walls, then publishes the initial score.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`] if a map entity fails to attach and
    /// [`SimError::NoSpawnCell`] if an initial enemy cannot be placed.
    pub fn populate(&mut self) -> Result<EntityId> {
        world_setup::populate(self)
    }

    // =========================================================================
    // Tick Loop
    // =========================================================================

    /// Advances the simulation by one frame of `dt` seconds.
    ///
    /// Each entity live at the start of the update phase runs its plugins
    /// once, in registry order, unless an earlier entity flagged it. Every
    /// output is resolved before the next plugin runs. Flagged entities are
    /// swept at the end; the population policy reacts to the sweep.
    pub fn step(&mut self, dt: f32) {
        self.arena.advance_tick(dt);
        let tick = self.arena.current_tick();
        trace!(tick, dt, "step");

        let ids: Vec<EntityId> = self.arena.entity_ids_sorted().collect();
        for id in ids {
            self.update_entity(id, tick, dt);
        }

        self.sweep(tick);
    }

    /// Runs every plugin registered for `id`'s kind and resolves the outputs.
    fn update_entity(&mut self, id: EntityId, tick: u64, dt: f32) {
        let Some(tag) = self.arena.get(id).filter(|e| !e.is_disposed()).map(Entity::tag) else {
            return;
        };
        let plugins: Vec<Arc<dyn Plugin>> = self.plugins.plugins_for(tag).to_vec();

        for plugin in plugins {
            if !self.arena.is_live(id) {
                break;
            }
            let declaration = plugin.declaration();
            let outputs = {
                let view = WorldView::for_plugin(&self.arena, declaration, tick);
                let mut ctx = PluginContext {
                    entity_id: id,
                    tick,
                    dt,
                    config: &self.config,
                    rng: &mut self.rng,
                };
                plugin.run(&mut ctx, &view)
            };

            let source = PluginInstanceId::new(id, declaration.id.clone());
            for (sequence, output) in outputs.into_iter().enumerate() {
                let sequence = u32::try_from(sequence).unwrap_or(u32::MAX);
                let envelope = OutputEnvelope::new(output, source.clone(), tick, sequence);
                self.resolve(&envelope);
            }
        }
    }

    /// Routes one output to every resolver that handles its kind.
    fn resolve(&mut self, envelope: &OutputEnvelope) {
        let kind = envelope.output().kind();
        let (mut ctx, lanes) = self.split(envelope.tick());
        for resolver in lanes.resolvers.iter().filter(|r| r.handles().contains(&kind)) {
            resolver.resolve(envelope, &mut ctx);
        }
    }

    /// Removes flagged entities and runs the lifecycle policies.
    fn sweep(&mut self, tick: u64) {
        let flagged = self.arena.flagged_ids();
        if flagged.is_empty() {
            return;
        }

        let (mut ctx, lanes) = self.split(tick);
        let mut lifecycle = Vec::with_capacity(flagged.len());
        for id in flagged {
            let Some(entity) = ctx.arena.despawn(id) else {
                continue;
            };
            ctx.scene.detach(id);
            debug!(entity = %id, kind = %entity.tag(), "disposed");
            let event = Event::Disposed {
                id,
                tag: entity.tag(),
                position: entity.position(),
            };
            ctx.record(event.clone());
            lifecycle.push(event);
        }

        for event in &lifecycle {
            for policy in lanes.policies.iter_mut() {
                policy.on_event(event, &mut ctx, &mut *lanes.rng);
            }
        }
    }

    /// Splits the simulation into a resolve context and the fields it does
    /// not borrow.
    fn split(&mut self, tick: u64) -> (ResolveContext<'_>, Lanes<'_>) {
        let ctx = ResolveContext {
            arena: &mut self.arena,
            assets: self.assets.as_ref(),
            scene: self.scene.as_mut(),
            scoreboard: self.scoreboard.as_mut(),
            camera: &mut self.camera,
            config: &self.config,
            events: &mut self.events,
            tick,
        };
        let lanes = Lanes {
            resolvers: &self.resolvers,
            policies: &mut self.policies,
            rng: &mut self.rng,
        };
        (ctx, lanes)
    }

    // =========================================================================
    // Public Operations
    // =========================================================================

    /// Attaches a blueprint and appends the entity to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`] if attaching fails.
    pub fn spawn(&mut self, blueprint: Blueprint) -> Result<EntityId> {
        let tick = self.tick();
        let (mut ctx, _) = self.split(tick);
        ctx.spawn(blueprint)
    }

    /// Deals damage outside of the plugin loop.
    ///
    /// Kinds without health ignore it. A kill flags the enemy, spawns an
    /// explosion and scores for a live player attacker, exactly as a bullet
    /// hit would.
    ///
    /// # Errors
    ///
    /// - [`SimError::UnknownEntity`] if `target` does not exist
    /// - [`SimError::EntityDisposed`] if `target` is already flagged
    /// - [`SimError::NegativeDamage`] if `amount` is below zero
    pub fn damage(
        &mut self,
        target: EntityId,
        amount: i32,
        attacker: Option<EntityId>,
    ) -> Result<()> {
        if amount < 0 {
            return Err(SimError::NegativeDamage(amount));
        }
        let entity = self.arena.get(target).ok_or(SimError::UnknownEntity(target))?;
        if entity.is_disposed() {
            return Err(SimError::EntityDisposed(target));
        }
        let tick = self.tick();
        let (mut ctx, _) = self.split(tick);
        apply_damage(&mut ctx, target, amount, attacker);
        Ok(())
    }

    /// Sets a player's score and forwards it to the scoreboard.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownEntity`] if `player` is not a player.
    pub fn set_score(&mut self, player: EntityId, value: u32) -> Result<()> {
        let tick = self.tick();
        let (mut ctx, _) = self.split(tick);
        ctx.set_score(player, value)
    }

    /// Presses an intent on the player. Returns `true` if anything changed.
    pub fn press(&mut self, intent: Intent) -> bool {
        self.player_input_mut()
            .is_some_and(|input| input.press(intent))
    }

    /// Releases an intent on the player. Returns `true` if it was held.
    pub fn release(&mut self, intent: Intent) -> bool {
        self.player_input_mut()
            .is_some_and(|input| input.release(intent))
    }

    fn player_input_mut(&mut self) -> Option<&mut InputState> {
        let id = self.arena.player_id()?;
        self.arena
            .get_mut(id)?
            .inner_mut()
            .as_player_mut()
            .map(|p| &mut p.input)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns a read-only reference to the arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns a mutable reference to the arena.
    ///
    /// Meant for setup and tests. Entities spawned here bypass the asset
    /// catalog and the scene graph.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Returns the asset catalog.
    #[must_use]
    pub fn assets(&self) -> &dyn AssetCatalog {
        self.assets.as_ref()
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Simulated seconds elapsed.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.arena.elapsed()
    }

    /// The live player, if any.
    #[must_use]
    pub fn player_id(&self) -> Option<EntityId> {
        self.arena.player_id()
    }

    /// The live player's score, if there is a player.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        let id = self.arena.player_id()?;
        self.arena.get(id)?.as_player().map(|p| p.score)
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Takes the recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    /// Returns a mutable reference to the plugin registry.
    #[must_use]
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Appends a resolver. Resolvers run in the order they were added.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Appends a lifecycle policy.
    pub fn add_policy(&mut self, policy: Box<dyn LifecyclePolicy>) {
        self.policies.push(policy);
    }

    /// The arena, config and RNG, borrowed together for placement searches.
    pub(crate) fn placement(&mut self) -> (&Arena, &ArenaConfig, &mut ChaCha8Rng) {
        (&self.arena, &self.config, &mut self.rng)
    }
}

// =============================================================================
// Tests
// =============================================================================
