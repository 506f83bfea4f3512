//! Test helper functions for setting up simulations and entities.
//!
//! This module provides factory functions and setup utilities that make
//! writing tests more ergonomic and consistent.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::arena::Arena;
use crate::assets::AssetLibrary;
use crate::collaborators::{Camera, SceneTree, SharedScoreboard};
use crate::config::ArenaConfig;
use crate::entity::{EffectKind, EntityId, EntityTag, Movable};
use crate::input::{InputState, Intent};
use crate::output::{EventRecord, Output, OutputEnvelope, PluginId, PluginInstanceId};
use crate::plugin::{Plugin, PluginContext};
use crate::resolver::{ResolveContext, Resolver};
use crate::simulation::Simulation;
use crate::spawn::{Attached, Blueprint};
use crate::world_view::WorldView;

/// Frame length used by the scenario tests.
pub const FRAME: f32 = 1.0 / 60.0;

/// Float comparison with a tolerance suited to a few frames of motion.
#[must_use]
pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// =============================================================================
// Entity Factory Functions
// =============================================================================

/// Attaches `blueprint` with the standard assets and inserts it directly.
///
/// # Panics
///
/// Panics if the standard library lacks an asset the blueprint needs.
pub fn spawn_blueprint(arena: &mut Arena, blueprint: Blueprint) -> EntityId {
    let Attached {
        inner,
        representation,
    } = blueprint
        .attach(&AssetLibrary::standard(), &ArenaConfig::default())
        .expect("standard assets cover every blueprint");
    arena.spawn(inner, representation)
}

/// Spawns the player tank at `position`, heading 0.
pub fn spawn_player(arena: &mut Arena, position: Vec3) -> EntityId {
    spawn_blueprint(
        arena,
        Blueprint::Player {
            position,
            heading: 0.0,
        },
    )
}

/// Spawns an enemy tank.
pub fn spawn_enemy(arena: &mut Arena, position: Vec3, heading: f32) -> EntityId {
    spawn_blueprint(arena, Blueprint::Enemy { position, heading })
}

/// Spawns a wall block on `cell`.
pub fn spawn_wall(arena: &mut Arena, cell: Vec3) -> EntityId {
    spawn_blueprint(arena, Blueprint::Wall { cell })
}

/// Spawns a bullet as if `owner` had just fired it.
pub fn spawn_bullet(
    arena: &mut Arena,
    position: Vec3,
    heading: f32,
    owner: EntityId,
    owner_tag: EntityTag,
) -> EntityId {
    spawn_blueprint(
        arena,
        Blueprint::Bullet {
            position,
            heading,
            owner,
            owner_tag,
        },
    )
}

/// Spawns an effect at a fixed spot in the middle of the map.
pub fn spawn_effect(arena: &mut Arena, kind: EffectKind, scale: f32) -> EntityId {
    spawn_blueprint(
        arena,
        Blueprint::Effect {
            kind,
            position: Vec3::new(5.0, 5.0, 0.5),
            heading: 0.0,
            scale,
        },
    )
}

// =============================================================================
// Plugin Runners
// =============================================================================

/// Runs one plugin for one entity with the default config and seed 0.
pub fn run_plugin(plugin: &dyn Plugin, arena: &Arena, entity: EntityId, dt: f32) -> Vec<Output> {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    run_plugin_full(plugin, arena, entity, dt, &ArenaConfig::default(), &mut rng)
}

/// Runs one plugin with a caller-supplied RNG.
pub fn run_plugin_with_rng(
    plugin: &dyn Plugin,
    arena: &Arena,
    entity: EntityId,
    dt: f32,
    rng: &mut ChaCha8Rng,
) -> Vec<Output> {
    run_plugin_full(plugin, arena, entity, dt, &ArenaConfig::default(), rng)
}

/// Runs one plugin with a caller-supplied config.
pub fn run_plugin_with_config(
    plugin: &dyn Plugin,
    arena: &Arena,
    entity: EntityId,
    dt: f32,
    config: &ArenaConfig,
) -> Vec<Output> {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    run_plugin_full(plugin, arena, entity, dt, config, &mut rng)
}

fn run_plugin_full(
    plugin: &dyn Plugin,
    arena: &Arena,
    entity: EntityId,
    dt: f32,
    config: &ArenaConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<Output> {
    let tick = arena.current_tick();
    let view = WorldView::for_plugin(arena, plugin.declaration(), tick);
    let mut ctx = PluginContext {
        entity_id: entity,
        tick,
        dt,
        config,
        rng,
    };
    plugin.run(&mut ctx, &view)
}

// =============================================================================
// Resolver Fixture
// =============================================================================

/// Owns everything a [`ResolveContext`] borrows, for driving resolvers
/// without a simulation.
pub struct ResolveFixture {
    /// Entity store, 15×15.
    pub arena: Arena,
    /// Standard asset library.
    pub assets: AssetLibrary,
    /// Recording scene graph.
    pub scene: SceneTree,
    /// Recording scoreboard.
    pub scoreboard: SharedScoreboard,
    /// Camera at the configured start.
    pub camera: Camera,
    /// Default config.
    pub config: ArenaConfig,
    /// Event log.
    pub events: Vec<EventRecord>,
    /// Tick stamped on events and envelopes.
    pub tick: u64,
}

impl ResolveFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        let config = ArenaConfig::default();
        Self {
            arena: Arena::new(config.map_size),
            assets: AssetLibrary::standard(),
            scene: SceneTree::new(),
            scoreboard: SharedScoreboard::new(),
            camera: Camera::new(config.camera_start),
            config,
            events: Vec::new(),
            tick: 0,
        }
    }

    /// Borrows the fixture as a resolve context.
    pub fn ctx(&mut self) -> ResolveContext<'_> {
        ResolveContext {
            arena: &mut self.arena,
            assets: &self.assets,
            scene: &mut self.scene,
            scoreboard: &mut self.scoreboard,
            camera: &mut self.camera,
            config: &self.config,
            events: &mut self.events,
            tick: self.tick,
        }
    }

    /// Spawns the player through the context.
    pub fn spawn_player(&mut self, position: Vec3) -> EntityId {
        self.ctx()
            .spawn(Blueprint::Player {
                position,
                heading: 0.0,
            })
            .unwrap()
    }

    /// Spawns an enemy through the context.
    pub fn spawn_enemy(&mut self, position: Vec3, heading: f32) -> EntityId {
        self.ctx()
            .spawn(Blueprint::Enemy { position, heading })
            .unwrap()
    }

    /// Spawns a wall through the context.
    pub fn spawn_wall(&mut self, cell: Vec3) -> EntityId {
        self.ctx().spawn(Blueprint::Wall { cell }).unwrap()
    }

    /// The player's score.
    #[must_use]
    pub fn score(&self, player: EntityId) -> u32 {
        self.arena
            .get(player)
            .and_then(|e| e.as_player())
            .map(|p| p.score)
            .unwrap()
    }

    /// The player's input state.
    pub fn input(&mut self, player: EntityId) -> &mut InputState {
        self.arena
            .get_mut(player)
            .and_then(|e| e.inner_mut().as_player_mut())
            .map(|p| &mut p.input)
            .unwrap()
    }

    /// Resolves one output with `resolver`, as if a plugin had emitted it.
    pub fn resolve(&mut self, resolver: &dyn Resolver, output: impl Into<Output>) {
        let source = PluginInstanceId::new(EntityId::new(0), PluginId::from_static("fixture"));
        let envelope = OutputEnvelope::new(output.into(), source, self.tick, 0);
        resolver.resolve(&envelope, &mut self.ctx());
    }
}

impl Default for ResolveFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Simulation Setup
// =============================================================================

/// An empty simulation with the default config.
#[must_use]
pub fn bare_simulation() -> Simulation {
    Simulation::new(ArenaConfig::default()).unwrap()
}

/// A fully populated simulation.
#[must_use]
pub fn populated(seed: u64) -> Simulation {
    let mut sim = Simulation::new(ArenaConfig::default().with_seed(seed)).unwrap();
    sim.populate().unwrap();
    sim
}

/// Steps `ticks` frames of [`FRAME`] seconds.
pub fn run_ticks(sim: &mut Simulation, ticks: u32) {
    for _ in 0..ticks {
        sim.step(FRAME);
    }
}

/// A scripted input change applied before a given tick.
#[derive(Debug, Clone, Copy)]
pub enum ScriptStep {
    /// Press an intent.
    Press(Intent),
    /// Release an intent.
    Release(Intent),
}

/// Runs `ticks` frames, applying `(tick, step)` pairs before the frame with
/// that index.
pub fn run_script(sim: &mut Simulation, ticks: u32, script: &[(u32, ScriptStep)]) {
    for tick in 0..ticks {
        for (_, step) in script.iter().filter(|(at, _)| *at == tick) {
            match *step {
                ScriptStep::Press(intent) => sim.press(intent),
                ScriptStep::Release(intent) => sim.release(intent),
            };
        }
        sim.step(FRAME);
    }
}

/// Position of a live entity.
pub fn position_of(sim: &Simulation, id: EntityId) -> Vec3 {
    sim.arena().get(id).unwrap().position()
}

/// Health of an enemy.
pub fn health_of(sim: &Simulation, enemy: EntityId) -> i32 {
    sim.arena()
        .get(enemy)
        .and_then(|e| e.as_enemy())
        .map(|c| c.health)
        .unwrap()
}

/// Moves an entity without going through a resolver.
pub fn place(sim: &mut Simulation, id: EntityId, position: Vec3) {
    let entity = sim.arena_mut().get_mut(id).unwrap();
    let delta = position - entity.position();
    entity.inner_mut().as_movable_mut().unwrap().translate(delta);
}
