//! Plugin system for the Entity-Plugin-Resolver architecture.
//!
//! Plugins hold the per-kind behaviour of the arena. A plugin reads from an
//! immutable [`WorldView`] and returns [`Output`]s; the simulation applies
//! them through the resolvers before moving on to the next entity, so each
//! entity sees the effects of the ones updated before it in the same tick.
//!
//! # Plugin Declaration
//!
//! Each plugin declares:
//! - Its unique identifier ([`PluginId`])
//! - Required entity tags (which entity kinds it operates on)
//! - Components it reads (for `WorldView` scoping)
//! - Output kinds it emits
//!
//! # Plugin Registry
//!
//! The [`PluginRegistry`] bundles plugins by entity tag. Kinds with no
//! bundle (walls and tiles in the default registry) simply do nothing on
//! update.
//!
//! # Example
//!
//! ```
//! use tankfield_core::plugin::{
//!     ComponentKind, Plugin, PluginContext, PluginDeclaration, PluginId, PluginRegistry,
//! };
//! use tankfield_core::world_view::WorldView;
//! use tankfield_core::output::{Output, OutputKind};
//! use tankfield_core::entity::EntityTag;
//! use std::sync::Arc;
//!
//! struct Idle {
//!     declaration: PluginDeclaration,
//! }
//!
//! impl Plugin for Idle {
//!     fn declaration(&self) -> &PluginDeclaration {
//!         &self.declaration
//!     }
//!
//!     fn run(&self, _ctx: &mut PluginContext<'_>, _view: &WorldView<'_>) -> Vec<Output> {
//!         vec![]
//!     }
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(
//!     EntityTag::Wall,
//!     Arc::new(Idle {
//!         declaration: PluginDeclaration {
//!             id: PluginId::new("idle"),
//!             required_tags: vec![EntityTag::Wall],
//!             reads: vec![ComponentKind::Transform],
//!             emits: vec![OutputKind::Command],
//!         },
//!     }),
//! );
//!
//! assert_eq!(registry.plugins_for(EntityTag::Wall).len(), 1);
//! assert!(registry.plugins_for(EntityTag::Tile).is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;
use crate::entity::{EntityId, EntityTag};
use crate::output::{Output, OutputKind};
use crate::world_view::WorldView;

pub use crate::output::PluginId;

// =============================================================================
// Component Kind
// =============================================================================

/// Component groups a plugin may read through its [`WorldView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Position and heading.
    Transform,
    /// Bounding volume.
    Collider,
    /// Player intents and queued shots.
    Input,
    /// Fire cooldown, bullet age or effect age.
    Timer,
    /// Bullet owner.
    Ownership,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform => write!(f, "Transform"),
            Self::Collider => write!(f, "Collider"),
            Self::Input => write!(f, "Input"),
            Self::Timer => write!(f, "Timer"),
            Self::Ownership => write!(f, "Ownership"),
        }
    }
}

// =============================================================================
// Plugin Declaration
// =============================================================================

/// Declaration of a plugin's capabilities and requirements.
#[derive(Debug, Clone)]
pub struct PluginDeclaration {
    /// Unique identifier for this plugin.
    pub id: PluginId,
    /// Entity tags this plugin operates on.
    pub required_tags: Vec<EntityTag>,
    /// Component groups this plugin reads.
    /// The `WorldView` will only allow access to these.
    pub reads: Vec<ComponentKind>,
    /// Output kinds this plugin may emit.
    pub emits: Vec<OutputKind>,
}

impl PluginDeclaration {
    /// Checks if this plugin operates on the given entity tag.
    #[must_use]
    pub fn supports_tag(&self, tag: EntityTag) -> bool {
        self.required_tags.contains(&tag)
    }

    /// Checks if this plugin reads the given component kind.
    #[must_use]
    pub fn reads_component(&self, kind: ComponentKind) -> bool {
        self.reads.contains(&kind)
    }

    /// Checks if this plugin emits the given output kind.
    #[must_use]
    pub fn emits_output(&self, kind: OutputKind) -> bool {
        self.emits.contains(&kind)
    }
}

// =============================================================================
// Plugin Context
// =============================================================================

/// Per-run context passed to a plugin.
///
/// The RNG is the simulation's seeded generator; drawing from it is the only
/// source of randomness a plugin may use.
#[derive(Debug)]
pub struct PluginContext<'a> {
    /// The entity this plugin is operating on.
    pub entity_id: EntityId,
    /// The current simulation tick.
    pub tick: u64,
    /// Seconds covered by this tick.
    pub dt: f32,
    /// Simulation tunables.
    pub config: &'a ArenaConfig,
    /// Seeded simulation RNG.
    pub rng: &'a mut ChaCha8Rng,
}

// =============================================================================
// Plugin Trait
// =============================================================================

/// A behaviour attached to every entity of some kind.
///
/// # Implementation Guidelines
///
/// 1. **No side effects**: all effects are expressed through outputs.
/// 2. **Determinism**: randomness only through `ctx.rng`.
/// 3. **Respect declarations**: only read components declared in `reads`.
pub trait Plugin: Send + Sync {
    /// Returns the plugin's declaration.
    fn declaration(&self) -> &PluginDeclaration;

    /// Executes the plugin logic for one entity.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Entity ID, tick, frame delta, config and RNG
    /// * `view` - Immutable view of the arena, scoped to declared components
    ///
    /// # Returns
    ///
    /// Outputs to apply, in order.
    fn run(&self, ctx: &mut PluginContext<'_>, view: &WorldView<'_>) -> Vec<Output>;
}

// =============================================================================
// Plugin Registry
// =============================================================================

/// Registry of plugins organized by entity tag.
#[derive(Default)]
pub struct PluginRegistry {
    bundles: HashMap<EntityTag, Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Registers a plugin for the given entity tag.
    ///
    /// Plugins for the same tag run in registration order.
    pub fn register(&mut self, tag: EntityTag, plugin: Arc<dyn Plugin>) {
        self.bundles.entry(tag).or_default().push(plugin);
    }

    /// Returns the plugins registered for the given entity tag, or an empty
    /// slice if none.
    #[must_use]
    pub fn plugins_for(&self, tag: EntityTag) -> &[Arc<dyn Plugin>] {
        self.bundles.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Returns the total number of plugin registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// Returns true if the registry has no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.values().all(Vec::is_empty)
    }

    /// Creates a registry with the stock behaviours:
    /// - Player: intent-driven driving and firing
    /// - Enemy: wander, re-head when blocked, fire on a cooldown
    /// - Bullet: straight flight and impact
    /// - Effect: ageing and expiry
    ///
    /// Walls and tiles get no plugins.
    ///
    /// ```
    /// use tankfield_core::plugin::PluginRegistry;
    /// use tankfield_core::entity::EntityTag;
    ///
    /// let registry = PluginRegistry::default_bundles();
    /// assert_eq!(registry.plugins_for(EntityTag::Enemy).len(), 1);
    /// assert!(registry.plugins_for(EntityTag::Wall).is_empty());
    /// ```
    #[must_use]
    pub fn default_bundles() -> Self {
        use crate::plugins::{EffectPlugin, EnemyPlugin, PlayerPlugin, ProjectilePlugin};

        let mut registry = Self::new();
        registry.register(EntityTag::Player, Arc::new(PlayerPlugin::new()));
        registry.register(EntityTag::Enemy, Arc::new(EnemyPlugin::new()));
        registry.register(EntityTag::Bullet, Arc::new(ProjectilePlugin::new()));
        registry.register(EntityTag::Effect, Arc::new(EffectPlugin::new()));
        registry
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("bundle_count", &self.bundles.len())
            .field("registration_count", &self.registration_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop {
        declaration: PluginDeclaration,
    }

    impl Plugin for Noop {
        fn declaration(&self) -> &PluginDeclaration {
            &self.declaration
        }

        fn run(&self, _ctx: &mut PluginContext<'_>, _view: &WorldView<'_>) -> Vec<Output> {
            vec![]
        }
    }

    fn noop(name: &str) -> Arc<dyn Plugin> {
        Arc::new(Noop {
            declaration: PluginDeclaration {
                id: PluginId::new(name),
                required_tags: vec![EntityTag::Wall],
                reads: vec![ComponentKind::Transform],
                emits: vec![],
            },
        })
    }

    mod declaration_tests {
        use super::*;

        #[test]
        fn supports_declared_tags_only() {
            let plugin = noop("a");
            assert!(plugin.declaration().supports_tag(EntityTag::Wall));
            assert!(!plugin.declaration().supports_tag(EntityTag::Enemy));
        }

        #[test]
        fn reads_component() {
            let plugin = noop("a");
            assert!(plugin.declaration().reads_component(ComponentKind::Transform));
            assert!(!plugin.declaration().reads_component(ComponentKind::Input));
            assert!(!plugin.declaration().emits_output(OutputKind::Event));
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn new_registry_is_empty() {
            let registry = PluginRegistry::new();
            assert!(registry.is_empty());
            assert_eq!(registry.registration_count(), 0);
        }

        #[test]
        fn registration_order_is_kept() {
            let mut registry = PluginRegistry::new();
            registry.register(EntityTag::Wall, noop("first"));
            registry.register(EntityTag::Wall, noop("second"));
            let names: Vec<_> = registry
                .plugins_for(EntityTag::Wall)
                .iter()
                .map(|p| p.declaration().id.as_str().to_string())
                .collect();
            assert_eq!(names, vec!["first", "second"]);
        }

        #[test]
        fn default_bundles_cover_active_kinds() {
            let registry = PluginRegistry::default_bundles();
            for tag in [
                EntityTag::Player,
                EntityTag::Enemy,
                EntityTag::Bullet,
                EntityTag::Effect,
            ] {
                assert_eq!(registry.plugins_for(tag).len(), 1, "{tag}");
                assert!(registry.plugins_for(tag)[0].declaration().supports_tag(tag));
            }
            assert!(registry.plugins_for(EntityTag::Wall).is_empty());
            assert!(registry.plugins_for(EntityTag::Tile).is_empty());
            assert_eq!(registry.registration_count(), 4);
        }

        #[test]
        fn debug_format() {
            let registry = PluginRegistry::default_bundles();
            let debug = format!("{registry:?}");
            assert!(debug.contains("registration_count"));
        }
    }
}
