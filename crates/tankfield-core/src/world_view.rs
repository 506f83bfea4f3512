//! `WorldView` provides scoped, read-only access to arena state for plugins.
//!
//! The [`WorldView`] is how plugins read game state. It enforces
//! component-level access control based on what the plugin declared in its
//! [`PluginDeclaration`](crate::plugin::PluginDeclaration):
//! - In debug builds, accessing an undeclared component panics
//! - In release builds, it returns `None`
//!
//! Collision queries are always allowed since they return only entity IDs.
//! Like the arena they are built on, they skip entities flagged for
//! disposal.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use tankfield_core::arena::Arena;
//! use tankfield_core::assets::Representation;
//! use tankfield_core::collider::Collider;
//! use tankfield_core::entity::{EntityInner, EntityTag, TransformState, WallComponents};
//! use tankfield_core::output::OutputKind;
//! use tankfield_core::plugin::{ComponentKind, PluginDeclaration, PluginId};
//! use tankfield_core::world_view::WorldView;
//!
//! let mut arena = Arena::new(15);
//! let cell = Vec3::new(3.0, 0.0, 0.0);
//! let wall = arena.spawn(
//!     EntityInner::Wall(WallComponents {
//!         transform: TransformState::new(cell, 0.0),
//!         collider: Collider::unit_cell(cell),
//!     }),
//!     Representation::Textured { texture: "wall".into(), scale: 1.0 },
//! );
//!
//! let decl = PluginDeclaration {
//!     id: PluginId::new("probe"),
//!     required_tags: vec![EntityTag::Enemy],
//!     reads: vec![ComponentKind::Transform],
//!     emits: vec![OutputKind::Command],
//! };
//! let view = WorldView::for_plugin(&arena, &decl, arena.current_tick());
//!
//! assert_eq!(view.get_transform(wall).unwrap().position, cell);
//! ```

use crate::arena::Arena;
use crate::collider::Collider;
use crate::entity::{Entity, EntityId, EntityInner, EntityTag, TransformState};
use crate::input::InputState;
use crate::plugin::{ComponentKind, PluginDeclaration};

/// A running clock read through the `Timer` component group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    /// Seconds accumulated so far.
    pub elapsed: f32,
    /// Expiry, for kinds that carry their own (effects).
    pub lifetime: Option<f32>,
}

/// Bullet ownership read through the `Ownership` component group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    /// The tank that fired.
    pub owner: EntityId,
    /// The kind of that tank.
    pub owner_tag: EntityTag,
}

// =============================================================================
// WorldView
// =============================================================================

/// Scoped, read-only view of the arena for plugin access.
///
/// `get_entity()` is always allowed so that plugins can inspect IDs and
/// tags regardless of which components they read.
#[derive(Debug)]
pub struct WorldView<'a> {
    arena: &'a Arena,
    tick: u64,
    allowed_components: &'a [ComponentKind],
}

impl<'a> WorldView<'a> {
    /// Creates a `WorldView` scoped to a plugin's declared component access.
    ///
    /// # Arguments
    ///
    /// * `arena` - The arena to view
    /// * `decl` - The plugin declaration (determines allowed components)
    /// * `tick` - The current simulation tick
    #[must_use]
    pub fn for_plugin(arena: &'a Arena, decl: &'a PluginDeclaration, tick: u64) -> Self {
        Self {
            arena,
            tick,
            allowed_components: &decl.reads,
        }
    }

    /// Creates a `WorldView` with full access to all components.
    ///
    /// Meant for tests and system-level code.
    #[must_use]
    pub fn full_access(arena: &'a Arena, tick: u64) -> Self {
        static ALL_COMPONENTS: &[ComponentKind] = &[
            ComponentKind::Transform,
            ComponentKind::Collider,
            ComponentKind::Input,
            ComponentKind::Timer,
            ComponentKind::Ownership,
        ];

        Self {
            arena,
            tick,
            allowed_components: ALL_COMPONENTS,
        }
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn map_size(&self) -> u32 {
        self.arena.map_size()
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.arena.get(id)
    }

    /// Returns `true` if the entity exists and is not flagged for disposal.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.arena.is_live(id)
    }

    /// Returns an entity's transform.
    ///
    /// Requires `ComponentKind::Transform`.
    #[must_use]
    pub fn get_transform(&self, id: EntityId) -> Option<&'a TransformState> {
        self.check_access(ComponentKind::Transform)?;
        self.arena.get(id).map(|e| e.inner().transform())
    }

    /// Returns an entity's collider, if its kind has one.
    ///
    /// Requires `ComponentKind::Collider`.
    #[must_use]
    pub fn get_collider(&self, id: EntityId) -> Option<&'a Collider> {
        self.check_access(ComponentKind::Collider)?;
        self.arena.get(id)?.collider()
    }

    /// Returns the player's input state.
    ///
    /// Requires `ComponentKind::Input`.
    #[must_use]
    pub fn get_input(&self, id: EntityId) -> Option<&'a InputState> {
        self.check_access(ComponentKind::Input)?;
        self.arena.get(id)?.as_player().map(|c| &c.input)
    }

    /// Returns an entity's timer: the fire cooldown for enemies, the age for
    /// bullets and effects.
    ///
    /// Requires `ComponentKind::Timer`.
    #[must_use]
    pub fn get_timer(&self, id: EntityId) -> Option<Timer> {
        self.check_access(ComponentKind::Timer)?;
        match self.arena.get(id)?.inner() {
            EntityInner::Enemy(c) => Some(Timer {
                elapsed: c.fire_cooldown_elapsed,
                lifetime: None,
            }),
            EntityInner::Bullet(c) => Some(Timer {
                elapsed: c.age,
                lifetime: None,
            }),
            EntityInner::Effect(c) => Some(Timer {
                elapsed: c.age,
                lifetime: Some(c.lifetime),
            }),
            EntityInner::Player(_) | EntityInner::Wall(_) | EntityInner::Tile(_) => None,
        }
    }

    /// Returns a bullet's owner.
    ///
    /// Requires `ComponentKind::Ownership`.
    #[must_use]
    pub fn get_ownership(&self, id: EntityId) -> Option<Ownership> {
        self.check_access(ComponentKind::Ownership)?;
        self.arena.get(id)?.as_bullet().map(|c| Ownership {
            owner: c.owner,
            owner_tag: c.owner_tag,
        })
    }

    /// Live entities whose collider intersects `probe`, in registry order.
    ///
    /// `include` filters candidates; entities without colliders never match.
    pub fn intersecting<F>(&self, probe: &Collider, include: F) -> Vec<EntityId>
    where
        F: Fn(&Entity) -> bool,
    {
        self.arena.intersecting(probe, include)
    }

    /// Returns `true` if any live entity accepted by `include` intersects
    /// `probe`.
    pub fn any_intersecting<F>(&self, probe: &Collider, include: F) -> bool
    where
        F: Fn(&Entity) -> bool,
    {
        self.arena
            .live_entities()
            .filter(|e| include(e))
            .any(|e| e.collider().is_some_and(|c| c.intersects(probe)))
    }

    /// Checks if access to a component kind is allowed.
    ///
    /// In debug builds, panics if access is denied.
    /// In release builds, returns `None` if access is denied.
    #[allow(clippy::unnecessary_wraps)]
    fn check_access(&self, kind: ComponentKind) -> Option<()> {
        if self.allowed_components.contains(&kind) {
            Some(())
        } else {
            #[cfg(debug_assertions)]
            panic!(
                "WorldView access denied: plugin tried to access {:?} but only declared: {:?}",
                kind, self.allowed_components
            );

            #[cfg(not(debug_assertions))]
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
