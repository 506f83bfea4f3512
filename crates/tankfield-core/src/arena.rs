//! Arena module for the tank simulation.
//!
//! The Arena is the authoritative container for every entity. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Collision queries over live colliders
//! - Tick and elapsed-time tracking
//!
//! # Ordering
//!
//! Entity IDs are handed out monotonically, and the `BTreeMap`'s natural
//! ordering makes "registry order" the same as spawn order. Every query in
//! this module returns ids in that order.
//!
//! # Liveness
//!
//! An entity flagged for disposal stays in the map until the end-of-tick
//! sweep, but it is no longer *live*: collision queries skip it and the
//! simulation does not update it again.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use tankfield_core::arena::Arena;
//! use tankfield_core::assets::Representation;
//! use tankfield_core::collider::Collider;
//! use tankfield_core::entity::{EntityInner, TransformState, WallComponents};
//!
//! let mut arena = Arena::new(15);
//! let cell = Vec3::new(0.0, 4.0, 0.0);
//! let wall = arena.spawn(
//!     EntityInner::Wall(WallComponents {
//!         transform: TransformState::new(cell, 0.0),
//!         collider: Collider::unit_cell(cell),
//!     }),
//!     Representation::Textured { texture: "wall".into(), scale: 1.0 },
//! );
//!
//! let probe = Collider::sphere(Vec3::new(0.8, 4.0, 0.35), 0.45);
//! assert_eq!(arena.intersecting(&probe, |_| true), vec![wall]);
//! ```

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::Representation;
use crate::collider::Collider;
use crate::entity::{Entity, EntityId, EntityInner, EntityTag};

// =============================================================================
// Arena
// =============================================================================

/// Entity store for one arena simulation.
///
/// # Determinism
///
/// The Arena uses `BTreeMap` for entity storage so that iteration order is
/// identical across runs and platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Side length of the square grid, fixed at creation.
    map_size: u32,
    /// Current simulation tick.
    tick: u64,
    /// Simulated seconds since the first tick.
    elapsed: f64,
}

impl Arena {
    /// Creates a new empty arena for a `map_size × map_size` grid.
    ///
    /// The arena starts at tick 0 with no entities.
    #[must_use]
    pub fn new(map_size: u32) -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            map_size,
            tick: 0,
            elapsed: 0.0,
        }
    }

    /// Inserts an attached entity.
    ///
    /// # Arguments
    ///
    /// * `inner` - The entity's component storage
    /// * `representation` - The representation produced by the attach phase
    ///
    /// # Returns
    ///
    /// The unique ID assigned to the new entity.
    pub fn spawn(&mut self, inner: EntityInner, representation: Representation) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities
            .insert(id, Entity::new(id, inner, representation));
        id
    }

    /// Removes an entity from the arena.
    ///
    /// # Returns
    ///
    /// The removed entity, if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if the entity exists and is not flagged for disposal.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(|e| !e.is_disposed())
    }

    /// Returns an iterator over entity IDs in registry order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over live entities in registry order.
    pub fn live_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values().filter(|e| !e.is_disposed())
    }

    /// Returns an iterator over live entities of one kind.
    pub fn live_with_tag(&self, tag: EntityTag) -> impl Iterator<Item = &Entity> + '_ {
        self.live_entities().filter(move |e| e.tag() == tag)
    }

    /// Counts live entities of one kind.
    #[must_use]
    pub fn count_live(&self, tag: EntityTag) -> usize {
        self.live_with_tag(tag).count()
    }

    /// Returns the first live player, if any.
    #[must_use]
    pub fn player_id(&self) -> Option<EntityId> {
        self.live_with_tag(EntityTag::Player).next().map(Entity::id)
    }

    /// Positions of every live tank, player and enemies alike.
    #[must_use]
    pub fn live_tank_positions(&self) -> Vec<Vec3> {
        self.live_entities()
            .filter(|e| e.tag().is_tank())
            .map(Entity::position)
            .collect()
    }

    /// IDs flagged for disposal, in registry order.
    #[must_use]
    pub fn flagged_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.is_disposed())
            .map(Entity::id)
            .collect()
    }

    /// Finds live entities whose collider intersects `probe`.
    ///
    /// Entities without a collider never match. `include` filters candidates
    /// before the intersection test.
    ///
    /// # Returns
    ///
    /// Matching IDs in registry order.
    pub fn intersecting<F>(&self, probe: &Collider, include: F) -> Vec<EntityId>
    where
        F: Fn(&Entity) -> bool,
    {
        self.live_entities()
            .filter(|e| include(e))
            .filter(|e| e.collider().is_some_and(|c| c.intersects(probe)))
            .map(Entity::id)
            .collect()
    }

    /// Returns the number of entities in the arena, flagged ones included.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn map_size(&self) -> u32 {
        self.map_size
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds elapsed.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances the tick counter and the simulated clock by `dt` seconds.
    pub fn advance_tick(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed += f64::from(dt);
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(15)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyComponents, TileComponents, TransformState, WallComponents};

    fn wall(cell: Vec3) -> EntityInner {
        EntityInner::Wall(WallComponents {
            transform: TransformState::new(cell, 0.0),
            collider: Collider::unit_cell(cell),
        })
    }

    fn enemy(position: Vec3) -> EntityInner {
        EntityInner::Enemy(EnemyComponents {
            transform: TransformState::new(position, 0.0),
            collider: Collider::sphere(position + Vec3::new(0.0, 0.0, 0.35), 0.45),
            health: 100,
            fire_cooldown_elapsed: 0.0,
        })
    }

    fn tile(cell: Vec3) -> EntityInner {
        EntityInner::Tile(TileComponents {
            transform: TransformState::new(cell, 0.0),
            ground: 0,
        })
    }

    fn rep() -> Representation {
        Representation::Sphere { radius: 0.1 }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_arena_is_empty() {
            let arena = Arena::new(15);
            assert!(arena.is_empty());
            assert_eq!(arena.current_tick(), 0);
            assert_eq!(arena.map_size(), 15);
        }

        #[test]
        fn spawn_assigns_increasing_ids() {
            let mut arena = Arena::new(15);
            let a = arena.spawn(wall(Vec3::ZERO), rep());
            let b = arena.spawn(wall(Vec3::X), rep());
            assert!(a < b);
            let ids: Vec<_> = arena.entity_ids_sorted().collect();
            assert_eq!(ids, vec![a, b]);
        }

        #[test]
        fn despawn_removes_entity() {
            let mut arena = Arena::new(15);
            let id = arena.spawn(wall(Vec3::ZERO), rep());
            assert!(arena.despawn(id).is_some());
            assert!(arena.get(id).is_none());
            assert!(arena.despawn(id).is_none());
        }

        #[test]
        fn ids_not_reused_after_despawn() {
            let mut arena = Arena::new(15);
            let a = arena.spawn(wall(Vec3::ZERO), rep());
            arena.despawn(a);
            let b = arena.spawn(wall(Vec3::ZERO), rep());
            assert_ne!(a, b);
        }

        #[test]
        fn advance_tick_accumulates_time() {
            let mut arena = Arena::new(15);
            arena.advance_tick(0.5);
            arena.advance_tick(0.25);
            assert_eq!(arena.current_tick(), 2);
            assert!((arena.elapsed() - 0.75).abs() < 1e-9);
        }
    }

    mod liveness_tests {
        use super::*;

        #[test]
        fn flagged_entities_are_not_live() {
            let mut arena = Arena::new(15);
            let id = arena.spawn(enemy(Vec3::new(5.0, 5.0, 0.0)), rep());
            assert!(arena.is_live(id));
            arena.get_mut(id).map(Entity::mark_for_disposal);
            assert!(!arena.is_live(id));
            assert_eq!(arena.flagged_ids(), vec![id]);
            assert_eq!(arena.count_live(EntityTag::Enemy), 0);
        }

        #[test]
        fn live_tank_positions_skip_walls() {
            let mut arena = Arena::new(15);
            arena.spawn(wall(Vec3::ZERO), rep());
            arena.spawn(enemy(Vec3::new(5.0, 5.0, 0.0)), rep());
            assert_eq!(arena.live_tank_positions(), vec![Vec3::new(5.0, 5.0, 0.0)]);
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn intersecting_returns_registry_order() {
            let mut arena = Arena::new(15);
            let b = arena.spawn(wall(Vec3::new(1.0, 0.0, 0.0)), rep());
            let a = arena.spawn(wall(Vec3::new(0.0, 0.0, 0.0)), rep());
            let probe = Collider::sphere(Vec3::new(0.5, 0.0, 0.5), 0.2);
            assert_eq!(arena.intersecting(&probe, |_| true), vec![b, a]);
        }

        #[test]
        fn intersecting_skips_flagged() {
            let mut arena = Arena::new(15);
            let id = arena.spawn(wall(Vec3::ZERO), rep());
            arena.get_mut(id).map(Entity::mark_for_disposal);
            let probe = Collider::sphere(Vec3::new(0.0, 0.0, 0.5), 0.2);
            assert!(arena.intersecting(&probe, |_| true).is_empty());
        }

        #[test]
        fn intersecting_ignores_colliderless() {
            let mut arena = Arena::new(15);
            arena.spawn(tile(Vec3::ZERO), rep());
            let probe = Collider::sphere(Vec3::ZERO, 5.0);
            assert!(arena.intersecting(&probe, |_| true).is_empty());
        }

        #[test]
        fn intersecting_applies_filter() {
            let mut arena = Arena::new(15);
            let w = arena.spawn(wall(Vec3::ZERO), rep());
            arena.spawn(enemy(Vec3::new(0.5, 0.0, 0.0)), rep());
            let probe = Collider::sphere(Vec3::new(0.0, 0.0, 0.5), 1.0);
            let hits = arena.intersecting(&probe, |e| e.tag() != EntityTag::Enemy);
            assert_eq!(hits, vec![w]);
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let mut arena = Arena::new(9);
        arena.spawn(wall(Vec3::ZERO), rep());
        arena.advance_tick(0.016);
        let json = serde_json::to_string(&arena).unwrap();
        let back: Arena = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entity_count(), 1);
        assert_eq!(back.current_tick(), 1);
        assert_eq!(back.map_size(), 9);
    }
}
