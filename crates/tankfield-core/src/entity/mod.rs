//! Entity module for the arena simulation.
//!
//! This module provides the core entity types:
//! - [`EntityId`]: Unique identifier for entities, doubling as spawn order
//! - [`EntityTag`]: Closed set of entity kinds, used for plugin selection
//! - [`EntityInner`]: Type-safe storage for kind-specific components
//! - [`Entity`]: The complete entity container, with its disposal flag
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use tankfield_core::collider::Collider;
//! use tankfield_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use tankfield_core::entity::components::{TransformState, WallComponents};
//! use tankfield_core::assets::Representation;
//!
//! let cell = Vec3::new(0.0, 3.0, 0.0);
//! let mut wall = Entity::new(
//!     EntityId::new(42),
//!     EntityInner::Wall(WallComponents {
//!         transform: TransformState::new(cell, 0.0),
//!         collider: Collider::unit_cell(cell),
//!     }),
//!     Representation::Textured { texture: "wall".into(), scale: 1.0 },
//! );
//!
//! assert_eq!(wall.tag(), EntityTag::Wall);
//! assert!(wall.mark_for_disposal());
//! assert!(!wall.mark_for_disposal());
//! ```

pub mod components;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assets::Representation;
use crate::collider::Collider;

pub use components::{
    heading_vector, normalize_heading, BulletComponents, DamageOutcome, Damageable,
    EffectComponents, EffectKind, EnemyComponents, Movable, PlayerComponents, TileComponents,
    TransformState, WallComponents,
};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Ids are handed out by the
/// arena in increasing order, so ordering by id is ordering by spawn time.
///
/// # Example
///
/// ```
/// use tankfield_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    ///
    /// # Arguments
    ///
    /// * `id` - The raw identifier value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity kind.
///
/// The set is closed. The tag selects which plugins run on an entity and
/// is what bullets compare against their owner's kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player's tank.
    Player,
    /// An autonomous enemy tank.
    Enemy,
    /// A projectile in flight.
    Bullet,
    /// A boundary wall block.
    Wall,
    /// A ground tile. Decorative, no collider.
    Tile,
    /// A transient visual effect. No collider.
    Effect,
}

impl EntityTag {
    /// Returns true for the two tank kinds.
    #[must_use]
    pub const fn is_tank(self) -> bool {
        matches!(self, Self::Player | Self::Enemy)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Bullet => write!(f, "Bullet"),
            Self::Wall => write!(f, "Wall"),
            Self::Tile => write!(f, "Tile"),
            Self::Effect => write!(f, "Effect"),
        }
    }
}

/// Type-safe storage for kind-specific components.
///
/// The variant always matches the entity's tag; [`Entity::new`] derives the
/// tag from the variant so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player tank components.
    Player(PlayerComponents),
    /// Enemy tank components.
    Enemy(EnemyComponents),
    /// Bullet components.
    Bullet(BulletComponents),
    /// Wall components.
    Wall(WallComponents),
    /// Tile components.
    Tile(TileComponents),
    /// Effect components.
    Effect(EffectComponents),
}

impl EntityInner {
    /// Returns the corresponding `EntityTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Player(_) => EntityTag::Player,
            Self::Enemy(_) => EntityTag::Enemy,
            Self::Bullet(_) => EntityTag::Bullet,
            Self::Wall(_) => EntityTag::Wall,
            Self::Tile(_) => EntityTag::Tile,
            Self::Effect(_) => EntityTag::Effect,
        }
    }

    /// Returns the transform every kind carries.
    #[must_use]
    pub const fn transform(&self) -> &TransformState {
        match self {
            Self::Player(c) => &c.transform,
            Self::Enemy(c) => &c.transform,
            Self::Bullet(c) => &c.transform,
            Self::Wall(c) => &c.transform,
            Self::Tile(c) => &c.transform,
            Self::Effect(c) => &c.transform,
        }
    }

    /// Returns the collider, if this kind has one.
    #[must_use]
    pub const fn collider(&self) -> Option<&Collider> {
        match self {
            Self::Player(c) => Some(&c.collider),
            Self::Enemy(c) => Some(&c.collider),
            Self::Bullet(c) => Some(&c.collider),
            Self::Wall(c) => Some(&c.collider),
            Self::Tile(_) | Self::Effect(_) => None,
        }
    }

    /// Returns the movable capability, if this kind moves.
    #[must_use]
    pub fn as_movable_mut(&mut self) -> Option<&mut dyn Movable> {
        match self {
            Self::Player(c) => Some(c),
            Self::Enemy(c) => Some(c),
            Self::Bullet(c) => Some(c),
            Self::Effect(c) => Some(c),
            Self::Wall(_) | Self::Tile(_) => None,
        }
    }

    /// Returns the damageable capability, if this kind takes damage.
    #[must_use]
    pub fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        match self {
            Self::Enemy(c) => Some(c),
            _ => None,
        }
    }

    /// Returns a reference to the player components, if this is the player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match self {
            Self::Player(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the player components, if this is the player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match self {
            Self::Player(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the enemy components, if this is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        match self {
            Self::Enemy(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the enemy components, if this is an enemy.
    #[must_use]
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyComponents> {
        match self {
            Self::Enemy(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the bullet components, if this is a bullet.
    #[must_use]
    pub const fn as_bullet(&self) -> Option<&BulletComponents> {
        match self {
            Self::Bullet(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the bullet components, if this is a bullet.
    #[must_use]
    pub fn as_bullet_mut(&mut self) -> Option<&mut BulletComponents> {
        match self {
            Self::Bullet(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the effect components, if this is an effect.
    #[must_use]
    pub const fn as_effect(&self) -> Option<&EffectComponents> {
        match self {
            Self::Effect(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the effect components, if this is an effect.
    #[must_use]
    pub fn as_effect_mut(&mut self) -> Option<&mut EffectComponents> {
        match self {
            Self::Effect(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the tile components, if this is a tile.
    #[must_use]
    pub const fn as_tile(&self) -> Option<&TileComponents> {
        match self {
            Self::Tile(components) => Some(components),
            _ => None,
        }
    }
}

/// A complete entity in the arena.
///
/// An `Entity` combines:
/// - A unique [`EntityId`] for identification and ordering
/// - An [`EntityTag`] that determines which plugins operate on it
/// - An [`EntityInner`] containing kind-specific components
/// - The [`Representation`] handed to the scene graph at attach time
/// - A one-way disposal flag
///
/// # Invariants
///
/// - The `EntityId` is unique within an arena
/// - The disposal flag only ever goes from `false` to `true`
/// - While not disposed, the collider (if any) is consistent with the
///   transform: every committed move translates both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    inner: EntityInner,
    representation: Representation,
    disposed: bool,
}

impl Entity {
    /// Creates a new entity. The tag is taken from the inner variant.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier for this entity
    /// * `inner` - Kind-specific component storage
    /// * `representation` - Attached scene representation
    #[must_use]
    pub fn new(id: EntityId, inner: EntityInner, representation: Representation) -> Self {
        Self {
            id,
            tag: inner.tag(),
            inner,
            representation,
            disposed: false,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Returns a reference to the entity's inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the entity's inner component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns the attached representation.
    #[must_use]
    pub const fn representation(&self) -> &Representation {
        &self.representation
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.inner.transform().position
    }

    /// Current heading.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        self.inner.transform().heading
    }

    /// The collider, if this kind has one.
    #[must_use]
    pub const fn collider(&self) -> Option<&Collider> {
        self.inner.collider()
    }

    /// Returns `true` once the entity has been flagged for disposal.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Flags the entity for disposal at the next sweep.
    ///
    /// Returns `true` if this call set the flag, `false` if it was already
    /// set.
    pub fn mark_for_disposal(&mut self) -> bool {
        !std::mem::replace(&mut self.disposed, true)
    }

    /// Returns the player components if this is the player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        self.inner.as_player()
    }

    /// Returns the enemy components if this is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        self.inner.as_enemy()
    }

    /// Returns the bullet components if this is a bullet.
    #[must_use]
    pub const fn as_bullet(&self) -> Option<&BulletComponents> {
        self.inner.as_bullet()
    }

    /// Returns the effect components if this is an effect.
    #[must_use]
    pub const fn as_effect(&self) -> Option<&EffectComponents> {
        self.inner.as_effect()
    }
}
