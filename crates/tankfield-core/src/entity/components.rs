//! Component structs for each entity kind, and the capabilities they share.
//!
//! Every kind stores a [`TransformState`]. Kinds that take part in collision
//! tests also store a [`Collider`]; kinds that move implement [`Movable`],
//! which keeps the two in lockstep. Only enemies implement [`Damageable`].

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collider::Collider;
use crate::input::InputState;

use super::{EntityId, EntityTag};

/// Wraps an angle into `[0, 2π)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `2π`; that case
/// folds back to zero.
#[must_use]
pub fn normalize_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector on the ground plane for a heading. Heading 0 points toward
/// negative y.
#[must_use]
pub fn heading_vector(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), -heading.cos(), 0.0)
}

// =============================================================================
// Shared State
// =============================================================================

/// Position and heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// World position.
    pub position: Vec3,
    /// Heading in radians, in `[0, 2π)` for tanks.
    pub heading: f32,
}

impl TransformState {
    /// Creates a transform.
    #[must_use]
    pub const fn new(position: Vec3, heading: f32) -> Self {
        Self { position, heading }
    }
}

/// Entities whose position can change. Moving translates the collider by
/// the same amount.
pub trait Movable {
    /// Current transform.
    fn transform(&self) -> &TransformState;

    /// Mutable transform and collider, borrowed together.
    fn parts_mut(&mut self) -> (&mut TransformState, Option<&mut Collider>);

    /// Moves position and collider by `delta`.
    fn translate(&mut self, delta: Vec3) {
        let (transform, collider) = self.parts_mut();
        transform.position += delta;
        if let Some(collider) = collider {
            collider.translate(delta);
        }
    }

    /// Sets the heading.
    fn set_heading(&mut self, heading: f32) {
        self.parts_mut().0.heading = heading;
    }
}

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health remains above zero.
    Survived {
        /// Remaining health.
        health: i32,
    },
    /// Health dropped to zero or below.
    Destroyed,
}

/// Entities with health.
pub trait Damageable {
    /// Current health.
    fn health(&self) -> i32;

    /// Subtracts `amount` from health.
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome;
}

// =============================================================================
// Per-kind Components
// =============================================================================

/// Player tank state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Position and heading.
    pub transform: TransformState,
    /// Tank bounding sphere.
    pub collider: Collider,
    /// Enemies destroyed.
    pub score: u32,
    /// Held intents and queued shots.
    pub input: InputState,
}

/// Enemy tank state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyComponents {
    /// Position and heading.
    pub transform: TransformState,
    /// Tank bounding sphere.
    pub collider: Collider,
    /// Hit points.
    pub health: i32,
    /// Seconds of unblocked cruising since the last shot.
    pub fire_cooldown_elapsed: f32,
}

/// Bullet state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletComponents {
    /// Position and the fixed flight heading.
    pub transform: TransformState,
    /// Bullet sphere.
    pub collider: Collider,
    /// The tank that fired this bullet.
    pub owner: EntityId,
    /// Kind of the owner; entities of this kind are never hit.
    pub owner_tag: EntityTag,
    /// Seconds in flight.
    pub age: f32,
}

/// Boundary wall state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallComponents {
    /// Cell position.
    pub transform: TransformState,
    /// Unit cube.
    pub collider: Collider,
}

/// Ground tile state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileComponents {
    /// Cell position.
    pub transform: TransformState,
    /// Index of the ground texture variant.
    pub ground: usize,
}

/// Visual effect flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Flash at a muzzle when a tank fires.
    MuzzleFlash,
    /// Bullet impact or tank destruction.
    Explosion,
}

/// Transient effect state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectComponents {
    /// Position and facing.
    pub transform: TransformState,
    /// Which effect.
    pub kind: EffectKind,
    /// Size multiplier.
    pub scale: f32,
    /// Seconds since the effect appeared.
    pub age: f32,
    /// Seconds until the effect expires.
    pub lifetime: f32,
}

impl EffectComponents {
    /// Returns true once the effect has run its course.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

// =============================================================================
// Capability Impls
// =============================================================================

impl Movable for PlayerComponents {
    fn transform(&self) -> &TransformState {
        &self.transform
    }

    fn parts_mut(&mut self) -> (&mut TransformState, Option<&mut Collider>) {
        (&mut self.transform, Some(&mut self.collider))
    }
}

impl Movable for EnemyComponents {
    fn transform(&self) -> &TransformState {
        &self.transform
    }

    fn parts_mut(&mut self) -> (&mut TransformState, Option<&mut Collider>) {
        (&mut self.transform, Some(&mut self.collider))
    }
}

impl Movable for BulletComponents {
    fn transform(&self) -> &TransformState {
        &self.transform
    }

    fn parts_mut(&mut self) -> (&mut TransformState, Option<&mut Collider>) {
        (&mut self.transform, Some(&mut self.collider))
    }
}

impl Movable for EffectComponents {
    fn transform(&self) -> &TransformState {
        &self.transform
    }

    fn parts_mut(&mut self) -> (&mut TransformState, Option<&mut Collider>) {
        (&mut self.transform, None)
    }
}

impl Damageable for EnemyComponents {
    fn health(&self) -> i32 {
        self.health
    }

    fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Survived {
                health: self.health,
            }
        }
    }
}
