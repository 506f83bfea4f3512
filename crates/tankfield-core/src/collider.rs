//! Bounding volumes used for intersection tests.
//!
//! A [`Collider`] is either a sphere or an axis-aligned box. Colliders carry
//! no rendering meaning: they exist only so the simulation can ask "would
//! these two things overlap?". Intersection is a single operation dispatched
//! on the pair of shape tags.
//!
//! # Example
//!
//! ```
//! use tankfield_core::collider::Collider;
//! use glam::Vec3;
//!
//! let tank = Collider::sphere(Vec3::new(3.0, 2.9, 0.35), 0.45);
//! let wall = Collider::unit_cell(Vec3::new(3.0, 2.0, 0.0));
//!
//! assert!(tank.intersects(&wall));
//! assert!(!tank.translated(Vec3::new(0.0, 1.0, 0.0)).intersects(&wall));
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A bounding shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    /// Sphere with a center and radius.
    Sphere {
        /// Sphere center.
        center: Vec3,
        /// Sphere radius.
        radius: f32,
    },
    /// Axis-aligned box given by its corners.
    Box {
        /// Minimum corner.
        min: Vec3,
        /// Maximum corner.
        max: Vec3,
    },
}

impl Collider {
    /// Creates a sphere collider.
    #[must_use]
    pub const fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    /// Creates a box collider from its corners.
    #[must_use]
    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        Self::Box {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Creates the unit cube occupying a grid cell: centered on `cell` in
    /// x/y and standing on the ground plane (`z` in `[cell.z, cell.z + 1]`).
    #[must_use]
    pub fn unit_cell(cell: Vec3) -> Self {
        let half = Vec3::new(0.5, 0.5, 0.0);
        Self::aabb(cell - half, cell + half + Vec3::Z)
    }

    /// Returns the center of the shape.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        match *self {
            Self::Sphere { center, .. } => center,
            Self::Box { min, max } => (min + max) * 0.5,
        }
    }

    /// Moves the shape by `delta` in place.
    pub fn translate(&mut self, delta: Vec3) {
        match self {
            Self::Sphere { center, .. } => *center += delta,
            Self::Box { min, max } => {
                *min += delta;
                *max += delta;
            }
        }
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec3) -> Self {
        let mut moved = *self;
        moved.translate(delta);
        moved
    }

    /// Tests whether two shapes overlap. Touching counts as overlapping.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        match (*self, *other) {
            (
                Self::Sphere {
                    center: a,
                    radius: ra,
                },
                Self::Sphere {
                    center: b,
                    radius: rb,
                },
            ) => {
                let reach = ra + rb;
                a.distance_squared(b) <= reach * reach
            }
            (Self::Sphere { center, radius }, Self::Box { min, max })
            | (Self::Box { min, max }, Self::Sphere { center, radius }) => {
                let closest = center.clamp(min, max);
                center.distance_squared(closest) <= radius * radius
            }
            (
                Self::Box {
                    min: amin,
                    max: amax,
                },
                Self::Box {
                    min: bmin,
                    max: bmax,
                },
            ) => amin.cmple(bmax).all() && bmin.cmple(amax).all(),
        }
    }
}
