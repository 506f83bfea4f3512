//! Seams to the rendering and UI side.
//!
//! The simulation talks to the outside through two traits:
//! - [`SceneGraph`] receives representations on attach, pose updates after
//!   every committed move or turn, and detach calls from the sweep.
//! - [`Scoreboard`] receives the player's score whenever it is set.
//!
//! [`SceneTree`] and [`SharedScoreboard`] are in-memory implementations.
//! Both are cheap cloneable handles, so a caller can keep one clone and
//! hand the other to the simulation. [`Camera`] is owned by the
//! simulation and follows the player on the ground plane.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::Representation;
use crate::entity::EntityId;

// =============================================================================
// Scene Graph
// =============================================================================

/// Receives representation lifecycle and pose updates.
pub trait SceneGraph {
    /// Adds a representation for a newly inserted entity.
    fn attach(&mut self, id: EntityId, representation: &Representation, position: Vec3, heading: f32);

    /// Updates the pose of an attached representation.
    fn sync(&mut self, id: EntityId, position: Vec3, heading: f32);

    /// Removes and releases a representation.
    fn detach(&mut self, id: EntityId);
}

/// One node in a [`SceneTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// What is drawn.
    pub representation: Representation,
    /// Last synced position.
    pub position: Vec3,
    /// Last synced heading.
    pub heading: f32,
}

#[derive(Debug, Default)]
struct SceneState {
    nodes: BTreeMap<EntityId, SceneNode>,
    attached_total: u64,
    detached_total: u64,
}

/// Recording scene graph. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    state: Rc<RefCell<SceneState>>,
}

impl SceneTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().nodes.is_empty()
    }

    /// Copy of the node for `id`, if attached.
    #[must_use]
    pub fn node(&self, id: EntityId) -> Option<SceneNode> {
        self.state.borrow().nodes.get(&id).cloned()
    }

    /// Returns `true` if `id` is attached.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.state.borrow().nodes.contains_key(&id)
    }

    /// Attach calls seen so far.
    #[must_use]
    pub fn attached_total(&self) -> u64 {
        self.state.borrow().attached_total
    }

    /// Detach calls that removed a node.
    #[must_use]
    pub fn detached_total(&self) -> u64 {
        self.state.borrow().detached_total
    }
}

impl SceneGraph for SceneTree {
    fn attach(&mut self, id: EntityId, representation: &Representation, position: Vec3, heading: f32) {
        let mut state = self.state.borrow_mut();
        state.attached_total += 1;
        state.nodes.insert(
            id,
            SceneNode {
                representation: representation.clone(),
                position,
                heading,
            },
        );
    }

    fn sync(&mut self, id: EntityId, position: Vec3, heading: f32) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(&id) {
            node.position = position;
            node.heading = heading;
        }
    }

    fn detach(&mut self, id: EntityId) {
        let mut state = self.state.borrow_mut();
        if state.nodes.remove(&id).is_some() {
            state.detached_total += 1;
        }
    }
}

// =============================================================================
// Scoreboard
// =============================================================================

/// Receives the player's score.
pub trait Scoreboard {
    /// Displays a new score.
    fn set_score(&mut self, value: u32);
}

/// Scoreboard that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScoreboard;

impl Scoreboard for NullScoreboard {
    fn set_score(&mut self, _value: u32) {}
}

/// Scoreboard that remembers the last value. Clones share it.
#[derive(Debug, Clone, Default)]
pub struct SharedScoreboard {
    last: Rc<Cell<Option<u32>>>,
    updates: Rc<Cell<u32>>,
}

impl SharedScoreboard {
    /// Creates a scoreboard with no value yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value set, if any.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.last.get()
    }

    /// Number of times a score was set.
    #[must_use]
    pub fn updates(&self) -> u32 {
        self.updates.get()
    }
}

impl Scoreboard for SharedScoreboard {
    fn set_score(&mut self, value: u32) {
        self.last.set(Some(value));
        self.updates.set(self.updates.get() + 1);
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Overhead camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position.
    pub position: Vec3,
}

impl Camera {
    /// Creates a camera at `position`.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Moves over `target` on the ground plane. Height is kept.
    pub fn follow(&mut self, target: Vec3) {
        self.position.x = target.x;
        self.position.y = target.y;
    }
}
