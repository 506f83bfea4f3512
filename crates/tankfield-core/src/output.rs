//! Output system for the Entity-Plugin-Resolver architecture.
//!
//! Plugins never mutate the arena. They return outputs, which the
//! simulation wraps in an [`OutputEnvelope`] and hands to the resolvers
//! straight away, before the next entity updates.
//!
//! # Architecture
//!
//! The output system uses a nested enum hierarchy for categorical routing:
//! - [`Command`]: Direct state change requests (`SetHeading`, `Translate`, `Fire`, ...)
//! - [`Modifier`]: Value modifications (`ApplyDamage`, `MarkForDisposal`)
//! - [`Event`]: Notifications of things that happened (`ShotFired`, `Disposed`, ...)
//!
//! Resolvers emit events of their own as they apply commands and modifiers;
//! all of them end up in the simulation's event log as [`EventRecord`]s.
//!
//! # Example
//!
//! ```
//! use tankfield_core::output::{Command, Output, OutputEnvelope, PluginId, PluginInstanceId};
//! use tankfield_core::entity::EntityId;
//!
//! let command = Command::SetHeading {
//!     target: EntityId::new(1),
//!     heading: 1.5,
//! };
//!
//! let envelope = OutputEnvelope::new(
//!     Output::Command(command),
//!     PluginInstanceId::new(EntityId::new(1), PluginId::new("player")),
//!     100, // tick
//!     0,   // sequence
//! );
//!
//! assert!(matches!(envelope.output(), Output::Command(_)));
//! ```

use std::borrow::Cow;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::{EffectKind, EntityId, EntityTag};

// =============================================================================
// Plugin Identification Types
// =============================================================================

/// Unique identifier for a plugin type.
///
/// Built-in plugins use [`PluginId::from_static`], which allocates nothing.
///
/// # Example
///
/// ```
/// use tankfield_core::output::PluginId;
///
/// const ENEMY: PluginId = PluginId::from_static("enemy");
/// assert_eq!(ENEMY, PluginId::new("enemy"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginId(Cow<'static, str>);

impl PluginId {
    /// Creates a new `PluginId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Cow::Owned(id.to_string()))
    }

    /// Creates a `PluginId` from a static string at compile time.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Returns the plugin ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PluginId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifies a specific plugin instance (entity + plugin type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginInstanceId {
    entity_id: EntityId,
    plugin_id: PluginId,
}

impl PluginInstanceId {
    /// Creates a new plugin instance identifier.
    #[must_use]
    pub fn new(entity_id: EntityId, plugin_id: PluginId) -> Self {
        Self {
            entity_id,
            plugin_id,
        }
    }

    /// Returns the entity ID of this instance.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Returns the plugin ID of this instance.
    #[must_use]
    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }
}

impl fmt::Display for PluginInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.plugin_id, self.entity_id)
    }
}

// =============================================================================
// Output Categories
// =============================================================================

/// Command outputs request direct state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set the heading of an entity.
    SetHeading {
        /// Entity to modify
        target: EntityId,
        /// New heading in radians
        heading: f32,
    },
    /// Commit a displacement. Position and collider move together.
    Translate {
        /// Entity to move
        target: EntityId,
        /// Displacement
        delta: Vec3,
    },
    /// Overwrite an entity's timer: enemy fire cooldown, bullet age or
    /// effect age.
    SetTimer {
        /// Entity to modify
        target: EntityId,
        /// New elapsed value in seconds
        elapsed: f32,
    },
    /// Fire from the shooter's muzzle at its current heading.
    Fire {
        /// Tank that fires
        shooter: EntityId,
    },
    /// Spawn a transient visual effect.
    SpawnEffect {
        /// Which effect
        kind: EffectKind,
        /// Where
        position: Vec3,
        /// Facing
        heading: f32,
        /// Size multiplier
        scale: f32,
    },
}

impl Command {
    /// Returns the entity this command acts on, if any.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::SetHeading { target, .. }
            | Self::Translate { target, .. }
            | Self::SetTimer { target, .. } => Some(*target),
            Self::Fire { shooter } => Some(*shooter),
            Self::SpawnEffect { .. } => None,
        }
    }
}

/// Modifier outputs request value changes to entity state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Apply damage to an entity. Kinds without health ignore it.
    ApplyDamage {
        /// Entity to damage
        target: EntityId,
        /// Damage amount
        amount: i32,
        /// Who dealt it, for scoring
        attacker: Option<EntityId>,
    },
    /// Flag an entity for removal at the end of the tick.
    MarkForDisposal {
        /// Entity to flag
        target: EntityId,
    },
}

impl Modifier {
    /// Returns the target entity for this modifier.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::ApplyDamage { target, .. } | Self::MarkForDisposal { target } => *target,
        }
    }
}

/// Event outputs notify of things that happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A tank's move was rejected by an obstacle.
    MoveBlocked {
        /// The tank
        entity: EntityId,
    },
    /// An enemy picked a new heading after being blocked.
    Rerouted {
        /// The enemy
        entity: EntityId,
        /// Its new heading
        heading: f32,
    },
    /// A tank fired.
    ShotFired {
        /// The tank
        shooter: EntityId,
        /// The new bullet
        bullet: EntityId,
    },
    /// A bullet struck something.
    BulletImpact {
        /// The bullet
        bullet: EntityId,
        /// First entity hit, in registry order
        target: EntityId,
        /// Impact point
        position: Vec3,
    },
    /// A bullet outlived the configured maximum lifetime.
    BulletExpired {
        /// The bullet
        bullet: EntityId,
    },
    /// Damage landed on an entity with health.
    DamageDealt {
        /// Entity that received the damage
        target: EntityId,
        /// Entity that dealt it, if known
        attacker: Option<EntityId>,
        /// Amount of damage dealt
        amount: i32,
        /// Health left afterwards
        remaining: i32,
    },
    /// An enemy's health reached zero.
    EnemyDestroyed {
        /// The enemy
        enemy: EntityId,
        /// The attacker, if known
        attacker: Option<EntityId>,
    },
    /// The player's score was set.
    ScoreChanged {
        /// The player
        player: EntityId,
        /// New score
        score: u32,
    },
    /// A flagged entity was removed by the sweep.
    Disposed {
        /// Removed entity
        id: EntityId,
        /// Its kind
        tag: EntityTag,
        /// Its last position
        position: Vec3,
    },
    /// The population policy placed a replacement enemy.
    EnemyRespawned {
        /// The new enemy
        enemy: EntityId,
        /// Spawn position
        position: Vec3,
    },
    /// The population policy found no valid spawn cell.
    RespawnSkipped {
        /// Random probes made before the ordered scan
        attempts: u32,
    },
}

impl Event {
    /// Returns the primary entity involved in this event, if any.
    #[must_use]
    pub const fn primary_entity(&self) -> Option<EntityId> {
        match self {
            Self::MoveBlocked { entity } | Self::Rerouted { entity, .. } => Some(*entity),
            Self::ShotFired { shooter, .. } => Some(*shooter),
            Self::BulletImpact { bullet, .. } | Self::BulletExpired { bullet } => Some(*bullet),
            Self::DamageDealt { target, .. } => Some(*target),
            Self::EnemyDestroyed { enemy, .. } | Self::EnemyRespawned { enemy, .. } => {
                Some(*enemy)
            }
            Self::ScoreChanged { player, .. } => Some(*player),
            Self::Disposed { id, .. } => Some(*id),
            Self::RespawnSkipped { .. } => None,
        }
    }
}

/// An event stamped with the tick it happened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Tick of occurrence. Zero for setup before the first step.
    pub tick: u64,
    /// The event.
    pub event: Event,
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output kind for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Command outputs (state change requests)
    Command,
    /// Modifier outputs (value modifications)
    Modifier,
    /// Event outputs (notifications)
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Modifier => write!(f, "Modifier"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// A plugin output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A command output (state change request)
    Command(Command),
    /// A modifier output (value modification)
    Modifier(Modifier),
    /// An event output (notification)
    Event(Event),
}

impl Output {
    /// Returns the kind of this output for resolver routing.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Modifier(_) => OutputKind::Modifier,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is a command output.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the modifier if this is a modifier output.
    #[must_use]
    pub const fn as_modifier(&self) -> Option<&Modifier> {
        match self {
            Self::Modifier(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the event if this is an event output.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Modifier> for Output {
    fn from(m: Modifier) -> Self {
        Self::Modifier(m)
    }
}

impl From<Event> for Output {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// Wrapper for outputs with provenance metadata.
///
/// - `source`: Which plugin instance emitted this output
/// - `tick`: When this output was emitted
/// - `sequence`: Position within the plugin's output list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: PluginInstanceId,
    tick: u64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Creates a new output envelope.
    ///
    /// # Arguments
    ///
    /// * `output` - The output to wrap
    /// * `source` - The plugin instance that emitted this output
    /// * `tick` - Current simulation tick
    /// * `sequence` - Sequence number within this plugin run
    #[must_use]
    pub fn new(output: Output, source: PluginInstanceId, tick: u64, sequence: u32) -> Self {
        Self {
            output,
            source,
            tick,
            sequence,
        }
    }

    /// Returns a reference to the wrapped output.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Returns the source plugin instance.
    #[must_use]
    pub fn source(&self) -> &PluginInstanceId {
        &self.source
    }

    /// Returns the tick when this output was emitted.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns the sequence number within the plugin run.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }
}

// =============================================================================
// Tests
// =============================================================================
