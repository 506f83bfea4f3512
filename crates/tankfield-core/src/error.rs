//! Error types for the arena simulation.
//!
//! Errors fall into three groups:
//! - Asset resolution failures while attaching an entity ([`SimError::MissingAsset`])
//! - Misuse of the public API on entities that are gone or already flagged
//!   for disposal ([`SimError::UnknownEntity`], [`SimError::EntityDisposed`]),
//!   or with a negative damage amount ([`SimError::NegativeDamage`])
//! - Configuration and placement failures
//!
//! Behaviour code never produces the misuse errors: flagged entities are
//! removed from every query source in the tick they are flagged.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// Kind of asset that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// A model (mesh hierarchy).
    Model,
    /// A texture.
    Texture,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Texture => write!(f, "texture"),
        }
    }
}

/// Errors produced by the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// A required model or texture key could not be resolved.
    #[error("missing {kind} asset '{key}'")]
    MissingAsset {
        /// What kind of asset was requested.
        kind: AssetKind,
        /// The lookup key.
        key: String,
    },

    /// The entity does not exist in the arena.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// The entity has already been flagged for disposal.
    #[error("entity {0} is already flagged for disposal")]
    EntityDisposed(EntityId),

    /// Damage amounts cannot be negative.
    #[error("negative damage {0}")]
    NegativeDamage(i32),

    /// No grid cell satisfied the spawn distance constraint.
    #[error("no free spawn cell found after {attempts} attempts")]
    NoSpawnCell {
        /// Number of random probes made before the exhaustive scan.
        attempts: u32,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_asset_message_names_key() {
        let err = SimError::MissingAsset {
            kind: AssetKind::Texture,
            key: "tank-body".to_string(),
        };
        assert_eq!(err.to_string(), "missing texture asset 'tank-body'");
    }

    #[test]
    fn disposed_message_names_entity() {
        let err = SimError::EntityDisposed(EntityId::new(7));
        assert_eq!(err.to_string(), "entity 7 is already flagged for disposal");
    }

    #[test]
    fn negative_damage_message_names_amount() {
        assert_eq!(SimError::NegativeDamage(-5).to_string(), "negative damage -5");
    }

    #[test]
    fn config_error_converts_from_serde() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::Config(_)));
    }
}
