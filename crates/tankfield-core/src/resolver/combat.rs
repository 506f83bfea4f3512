//! Combat resolver for damage, kills and disposal flags.
//!
//! The `CombatResolver` handles:
//! - `ApplyDamage` modifiers: reduce an enemy's health
//! - `MarkForDisposal` modifiers: flag an entity for the end-of-tick sweep
//!
//! # Destruction Handling
//!
//! When an enemy's health drops to zero or below, it is flagged, an
//! `EnemyDestroyed` event is recorded and a scale-2 explosion is spawned
//! where it stood. A live player attacker scores one point, but only once
//! the explosion is attached: a missing explosion texture costs the point.
//! Flagged entities take no further damage.

use tracing::{info, trace, warn};

use crate::entity::{DamageOutcome, EffectKind, EntityId, EntityTag};
use crate::output::{Event, Modifier, Output, OutputEnvelope, OutputKind};
use crate::spawn::Blueprint;

use super::{ResolveContext, Resolver};

/// Scale of the explosion left by a destroyed tank.
const KILL_EXPLOSION_SCALE: f32 = 2.0;

/// Resolver for combat-related modifiers.
///
/// # Example
///
/// ```
/// use tankfield_core::resolver::CombatResolver;
/// use tankfield_core::resolver::Resolver;
/// use tankfield_core::output::OutputKind;
///
/// let resolver = CombatResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Modifier));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn mark_for_disposal(ctx: &mut ResolveContext<'_>, target: EntityId) {
        if let Some(entity) = ctx.arena.get_mut(target) {
            if entity.mark_for_disposal() {
                trace!(entity = %target, "flagged for disposal");
            }
        }
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Modifier]
    }

    fn resolve(&self, envelope: &OutputEnvelope, ctx: &mut ResolveContext<'_>) {
        let Output::Modifier(modifier) = envelope.output() else {
            return;
        };
        match *modifier {
            Modifier::ApplyDamage {
                target,
                amount,
                attacker,
            } => apply_damage(ctx, target, amount, attacker),
            Modifier::MarkForDisposal { target } => Self::mark_for_disposal(ctx, target),
        }
    }
}

/// Applies damage to `target` and handles the kill that may follow.
///
/// Kinds without health ignore damage, as do unknown and flagged entities.
pub(crate) fn apply_damage(
    ctx: &mut ResolveContext<'_>,
    target: EntityId,
    amount: i32,
    attacker: Option<EntityId>,
) {
    let (outcome, remaining, position, heading) = {
        let Some(entity) = ctx.arena.get_mut(target).filter(|e| !e.is_disposed()) else {
            return;
        };
        let position = entity.position();
        let heading = entity.heading();
        let Some(damageable) = entity.inner_mut().as_damageable_mut() else {
            trace!(entity = %target, "damage ignored by kind without health");
            return;
        };
        let outcome = damageable.apply_damage(amount);
        let remaining = damageable.health();
        if outcome == DamageOutcome::Destroyed {
            entity.mark_for_disposal();
        }
        (outcome, remaining, position, heading)
    };

    ctx.record(Event::DamageDealt {
        target,
        attacker,
        amount,
        remaining,
    });
    if outcome != DamageOutcome::Destroyed {
        return;
    }

    info!(enemy = %target, attacker = ?attacker, "enemy destroyed");
    ctx.record(Event::EnemyDestroyed {
        enemy: target,
        attacker,
    });

    let explosion = Blueprint::Effect {
        kind: EffectKind::Explosion,
        position,
        heading,
        scale: KILL_EXPLOSION_SCALE,
    };
    if let Err(err) = ctx.spawn(explosion) {
        warn!(enemy = %target, error = %err, "kill explosion not spawned; kill not scored");
        return;
    }

    let Some(player) = attacker else {
        return;
    };
    let score = ctx
        .arena
        .get(player)
        .filter(|e| !e.is_disposed() && e.tag() == EntityTag::Player)
        .and_then(|e| e.as_player())
        .map(|p| p.score);
    if let Some(score) = score {
        if let Err(err) = ctx.set_score(player, score.saturating_add(1)) {
            warn!(player = %player, error = %err, "score not updated");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
