//! Spawn resolver: firing and visual effects.
//!
//! A `Fire` command spawns a bullet and a muzzle flash at the shooter's
//! muzzle point, which sits `muzzle_distance` ahead of the tank along its
//! heading and `muzzle_height` above it. A player shot consumes one queued
//! fire trigger. `SpawnEffect` attaches a free-standing effect.
//!
//! Asset failures are logged and skipped; they never abort the tick.

use glam::Vec3;
use tracing::{debug, warn};

use crate::config::ArenaConfig;
use crate::entity::{heading_vector, EffectKind, EntityId, EntityTag};
use crate::output::{Command, Event, Output, OutputEnvelope, OutputKind};
use crate::spawn::Blueprint;

use super::{ResolveContext, Resolver};

/// Muzzle point for a tank at `position` facing `heading`.
#[must_use]
pub fn muzzle_point(position: Vec3, heading: f32, config: &ArenaConfig) -> Vec3 {
    position + heading_vector(heading) * config.muzzle_distance + Vec3::Z * config.muzzle_height
}

/// Resolver for commands that create entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnResolver;

impl SpawnResolver {
    /// Creates a new spawn resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fire(ctx: &mut ResolveContext<'_>, shooter: EntityId) {
        let Some(entity) = ctx.arena.get_mut(shooter).filter(|e| !e.is_disposed()) else {
            return;
        };
        let owner_tag = entity.tag();
        if !owner_tag.is_tank() {
            return;
        }
        if let Some(player) = entity.inner_mut().as_player_mut() {
            if !player.input.consume_shot() {
                return;
            }
        }
        let heading = entity.heading();
        let muzzle = muzzle_point(entity.position(), heading, ctx.config);

        let bullet = Blueprint::Bullet {
            position: muzzle,
            heading,
            owner: shooter,
            owner_tag,
        };
        match ctx.spawn(bullet) {
            Ok(bullet) => {
                debug!(shooter = %shooter, bullet = %bullet, "shot fired");
                ctx.record(Event::ShotFired { shooter, bullet });
            }
            Err(err) => {
                warn!(shooter = %shooter, error = %err, "bullet not spawned");
                return;
            }
        }

        Self::spawn_effect(ctx, EffectKind::MuzzleFlash, muzzle, heading, 1.0);
    }

    fn spawn_effect(
        ctx: &mut ResolveContext<'_>,
        kind: EffectKind,
        position: Vec3,
        heading: f32,
        scale: f32,
    ) {
        let blueprint = Blueprint::Effect {
            kind,
            position,
            heading,
            scale,
        };
        if let Err(err) = ctx.spawn(blueprint) {
            warn!(?kind, error = %err, "effect not spawned");
        }
    }
}

impl Resolver for SpawnResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, envelope: &OutputEnvelope, ctx: &mut ResolveContext<'_>) {
        let Output::Command(command) = envelope.output() else {
            return;
        };
        match *command {
            Command::Fire { shooter } => Self::fire(ctx, shooter),
            Command::SpawnEffect {
                kind,
                position,
                heading,
                scale,
            } => Self::spawn_effect(ctx, kind, position, heading, scale),
            Command::SetHeading { .. } | Command::Translate { .. } | Command::SetTimer { .. } => {}
        }
    }
}
