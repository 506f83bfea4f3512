//! Projectile plugin for bullets in flight.
//!
//! # Supported Entity Types
//!
//! - Bullet
//!
//! # Outputs
//!
//! Every tick the bullet ages and advances along its fixed heading. If the
//! moved collider touches anything that is not of its owner's kind, the
//! bullet flags itself, spawns an explosion at the impact point and deals
//! damage to the first entity hit in registry order.

use crate::entity::{heading_vector, EffectKind, EntityTag};
use crate::output::{Command, Event, Modifier, Output, OutputKind, PluginId};
use crate::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Plugin that flies bullets and resolves their impacts.
///
/// # Example
///
/// ```
/// use tankfield_core::plugins::ProjectilePlugin;
/// use tankfield_core::plugin::Plugin;
///
/// let plugin = ProjectilePlugin::new();
/// assert_eq!(plugin.declaration().id.as_str(), "projectile");
/// ```
pub struct ProjectilePlugin {
    declaration: PluginDeclaration,
}

impl ProjectilePlugin {
    /// Creates a new `ProjectilePlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("projectile"),
                required_tags: vec![EntityTag::Bullet],
                reads: vec![
                    ComponentKind::Transform,
                    ComponentKind::Collider,
                    ComponentKind::Timer,
                    ComponentKind::Ownership,
                ],
                emits: vec![OutputKind::Command, OutputKind::Modifier, OutputKind::Event],
            },
        }
    }
}

impl Default for ProjectilePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ProjectilePlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &mut PluginContext<'_>, view: &WorldView<'_>) -> Vec<Output> {
        let id = ctx.entity_id;
        let (Some(transform), Some(collider), Some(timer), Some(ownership)) = (
            view.get_transform(id),
            view.get_collider(id),
            view.get_timer(id),
            view.get_ownership(id),
        ) else {
            return vec![];
        };

        let age = timer.elapsed + ctx.dt;
        let delta = heading_vector(transform.heading) * (ctx.config.bullet_speed * ctx.dt);
        let moved = collider.translated(delta);

        let mut outputs: Vec<Output> = vec![
            Command::SetTimer {
                target: id,
                elapsed: age,
            }
            .into(),
            Command::Translate { target: id, delta }.into(),
        ];

        let hits = view.intersecting(&moved, |e| e.id() != id && e.tag() != ownership.owner_tag);
        if let Some(&target) = hits.first() {
            let position = moved.center();
            outputs.push(Modifier::MarkForDisposal { target: id }.into());
            outputs.push(
                Command::SpawnEffect {
                    kind: EffectKind::Explosion,
                    position,
                    heading: transform.heading,
                    scale: 1.0,
                }
                .into(),
            );
            outputs.push(
                Event::BulletImpact {
                    bullet: id,
                    target,
                    position,
                }
                .into(),
            );
            outputs.push(
                Modifier::ApplyDamage {
                    target,
                    amount: ctx.config.bullet_damage,
                    attacker: Some(ownership.owner),
                }
                .into(),
            );
        } else if ctx.config.bullet_max_lifetime.is_some_and(|max| age > max) {
            outputs.push(Modifier::MarkForDisposal { target: id }.into());
            outputs.push(Event::BulletExpired { bullet: id }.into());
        }

        outputs
    }
}

// =============================================================================
// Tests
// =============================================================================
