//! Enemy plugin: wander, re-head when blocked, fire on a cooldown.
//!
//! An enemy drives straight along its heading. When the next step would
//! hit anything other than a bullet it picks a fresh random heading and
//! does nothing else that tick. Every unblocked tick advances the fire
//! cooldown; once it passes the configured interval the enemy fires and
//! the cooldown restarts.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entity::{heading_vector, EntityTag};
use crate::output::{Command, Event, Output, OutputKind, PluginId};
use crate::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Plugin that drives enemy tanks.
pub struct EnemyPlugin {
    declaration: PluginDeclaration,
}

impl EnemyPlugin {
    /// Creates a new `EnemyPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("enemy"),
                required_tags: vec![EntityTag::Enemy],
                reads: vec![
                    ComponentKind::Transform,
                    ComponentKind::Collider,
                    ComponentKind::Timer,
                ],
                emits: vec![OutputKind::Command, OutputKind::Event],
            },
        }
    }
}

impl Default for EnemyPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for EnemyPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &mut PluginContext<'_>, view: &WorldView<'_>) -> Vec<Output> {
        let id = ctx.entity_id;
        let (Some(transform), Some(collider), Some(timer)) = (
            view.get_transform(id),
            view.get_collider(id),
            view.get_timer(id),
        ) else {
            return vec![];
        };

        let delta = heading_vector(transform.heading) * (ctx.config.enemy_move_speed * ctx.dt);
        let probe = collider.translated(delta);
        if view.any_intersecting(&probe, |e| e.id() != id && e.tag() != EntityTag::Bullet) {
            let heading = ctx.rng.gen_range(0.0..TAU);
            return vec![
                Command::SetHeading { target: id, heading }.into(),
                Event::Rerouted {
                    entity: id,
                    heading,
                }
                .into(),
            ];
        }

        let mut outputs = Vec::with_capacity(3);
        let elapsed = timer.elapsed + ctx.dt;
        if elapsed > ctx.config.enemy_fire_interval {
            outputs.push(Command::Fire { shooter: id }.into());
            outputs.push(Command::SetTimer {
                target: id,
                elapsed: 0.0,
            }
            .into());
        } else {
            outputs.push(Command::SetTimer { target: id, elapsed }.into());
        }
        outputs.push(Command::Translate { target: id, delta }.into());
        outputs
    }
}
