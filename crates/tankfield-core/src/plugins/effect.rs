//! Effect plugin: ages muzzle flashes and explosions and flags them once
//! their lifetime is used up.

use crate::entity::EntityTag;
use crate::output::{Command, Modifier, Output, OutputKind, PluginId};
use crate::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Plugin that expires transient effects.
pub struct EffectPlugin {
    declaration: PluginDeclaration,
}

impl EffectPlugin {
    /// Creates a new `EffectPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("effect"),
                required_tags: vec![EntityTag::Effect],
                reads: vec![ComponentKind::Timer],
                emits: vec![OutputKind::Command, OutputKind::Modifier],
            },
        }
    }
}

impl Default for EffectPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for EffectPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &mut PluginContext<'_>, view: &WorldView<'_>) -> Vec<Output> {
        let id = ctx.entity_id;
        let Some(timer) = view.get_timer(id) else {
            return vec![];
        };
        let Some(lifetime) = timer.lifetime else {
            return vec![];
        };

        let age = timer.elapsed + ctx.dt;
        let mut outputs: Vec<Output> = vec![Command::SetTimer {
            target: id,
            elapsed: age,
        }
        .into()];
        if age >= lifetime {
            outputs.push(Modifier::MarkForDisposal { target: id }.into());
        }
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::entity::EffectKind;
    use crate::tests::{run_plugin, spawn_effect};

    fn flags_self(outputs: &[Output]) -> bool {
        outputs
            .iter()
            .any(|o| matches!(o.as_modifier(), Some(Modifier::MarkForDisposal { .. })))
    }

    #[test]
    fn young_effect_only_ages() {
        let mut arena = Arena::new(15);
        let flash = spawn_effect(&mut arena, EffectKind::MuzzleFlash, 1.0);
        let outputs = run_plugin(&EffectPlugin::new(), &arena, flash, 0.1);
        assert_eq!(outputs.len(), 1);
        assert!(!flags_self(&outputs));
    }

    #[test]
    fn flash_expires_at_lifetime() {
        let mut arena = Arena::new(15);
        let flash = spawn_effect(&mut arena, EffectKind::MuzzleFlash, 1.0);
        let outputs = run_plugin(&EffectPlugin::new(), &arena, flash, 0.15);
        assert!(flags_self(&outputs));
    }

    #[test]
    fn big_explosion_lasts_longer() {
        let mut arena = Arena::new(15);
        let small = spawn_effect(&mut arena, EffectKind::Explosion, 1.0);
        let big = spawn_effect(&mut arena, EffectKind::Explosion, 2.0);
        assert!(flags_self(&run_plugin(&EffectPlugin::new(), &arena, small, 0.6)));
        assert!(!flags_self(&run_plugin(&EffectPlugin::new(), &arena, big, 0.6)));
    }
}
