//! Player plugin: intent-driven turning, driving and firing.
//!
//! # Supported Entity Types
//!
//! - Player
//!
//! # Outputs
//!
//! - `SetHeading` when a turn intent is held
//! - `Translate` for an unobstructed move, or a `MoveBlocked` event
//! - One `Fire` per queued fire trigger

use crate::entity::{heading_vector, normalize_heading, EntityTag};
use crate::input::Intents;
use crate::output::{Command, Event, Output, OutputKind, PluginId};
use crate::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Plugin that drives the player's tank from its held intents.
///
/// Left wins over right and forward wins over back when both are held.
/// The turn is committed even if the move that follows is blocked.
///
/// # Example
///
/// ```
/// use tankfield_core::plugins::PlayerPlugin;
/// use tankfield_core::plugin::Plugin;
///
/// let plugin = PlayerPlugin::new();
/// assert_eq!(plugin.declaration().id.as_str(), "player");
/// ```
pub struct PlayerPlugin {
    declaration: PluginDeclaration,
}

impl PlayerPlugin {
    /// Creates a new `PlayerPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("player"),
                required_tags: vec![EntityTag::Player],
                reads: vec![
                    ComponentKind::Transform,
                    ComponentKind::Collider,
                    ComponentKind::Input,
                ],
                emits: vec![OutputKind::Command, OutputKind::Event],
            },
        }
    }
}

impl Default for PlayerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PlayerPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &mut PluginContext<'_>, view: &WorldView<'_>) -> Vec<Output> {
        let id = ctx.entity_id;
        let (Some(transform), Some(collider), Some(input)) = (
            view.get_transform(id),
            view.get_collider(id),
            view.get_input(id),
        ) else {
            return vec![];
        };

        let mut outputs = Vec::new();
        let held = input.held();

        let turn = ctx.config.turn_rate * ctx.dt;
        let heading = if held.contains(Intents::TURN_LEFT) {
            normalize_heading(transform.heading + turn)
        } else if held.contains(Intents::TURN_RIGHT) {
            normalize_heading(transform.heading - turn)
        } else {
            transform.heading
        };
        if held.intersects(Intents::TURN_LEFT | Intents::TURN_RIGHT) {
            outputs.push(Command::SetHeading { target: id, heading }.into());
        }

        let step = ctx.config.player_move_speed * ctx.dt;
        let direction = if held.contains(Intents::MOVE_FORWARD) {
            Some(1.0)
        } else if held.contains(Intents::MOVE_BACK) {
            Some(-1.0)
        } else {
            None
        };
        if let Some(sign) = direction {
            let delta = heading_vector(heading) * (step * sign);
            let probe = collider.translated(delta);
            let blocked =
                view.any_intersecting(&probe, |e| e.id() != id && e.tag() != EntityTag::Bullet);
            if blocked {
                outputs.push(Event::MoveBlocked { entity: id }.into());
            } else {
                outputs.push(Command::Translate { target: id, delta }.into());
            }
        }

        for _ in 0..input.queued_shots() {
            outputs.push(Command::Fire { shooter: id }.into());
        }

        outputs
    }
}

// =============================================================================
// Tests
// =============================================================================
