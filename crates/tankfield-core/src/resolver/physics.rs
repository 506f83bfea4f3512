//! Physics resolver for movement commands.
//!
//! The `PhysicsResolver` handles:
//! - `SetHeading`: commit a new heading
//! - `Translate`: move position and collider together
//! - `SetTimer`: overwrite an entity's cooldown or age
//!
//! Heading and position changes are mirrored to the scene graph. When the
//! player moves, the camera follows it on the ground plane.

use glam::Vec3;
use tracing::trace;

use crate::entity::{EntityId, EntityInner, EntityTag};
use crate::output::{Command, Output, OutputEnvelope, OutputKind};

use super::{ResolveContext, Resolver};

/// Resolver for transform and timer commands.
///
/// # Example
///
/// ```
/// use tankfield_core::resolver::PhysicsResolver;
/// use tankfield_core::resolver::Resolver;
/// use tankfield_core::output::OutputKind;
///
/// let resolver = PhysicsResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_set_heading(ctx: &mut ResolveContext<'_>, target: EntityId, heading: f32) {
        let Some(entity) = ctx.arena.get_mut(target).filter(|e| !e.is_disposed()) else {
            return;
        };
        let Some(movable) = entity.inner_mut().as_movable_mut() else {
            trace!(entity = %target, "heading ignored for static kind");
            return;
        };
        movable.set_heading(heading);
        let position = movable.transform().position;
        ctx.scene.sync(target, position, heading);
    }

    fn apply_translate(ctx: &mut ResolveContext<'_>, target: EntityId, delta: Vec3) {
        let Some(entity) = ctx.arena.get_mut(target).filter(|e| !e.is_disposed()) else {
            return;
        };
        let tag = entity.tag();
        let Some(movable) = entity.inner_mut().as_movable_mut() else {
            trace!(entity = %target, "translate ignored for static kind");
            return;
        };
        movable.translate(delta);
        let transform = *movable.transform();
        ctx.scene.sync(target, transform.position, transform.heading);
        if tag == EntityTag::Player {
            ctx.camera.follow(transform.position);
        }
    }

    fn apply_set_timer(ctx: &mut ResolveContext<'_>, target: EntityId, elapsed: f32) {
        let Some(entity) = ctx.arena.get_mut(target).filter(|e| !e.is_disposed()) else {
            return;
        };
        match entity.inner_mut() {
            EntityInner::Enemy(c) => c.fire_cooldown_elapsed = elapsed,
            EntityInner::Bullet(c) => c.age = elapsed,
            EntityInner::Effect(c) => c.age = elapsed,
            EntityInner::Player(_) | EntityInner::Wall(_) | EntityInner::Tile(_) => {}
        }
    }
}

impl Resolver for PhysicsResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, envelope: &OutputEnvelope, ctx: &mut ResolveContext<'_>) {
        let Output::Command(command) = envelope.output() else {
            return;
        };
        match *command {
            Command::SetHeading { target, heading } => Self::apply_set_heading(ctx, target, heading),
            Command::Translate { target, delta } => Self::apply_translate(ctx, target, delta),
            Command::SetTimer { target, elapsed } => Self::apply_set_timer(ctx, target, elapsed),
            Command::Fire { .. } | Command::SpawnEffect { .. } => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Collider;
    use crate::tests::ResolveFixture;

    mod heading_tests {
        use super::*;

        #[test]
        fn set_heading_updates_entity_and_scene() {
            let mut fixture = ResolveFixture::new();
            let enemy = fixture.spawn_enemy(Vec3::new(3.0, 3.0, 0.0), 0.0);
            fixture.resolve(
                &PhysicsResolver::new(),
                Command::SetHeading {
                    target: enemy,
                    heading: 2.0,
                },
            );
            assert!((fixture.arena.get(enemy).unwrap().heading() - 2.0).abs() < f32::EPSILON);
            assert!((fixture.scene.node(enemy).unwrap().heading - 2.0).abs() < f32::EPSILON);
        }

        #[test]
        fn walls_do_not_turn() {
            let mut fixture = ResolveFixture::new();
            let wall = fixture.spawn_wall(Vec3::new(0.0, 4.0, 0.0));
            fixture.resolve(
                &PhysicsResolver::new(),
                Command::SetHeading {
                    target: wall,
                    heading: 1.0,
                },
            );
            assert!(fixture.arena.get(wall).unwrap().heading().abs() < f32::EPSILON);
        }
    }

    mod translate_tests {
        use super::*;

        #[test]
        fn collider_moves_with_position() {
            let mut fixture = ResolveFixture::new();
            let enemy = fixture.spawn_enemy(Vec3::new(3.0, 3.0, 0.0), 0.0);
            let delta = Vec3::new(0.5, -0.25, 0.0);
            fixture.resolve(&PhysicsResolver::new(), Command::Translate { target: enemy, delta });
            let entity = fixture.arena.get(enemy).unwrap();
            assert_eq!(entity.position(), Vec3::new(3.5, 2.75, 0.0));
            assert_eq!(
                entity.collider().map(Collider::center),
                Some(Vec3::new(3.5, 2.75, 0.35))
            );
            assert_eq!(fixture.scene.node(enemy).unwrap().position, entity.position());
        }

        #[test]
        fn camera_follows_player_only() {
            let mut fixture = ResolveFixture::new();
            let player = fixture.spawn_player(Vec3::new(7.0, 7.0, 0.0));
            let enemy = fixture.spawn_enemy(Vec3::new(3.0, 3.0, 0.0), 0.0);
            let resolver = PhysicsResolver::new();
            fixture.resolve(
                &resolver,
                Command::Translate {
                    target: enemy,
                    delta: Vec3::X,
                },
            );
            assert_eq!(fixture.camera.position, Vec3::new(7.0, 7.0, 15.0));
            fixture.resolve(
                &resolver,
                Command::Translate {
                    target: player,
                    delta: Vec3::new(0.0, -1.0, 0.0),
                },
            );
            assert_eq!(fixture.camera.position, Vec3::new(7.0, 6.0, 15.0));
        }

        #[test]
        fn flagged_entity_does_not_move() {
            let mut fixture = ResolveFixture::new();
            let enemy = fixture.spawn_enemy(Vec3::new(3.0, 3.0, 0.0), 0.0);
            fixture.arena.get_mut(enemy).unwrap().mark_for_disposal();
            fixture.resolve(
                &PhysicsResolver::new(),
                Command::Translate {
                    target: enemy,
                    delta: Vec3::X,
                },
            );
            assert_eq!(
                fixture.arena.get(enemy).unwrap().position(),
                Vec3::new(3.0, 3.0, 0.0)
            );
        }
    }

    #[test]
    fn set_timer_targets_cooldown() {
        let mut fixture = ResolveFixture::new();
        let enemy = fixture.spawn_enemy(Vec3::new(3.0, 3.0, 0.0), 0.0);
        fixture.resolve(
            &PhysicsResolver::new(),
            Command::SetTimer {
                target: enemy,
                elapsed: 1.5,
            },
        );
        let cooldown = fixture
            .arena
            .get(enemy)
            .and_then(|e| e.as_enemy())
            .map(|c| c.fire_cooldown_elapsed);
        assert_eq!(cooldown, Some(1.5));
    }

    #[test]
    fn unknown_target_is_ignored() {
        let mut fixture = ResolveFixture::new();
        fixture.resolve(
            &PhysicsResolver::new(),
            Command::Translate {
                target: EntityId::new(404),
                delta: Vec3::X,
            },
        );
        assert!(fixture.arena.is_empty());
    }
}
