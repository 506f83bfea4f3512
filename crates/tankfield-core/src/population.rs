//! Lifecycle policies: reactions to entities leaving the arena.
//!
//! The disposal sweep emits one [`Event::Disposed`] per removed entity and
//! hands each to every registered [`LifecyclePolicy`]. [`EnemyPopulation`]
//! is the stock policy: every enemy that leaves is replaced by a new one on
//! a free grid cell, so the enemy count stays constant.
//!
//! # Spawn cells
//!
//! [`find_spawn_cell`] looks for a grid cell in
//! `[spawn_cell_min, spawn_cell_max]²` at least `respawn_min_distance` away
//! (on the ground plane) from every live tank. It draws a bounded number of
//! random cells first, then scans all cells in row-major order and takes
//! the first valid one.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::entity::EntityTag;
use crate::error::{Result, SimError};
use crate::output::Event;
use crate::resolver::ResolveContext;
use crate::spawn::Blueprint;

/// Reacts to lifecycle events after the disposal sweep.
pub trait LifecyclePolicy {
    /// Handles one event. Entities spawned here first update next tick.
    fn on_event(&mut self, event: &Event, ctx: &mut ResolveContext<'_>, rng: &mut ChaCha8Rng);
}

/// Keeps the enemy count constant by respawning every disposed enemy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyPopulation;

impl EnemyPopulation {
    /// Creates the policy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LifecyclePolicy for EnemyPopulation {
    fn on_event(&mut self, event: &Event, ctx: &mut ResolveContext<'_>, rng: &mut ChaCha8Rng) {
        let Event::Disposed {
            tag: EntityTag::Enemy,
            ..
        } = event
        else {
            return;
        };

        let position = match find_spawn_cell(ctx.arena, ctx.config, rng) {
            Ok(position) => position,
            Err(err) => {
                warn!(error = %err, "enemy respawn skipped");
                ctx.record(Event::RespawnSkipped {
                    attempts: ctx.config.respawn_max_attempts,
                });
                return;
            }
        };
        let heading = rng.gen_range(0.0..TAU);
        match ctx.spawn(Blueprint::Enemy { position, heading }) {
            Ok(enemy) => {
                info!(enemy = %enemy, x = position.x, y = position.y, "enemy respawned");
                ctx.record(Event::EnemyRespawned { enemy, position });
            }
            Err(err) => warn!(error = %err, "enemy respawn failed to attach"),
        }
    }
}

/// Finds a free grid cell for an enemy.
///
/// # Errors
///
/// Returns [`SimError::NoSpawnCell`] if no cell in range is far enough from
/// every live tank.
#[allow(clippy::cast_precision_loss)]
pub fn find_spawn_cell(arena: &Arena, config: &ArenaConfig, rng: &mut ChaCha8Rng) -> Result<Vec3> {
    let tanks: Vec<Vec2> = arena
        .live_tank_positions()
        .into_iter()
        .map(|p| p.truncate())
        .collect();
    let is_free = |x: i32, y: i32| {
        let cell = Vec2::new(x as f32, y as f32);
        tanks
            .iter()
            .all(|t| t.distance(cell) >= config.respawn_min_distance)
    };

    let (min, max) = (config.spawn_cell_min, config.spawn_cell_max);
    for _ in 0..config.respawn_max_attempts {
        let x = rng.gen_range(min..=max);
        let y = rng.gen_range(min..=max);
        if is_free(x, y) {
            return Ok(Vec3::new(x as f32, y as f32, 0.0));
        }
    }

    for y in min..=max {
        for x in min..=max {
            if is_free(x, y) {
                return Ok(Vec3::new(x as f32, y as f32, 0.0));
            }
        }
    }

    Err(SimError::NoSpawnCell {
        attempts: config.respawn_max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::entity::EntityId;
    use crate::tests::{spawn_enemy, spawn_player, ResolveFixture};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn horizontal(a: Vec3, b: Vec3) -> f32 {
        a.truncate().distance(b.truncate())
    }

    mod cell_tests {
        use super::*;

        #[test]
        fn empty_arena_accepts_any_cell_in_range() {
            let arena = Arena::new(15);
            let config = ArenaConfig::default();
            let cell = find_spawn_cell(&arena, &config, &mut rng()).unwrap();
            assert!((2.0..=12.0).contains(&cell.x));
            assert!((2.0..=12.0).contains(&cell.y));
            assert!(cell.z.abs() < f32::EPSILON);
        }

        #[test]
        fn keeps_distance_from_tanks() {
            let mut arena = Arena::new(15);
            let player = Vec3::new(7.0, 7.0, 0.0);
            spawn_player(&mut arena, player);
            let enemy = Vec3::new(4.0, 4.0, 0.0);
            spawn_enemy(&mut arena, enemy, 0.0);
            let config = ArenaConfig::default();
            let mut rng = rng();
            for _ in 0..50 {
                let cell = find_spawn_cell(&arena, &config, &mut rng).unwrap();
                assert!(horizontal(cell, player) >= 2.0);
                assert!(horizontal(cell, enemy) >= 2.0);
            }
        }

        #[test]
        fn ordered_scan_finds_last_free_cell() {
            let mut arena = Arena::new(15);
            let config = ArenaConfig {
                spawn_cell_min: 2,
                spawn_cell_max: 4,
                respawn_max_attempts: 0,
                ..ArenaConfig::default()
            };
            spawn_player(&mut arena, Vec3::new(2.0, 2.0, 0.0));
            let cell = find_spawn_cell(&arena, &config, &mut rng()).unwrap();
            assert_eq!(cell, Vec3::new(4.0, 2.0, 0.0));
        }

        #[test]
        fn crowded_range_fails() {
            let mut arena = Arena::new(15);
            let config = ArenaConfig {
                spawn_cell_min: 6,
                spawn_cell_max: 8,
                respawn_max_attempts: 5,
                ..ArenaConfig::default()
            };
            spawn_player(&mut arena, Vec3::new(7.0, 7.0, 0.0));
            let err = find_spawn_cell(&arena, &config, &mut rng()).unwrap_err();
            assert!(matches!(err, SimError::NoSpawnCell { attempts: 5 }));
        }

        #[test]
        fn flagged_tanks_do_not_block() {
            let mut arena = Arena::new(15);
            let config = ArenaConfig {
                spawn_cell_min: 7,
                spawn_cell_max: 7,
                ..ArenaConfig::default()
            };
            let enemy = spawn_enemy(&mut arena, Vec3::new(7.0, 7.0, 0.0), 0.0);
            arena.get_mut(enemy).unwrap().mark_for_disposal();
            assert!(find_spawn_cell(&arena, &config, &mut rng()).is_ok());
        }
    }

    mod policy_tests {
        use super::*;

        fn disposed(tag: EntityTag) -> Event {
            Event::Disposed {
                id: EntityId::new(40),
                tag,
                position: Vec3::new(5.0, 5.0, 0.0),
            }
        }

        #[test]
        fn disposed_enemy_is_replaced() {
            let mut fixture = ResolveFixture::new();
            fixture.spawn_player(Vec3::new(7.0, 7.0, 0.0));
            let mut rng = rng();
            EnemyPopulation::new().on_event(&disposed(EntityTag::Enemy), &mut fixture.ctx(), &mut rng);
            assert_eq!(fixture.arena.count_live(EntityTag::Enemy), 1);
            assert!(fixture
                .events
                .iter()
                .any(|r| matches!(r.event, Event::EnemyRespawned { .. })));
        }

        #[test]
        fn other_kinds_are_ignored() {
            let mut fixture = ResolveFixture::new();
            let mut rng = rng();
            let mut policy = EnemyPopulation::new();
            for tag in [EntityTag::Bullet, EntityTag::Effect, EntityTag::Player] {
                policy.on_event(&disposed(tag), &mut fixture.ctx(), &mut rng);
            }
            assert!(fixture.arena.is_empty());
            assert!(fixture.events.is_empty());
        }

        #[test]
        fn no_cell_records_skip() {
            let mut fixture = ResolveFixture::new();
            fixture.config.spawn_cell_min = 7;
            fixture.config.spawn_cell_max = 7;
            fixture.spawn_player(Vec3::new(7.0, 7.0, 0.0));
            let mut rng = rng();
            EnemyPopulation::new().on_event(&disposed(EntityTag::Enemy), &mut fixture.ctx(), &mut rng);
            assert_eq!(fixture.arena.count_live(EntityTag::Enemy), 0);
            assert_eq!(
                fixture.events.last().map(|r| &r.event),
                Some(&Event::RespawnSkipped { attempts: 256 })
            );
        }
    }
}
