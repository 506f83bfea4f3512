//! Initial map construction.
//!
//! [`populate`] builds the arena a fresh simulation starts from, in a fixed
//! order so the same seed always produces the same IDs:
//!
//! 1. One ground tile per grid cell, row-major, each with a random ground
//!    texture
//! 2. The player at the configured spawn point, heading 0
//! 3. The initial enemies on free cells, each with a random heading
//! 4. Walls on every boundary cell, row-major, each corner once
//! 5. The initial score of 0, published to the scoreboard

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use tracing::info;

use crate::entity::EntityId;
use crate::error::Result;
use crate::population::find_spawn_cell;
use crate::simulation::Simulation;
use crate::spawn::Blueprint;

/// Builds the map and returns the player's ID.
///
/// # Errors
///
/// - [`SimError::MissingAsset`](crate::error::SimError::MissingAsset) if a
///   map entity fails to attach
/// - [`SimError::NoSpawnCell`](crate::error::SimError::NoSpawnCell) if an
///   initial enemy cannot be placed
#[allow(clippy::cast_precision_loss)]
pub fn populate(sim: &mut Simulation) -> Result<EntityId> {
    let size = sim.config().map_size;
    let edge = sim.config().edge();

    let ground_count = sim.assets().ground_texture_count();
    for y in 0..size {
        for x in 0..size {
            let ground = if ground_count == 0 {
                0
            } else {
                sim.placement().2.gen_range(0..ground_count)
            };
            sim.spawn(Blueprint::Tile {
                cell: Vec3::new(x as f32, y as f32, 0.0),
                ground,
            })?;
        }
    }

    let spawn_point = sim.config().player_spawn;
    let player = sim.spawn(Blueprint::Player {
        position: spawn_point,
        heading: 0.0,
    })?;

    for _ in 0..sim.config().enemy_count {
        let (arena, config, rng) = sim.placement();
        let position = find_spawn_cell(arena, config, rng)?;
        let heading = rng.gen_range(0.0..TAU);
        sim.spawn(Blueprint::Enemy { position, heading })?;
    }

    for y in 0..size {
        for x in 0..size {
            if x == 0 || y == 0 || x == edge || y == edge {
                sim.spawn(Blueprint::Wall {
                    cell: Vec3::new(x as f32, y as f32, 0.0),
                })?;
            }
        }
    }

    sim.set_score(player, 0)?;
    info!(
        map_size = size,
        entities = sim.arena().entity_count(),
        "arena populated"
    );
    Ok(player)
}
