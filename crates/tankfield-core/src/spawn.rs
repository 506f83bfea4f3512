//! Two-phase entity construction.
//!
//! A [`Blueprint`] is a pure description of an entity: kind, placement and
//! kind-specific parameters, no assets. [`Blueprint::attach`] resolves the
//! assets the kind needs, builds the [`Representation`] and derives the
//! collider from the resolved geometry. Only attached entities ever reach
//! the arena, so a missing asset aborts that one spawn and nothing else.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::assets::{
    AssetCatalog, Representation, ENEMY_BODY_TEXTURE, ENEMY_TURRET_TEXTURE, EXPLOSION_TEXTURE,
    MUZZLE_FLASH_TEXTURE, PLAYER_BODY_TEXTURE, PLAYER_TURRET_TEXTURE, TANK_MODEL, WALL_TEXTURE,
};
use crate::collider::Collider;
use crate::config::ArenaConfig;
use crate::entity::{
    BulletComponents, EffectComponents, EffectKind, EnemyComponents, EntityId, EntityInner,
    EntityTag, PlayerComponents, TileComponents, TransformState, WallComponents,
};
use crate::error::Result;
use crate::input::InputState;

/// Pure description of an entity to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Blueprint {
    /// The player's tank.
    Player {
        /// Spawn position
        position: Vec3,
        /// Initial heading
        heading: f32,
    },
    /// An enemy tank.
    Enemy {
        /// Spawn position
        position: Vec3,
        /// Initial heading
        heading: f32,
    },
    /// A bullet leaving a muzzle.
    Bullet {
        /// Muzzle point
        position: Vec3,
        /// Flight heading, fixed for the bullet's life
        heading: f32,
        /// Tank that fired
        owner: EntityId,
        /// Kind of that tank
        owner_tag: EntityTag,
    },
    /// A boundary wall block.
    Wall {
        /// Grid cell
        cell: Vec3,
    },
    /// A ground tile.
    Tile {
        /// Grid cell
        cell: Vec3,
        /// Ground texture variant
        ground: usize,
    },
    /// A transient visual effect.
    Effect {
        /// Which effect
        kind: EffectKind,
        /// Where
        position: Vec3,
        /// Facing
        heading: f32,
        /// Size multiplier
        scale: f32,
    },
}

/// Components and representation produced by [`Blueprint::attach`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attached {
    /// Kind-specific state, collider included.
    pub inner: EntityInner,
    /// What the scene graph should draw.
    pub representation: Representation,
}

impl Blueprint {
    /// Kind the blueprint will produce.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Player { .. } => EntityTag::Player,
            Self::Enemy { .. } => EntityTag::Enemy,
            Self::Bullet { .. } => EntityTag::Bullet,
            Self::Wall { .. } => EntityTag::Wall,
            Self::Tile { .. } => EntityTag::Tile,
            Self::Effect { .. } => EntityTag::Effect,
        }
    }

    /// Resolves assets and builds the entity's components.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`](crate::error::SimError::MissingAsset)
    /// if any model or texture the kind needs is not in the catalog.
    pub fn attach(self, assets: &dyn AssetCatalog, config: &ArenaConfig) -> Result<Attached> {
        trace!(kind = %self.tag(), "attaching blueprint");
        let attached = match self {
            Self::Player { position, heading } => {
                let (collider, representation) = tank_parts(
                    assets,
                    config,
                    position,
                    PLAYER_BODY_TEXTURE,
                    PLAYER_TURRET_TEXTURE,
                )?;
                Attached {
                    inner: EntityInner::Player(PlayerComponents {
                        transform: TransformState::new(position, heading),
                        collider,
                        score: 0,
                        input: InputState::default(),
                    }),
                    representation,
                }
            }
            Self::Enemy { position, heading } => {
                let (collider, representation) = tank_parts(
                    assets,
                    config,
                    position,
                    ENEMY_BODY_TEXTURE,
                    ENEMY_TURRET_TEXTURE,
                )?;
                Attached {
                    inner: EntityInner::Enemy(EnemyComponents {
                        transform: TransformState::new(position, heading),
                        collider,
                        health: config.enemy_health,
                        fire_cooldown_elapsed: 0.0,
                    }),
                    representation,
                }
            }
            Self::Bullet {
                position,
                heading,
                owner,
                owner_tag,
            } => Attached {
                inner: EntityInner::Bullet(BulletComponents {
                    transform: TransformState::new(position, heading),
                    collider: Collider::sphere(position, config.bullet_radius),
                    owner,
                    owner_tag,
                    age: 0.0,
                }),
                representation: Representation::Sphere {
                    radius: config.bullet_radius,
                },
            },
            Self::Wall { cell } => {
                let texture = assets.texture(WALL_TEXTURE)?;
                Attached {
                    inner: EntityInner::Wall(WallComponents {
                        transform: TransformState::new(cell, 0.0),
                        collider: Collider::unit_cell(cell),
                    }),
                    representation: Representation::Textured {
                        texture: texture.key.clone(),
                        scale: 1.0,
                    },
                }
            }
            Self::Tile { cell, ground } => {
                let texture = assets.ground_texture(ground)?;
                Attached {
                    inner: EntityInner::Tile(TileComponents {
                        transform: TransformState::new(cell, 0.0),
                        ground,
                    }),
                    representation: Representation::Textured {
                        texture: texture.key.clone(),
                        scale: 1.0,
                    },
                }
            }
            Self::Effect {
                kind,
                position,
                heading,
                scale,
            } => {
                let (key, lifetime) = match kind {
                    EffectKind::MuzzleFlash => (MUZZLE_FLASH_TEXTURE, config.muzzle_flash_lifetime),
                    EffectKind::Explosion => (EXPLOSION_TEXTURE, config.explosion_lifetime * scale),
                };
                let texture = assets.texture(key)?;
                Attached {
                    inner: EntityInner::Effect(EffectComponents {
                        transform: TransformState::new(position, heading),
                        kind,
                        scale,
                        age: 0.0,
                        lifetime,
                    }),
                    representation: Representation::Textured {
                        texture: texture.key.clone(),
                        scale,
                    },
                }
            }
        };
        Ok(attached)
    }
}

/// Collider and representation shared by both tank kinds. The collider is
/// the model's bounding sphere, moved to the spawn position and scaled down
/// by the configured factor.
fn tank_parts(
    assets: &dyn AssetCatalog,
    config: &ArenaConfig,
    position: Vec3,
    body: &str,
    turret: &str,
) -> Result<(Collider, Representation)> {
    let model = assets.model(TANK_MODEL)?;
    let body = assets.texture(body)?;
    let turret = assets.texture(turret)?;
    let collider = Collider::sphere(
        position + model.bounds_center,
        model.bounds_radius * config.tank_collider_scale,
    );
    let representation = Representation::Model {
        model: model.key.clone(),
        textures: vec![body.key.clone(), turret.key.clone()],
    };
    Ok((collider, representation))
}
