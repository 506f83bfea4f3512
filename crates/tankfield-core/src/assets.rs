//! Asset catalog seam and entity representations.
//!
//! The simulation never loads files. It asks an [`AssetCatalog`] for models
//! and textures by key while attaching an entity, and keeps the resulting
//! [`Representation`] as an opaque handle for the scene graph. A model also
//! reports its bounding sphere, which is where tank colliders come from.
//!
//! [`AssetLibrary`] is the in-memory catalog. [`AssetLibrary::standard`]
//! registers the stock key set.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{AssetKind, Result, SimError};

/// Key of the tank model.
pub const TANK_MODEL: &str = "tank";
/// Player tank body texture.
pub const PLAYER_BODY_TEXTURE: &str = "tank-body";
/// Player tank turret texture.
pub const PLAYER_TURRET_TEXTURE: &str = "tank-turret";
/// Enemy tank body texture.
pub const ENEMY_BODY_TEXTURE: &str = "tank-body-red";
/// Enemy tank turret texture.
pub const ENEMY_TURRET_TEXTURE: &str = "tank-turret-red";
/// Wall texture.
pub const WALL_TEXTURE: &str = "wall";
/// Muzzle flash sprite.
pub const MUZZLE_FLASH_TEXTURE: &str = "muzzle-flash";
/// Explosion sprite.
pub const EXPLOSION_TEXTURE: &str = "explosion";

/// A model with its local bounding sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    /// Lookup key.
    pub key: String,
    /// Bounding sphere center relative to the model origin.
    pub bounds_center: Vec3,
    /// Bounding sphere radius.
    pub bounds_radius: f32,
}

/// A texture handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureAsset {
    /// Lookup key.
    pub key: String,
}

/// Resolves asset keys for the attach phase.
pub trait AssetCatalog {
    /// Looks up a model.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`] if the key is unknown.
    fn model(&self, key: &str) -> Result<&ModelAsset>;

    /// Looks up a texture.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`] if the key is unknown.
    fn texture(&self, key: &str) -> Result<&TextureAsset>;

    /// Number of interchangeable ground textures.
    fn ground_texture_count(&self) -> usize;

    /// Looks up a ground texture by index.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingAsset`] if the index is out of range.
    fn ground_texture(&self, index: usize) -> Result<&TextureAsset>;
}

/// In-memory asset catalog.
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    models: HashMap<String, ModelAsset>,
    textures: HashMap<String, TextureAsset>,
    ground: Vec<TextureAsset>,
}

impl AssetLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a library holding the stock game assets: the tank model,
    /// player and enemy tank textures, the wall texture, effect sprites and
    /// eight ground textures `g1`..`g8`.
    #[must_use]
    pub fn standard() -> Self {
        let mut library = Self::new();
        library.insert_model(ModelAsset {
            key: TANK_MODEL.to_string(),
            bounds_center: Vec3::new(0.0, 0.0, 0.35),
            bounds_radius: 0.6,
        });
        for key in [
            PLAYER_BODY_TEXTURE,
            PLAYER_TURRET_TEXTURE,
            ENEMY_BODY_TEXTURE,
            ENEMY_TURRET_TEXTURE,
            WALL_TEXTURE,
            MUZZLE_FLASH_TEXTURE,
            EXPLOSION_TEXTURE,
        ] {
            library.insert_texture(key);
        }
        for i in 1..=8 {
            library.push_ground_texture(&format!("g{i}"));
        }
        library
    }

    /// Registers a model, replacing any model with the same key.
    pub fn insert_model(&mut self, model: ModelAsset) {
        self.models.insert(model.key.clone(), model);
    }

    /// Registers a texture.
    pub fn insert_texture(&mut self, key: &str) {
        self.textures.insert(
            key.to_string(),
            TextureAsset {
                key: key.to_string(),
            },
        );
    }

    /// Removes a texture. Returns `true` if it was present.
    pub fn remove_texture(&mut self, key: &str) -> bool {
        self.textures.remove(key).is_some()
    }

    /// Appends a ground texture variant.
    pub fn push_ground_texture(&mut self, key: &str) {
        self.ground.push(TextureAsset {
            key: key.to_string(),
        });
    }
}

impl AssetCatalog for AssetLibrary {
    fn model(&self, key: &str) -> Result<&ModelAsset> {
        self.models.get(key).ok_or_else(|| SimError::MissingAsset {
            kind: AssetKind::Model,
            key: key.to_string(),
        })
    }

    fn texture(&self, key: &str) -> Result<&TextureAsset> {
        self.textures.get(key).ok_or_else(|| SimError::MissingAsset {
            kind: AssetKind::Texture,
            key: key.to_string(),
        })
    }

    fn ground_texture_count(&self) -> usize {
        self.ground.len()
    }

    fn ground_texture(&self, index: usize) -> Result<&TextureAsset> {
        self.ground.get(index).ok_or_else(|| SimError::MissingAsset {
            kind: AssetKind::Texture,
            key: format!("ground[{index}]"),
        })
    }
}

/// What the scene graph should draw for an entity. Opaque to the
/// simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Representation {
    /// Textured model (tanks).
    Model {
        /// The model key.
        model: String,
        /// Textures applied to the model's parts, in part order.
        textures: Vec<String>,
    },
    /// Textured primitive: a cube for walls, a plane for tiles, a billboard
    /// for effects.
    Textured {
        /// The texture key.
        texture: String,
        /// Uniform scale.
        scale: f32,
    },
    /// Untextured sphere (bullets).
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
}
