//! Tilemap data types.
//!
//! Provides simple serializable structs for the level layout. Tile rows are
//! counted from the top of the map, so the prefab flips them into the Y-up
//! world when it spawns tiles.

use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Single tile placement within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TilePosition {
    /// X coordinate in tiles.
    pub x: u32,
    /// Y coordinate in tiles, counted from the top row.
    pub y: u32,
    /// Tile identifier (tileset-local).
    pub id: u32,
}

/// A named tile layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TileLayer {
    pub name: String,
    /// Whether tiles of this layer get a solid collider.
    #[serde(default)]
    pub collider: bool,
    pub tiles: Vec<TilePosition>,
}

impl TileLayer {
    /// Layers whose name mentions "platform" hold walkable terrain.
    pub fn is_platform(&self) -> bool {
        self.name.to_lowercase().contains("platform")
    }
}

/// Tilemap metadata and layers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tilemap {
    /// Size of a tile in world units.
    pub tile_size: f32,
    /// Map width in tiles.
    pub map_width: u32,
    /// Map height in tiles.
    pub map_height: u32,
    pub layers: Vec<TileLayer>,
    /// Image key per tile id.
    #[serde(default)]
    pub tile_images: FxHashMap<u32, String>,
}

impl Tilemap {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let map: Tilemap = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        if !(map.tile_size > 0.0) {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        info!(
            "Loaded map from {:?}: {}x{} tiles, {} layers",
            path,
            map.map_width,
            map.map_height,
            map.layers.len()
        );
        Ok(map)
    }

    /// Row index counted from the bottom of the map.
    pub fn world_row(&self, y: u32) -> i64 {
        i64::from(self.map_height) - 1 - i64::from(y)
    }
}
