//! Player configuration loaded from JSON.
//!
//! The configuration is immutable once loaded: the prefab copies the
//! relevant sections into each controller when the player is spawned.
//!
//! # File Format
//!
//! ```json
//! {
//!   "object": { "position": [0, 0], "collider_size": [32, 40], ... },
//!   "movement": { "speed": 150 },
//!   "jump": { "impulse": 500, "min_impulse": 150, "max_impulse": 650, ... },
//!   "knockback": { "impulse": 180, "diagonal_angle": 60 },
//!   "fall": { "allowed_duration": 0.9 },
//!   "animations": { "idle": { "repeat": true, "duration": 0.2, "frames": ["..."] } }
//! }
//! ```

use std::path::Path;

use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::animator::{AnimationClip, ClipTable};
use crate::error::ConfigError;

/// Physical description of the player object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub position: Vec2,
    pub collider_size: Vec2,
    #[serde(default)]
    pub collider_offset: Vec2,
    pub renderer_size: Vec2,
    #[serde(default)]
    pub renderer_offset: Vec2,
    pub mass: f32,
    #[serde(default)]
    pub drag: f32,
    #[serde(default)]
    pub friction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Horizontal speed in world units per second.
    pub speed: f32,
}

/// Clock used to accumulate jump charge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeClock {
    /// Accumulate in the fixed-rate phase with the fixed step.
    #[default]
    Fixed,
    /// Accumulate in the variable-rate phase with the tick delta.
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpConfig {
    /// Charge gained per second of holding jump, before the multiplier.
    pub impulse: f32,
    #[serde(default = "default_multiplier")]
    pub impulse_multiplier: f32,
    pub min_impulse: f32,
    pub max_impulse: f32,
    /// Maximum lean of the launch direction, in degrees.
    pub diagonal_angle: f32,
    #[serde(default)]
    pub charge_clock: ChargeClock,
    /// Seconds a charge survives without ground contact.
    #[serde(default)]
    pub leniency: Option<f32>,
}

fn default_multiplier() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnockbackConfig {
    pub impulse: f32,
    /// Maximum lean above the horizontal, in degrees.
    pub diagonal_angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallConfig {
    /// Seconds of falling tolerated before a landing counts as hard.
    pub allowed_duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub object: ObjectConfig,
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub knockback: KnockbackConfig,
    pub fall: FallConfig,
    pub animations: ClipTable,
}

impl PlayerConfig {
    /// Read and validate a player configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: PlayerConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        info!(
            "Loaded player config from {:?}: {} animations",
            path,
            config.animations.len()
        );
        Ok(config)
    }

    /// Check the invariants the controllers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let jump = &self.jump;
        if !(jump.max_impulse > 0.0) {
            return Err(ConfigError::Invalid("jump.max_impulse must be positive".into()));
        }
        if jump.min_impulse < 0.0 || jump.min_impulse > jump.max_impulse {
            return Err(ConfigError::Invalid(
                "jump.min_impulse must be within [0, max_impulse]".into(),
            ));
        }
        if jump.impulse < 0.0 || jump.impulse_multiplier < 0.0 {
            return Err(ConfigError::Invalid("jump charge rate must not be negative".into()));
        }
        if jump.leniency.is_some_and(|l| l < 0.0) {
            return Err(ConfigError::Invalid("jump.leniency must not be negative".into()));
        }
        if self.fall.allowed_duration < 0.0 {
            return Err(ConfigError::Invalid("fall.allowed_duration must not be negative".into()));
        }
        if !(self.object.mass > 0.0) {
            return Err(ConfigError::Invalid("object.mass must be positive".into()));
        }
        for (name, clip) in &self.animations {
            validate_clip(name, clip)?;
        }
        Ok(())
    }
}

fn validate_clip(name: &str, clip: &AnimationClip) -> Result<(), ConfigError> {
    if clip.duration < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "animation '{name}' has a negative frame duration"
        )));
    }
    if clip.frames.is_empty() {
        return Err(ConfigError::Invalid(format!("animation '{name}' has no frames")));
    }
    Ok(())
}
