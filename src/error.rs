//! Error types.
//!
//! Controllers only fail on broken entity setup (a required sibling component
//! is gone). Everything optional is skipped silently by the systems and never
//! reaches these types.

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::scheduler::Phase;

/// Hard failure raised by a behaviour system.
#[derive(Debug, Error)]
pub enum BehaviourError {
    /// A controller's entity lost a component it cannot work without.
    #[error("{controller} on {entity} requires a {sibling} component")]
    MissingSibling {
        entity: Entity,
        controller: &'static str,
        sibling: &'static str,
    },
    /// A resource the behaviour layer needs was never inserted.
    #[error("missing resource {0}")]
    MissingResource(&'static str),
}

/// Failure that aborted a scheduler tick.
#[derive(Debug, Error)]
pub enum TickError {
    /// A registered system returned an error.
    #[error("{phase:?} system '{system}' failed: {source}")]
    Behaviour {
        phase: Phase,
        system: String,
        #[source]
        source: BehaviourError,
    },
    /// The world refused to run a registered system.
    #[error("{phase:?} system '{system}' could not run: {message}")]
    Dispatch {
        phase: Phase,
        system: String,
        message: String,
    },
    /// [`WorldTime`](crate::resources::worldtime::WorldTime) is not in the world.
    #[error("world time resource is missing")]
    MissingTime,
}

/// Failure while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to load ini {path}: {message}")]
    Ini { path: String, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
