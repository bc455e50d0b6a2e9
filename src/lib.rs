//! Jumpmaster behaviour layer.
//!
//! Per-entity controllers for a charge-and-release platformer character,
//! built on bevy_ecs. This module exposes the components, resources, systems
//! and events for the headless runner and for integration tests.

pub mod app;
pub mod components;
pub mod error;
pub mod events;
pub mod math;
pub mod prefab;
pub mod resources;
pub mod scheduler;
pub mod snapshot;
pub mod systems;
