//! ECS components for entities.
//!
//! This module groups the component types attached to game objects: the
//! shared physical state (transform, rigid body, collider), the presentation
//! state read by the host (renderer, properties), and the per-entity
//! behaviour controllers driven by the scheduler.
//!
//! Submodules overview:
//! - [`animator`] – clip table and playback state for frame animations
//! - [`collider`] – collider shapes, materials and world-space bounds
//! - [`contact`] – contact sets and ground/ceiling sensor trackers
//! - [`fall`] – long-fall timer and landing classification
//! - [`jump`] – charge-and-release jump state machine
//! - [`knockback`] – bounce reaction to airborne platform hits
//! - [`movement`] – walking and facing while grounded
//! - [`object`] – tag and active flag shared by every game object
//! - [`properties`] – string-keyed property bag for the presentation layer
//! - [`renderer`] – drawn size and offset of an entity
//! - [`rigidbody`] – body kind, velocity and queued accelerations
//! - [`sound`] – per-tick sound event set
//! - [`transform`] – position, rotation and scale

pub mod animator;
pub mod collider;
pub mod contact;
pub mod fall;
pub mod jump;
pub mod knockback;
pub mod movement;
pub mod object;
pub mod properties;
pub mod renderer;
pub mod rigidbody;
pub mod sound;
pub mod transform;
