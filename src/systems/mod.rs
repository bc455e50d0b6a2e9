//! Behaviour systems.
//!
//! Every system returns `Result<(), BehaviourError>` and is driven by the
//! [`BehaviourScheduler`](crate::scheduler::BehaviourScheduler) through its
//! registered `SystemId`. Observers react to the contact events raised by
//! the physics step.
//!
//! Submodules overview
//! - [`animation`] – advance animators and publish the current image
//! - [`camera`] – move the camera one screen at a time after the player
//! - [`contact`] – place sensors and feed trigger events to their trackers
//! - [`fall`] – time falls and react to landings
//! - [`jump`] – charge, release and launch
//! - [`knockback`] – cache velocity and bounce off platform hits
//! - [`movement`] – sample input and walk while grounded
//! - [`physics`] – stand-in integrator and contact detection
//! - [`sound`] – publish the sounds raised during the tick
//! - [`time`] – update simulation time and the fixed-step accumulator

pub mod animation;
pub mod camera;
pub mod contact;
pub mod fall;
pub mod jump;
pub mod knockback;
pub mod movement;
pub mod physics;
pub mod sound;
pub mod time;
