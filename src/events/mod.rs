//! Event types.
//!
//! - [`contact`] – trigger and collision events emitted by the physics step
//!   and consumed by the contact trackers and the knockback controller.

pub mod contact;
