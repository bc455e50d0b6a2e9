//! ECS resources.
//!
//! Global, single-instance data shared across systems.
//!
//! Submodules overview:
//! - [`actions`] – held state and edges of the gameplay actions
//! - [`camera`] – camera view and screen-by-screen follow state
//! - [`gameconfig`] – engine settings loaded from an INI file
//! - [`physics`] – gravity and contact bookkeeping for the physics step
//! - [`playerconfig`] – player tuning loaded from JSON
//! - [`tilemap`] – level layout loaded from JSON
//! - [`worldtime`] – variable and fixed simulation clocks

pub mod actions;
pub mod camera;
pub mod gameconfig;
pub mod physics;
pub mod playerconfig;
pub mod tilemap;
pub mod worldtime;
