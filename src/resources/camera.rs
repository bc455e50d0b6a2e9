//! Shared 2D camera resource.
//!
//! [`Camera`] holds the view the host draws: a centre in world units and a
//! pixel size with a pixels-per-unit factor. [`CameraController`] moves it one
//! screen height at a time so the player always sits on the current screen.

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use serde::Serialize;

use crate::components::collider::Aabb;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    /// Centre of the view in world units.
    pub position: Vec2,
    /// View width in pixels.
    pub width: f32,
    /// View height in pixels.
    pub height: f32,
    /// Pixels per world unit.
    pub ppu: f32,
}

impl Camera {
    pub fn new(position: Vec2, width: f32, height: f32, ppu: f32) -> Self {
        Self {
            position,
            width,
            height,
            ppu,
        }
    }

    /// View size in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / self.ppu
    }

    /// View height in world units.
    pub fn world_height(&self) -> f32 {
        self.height / self.ppu
    }

    pub fn view(&self) -> Aabb {
        Aabb::from_center(self.position, self.world_size())
    }

    /// Whether anything inside `bounds` would be on screen.
    pub fn is_visible(&self, bounds: &Aabb) -> bool {
        self.view().overlaps(bounds)
    }
}

/// Screen-by-screen follow state.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraController {
    /// Camera position when the level started.
    pub initial: Vec2,
    /// Where the current transition started.
    pub previous: Vec2,
    /// Target of the current level.
    pub current: Vec2,
    /// Progress of the current transition in `[0, 1]`.
    pub transition: f32,
    /// Transitions per second.
    pub speed: f32,
}

impl CameraController {
    pub fn new(camera: &Camera, speed: f32) -> Self {
        Self {
            initial: camera.position,
            previous: camera.position,
            current: camera.position,
            transition: 1.0,
            speed: if speed > 0.0 { speed } else { 1.0 },
        }
    }

    /// Screen level the bottom edge `min_y` belongs to.
    pub fn level_for(&self, camera: &Camera, min_y: f32) -> i32 {
        let h = camera.world_height();
        ((min_y - self.initial.y + h * 0.5) / h).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_size_uses_ppu() {
        let cam = Camera::new(Vec2::ZERO, 640.0, 360.0, 2.0);
        assert_eq!(cam.world_size(), Vec2::new(320.0, 180.0));
    }

    #[test]
    fn test_visibility() {
        let cam = Camera::new(Vec2::ZERO, 100.0, 100.0, 1.0);
        assert!(cam.is_visible(&Aabb::from_center(Vec2::new(40.0, 0.0), Vec2::splat(20.0))));
        assert!(!cam.is_visible(&Aabb::from_center(Vec2::new(200.0, 0.0), Vec2::splat(20.0))));
    }

    #[test]
    fn test_levels() {
        let cam = Camera::new(Vec2::ZERO, 100.0, 100.0, 1.0);
        let ctl = CameraController::new(&cam, 0.0);
        assert_eq!(ctl.speed, 1.0);
        assert_eq!(ctl.level_for(&cam, 0.0), 0);
        assert_eq!(ctl.level_for(&cam, 49.0), 0);
        assert_eq!(ctl.level_for(&cam, 51.0), 1);
        assert_eq!(ctl.level_for(&cam, -51.0), -1);
    }
}
