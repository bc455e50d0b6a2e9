//! Collider shapes and their world-space bounds.
//!
//! A [`Collider`] is centred on the entity position plus `offset`. Only the
//! axis-aligned [`Aabb`] returned by [`Collider::bounds`] takes part in the
//! physics step; the shape payload is kept for snapshots and for hosts with a
//! real solver.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build from a centre and a full size. Negative sizes are normalized.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap test; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Overlap test with both boxes grown by `margin` on every side.
    pub fn overlaps_with_margin(&self, other: &Aabb, margin: f32) -> bool {
        self.min.x - margin < other.max.x
            && self.max.x + margin > other.min.x
            && self.min.y - margin < other.max.y
            && self.max.y + margin > other.min.y
    }

    /// Penetration depth along each axis, or `None` when the boxes are apart.
    pub fn penetration(&self, other: &Aabb) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }
        let x = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let y = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        Some(Vec2::new(x, y))
    }

    /// Box shared by both, clamped to zero size when they only touch.
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        Aabb {
            min,
            max: max.max(min),
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Geometric payload of a collider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColliderShape {
    Box { size: Vec2 },
    Circle { radius: f32 },
    /// Segment between two points relative to the collider centre.
    Edge { start: Vec2, end: Vec2 },
    /// Convex polygon relative to the collider centre.
    Polygon { points: Vec<Vec2> },
}

/// Surface response parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub elasticity: f32,
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            elasticity: 0.0,
            friction: 0.0,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    pub offset: Vec2,
    /// Trigger colliders report contacts but are never resolved.
    pub is_trigger: bool,
    pub material: Material,
}

impl Collider {
    /// Solid box of the given size.
    pub fn rect(width: f32, height: f32) -> Self {
        Self {
            shape: ColliderShape::Box {
                size: Vec2::new(width, height),
            },
            offset: Vec2::ZERO,
            is_trigger: false,
            material: Material::default(),
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            ..Self::rect(0.0, 0.0)
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// World-space bounds for a collider attached at `position`.
    pub fn bounds(&self, position: Vec2) -> Aabb {
        let center = position + self.offset;
        match &self.shape {
            ColliderShape::Box { size } => Aabb::from_center(center, *size),
            ColliderShape::Circle { radius } => Aabb::from_center(center, Vec2::splat(radius * 2.0)),
            ColliderShape::Edge { start, end } => Aabb {
                min: center + start.min(*end),
                max: center + start.max(*end),
            },
            ColliderShape::Polygon { points } => {
                let Some(first) = points.first() else {
                    return Aabb::from_center(center, Vec2::ZERO);
                };
                let (min, max) = points
                    .iter()
                    .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
                Aabb {
                    min: center + min,
                    max: center + max,
                }
            }
        }
    }

    /// Full height of the bounds.
    pub fn height(&self) -> f32 {
        self.bounds(Vec2::ZERO).size().y
    }
}
