use std::fmt;

use breach_ecs::{Component, Entity};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::layers::CollisionLayers;

/// Collision shape. Detection only exercises box tests; the other shapes
/// participate through their bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderShape {
    Box,
    Sphere,
    Capsule,
    Mesh,
}

/// One side's view of a detected collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub other: Entity,
    /// Midpoint of the two bounds' centers; an approximation, not a
    /// manifold point.
    pub point: Vec3,
    /// Direction from this collider's center toward the other's.
    pub normal: Vec3,
    /// Always 0.0; no penetration depth is computed.
    pub penetration: f32,
    /// Simulation time of the detection.
    pub time: f32,
}

pub type ContactCallback = Box<dyn FnMut(Entity, &Contact) + Send + Sync>;

/// Axis-aligned box collider component.
///
/// `bounds` is refreshed by the collision system every tick from the
/// entity's transform; the collider holds no position state of its own.
/// The trigger flag selects which callback fires when a pair resolves.
pub struct Collider {
    pub shape: ColliderShape,
    /// Full extents of the box (half on each side of the center).
    pub size: Vec3,
    /// Offset of the box center from the entity position.
    pub offset: Vec3,
    pub layer: CollisionLayers,
    pub mask: CollisionLayers,
    pub is_trigger: bool,
    pub bounds: Aabb,
    pub(crate) on_collision: Option<ContactCallback>,
    pub(crate) on_trigger: Option<ContactCallback>,
}

impl Component for Collider {}

impl Collider {
    /// Box collider with the given full extents. Defaults: environment
    /// layer, reacts to everything, solid.
    pub fn new(size: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box,
            size,
            offset: Vec3::ZERO,
            layer: CollisionLayers::ENVIRONMENT,
            mask: CollisionLayers::all(),
            is_trigger: false,
            bounds: Aabb::ZERO,
            on_collision: None,
            on_trigger: None,
        }
    }

    pub fn with_shape(mut self, shape: ColliderShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayers) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_mask(mut self, mask: CollisionLayers) -> Self {
        self.mask = mask;
        self
    }

    /// Mark as a trigger: overlap is reported through `on_trigger` instead
    /// of `on_collision`.
    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    pub fn on_collision(mut self, callback: impl FnMut(Entity, &Contact) + Send + Sync + 'static) -> Self {
        self.on_collision = Some(Box::new(callback));
        self
    }

    pub fn on_trigger(mut self, callback: impl FnMut(Entity, &Contact) + Send + Sync + 'static) -> Self {
        self.on_trigger = Some(Box::new(callback));
        self
    }

    /// Recompute world bounds around the given entity position.
    pub fn refresh_bounds(&mut self, position: Vec3) {
        self.bounds = Aabb::from_center_half_extents(position + self.offset, self.size * 0.5);
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("shape", &self.shape)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .field("layer", &self.layer)
            .field("mask", &self.mask)
            .field("is_trigger", &self.is_trigger)
            .field("bounds", &self.bounds)
            .field("has_on_collision", &self.on_collision.is_some())
            .field("has_on_trigger", &self.on_trigger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_centers_bounds_on_position_plus_offset() {
        let mut collider = Collider::new(Vec3::new(2.0, 4.0, 6.0)).with_offset(Vec3::Y);
        collider.refresh_bounds(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(collider.bounds.min, Vec3::new(9.0, -1.0, -3.0));
        assert_eq!(collider.bounds.max, Vec3::new(11.0, 3.0, 3.0));
    }

    #[test]
    fn builder_configures_layers_and_trigger() {
        let collider = Collider::new(Vec3::ONE)
            .with_layer(CollisionLayers::ENEMY)
            .with_mask(CollisionLayers::BULLET)
            .trigger();
        assert_eq!(collider.layer, CollisionLayers::ENEMY);
        assert_eq!(collider.mask, CollisionLayers::BULLET);
        assert!(collider.is_trigger);
    }
}
