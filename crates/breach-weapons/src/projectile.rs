use breach_ecs::Entity;
use glam::Vec3;

/// A live bullet. Pool value owned by the weapon system, not an ECS
/// component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
    /// Seconds of flight remaining before the bullet is pruned
    pub lifespan: f32,
    /// Firing entity, excluded from hit tests against this bullet
    pub owner: Entity,
}
