//! World-setup helpers for demo and test scenes

use breach_core::Transform;
use breach_ecs::{Entity, World};
use breach_physics::{Collider, CollisionLayers};
use glam::Vec3;

/// Create a static box collider entity at the given position. A thin
/// convenience wrapper over the core world operations, not part of the
/// core contract.
pub fn create_static_collider(
    world: &mut World,
    position: Vec3,
    size: Vec3,
    layer: CollisionLayers,
) -> Entity {
    let entity = world.create_entity();
    world.add_component_immediate(entity, Transform::from_position(position));
    world.add_component_immediate(entity, Collider::new(size).with_layer(layer));
    entity
}

/// Entities created by `setup_test_arena`.
pub struct Arena {
    pub ground: Entity,
    pub walls: [Entity; 4],
    pub targets: Vec<Entity>,
}

/// Static layout used by demos and integration tests: a ground slab, four
/// walls, and a row of enemy-layer target blocks tagged "target".
pub fn setup_test_arena(world: &mut World) -> Arena {
    let ground = create_static_collider(
        world,
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(40.0, 1.0, 40.0),
        CollisionLayers::ENVIRONMENT,
    );

    let walls = [
        create_static_collider(
            world,
            Vec3::new(0.0, 2.0, -20.0),
            Vec3::new(40.0, 4.0, 1.0),
            CollisionLayers::ENVIRONMENT,
        ),
        create_static_collider(
            world,
            Vec3::new(0.0, 2.0, 20.0),
            Vec3::new(40.0, 4.0, 1.0),
            CollisionLayers::ENVIRONMENT,
        ),
        create_static_collider(
            world,
            Vec3::new(-20.0, 2.0, 0.0),
            Vec3::new(1.0, 4.0, 40.0),
            CollisionLayers::ENVIRONMENT,
        ),
        create_static_collider(
            world,
            Vec3::new(20.0, 2.0, 0.0),
            Vec3::new(1.0, 4.0, 40.0),
            CollisionLayers::ENVIRONMENT,
        ),
    ];

    let targets = (0..5)
        .map(|i| {
            let x = -6.0 + i as f32 * 3.0;
            let target = create_static_collider(
                world,
                Vec3::new(x, 1.0, -15.0),
                Vec3::ONE,
                CollisionLayers::ENEMY,
            );
            world.add_tag::<Collider>(target, "target");
            target
        })
        .collect();

    Arena {
        ground,
        walls,
        targets,
    }
}
