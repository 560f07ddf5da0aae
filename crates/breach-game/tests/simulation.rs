//! End-to-end scenarios across the full tick sequence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use breach_core::Transform;
use breach_game::scene::{create_static_collider, setup_test_arena};
use breach_game::Simulation;
use breach_physics::{Collider, CollisionLayers, ProjectileHit};
use breach_weapons::{Weapon, WeaponArchetype};
use glam::Vec3;

fn spawn_shooter(sim: &mut Simulation, position: Vec3) -> breach_ecs::Entity {
    let shooter = sim.world.create_entity();
    sim.world
        .add_component_immediate(shooter, Transform::from_position(position));
    sim.world
        .add_component_immediate(shooter, Weapon::from_archetype(WeaponArchetype::Pistol));
    shooter
}

#[test]
fn deferred_mutations_flush_at_tick_start() {
    let mut sim = Simulation::new();
    let entity = sim.world.create_entity();
    let sender = sim.world.commands();
    sender.add_component(entity, Transform::from_position(Vec3::X));

    assert_eq!(sender.pending(), 1);
    assert!(sim.world.get_component::<Transform>(entity).is_none());
    sim.tick(1.0 / 60.0);
    assert!(sim.world.get_component::<Transform>(entity).is_some());
    assert_eq!(sender.pending(), 0);
}

#[test]
fn deferred_destroy_takes_effect_at_tick_boundary() {
    let mut sim = Simulation::new();
    let entity = sim.world.create_entity();
    sim.world.destroy_entity(entity);
    assert!(sim.world.entity_exists(entity));
    sim.tick(1.0 / 60.0);
    assert!(!sim.world.entity_exists(entity));
}

#[test]
fn pistol_empties_reloads_and_refills() {
    // ammo=1, fire_rate=2.0, reload_time=2.0
    let mut sim = Simulation::new();
    let shooter = spawn_shooter(&mut sim, Vec3::ZERO);
    sim.world.get_component_mut::<Weapon>(shooter).unwrap().ammo = 1;

    assert!(sim
        .weapons
        .fire_weapon(&mut sim.world, shooter, -Vec3::Z, 0.0));
    {
        let weapon = sim.world.get_component::<Weapon>(shooter).unwrap();
        assert_eq!(weapon.ammo, 0);
        assert!(weapon.is_reloading());
    }

    sim.tick(0.1);
    assert!(!sim
        .weapons
        .fire_weapon(&mut sim.world, shooter, -Vec3::Z, sim.time.now()));

    // Reload finishes once 2.0 seconds have elapsed since the dry shot.
    while sim.time.now() < 2.1 {
        sim.tick(0.1);
    }
    let weapon = sim.world.get_component::<Weapon>(shooter).unwrap();
    assert_eq!(weapon.ammo, weapon.max_ammo);
    assert!(!weapon.is_reloading());
}

#[test]
fn unhit_projectile_is_pruned_after_lifespan() {
    // speed=50, lifespan=5, fired into empty space; gone after 5.1s of
    // 0.1s ticks.
    let mut sim = Simulation::new();
    let shooter = spawn_shooter(&mut sim, Vec3::ZERO);

    assert!(sim
        .weapons
        .fire_weapon(&mut sim.world, shooter, -Vec3::Z, 0.0));
    assert_eq!(sim.weapons.projectiles().len(), 1);

    for _ in 0..51 {
        sim.tick(0.1);
    }
    assert!(sim.weapons.projectiles().is_empty());
}

#[test]
fn bullet_crosses_arena_and_hits_tagged_target() {
    let mut sim = Simulation::new();
    let arena = setup_test_arena(&mut sim.world);
    let shooter = spawn_shooter(&mut sim, Vec3::new(0.0, 1.0, 0.0));

    let hits: Arc<Mutex<Vec<ProjectileHit>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = hits.clone();
    sim.collision
        .set_projectile_hit_handler(move |hit: &ProjectileHit| {
            sink.lock().unwrap().push(*hit);
        });

    assert!(sim
        .weapons
        .fire_weapon(&mut sim.world, shooter, -Vec3::Z, 0.0));

    // Target row sits at z = -15; a 50 u/s bullet arrives inside its
    // bounds on the third 0.1s tick.
    for _ in 0..5 {
        sim.tick(0.1);
    }

    let hits = hits.lock().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target, arena.targets[2]);
    assert_eq!(hits[0].owner, shooter);
    assert!(sim.weapons.projectiles().is_empty());
    assert!(sim.world.has_tag::<Collider>(hits[0].target, "target"));
}

#[test]
fn projectiles_integrate_before_collision_within_one_tick() {
    // The weapon update moves the bullet into the target's bounds in the
    // same tick collision consumes it, per the fixed system order.
    let mut sim = Simulation::new();
    let shooter = spawn_shooter(&mut sim, Vec3::ZERO);
    create_static_collider(
        &mut sim.world,
        Vec3::new(0.0, 0.0, -5.0),
        Vec3::splat(2.0),
        CollisionLayers::ENEMY,
    );

    assert!(sim
        .weapons
        .fire_weapon(&mut sim.world, shooter, -Vec3::Z, 0.0));
    sim.tick(0.1); // bullet moves to z = -5, inside [-6, -4]
    assert!(sim.weapons.projectiles().is_empty());
}

#[test]
fn collision_callbacks_fire_once_per_tick_through_simulation() {
    let mut sim = Simulation::new();
    let count = Arc::new(AtomicUsize::new(0));

    let body = sim.world.create_entity();
    sim.world
        .add_component_immediate(body, Transform::from_position(Vec3::ZERO));
    let counter = count.clone();
    sim.world.add_component_immediate(
        body,
        Collider::new(Vec3::ONE)
            .with_layer(CollisionLayers::PLAYER)
            .with_mask(CollisionLayers::ENVIRONMENT)
            .on_collision(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    );
    create_static_collider(
        &mut sim.world,
        Vec3::ZERO,
        Vec3::ONE,
        CollisionLayers::ENVIRONMENT,
    );

    sim.tick(0.1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    sim.tick(0.1);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn reset_clears_world_and_projectiles() {
    let mut sim = Simulation::new();
    let shooter = spawn_shooter(&mut sim, Vec3::ZERO);
    setup_test_arena(&mut sim.world);
    sim.weapons
        .fire_weapon(&mut sim.world, shooter, -Vec3::Z, 0.0);

    sim.reset();
    assert_eq!(sim.world.entity_count(), 0);
    assert!(sim.weapons.projectiles().is_empty());
}
