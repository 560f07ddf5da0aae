use breach_core::Transform;
use breach_ecs::{Entity, World};
use glam::Vec3;
use tracing::warn;

use crate::projectile::Projectile;
use crate::weapon::Weapon;

/// Drives every weapon's reload state and owns the projectile pool.
///
/// The pool is a flat vector with a monotonically increasing id counter;
/// integration and pruning run once per tick, before collision detection
/// reads the projectile positions.
pub struct WeaponSystem {
    projectiles: Vec<Projectile>,
    next_projectile_id: u64,
}

impl WeaponSystem {
    pub fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            next_projectile_id: 0,
        }
    }

    /// Fire the entity's weapon toward `direction`. Returns whether a shot
    /// was accepted; a rejected shot has no side effects. A zero-length
    /// direction is rejected as a no-op shot.
    pub fn fire_weapon(
        &mut self,
        world: &mut World,
        entity: Entity,
        direction: Vec3,
        now: f32,
    ) -> bool {
        let Some(direction) = direction.try_normalize() else {
            warn!("rejected shot from {entity}: zero-length direction");
            return false;
        };
        let Some(position) = world.get_component::<Transform>(entity).map(|t| t.position) else {
            warn!("fire_weapon on {entity} without a transform");
            return false;
        };
        let Some(weapon) = world.get_component_mut::<Weapon>(entity) else {
            warn!("fire_weapon on {entity} without a weapon");
            return false;
        };
        if !weapon.fire(now) {
            return false;
        }
        self.projectiles.push(Projectile {
            id: self.next_projectile_id,
            position,
            velocity: direction * weapon.bullet_speed,
            damage: weapon.damage,
            lifespan: weapon.bullet_lifespan,
            owner: entity,
        });
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        true
    }

    /// Begin reloading the entity's weapon. Returns whether the reload was
    /// accepted.
    pub fn reload_weapon(&mut self, world: &mut World, entity: Entity, now: f32) -> bool {
        match world.get_component_mut::<Weapon>(entity) {
            Some(weapon) => weapon.start_reload(now),
            None => {
                warn!("reload_weapon on {entity} without a weapon");
                false
            }
        }
    }

    /// Per-tick update: advance every weapon's reload state, then integrate
    /// projectile positions and prune expired ones.
    pub fn update(&mut self, world: &mut World, dt: f32, now: f32) {
        for entity in world.entities_with::<Weapon>() {
            if let Some(weapon) = world.get_component_mut::<Weapon>(entity) {
                weapon.update(now);
            }
        }
        self.projectiles.retain_mut(|projectile| {
            projectile.position += projectile.velocity * dt;
            projectile.lifespan -= dt;
            projectile.lifespan > 0.0
        });
    }

    /// Live projectiles, in pool order.
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Remove a projectile by id (hit resolution). Returns whether it was
    /// present.
    pub fn remove_projectile(&mut self, id: u64) -> bool {
        match self.projectiles.iter().position(|p| p.id == id) {
            Some(index) => {
                self.projectiles.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every live projectile (world reset).
    pub fn clear_projectiles(&mut self) {
        self.projectiles.clear();
    }
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self::new()
    }
}
