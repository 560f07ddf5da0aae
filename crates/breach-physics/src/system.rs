use std::collections::HashSet;

use breach_core::Transform;
use breach_ecs::{Entity, World};
use breach_weapons::WeaponSystem;
use glam::Vec3;
use tracing::debug;

use crate::aabb::Aabb;
use crate::collider::{Collider, Contact};
use crate::layers::CollisionLayers;

/// A projectile-vs-collider hit, reported to the hit handler after the
/// projectile has been removed from the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub projectile_id: u64,
    pub owner: Entity,
    pub target: Entity,
    pub position: Vec3,
    pub damage: f32,
    pub time: f32,
}

/// Closest collider hit by a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: Entity,
    pub point: Vec3,
    /// Axis-aligned approximation of the surface normal.
    pub normal: Vec3,
    pub distance: f32,
}

type HitHandler = Box<dyn FnMut(&ProjectileHit) + Send>;

/// Snapshot of one enabled collider taken after the bounds refresh, so the
/// pair scan holds no borrows into the world.
#[derive(Clone, Copy)]
struct ColliderView {
    entity: Entity,
    bounds: Aabb,
    layer: CollisionLayers,
    mask: CollisionLayers,
}

/// Per-tick spatial intersection detection; the only system that invokes
/// collision callbacks.
///
/// The scan is a naive O(n^2) pass over enabled colliders, which is the
/// intended complexity class for this detector. The duplicate-pair set and
/// the hit handler are owned exclusively by this system and need no
/// external synchronization while only the simulation thread ticks it.
pub struct CollisionSystem {
    handled_pairs: HashSet<(Entity, Entity)>,
    on_projectile_hit: Option<HitHandler>,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self {
            handled_pairs: HashSet::new(),
            on_projectile_hit: None,
        }
    }

    /// Install the projectile hit handler (damage application lives with
    /// the consumer until a health system exists).
    pub fn set_projectile_hit_handler(
        &mut self,
        handler: impl FnMut(&ProjectileHit) + Send + 'static,
    ) {
        self.on_projectile_hit = Some(Box::new(handler));
    }

    /// Per-tick update: refresh bounds from this tick's transforms, scan
    /// entity pairs, then test live projectiles. Runs after the weapon
    /// system so projectile positions are current.
    pub fn update(&mut self, world: &mut World, weapons: &mut WeaponSystem, now: f32) {
        self.handled_pairs.clear();
        let views = Self::refresh_bounds(world);
        self.detect_pairs(world, &views, now);
        self.detect_projectile_hits(weapons, &views, now);
    }

    /// Recompute every enabled collider's bounds from its entity transform.
    /// Colliders on disabled entities keep stale bounds and are excluded
    /// from the snapshot.
    fn refresh_bounds(world: &mut World) -> Vec<ColliderView> {
        let mut views = Vec::new();
        for entity in world.entities_with::<Collider>() {
            if !world.entity_enabled(entity) || !world.component_enabled::<Collider>(entity) {
                continue;
            }
            let Some(position) = world.get_component::<Transform>(entity).map(|t| t.position)
            else {
                continue;
            };
            let Some(collider) = world.get_component_mut::<Collider>(entity) else {
                continue;
            };
            collider.refresh_bounds(position);
            views.push(ColliderView {
                entity,
                bounds: collider.bounds,
                layer: collider.layer,
                mask: collider.mask,
            });
        }
        views
    }

    /// Either side willing to react to the other is enough to test the pair.
    fn layers_compatible(a: &ColliderView, b: &ColliderView) -> bool {
        a.mask.intersects(b.layer) || b.mask.intersects(a.layer)
    }

    fn detect_pairs(&mut self, world: &mut World, views: &[ColliderView], now: f32) {
        for i in 0..views.len() {
            for j in (i + 1)..views.len() {
                let (a, b) = (&views[i], &views[j]);
                if !Self::layers_compatible(a, b) {
                    continue;
                }
                if !a.bounds.intersects(&b.bounds) {
                    continue;
                }
                if self.handled_pairs.contains(&(a.entity, b.entity)) {
                    continue;
                }
                // Both orders are marked handled for the rest of the tick.
                self.handled_pairs.insert((a.entity, b.entity));
                self.handled_pairs.insert((b.entity, a.entity));
                Self::dispatch(world, a, b, now);
            }
        }
    }

    fn dispatch(world: &mut World, a: &ColliderView, b: &ColliderView, now: f32) {
        let center_a = a.bounds.center();
        let center_b = b.bounds.center();
        let point = (center_a + center_b) * 0.5;
        let normal = (center_b - center_a).try_normalize().unwrap_or(Vec3::Y);
        Self::notify(
            world,
            a.entity,
            Contact {
                other: b.entity,
                point,
                normal,
                penetration: 0.0,
                time: now,
            },
        );
        Self::notify(
            world,
            b.entity,
            Contact {
                other: a.entity,
                point,
                normal: -normal,
                penetration: 0.0,
                time: now,
            },
        );
    }

    /// Invoke the receiving side's callback; its trigger flag picks which.
    fn notify(world: &mut World, entity: Entity, contact: Contact) {
        let Some(collider) = world.get_component_mut::<Collider>(entity) else {
            return;
        };
        if collider.is_trigger {
            if let Some(callback) = collider.on_trigger.as_mut() {
                callback(entity, &contact);
            }
        } else if let Some(callback) = collider.on_collision.as_mut() {
            callback(entity, &contact);
        }
    }

    /// Test every live projectile as a point against the collider snapshot,
    /// skipping each projectile's owner. A hit consumes the projectile.
    fn detect_projectile_hits(
        &mut self,
        weapons: &mut WeaponSystem,
        views: &[ColliderView],
        now: f32,
    ) {
        let mut hits = Vec::new();
        for projectile in weapons.projectiles() {
            for view in views {
                if view.entity == projectile.owner {
                    continue;
                }
                if view.bounds.contains_point(projectile.position) {
                    hits.push(ProjectileHit {
                        projectile_id: projectile.id,
                        owner: projectile.owner,
                        target: view.entity,
                        position: projectile.position,
                        damage: projectile.damage,
                        time: now,
                    });
                    break;
                }
            }
        }
        for hit in hits {
            weapons.remove_projectile(hit.projectile_id);
            match self.on_projectile_hit.as_mut() {
                Some(handler) => handler(&hit),
                None => debug!(
                    "projectile {} from {} hit {}",
                    hit.projectile_id, hit.owner, hit.target
                ),
            }
        }
    }

    /// Closest enabled collider whose layer matches `mask` along the ray,
    /// or `None` within `max_distance`. Uses the bounds of the last update.
    pub fn raycast(
        &self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;
        let mut best: Option<RaycastHit> = None;
        for entity in world.entities_with::<Collider>() {
            if !world.entity_enabled(entity) || !world.component_enabled::<Collider>(entity) {
                continue;
            }
            let Some(collider) = world.get_component::<Collider>(entity) else {
                continue;
            };
            if !mask.intersects(collider.layer) {
                continue;
            }
            if let Some((distance, normal)) =
                collider.bounds.ray_intersect(origin, direction, max_distance)
            {
                if best.as_ref().map_or(true, |b| distance < b.distance) {
                    best = Some(RaycastHit {
                        entity,
                        point: origin + direction * distance,
                        normal,
                        distance,
                    });
                }
            }
        }
        best
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}
