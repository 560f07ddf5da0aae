//! Breach Physics - gameplay-grade collision detection
//!
//! Axis-aligned box tests only: per-tick bounds refresh from transforms, a
//! naive pairwise scan with layer/mask gating, projectile point tests, and
//! linear raycasts. This is a detector feeding gameplay callbacks, not a
//! physics solver; contact points and normals are intentionally
//! approximate.

mod aabb;
mod collider;
mod layers;
mod system;

pub use aabb::Aabb;
pub use collider::{Collider, ColliderShape, Contact};
pub use layers::CollisionLayers;
pub use system::{CollisionSystem, ProjectileHit, RaycastHit};
