//! Breach Weapons - weapon state machines and projectile simulation
//!
//! Weapons are ECS components driven by a small fire/reload state machine.
//! Projectiles live in a flat pool owned by the weapon system rather than
//! the ECS: they are high-churn, short-lived, and need neither tagging nor
//! component polymorphism.

mod archetype;
mod projectile;
mod system;
mod weapon;

pub use archetype::{ParseArchetypeError, WeaponArchetype, WeaponConfig};
pub use projectile::Projectile;
pub use system::WeaponSystem;
pub use weapon::Weapon;
