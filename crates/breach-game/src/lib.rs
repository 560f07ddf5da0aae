//! Breach Game - tick orchestration and scene bootstrap
//!
//! Wires the ECS core and the gameplay systems into the fixed per-tick
//! sequence: flush deferred world mutations, advance weapons and
//! projectiles, then run collision detection against the fresh transforms.

pub mod scene;

use breach_core::{GameTime, TimeConfig};
use breach_ecs::World;
use breach_physics::CollisionSystem;
use breach_weapons::WeaponSystem;

/// Owns the world and both gameplay systems and drives them in the fixed
/// per-tick order. Construct one per simulation; there is no global state,
/// so tests build isolated instances freely.
pub struct Simulation {
    pub world: World,
    pub weapons: WeaponSystem,
    pub collision: CollisionSystem,
    pub time: GameTime,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_time_config(TimeConfig::default())
    }

    pub fn with_time_config(config: TimeConfig) -> Self {
        Self {
            world: World::new(),
            weapons: WeaponSystem::new(),
            collision: CollisionSystem::new(),
            time: GameTime::new(config),
        }
    }

    /// Advance one simulation tick.
    ///
    /// The sequence is fixed and must not be reordered: collision detection
    /// depends on this tick's post-flush transforms and on the current
    /// projectile positions.
    pub fn tick(&mut self, raw_delta: f32) {
        self.time.update(raw_delta);
        let now = self.time.now();
        self.world.process_pending();
        self.weapons.update(&mut self.world, self.time.delta_time, now);
        self.collision.update(&mut self.world, &mut self.weapons, now);
    }

    /// Reset the world and every system-owned pool.
    pub fn reset(&mut self) {
        self.world.clear();
        self.weapons.clear_projectiles();
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
