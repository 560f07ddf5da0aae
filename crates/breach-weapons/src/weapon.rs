use breach_ecs::Component;
use serde::{Deserialize, Serialize};

use crate::archetype::{WeaponArchetype, WeaponConfig};

/// Per-entity weapon state.
///
/// Three states: ready, cooling down between shots, reloading. Transitions
/// are driven by `fire`/`start_reload`/`update` with the caller's
/// simulation time. A rejected transition returns `false` and has no side
/// effects; callers use the return value to drive feedback (a dry-fire
/// click, a UI flash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub archetype: WeaponArchetype,
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub bullet_speed: f32,
    pub bullet_lifespan: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reload_time: f32,
    reloading: bool,
    last_fire_time: f32,
    reload_started: f32,
}

impl Component for Weapon {}

impl Weapon {
    /// Build a weapon from an archetype preset, magazine full.
    pub fn from_archetype(archetype: WeaponArchetype) -> Self {
        let WeaponConfig {
            damage,
            fire_rate,
            bullet_speed,
            bullet_lifespan,
            magazine_size,
            reload_time,
        } = archetype.config();
        Self {
            archetype,
            damage,
            fire_rate,
            bullet_speed,
            bullet_lifespan,
            ammo: magazine_size,
            max_ammo: magazine_size,
            reload_time,
            reloading: false,
            // Negative infinity so the first shot is never cooldown-gated.
            last_fire_time: f32::NEG_INFINITY,
            reload_started: 0.0,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    /// Whether a shot would be accepted at `now`: not reloading, ammo in
    /// the magazine, and the cooldown window elapsed.
    pub fn can_fire(&self, now: f32) -> bool {
        !self.reloading && self.ammo > 0 && now - self.last_fire_time >= 1.0 / self.fire_rate
    }

    /// Attempt a shot. On accept: ammo decremented, cooldown stamped, and
    /// an emptied magazine flows straight into a reload.
    pub fn fire(&mut self, now: f32) -> bool {
        if !self.can_fire(now) {
            return false;
        }
        self.ammo -= 1;
        self.last_fire_time = now;
        if self.ammo == 0 {
            self.reloading = true;
            self.reload_started = now;
        }
        true
    }

    /// Begin a reload. Rejected while already reloading or with a full
    /// magazine.
    pub fn start_reload(&mut self, now: f32) -> bool {
        if self.reloading || self.ammo == self.max_ammo {
            return false;
        }
        self.reloading = true;
        self.reload_started = now;
        true
    }

    /// Advance the reload state. Completion refills the magazine; calling
    /// early does nothing.
    pub fn update(&mut self, now: f32) {
        if self.reloading && now - self.reload_started >= self.reload_time {
            self.ammo = self.max_ammo;
            self.reloading = false;
        }
    }
}
