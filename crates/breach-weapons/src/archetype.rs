//! Built-in weapon presets
//!
//! A fixed lookup table; archetypes are not runtime-extensible.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four built-in weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponArchetype {
    Pistol,
    Rifle,
    Shotgun,
    MachineGun,
}

/// Tuning parameters for one archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub bullet_speed: f32,
    /// Seconds a spawned bullet lives without hitting anything
    pub bullet_lifespan: f32,
    pub magazine_size: u32,
    pub reload_time: f32,
}

impl WeaponArchetype {
    /// Preset parameters for this archetype
    pub fn config(self) -> WeaponConfig {
        match self {
            Self::Pistol => WeaponConfig {
                damage: 12.0,
                fire_rate: 2.0,
                bullet_speed: 50.0,
                bullet_lifespan: 5.0,
                magazine_size: 12,
                reload_time: 2.0,
            },
            Self::Rifle => WeaponConfig {
                damage: 20.0,
                fire_rate: 5.0,
                bullet_speed: 80.0,
                bullet_lifespan: 4.0,
                magazine_size: 30,
                reload_time: 2.5,
            },
            Self::Shotgun => WeaponConfig {
                damage: 40.0,
                fire_rate: 1.0,
                bullet_speed: 40.0,
                bullet_lifespan: 1.5,
                magazine_size: 6,
                reload_time: 3.0,
            },
            Self::MachineGun => WeaponConfig {
                damage: 8.0,
                fire_rate: 10.0,
                bullet_speed: 70.0,
                bullet_lifespan: 3.0,
                magazine_size: 100,
                reload_time: 5.0,
            },
        }
    }

    /// Display name of this archetype
    pub fn name(self) -> &'static str {
        match self {
            Self::Pistol => "pistol",
            Self::Rifle => "rifle",
            Self::Shotgun => "shotgun",
            Self::MachineGun => "machine_gun",
        }
    }
}

/// Error returned when parsing an unknown archetype name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weapon archetype `{0}`")]
pub struct ParseArchetypeError(String);

impl FromStr for WeaponArchetype {
    type Err = ParseArchetypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pistol" => Ok(Self::Pistol),
            "rifle" => Ok(Self::Rifle),
            "shotgun" => Ok(Self::Shotgun),
            "machine_gun" | "machinegun" => Ok(Self::MachineGun),
            other => Err(ParseArchetypeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_ordered_sensibly() {
        let pistol = WeaponArchetype::Pistol.config();
        let mg = WeaponArchetype::MachineGun.config();
        let shotgun = WeaponArchetype::Shotgun.config();
        assert!(mg.fire_rate > pistol.fire_rate);
        assert!(shotgun.damage > pistol.damage);
        assert!(mg.magazine_size > shotgun.magazine_size);
        for archetype in [
            WeaponArchetype::Pistol,
            WeaponArchetype::Rifle,
            WeaponArchetype::Shotgun,
            WeaponArchetype::MachineGun,
        ] {
            let config = archetype.config();
            assert!(config.fire_rate > 0.0);
            assert!(config.magazine_size > 0);
            assert!(config.reload_time > 0.0);
        }
    }

    #[test]
    fn parse_known_names() {
        assert_eq!("pistol".parse(), Ok(WeaponArchetype::Pistol));
        assert_eq!("Rifle".parse(), Ok(WeaponArchetype::Rifle));
        assert_eq!("machinegun".parse(), Ok(WeaponArchetype::MachineGun));
        assert_eq!("machine_gun".parse(), Ok(WeaponArchetype::MachineGun));
    }

    #[test]
    fn parse_unknown_name_fails() {
        let err = "railgun".parse::<WeaponArchetype>().unwrap_err();
        assert_eq!(err.to_string(), "unknown weapon archetype `railgun`");
    }

    #[test]
    fn name_roundtrips_through_parse() {
        for archetype in [
            WeaponArchetype::Pistol,
            WeaponArchetype::Rifle,
            WeaponArchetype::Shotgun,
            WeaponArchetype::MachineGun,
        ] {
            assert_eq!(archetype.name().parse(), Ok(archetype));
        }
    }
}
