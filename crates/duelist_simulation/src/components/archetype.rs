//! Архетипы бойцов (типы телосложения)
//!
//! Закрытый набор из 6 профилей. Каждый фиксирует здоровье, скорость,
//! урон за удар и геометрию для коллизий.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип телосложения бойца
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Archetype {
    /// Сбалансированные характеристики
    #[default]
    Athletic,
    /// Быстрый но хрупкий
    Lean,
    /// Медленный но выносливый
    Heavy,
    /// Очень выносливый, очень медленный
    Sumo,
    /// Очень быстрый, мало здоровья
    Ninja,
    /// Хороший баланс
    Robotic,
}

/// Fixed per-archetype profile.
///
/// Only `width`, `height`, `head_radius`, `shoulder_width` and `arm_length`
/// take part in collision geometry; the rest of the silhouette belongs to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArchetypeStats {
    pub width: f32,
    pub height: f32,
    /// Pixels per tick
    pub speed: f32,
    pub max_health: u32,
    pub damage: u32,
    pub head_radius: f32,
    pub shoulder_width: f32,
    pub arm_length: f32,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Athletic,
        Archetype::Lean,
        Archetype::Heavy,
        Archetype::Sumo,
        Archetype::Ninja,
        Archetype::Robotic,
    ];

    pub fn stats(self) -> ArchetypeStats {
        match self {
            Archetype::Athletic => ArchetypeStats {
                width: 52.0,
                height: 130.0,
                speed: 5.5,
                max_health: 100,
                damage: 10,
                head_radius: 18.0,
                shoulder_width: 45.0,
                arm_length: 55.0,
            },
            Archetype::Lean => ArchetypeStats {
                width: 42.0,
                height: 140.0,
                speed: 6.0,
                max_health: 90,
                damage: 9,
                head_radius: 16.0,
                shoulder_width: 35.0,
                arm_length: 60.0,
            },
            Archetype::Heavy => ArchetypeStats {
                width: 65.0,
                height: 125.0,
                speed: 4.5,
                max_health: 120,
                damage: 12,
                head_radius: 22.0,
                shoulder_width: 55.0,
                arm_length: 50.0,
            },
            Archetype::Sumo => ArchetypeStats {
                width: 75.0,
                height: 115.0,
                speed: 3.5,
                max_health: 150,
                damage: 15,
                head_radius: 25.0,
                shoulder_width: 60.0,
                arm_length: 45.0,
            },
            Archetype::Ninja => ArchetypeStats {
                width: 45.0,
                height: 135.0,
                speed: 6.5,
                max_health: 85,
                damage: 8,
                head_radius: 17.0,
                shoulder_width: 38.0,
                arm_length: 65.0,
            },
            Archetype::Robotic => ArchetypeStats {
                width: 58.0,
                height: 145.0,
                speed: 5.0,
                max_health: 110,
                damage: 11,
                head_radius: 20.0,
                shoulder_width: 50.0,
                arm_length: 58.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Athletic => "athletic",
            Archetype::Lean => "lean",
            Archetype::Heavy => "heavy",
            Archetype::Sumo => "sumo",
            Archetype::Ninja => "ninja",
            Archetype::Robotic => "robotic",
        }
    }

    /// Parse a lowercase archetype name. Unknown names fall back to `Athletic`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.name() == name)
            .unwrap_or_default()
    }
}

impl ArchetypeStats {
    /// Integer half-width, used for the fighter's horizontal center.
    pub fn half_width(&self) -> f32 {
        (self.width / 2.0).floor()
    }

    /// Integer half of the shoulder span.
    pub fn half_shoulder(&self) -> f32 {
        (self.shoulder_width / 2.0).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_archetypes_have_positive_stats() {
        for archetype in Archetype::ALL {
            let stats = archetype.stats();
            assert!(stats.width > 0.0, "{:?}", archetype);
            assert!(stats.height > 0.0, "{:?}", archetype);
            assert!(stats.speed > 0.0, "{:?}", archetype);
            assert!(stats.max_health > 0, "{:?}", archetype);
            assert!(stats.damage > 0, "{:?}", archetype);
        }
    }

    #[test]
    fn test_sumo_is_slowest_and_toughest() {
        let sumo = Archetype::Sumo.stats();
        for archetype in Archetype::ALL {
            let stats = archetype.stats();
            assert!(sumo.speed <= stats.speed);
            assert!(sumo.max_health >= stats.max_health);
        }
    }

    #[test]
    fn test_name_roundtrip_and_fallback() {
        for archetype in Archetype::ALL {
            assert_eq!(Archetype::from_name(archetype.name()), archetype);
        }
        assert_eq!(Archetype::from_name("dragon"), Archetype::Athletic);
    }

    #[test]
    fn test_integer_half_extents() {
        // Athletic: 52 / 2 = 26, 45 / 2 = 22 (integer division)
        let stats = Archetype::Athletic.stats();
        assert_eq!(stats.half_width(), 26.0);
        assert_eq!(stats.half_shoulder(), 22.0);
    }
}
