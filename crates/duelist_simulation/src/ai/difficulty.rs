//! Уровни сложности бота

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Сложность бота (пресет стартовых параметров)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

/// Стартовые параметры BotController
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPreset {
    /// Склонность атаковать (0..1)
    pub aggression: f32,
    /// Склонность защищаться / отступать (0..1)
    pub caution: f32,
    /// Базовая пауза между решениями (тики)
    pub reaction_time: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn preset(self) -> DifficultyPreset {
        let (aggression, caution, reaction_time) = match self {
            Difficulty::Easy => (0.4, 0.7, 40),
            Difficulty::Medium => (0.6, 0.4, 25),
            Difficulty::Hard => (0.8, 0.2, 15),
            Difficulty::Insane => (0.9, 0.1, 8),
        };

        DifficultyPreset {
            aggression,
            caution,
            reaction_time,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    /// Unknown names fall back to `Medium`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name() == name)
            .unwrap_or_default()
    }
}
