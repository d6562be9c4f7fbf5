//! AI decision-making module
//!
//! Бот: distance-banded policy с адаптацией aggression/caution.
//! Вся случайность через DeterministicRng (seeded ChaCha8).

use bevy::prelude::*;

use crate::DuelSystems;

pub mod bot;
pub mod difficulty;
pub mod systems;


// Re-export основных типов
pub use bot::{BotAction, BotController, BotDecision};
pub use difficulty::{Difficulty, DifficultyPreset};
pub use systems::{bot_decisions, bot_reflex_block};

/// AI Plugin
///
/// Регистрирует bot системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. bot_reflex_block: блок при низком здоровье (после update_fighters)
/// 2. bot_decisions: decision cooldown → действие → команды
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (bot_reflex_block, bot_decisions)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(DuelSystems::Bot),
        );
    }
}
