//! Combat module
//!
//! ECS ответственность:
//! - Команды бойцам (FighterCommandIssued → Fighter::apply)
//! - Per-tick update (движение, таймеры атаки/блока)
//! - Разрешение ударов: hit box × body box, арбитраж блока
//! - Events: CombatEvent
//!
//! Рендер (host) только читает Fighter / CombatEvent.

use bevy::prelude::*;

use crate::DuelSystems;

pub mod events;
pub mod resolver;
pub mod systems;

// Re-export основных типов
pub use events::{CombatEvent, FighterCommandIssued, StrikeKind};
pub use resolver::{block_succeeds, resolve_exchange, resolve_strike, StrikeOutcome};
pub use systems::{
    apply_fighter_commands, opponent_in, resolve_collisions, spawn_order, spawn_rank, update_fighters, SpawnOrderQuery,
};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения (через DuelSystems):
/// 1. apply_fighter_commands: команды host'а
/// 2. update_fighters: движение + таймеры
/// 3. resolve_collisions: удары → CombatEvent
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<CombatEvent>()
            .add_event::<FighterCommandIssued>();

        app.add_systems(
            FixedUpdate,
            (
                apply_fighter_commands.in_set(DuelSystems::Commands),
                update_fighters.in_set(DuelSystems::Movement),
                resolve_collisions.in_set(DuelSystems::Resolution),
            ),
        );
    }
}
