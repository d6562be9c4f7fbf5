//! Combat события (ECS → host)

use bevy::prelude::*;

use crate::components::FighterCommand;

/// Исход удара, дошедшего до тела противника
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum StrikeKind {
    Hit,
    Blocked,
}

/// Событие: удар достиг защитника
///
/// Генерируется `resolve_collisions` не чаще одного раза за замах.
/// Host использует для hit flash / звуков / табло.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CombatEvent {
    pub attacker: Entity,
    pub defender: Entity,
    pub kind: StrikeKind,
    /// Сколько здоровья реально снято (0 для Blocked и для добивания по нулю)
    pub damage_applied: u32,
    /// Defender's torso center at impact.
    pub contact: Vec2,
}

impl CombatEvent {
    pub fn is_hit(&self) -> bool {
        self.kind == StrikeKind::Hit
    }
}

/// Команда бойцу от host (клавиатура, сеть, скрипт)
///
/// Applied at the start of the next simulation tick.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FighterCommandIssued {
    pub fighter: Entity,
    pub command: FighterCommand,
}
