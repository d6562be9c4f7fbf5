//! Fighter command + per-tick update systems

use bevy::prelude::*;

use crate::combat::FighterCommandIssued;
use crate::components::{Fighter, SpawnSeq};
use crate::config::ArenaConfig;

/// Бойцы с их порядковым номером спавна (для `spawn_order`)
pub type SpawnOrderQuery<'w, 's> = Query<'w, 's, (Entity, Option<&'static SpawnSeq>), With<Fighter>>;

/// Ключ сортировки по спавну.
///
/// Бойцы без `SpawnSeq` (заспавнены мимо `spawn_fighter`) идут после, по index.
pub fn spawn_rank(entity: Entity, seq: Option<&SpawnSeq>) -> (u32, u32) {
    (seq.map_or(u32::MAX, |seq| seq.0), entity.index())
}

/// Бойцы в порядке спавна (по `SpawnSeq`)
///
/// Fixes the sequential order of updates, decisions and strike checks.
pub fn spawn_order(spawned: &SpawnOrderQuery<'_, '_>) -> Vec<Entity> {
    let mut order: Vec<(Entity, (u32, u32))> = spawned
        .iter()
        .map(|(entity, seq)| (entity, spawn_rank(entity, seq)))
        .collect();
    order.sort_by_key(|(_, rank)| *rank);
    order.into_iter().map(|(entity, _)| entity).collect()
}

/// Противник бойца: первый другой боец в порядке спавна.
pub fn opponent_in(order: &[Entity], fighter: Entity) -> Option<Entity> {
    order.iter().copied().find(|&other| other != fighter)
}

/// System: применить команды host'а (FighterCommandIssued) к бойцам.
pub fn apply_fighter_commands(
    mut command_events: EventReader<FighterCommandIssued>,
    mut fighters: Query<&mut Fighter>,
) {
    for issued in command_events.read() {
        let Ok(mut fighter) = fighters.get_mut(issued.fighter) else {
            crate::logger::log_warning(&format!(
                "⚠️ Command {:?} addressed to {:?} which is not a fighter",
                issued.command, issued.fighter
            ));
            continue;
        };

        fighter.apply(issued.command);
    }
}

/// System: `Fighter::update` для всех бойцов (движение, таймеры, блок).
///
/// Бойцы обновляются последовательно: второй видит уже сдвинутого первого.
pub fn update_fighters(
    arena: Res<ArenaConfig>,
    spawned: SpawnOrderQuery,
    mut fighters: Query<(Entity, &mut Fighter)>,
) {
    let order = spawn_order(&spawned);

    for &entity in &order {
        let opponent_x = opponent_in(&order, entity)
            .and_then(|opponent| fighters.get(opponent).ok())
            .map(|(_, opponent)| opponent.position.x);

        if let Ok((_, mut fighter)) = fighters.get_mut(entity) {
            fighter.update(arena.ground_y, arena.arena_width, opponent_x);
        }
    }
}
