//! Bot systems (FixedUpdate)

use bevy::prelude::*;

use super::bot::BotController;
use crate::combat::{opponent_in, spawn_order, SpawnOrderQuery};
use crate::components::Fighter;
use crate::DeterministicRng;

/// System: рефлекторный блок ботов с низким здоровьем.
///
/// Runs right after `update_fighters`, before decisions.
pub fn bot_reflex_block(
    mut rng: ResMut<DeterministicRng>,
    spawned: SpawnOrderQuery,
    mut fighters: Query<(Entity, &mut Fighter, Has<BotController>)>,
) {
    let order = spawn_order(&spawned);

    for &entity in &order {
        let opponent_x = opponent_in(&order, entity)
            .and_then(|opponent| fighters.get(opponent).ok())
            .map(|(_, opponent, _)| opponent.position.x);

        let Ok((_, mut fighter, true)) = fighters.get_mut(entity) else {
            continue;
        };

        if BotController::reflex_block(&mut fighter, opponent_x, &mut rng.rng) {
            crate::logger::log(&format!(
                "🛡️ Bot {:?}: reflex block (HP {}/{})",
                entity, fighter.health, fighter.max_health
            ));
        }
    }
}

/// System: решения ботов (BotController::decide → команды бойцу).
///
/// Боты решают по очереди: второй видит `last_action` первого из этого же тика.
pub fn bot_decisions(
    mut rng: ResMut<DeterministicRng>,
    spawned: SpawnOrderQuery,
    mut fighters: Query<(Entity, &mut Fighter, Option<&mut BotController>)>,
) {
    let order = spawn_order(&spawned);

    for &entity in &order {
        let Some((opponent_x, opponent_last_action)) = opponent_in(&order, entity)
            .and_then(|opponent| fighters.get(opponent).ok())
            .map(|(_, opponent, opponent_bot)| {
                (
                    opponent.position.x,
                    opponent_bot.and_then(|bot| bot.last_action),
                )
            })
        else {
            continue;
        };

        let Ok((_, mut fighter, Some(mut bot))) = fighters.get_mut(entity) else {
            continue;
        };

        let Some(decision) = bot.decide(&fighter, opponent_x, opponent_last_action, &mut rng.rng) else {
            continue;
        };

        decision.apply_to(&mut fighter);

        crate::logger::log(&format!(
            "🤖 Bot {:?}: {} (aggression {:.2}, caution {:.2}, next decision in {} ticks)",
            entity,
            decision.action.name(),
            bot.aggression,
            bot.caution,
            bot.decision_cooldown_ticks
        ));
    }
}
