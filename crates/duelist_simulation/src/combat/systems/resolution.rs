//! Collision resolution system

use bevy::prelude::*;

use crate::combat::resolver::{resolve_exchange, StrikeOutcome};
use crate::combat::{spawn_order, CombatEvent, SpawnOrderQuery, StrikeKind};
use crate::components::Fighter;

/// System: разрешить удары для каждой пары бойцов.
///
/// Within a pair the fighter spawned first strikes first.
pub fn resolve_collisions(
    spawned: SpawnOrderQuery,
    mut fighters: Query<(Entity, &mut Fighter)>,
    mut combat_events: EventWriter<CombatEvent>,
) {
    let order = spawn_order(&spawned);
    let position = |entity: Entity| order.iter().position(|&other| other == entity);

    let mut pairs = fighters.iter_combinations_mut();
    while let Some([(e1, f1), (e2, f2)]) = pairs.fetch_next() {
        let ((a, mut fighter_a), (b, mut fighter_b)) = if position(e1) <= position(e2) {
            ((e1, f1), (e2, f2))
        } else {
            ((e2, f2), (e1, f1))
        };

        let (a_on_b, b_on_a) = resolve_exchange(&mut fighter_a, &mut fighter_b);

        if let Some(outcome) = a_on_b {
            combat_events.write(combat_event(a, b, &fighter_b, outcome));
        }
        if let Some(outcome) = b_on_a {
            combat_events.write(combat_event(b, a, &fighter_a, outcome));
        }
    }
}

fn combat_event(attacker: Entity, defender: Entity, defender_state: &Fighter, outcome: StrikeOutcome) -> CombatEvent {
    let contact = Vec2::new(
        defender_state.center_x(),
        defender_state.position.y + (defender_state.height() / 2.0).floor(),
    );

    let (kind, damage_applied) = match outcome {
        StrikeOutcome::Blocked => (StrikeKind::Blocked, 0),
        StrikeOutcome::Hit { damage_applied } => (StrikeKind::Hit, damage_applied),
    };

    match kind {
        StrikeKind::Hit => crate::logger::log(&format!(
            "💥 Hit: {:?} → {:?} (-{} HP, HP left: {})",
            attacker, defender, damage_applied, defender_state.health
        )),
        StrikeKind::Blocked => crate::logger::log(&format!(
            "🛡️ Blocked: {:?} → {:?} (guard {:?})",
            attacker, defender, defender_state.block_direction
        )),
    }

    CombatEvent {
        attacker,
        defender,
        kind,
        damage_applied,
        contact,
    }
}
