//! Duel lifecycle: тики раунда, победитель, статистика
//!
//! Матч заканчивается нокаутом или (опционально) по лимиту времени.
//! После конца матча все DuelSystems перестают выполняться.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::combat::{opponent_in, spawn_order, CombatEvent, SpawnOrderQuery, StrikeKind};
use crate::components::Fighter;
use crate::config::ArenaConfig;
use crate::DuelSystems;

/// Статус матча
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchStatus {
    #[default]
    InProgress,
    Won { winner: Entity, loser: Entity },
    Draw,
}

/// Почему матч закончился
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchEndReason {
    KnockOut,
    Timeout,
}

/// Per-fighter статистика раунда
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FighterStats {
    pub hits_landed: u32,
    /// Удары противника, остановленные блоком
    pub blocks_made: u32,
    pub damage_dealt: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub fighters: BTreeMap<Entity, FighterStats>,
    /// Round duration (ticks), final once the match ends
    pub round_ticks: u32,
}

impl MatchStats {
    pub fn for_fighter(&self, fighter: Entity) -> FighterStats {
        self.fighters.get(&fighter).copied().unwrap_or_default()
    }
}

/// Состояние текущего матча
#[derive(Resource, Clone, Debug, Default)]
pub struct MatchState {
    /// Тиков с начала матча
    pub tick: u32,
    pub status: MatchStatus,
    pub end_reason: Option<MatchEndReason>,
    pub stats: MatchStats,
}

impl MatchState {
    pub fn is_over(&self) -> bool {
        self.status != MatchStatus::InProgress
    }

    pub fn winner(&self) -> Option<Entity> {
        match self.status {
            MatchStatus::Won { winner, .. } => Some(winner),
            _ => None,
        }
    }

    fn finish(&mut self, status: MatchStatus, reason: MatchEndReason) -> MatchEnded {
        self.status = status;
        self.end_reason = Some(reason);
        self.stats.round_ticks = self.tick;

        MatchEnded {
            status,
            reason,
            ticks: self.tick,
        }
    }
}

/// Событие: матч закончился (отправляется один раз)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MatchEnded {
    pub status: MatchStatus,
    pub reason: MatchEndReason,
    pub ticks: u32,
}

/// Run condition: матч ещё идёт
pub fn match_in_progress(state: Res<MatchState>) -> bool {
    !state.is_over()
}

/// System: +1 тик матча (первым в FixedUpdate)
pub fn advance_match_clock(mut state: ResMut<MatchState>) {
    state.tick += 1;
}

/// System: CombatEvent → статистика
pub fn record_combat_stats(mut combat_events: EventReader<CombatEvent>, mut state: ResMut<MatchState>) {
    for event in combat_events.read() {
        match event.kind {
            StrikeKind::Hit => {
                let stats = state.stats.fighters.entry(event.attacker).or_default();
                stats.hits_landed += 1;
                stats.damage_dealt += event.damage_applied;
            }
            StrikeKind::Blocked => {
                state.stats.fighters.entry(event.defender).or_default().blocks_made += 1;
            }
        }
    }
}

/// System: нокаут / таймаут → MatchEnded
///
/// Бойцы проверяются в порядке спавна: первый найденный на нуле проигрывает.
pub fn check_match_end(
    arena: Res<ArenaConfig>,
    mut state: ResMut<MatchState>,
    spawned: SpawnOrderQuery,
    fighters: Query<(Entity, &Fighter)>,
    mut match_ended: EventWriter<MatchEnded>,
) {
    if state.is_over() {
        return;
    }

    let order = spawn_order(&spawned);
    if order.len() < 2 {
        return;
    }

    let knocked_out = order
        .iter()
        .copied()
        .find(|&entity| fighters.get(entity).is_ok_and(|(_, fighter)| !fighter.is_alive()));

    if let Some(loser) = knocked_out {
        let Some(winner) = opponent_in(&order, loser) else {
            return;
        };
        let ended = state.finish(MatchStatus::Won { winner, loser }, MatchEndReason::KnockOut);
        crate::logger::log_info(&format!(
            "🏆 Knockout at tick {}: {:?} defeats {:?}",
            ended.ticks, winner, loser
        ));
        match_ended.write(ended);
        return;
    }

    let Some(limit) = arena.round_time_limit_ticks else {
        return;
    };
    if state.tick < limit {
        return;
    }

    let status = timeout_verdict(&order, &fighters);
    let ended = state.finish(status, MatchEndReason::Timeout);
    crate::logger::log_info(&format!("⏱️ Time limit reached at tick {}: {:?}", ended.ticks, status));
    match_ended.write(ended);
}

/// Higher health ratio wins, equal ratios draw.
fn timeout_verdict(order: &[Entity], fighters: &Query<(Entity, &Fighter)>) -> MatchStatus {
    let mut ranked: Vec<(Entity, f32)> = order
        .iter()
        .filter_map(|&entity| fighters.get(entity).ok())
        .map(|(entity, fighter)| (entity, fighter.health_ratio()))
        .collect();
    // Стабильная сортировка: при равенстве сохраняется порядок спавна
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    match ranked.as_slice() {
        [(winner, best), (loser, second), ..] if best > second => MatchStatus::Won {
            winner: *winner,
            loser: *loser,
        },
        _ => MatchStatus::Draw,
    }
}

/// Duel Plugin: часы матча, статистика, конец матча
pub struct DuelPlugin;

impl Plugin for DuelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchState>().add_event::<MatchEnded>();

        app.add_systems(FixedUpdate, advance_match_clock.in_set(DuelSystems::Clock))
            .add_systems(
                FixedUpdate,
                (record_combat_stats, check_match_end)
                    .chain()
                    .in_set(DuelSystems::Outcome),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Archetype, Side};

    fn create_test_app(arena: ArenaConfig) -> App {
        let mut app = App::new();
        app.insert_resource(arena)
            .init_resource::<MatchState>()
            .add_event::<CombatEvent>()
            .add_event::<MatchEnded>()
            .add_systems(
                Update,
                (advance_match_clock, record_combat_stats, check_match_end)
                    .chain()
                    .run_if(match_in_progress),
            );
        app
    }

    fn spawn(app: &mut App, corner: Side, x: f32) -> Entity {
        app.world_mut()
            .spawn(Fighter::on_ground(Archetype::Athletic, corner, x, 648.0))
            .id()
    }

    fn set_health(app: &mut App, fighter: Entity, health: u32) {
        if let Some(mut fighter) = app.world_mut().get_mut::<Fighter>(fighter) {
            fighter.health = health;
        }
    }

    fn ended_events(app: &mut App) -> Vec<MatchEnded> {
        app.world_mut()
            .resource_mut::<Events<MatchEnded>>()
            .drain()
            .collect()
    }

    #[test]
    fn test_knockout_ends_match_once() {
        let mut app = create_test_app(ArenaConfig::default());
        let a = spawn(&mut app, Side::Left, 200.0);
        let b = spawn(&mut app, Side::Right, 700.0);

        app.update();
        assert_eq!(app.world().resource::<MatchState>().status, MatchStatus::InProgress);

        set_health(&mut app, b, 0);
        app.update();
        app.update();

        let state = app.world().resource::<MatchState>();
        assert_eq!(state.status, MatchStatus::Won { winner: a, loser: b });
        assert_eq!(state.end_reason, Some(MatchEndReason::KnockOut));
        assert_eq!(state.stats.round_ticks, 2);
        // Часы остановились
        assert_eq!(state.tick, 2);

        assert_eq!(ended_events(&mut app).len(), 1);
    }

    #[test]
    fn test_double_knockout_first_spawned_loses() {
        let mut app = create_test_app(ArenaConfig::default());
        let a = spawn(&mut app, Side::Left, 200.0);
        let b = spawn(&mut app, Side::Right, 700.0);

        set_health(&mut app, a, 0);
        set_health(&mut app, b, 0);
        app.update();

        let state = app.world().resource::<MatchState>();
        assert_eq!(state.status, MatchStatus::Won { winner: b, loser: a });
    }

    #[test]
    fn test_timeout_draw_on_equal_ratio() {
        let mut app = create_test_app(ArenaConfig::default().with_round_time_limit(3));
        spawn(&mut app, Side::Left, 200.0);
        spawn(&mut app, Side::Right, 700.0);

        for _ in 0..5 {
            app.update();
        }

        let state = app.world().resource::<MatchState>();
        assert_eq!(state.status, MatchStatus::Draw);
        assert_eq!(state.end_reason, Some(MatchEndReason::Timeout));
        assert_eq!(state.tick, 3);
    }

    #[test]
    fn test_timeout_higher_ratio_wins() {
        let mut app = create_test_app(ArenaConfig::default().with_round_time_limit(1));
        let a = spawn(&mut app, Side::Left, 200.0);
        let b = spawn(&mut app, Side::Right, 700.0);
        set_health(&mut app, a, 40);
        set_health(&mut app, b, 55);

        app.update();

        let state = app.world().resource::<MatchState>();
        assert_eq!(state.status, MatchStatus::Won { winner: b, loser: a });
    }

    #[test]
    fn test_stats_from_combat_events() {
        let mut app = create_test_app(ArenaConfig::default());
        let a = spawn(&mut app, Side::Left, 200.0);
        let b = spawn(&mut app, Side::Right, 700.0);

        let hit = CombatEvent {
            attacker: a,
            defender: b,
            kind: StrikeKind::Hit,
            damage_applied: 10,
            contact: Vec2::ZERO,
        };
        let blocked = CombatEvent {
            attacker: a,
            defender: b,
            kind: StrikeKind::Blocked,
            damage_applied: 0,
            contact: Vec2::ZERO,
        };
        app.world_mut().send_event(hit.clone());
        app.world_mut().send_event(hit);
        app.world_mut().send_event(blocked);
        app.update();

        let stats = &app.world().resource::<MatchState>().stats;
        assert_eq!(
            stats.for_fighter(a),
            FighterStats {
                hits_landed: 2,
                blocks_made: 0,
                damage_dealt: 20,
            }
        );
        assert_eq!(stats.for_fighter(b).blocks_made, 1);
    }
}
