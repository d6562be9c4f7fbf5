//! Combat integration test
//!
//! Полный App (SimulationPlugin) headless, тик за тиком через FixedUpdate.
//!
//! Проверяем:
//! - 10 чистых попаданий → нокаут, победитель не тронут
//! - Инварианты Fighter на длинном бою ботов
//! - Decision cooldown бота
//! - Таймаут
//! - Порядок спавна после reset_match, очереди событий не растут

use bevy::prelude::*;
use duelist_simulation::*;

fn create_duel_app(seed: u64, arena: ArenaConfig) -> App {
    create_headless_app(SimulationConfig { seed, arena })
}

fn fighter(app: &App, entity: Entity) -> &Fighter {
    app.world().get::<Fighter>(entity).expect("fighter exists")
}

fn drain_combat_events(app: &mut App) -> Vec<CombatEvent> {
    app.world_mut()
        .resource_mut::<Events<CombatEvent>>()
        .drain()
        .collect()
}

fn drain_match_ended(app: &mut App) -> Vec<MatchEnded> {
    app.world_mut()
        .resource_mut::<Events<MatchEnded>>()
        .drain()
        .collect()
}

fn set_input(app: &mut App, entity: Entity, input: PlayerInput) {
    if let Some(mut current) = app.world_mut().get_mut::<PlayerInput>(entity) {
        current.left = input.left;
        current.right = input.right;
        current.attack = input.attack;
        current.block = input.block;
    }
}

/// Test: 10 ударов по 10 урона → B на нуле, A побеждает со 100 HP
#[test]
fn test_ten_clean_hits_knock_out() {
    let mut app = create_duel_app(42, ArenaConfig::default());
    let (a, b) = spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Athletic),
        FighterSetup::human(Archetype::Athletic),
    );

    // B стоит вплотную к A
    let a_x = fighter(&app, a).position.x;
    app.world_mut().get_mut::<Fighter>(b).unwrap().position.x = a_x + 60.0;

    let mut hits = Vec::new();
    let mut ended = Vec::new();
    for _ in 0..10 {
        set_input(&mut app, a, PlayerInput::held(false, false, true, false));
        run_ticks(&mut app, 1);
        hits.extend(drain_combat_events(&mut app));
        ended.extend(drain_match_ended(&mut app));

        set_input(&mut app, a, PlayerInput::default());
        run_ticks(&mut app, 29);
        hits.extend(drain_combat_events(&mut app));
    }

    assert_eq!(hits.len(), 10);
    assert!(hits.iter().all(|event| event.attacker == a && event.is_hit()));
    assert!(hits.iter().all(|event| event.damage_applied == 10));

    assert_eq!(fighter(&app, b).health, 0);
    assert_eq!(fighter(&app, a).health, 100);

    let state = app.world().resource::<MatchState>();
    assert_eq!(state.status, MatchStatus::Won { winner: a, loser: b });
    assert_eq!(state.end_reason, Some(MatchEndReason::KnockOut));
    assert_eq!(state.stats.for_fighter(a).hits_landed, 10);
    assert_eq!(state.stats.for_fighter(a).damage_dealt, 100);
    // Нокаут на первом тике десятого замаха
    assert_eq!(state.stats.round_ticks, 9 * 30 + 1);

    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].ticks, 9 * 30 + 1);
}

/// Test: после конца матча симуляция замирает
#[test]
fn test_simulation_freezes_after_match() {
    let mut app = create_duel_app(42, ArenaConfig::default());
    let (a, b) = spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Athletic),
        FighterSetup::human(Archetype::Athletic),
    );
    app.world_mut().get_mut::<Fighter>(b).unwrap().health = 0;
    run_ticks(&mut app, 1);
    assert!(app.world().resource::<MatchState>().is_over());

    set_input(&mut app, a, PlayerInput::held(false, true, false, false));
    let before = fighter(&app, a).position;
    run_ticks(&mut app, 10);

    assert_eq!(fighter(&app, a).position, before);
    assert_eq!(app.world().resource::<MatchState>().tick, 1);
}

/// Test: инварианты бойцов на 3000 тиках бот против бота
#[test]
fn test_bot_duel_invariants() {
    let arena = ArenaConfig::default();
    let arena_width = arena.arena_width;
    let mut app = create_duel_app(7, arena);
    let (a, b) = spawn_duel(
        app.world_mut(),
        FighterSetup::bot(Archetype::Ninja, Difficulty::Insane),
        FighterSetup::bot(Archetype::Sumo, Difficulty::Hard),
    );

    let mut last_event_tick: [Option<u32>; 2] = [None, None];

    for tick in 1..=3000u32 {
        run_ticks(&mut app, 1);

        for entity in [a, b] {
            let f = fighter(&app, entity);
            assert!(!f.attacking || f.attack_animation_ticks > 0, "tick {}", tick);
            assert!(!(f.moving_left && f.moving_right), "tick {}", tick);
            assert!(f.health <= f.max_health);
            assert!(f.position.x >= 0.0 && f.position.x <= arena_width - f.width());
            assert!(f.attack_cooldown_ticks <= 30 && f.block_cooldown_ticks <= 40);
        }

        // Не больше одного события за замах
        for event in drain_combat_events(&mut app) {
            let slot = if event.attacker == a { 0 } else { 1 };
            if let Some(previous) = last_event_tick[slot] {
                assert!(tick - previous > 15, "two strikes from one swing at tick {}", tick);
            }
            last_event_tick[slot] = Some(tick);
        }

        if app.world().resource::<MatchState>().is_over() {
            break;
        }
    }
}

/// Test: бот с cooldown 25 за 25 тиков не принимает решений
#[test]
fn test_bot_decision_cooldown() {
    let mut app = create_duel_app(42, ArenaConfig::default());
    let (_, bot) = spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Athletic),
        FighterSetup::bot(Archetype::Athletic, Difficulty::Medium),
    );
    app.world_mut()
        .get_mut::<BotController>(bot)
        .unwrap()
        .decision_cooldown_ticks = 25;

    run_ticks(&mut app, 25);
    let controller = app.world().get::<BotController>(bot).unwrap();
    assert_eq!(controller.last_action, None);
    assert_eq!(controller.decision_cooldown_ticks, 0);

    run_ticks(&mut app, 1);
    let controller = app.world().get::<BotController>(bot).unwrap();
    assert!(controller.last_action.is_some());
    assert!((20..=30).contains(&controller.decision_cooldown_ticks));
}

/// Test: таймаут при равном здоровье → ничья
#[test]
fn test_timeout_draw() {
    let mut app = create_duel_app(42, ArenaConfig::default().with_round_time_limit(10));
    spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Heavy),
        FighterSetup::human(Archetype::Lean),
    );

    run_ticks(&mut app, 20);

    let state = app.world().resource::<MatchState>();
    assert_eq!(state.status, MatchStatus::Draw);
    assert_eq!(state.end_reason, Some(MatchEndReason::Timeout));
    assert_eq!(state.stats.round_ticks, 10);
}

/// Test: reset_match убирает бойцов и обнуляет состояние
#[test]
fn test_reset_match() {
    let mut app = create_duel_app(42, ArenaConfig::default());
    spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Athletic),
        FighterSetup::bot(Archetype::Robotic, Difficulty::Easy),
    );
    run_ticks(&mut app, 5);

    reset_match(app.world_mut());

    assert!(fighter_snapshots(app.world_mut()).is_empty());
    assert_eq!(app.world().resource::<MatchState>().tick, 0);
}

/// Test: после reset_match левый боец снова первый по спавну
///
/// Bevy отдаёт освобождённые index'ы в обратном порядке: новый левый боец
/// получает больший index, чем правый. Порядок всё равно по спавну.
#[test]
fn test_spawn_order_survives_reset() {
    let mut app = create_duel_app(42, ArenaConfig::default());
    spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Athletic),
        FighterSetup::human(Archetype::Athletic),
    );
    run_ticks(&mut app, 3);
    reset_match(app.world_mut());

    let (left, right) = spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Lean),
        FighterSetup::human(Archetype::Heavy),
    );

    let order: Vec<Archetype> = fighter_snapshots(app.world_mut())
        .iter()
        .map(|snapshot| snapshot.archetype)
        .collect();
    assert_eq!(order, vec![Archetype::Lean, Archetype::Heavy]);

    // Двойной нокаут: проигрывает заспавненный первым
    app.world_mut().get_mut::<Fighter>(left).unwrap().health = 0;
    app.world_mut().get_mut::<Fighter>(right).unwrap().health = 0;
    run_ticks(&mut app, 1);

    let state = app.world().resource::<MatchState>();
    assert_eq!(
        state.status,
        MatchStatus::Won {
            winner: right,
            loser: left
        }
    );
    assert_eq!(state.end_reason, Some(MatchEndReason::KnockOut));
}

/// Test: очереди событий не копятся на длинном матче
#[test]
fn test_event_queues_stay_bounded() {
    let mut app = create_duel_app(42, ArenaConfig::default());
    spawn_duel(
        app.world_mut(),
        FighterSetup::human(Archetype::Athletic),
        FighterSetup::human(Archetype::Athletic),
    );

    run_ticks(&mut app, 5000);

    // Без нажатий: один StopMoving на бойца за тик, живут последние два тика
    let commands = app.world().resource::<Events<FighterCommandIssued>>().len();
    assert!(commands <= 2 * 2, "{} commands retained", commands);
    assert_eq!(app.world().resource::<MatchState>().tick, 5000);
}
