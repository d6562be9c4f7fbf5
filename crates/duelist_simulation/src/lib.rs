//! Duelist Simulation Core
//!
//! ECS-симуляция 2D поединка на Bevy 0.16 (headless).
//! Рендер, меню и звук живут в host-слое и читают только
//! `Fighter` / `CombatEvent` / `MatchState`.
//!
//! Тик = один прогон `FixedUpdate` (60Hz). Порядок внутри тика задают `DuelSystems`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod duel;
pub mod input;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, BotAction, BotController, BotDecision, Difficulty, DifficultyPreset};
pub use combat::{CombatEvent, CombatPlugin, FighterCommandIssued, StrikeKind, StrikeOutcome};
pub use components::*;
pub use config::{ArenaConfig, SimulationConfig, TICK_RATE_HZ};
pub use duel::{DuelPlugin, FighterStats, MatchEndReason, MatchEnded, MatchState, MatchStats, MatchStatus};
pub use input::PlayerInput;
pub use logger::init_logger;

/// Фазы тика в FixedUpdate (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum DuelSystems {
    /// Счётчик тиков матча
    Clock,
    /// PlayerInput → FighterCommandIssued
    Input,
    /// FighterCommandIssued → Fighter
    Commands,
    /// Fighter::update (движение, таймеры)
    Movement,
    /// Рефлекторный блок и решения ботов
    Bot,
    /// Удары → CombatEvent
    Resolution,
    /// Статистика и конец матча
    Outcome,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            // Ресурсы по умолчанию (host может вставить свои заранее)
            .init_resource::<ArenaConfig>()
            .init_resource::<DeterministicRng>()
            .init_resource::<SpawnCounter>()
            .configure_sets(
                FixedUpdate,
                (
                    DuelSystems::Clock,
                    DuelSystems::Input,
                    DuelSystems::Commands,
                    DuelSystems::Movement,
                    DuelSystems::Bot,
                    DuelSystems::Resolution,
                    DuelSystems::Outcome,
                )
                    .chain()
                    // Матч закончен: симуляция замирает
                    .distributive_run_if(duel::match_in_progress),
            )
            .add_systems(FixedUpdate, input::translate_player_input.in_set(DuelSystems::Input))
            // Подсистемы
            .add_plugins((DuelPlugin, CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(SimulationConfig::default().seed)
    }
}

/// Создаёт minimal Bevy App для headless симуляции (с SimulationPlugin)
pub fn create_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(config.seed))
        .insert_resource(config.arena)
        .add_plugins(SimulationPlugin);

    app
}

/// Прогнать `ticks` тиков симуляции (по одному FixedUpdate на тик).
///
/// Не зависит от wall-clock времени: тесты и headless runner детерминированы.
/// После каждого тика очереди событий переключаются (вместо `First`), поэтому
/// событие доступно host'у до конца следующего тика, а потом отбрасывается.
pub fn run_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        let world = app.world_mut();
        world.run_schedule(FixedUpdate);
        update_simulation_events(world);
    }
}

/// Двойной буфер событий симуляции: без `First` его никто не переключает.
fn update_simulation_events(world: &mut World) {
    update_events::<FighterCommandIssued>(world);
    update_events::<CombatEvent>(world);
    update_events::<MatchEnded>(world);
}

fn update_events<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}

/// Счётчик спавнов (не сбрасывается `reset_match`)
#[derive(Resource, Debug, Default)]
pub struct SpawnCounter {
    next: u32,
}

impl SpawnCounter {
    pub fn next_seq(&mut self) -> SpawnSeq {
        let seq = SpawnSeq(self.next);
        self.next += 1;
        seq
    }
}

/// Кто управляет бойцом
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    /// Host пишет PlayerInput
    Human,
    Bot(Difficulty),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterSetup {
    pub archetype: Archetype,
    pub controller: Controller,
}

impl FighterSetup {
    pub fn human(archetype: Archetype) -> Self {
        Self {
            archetype,
            controller: Controller::Human,
        }
    }

    pub fn bot(archetype: Archetype, difficulty: Difficulty) -> Self {
        Self {
            archetype,
            controller: Controller::Bot(difficulty),
        }
    }
}

/// Спавн бойца в своём углу арены
pub fn spawn_fighter(world: &mut World, setup: FighterSetup, corner: Side) -> Entity {
    let arena = world.get_resource::<ArenaConfig>().cloned().unwrap_or_default();
    let x = match corner {
        Side::Left => arena.left_spawn_x(),
        Side::Right => arena.right_spawn_x(),
    };

    let seq = world.get_resource_or_insert_with(SpawnCounter::default).next_seq();

    let mut entity = world.spawn((Fighter::on_ground(setup.archetype, corner, x, arena.ground_y), seq));
    match setup.controller {
        Controller::Human => {
            entity.insert(PlayerInput::default());
        }
        Controller::Bot(difficulty) => {
            entity.insert(BotController::new(difficulty));
        }
    }

    let id = entity.id();
    logger::log(&format!(
        "🥊 Spawned {} fighter {:?} (#{}) at x={:.0} ({:?})",
        setup.archetype.name(),
        id,
        seq.0,
        x,
        setup.controller
    ));
    id
}

/// Новый поединок: левый боец спавнится первым
pub fn spawn_duel(world: &mut World, left: FighterSetup, right: FighterSetup) -> (Entity, Entity) {
    let left = spawn_fighter(world, left, Side::Left);
    let right = spawn_fighter(world, right, Side::Right);
    (left, right)
}

/// Сбросить матч: удалить бойцов и обнулить MatchState.
///
/// `SpawnCounter` продолжает счёт, так что новые бойцы идут после удалённых.
pub fn reset_match(world: &mut World) {
    let fighters: Vec<Entity> = world
        .query_filtered::<Entity, With<Fighter>>()
        .iter(world)
        .collect();
    for fighter in fighters {
        world.despawn(fighter);
    }
    world.insert_resource(MatchState::default());
}

/// Snapshot всех бойцов (в порядке спавна) для рендера и сравнения детерминизма
pub fn fighter_snapshots(world: &mut World) -> Vec<FighterSnapshot> {
    let mut query = world.query::<(Entity, &Fighter, Option<&SpawnSeq>)>();
    let mut fighters: Vec<_> = query.iter(world).collect();

    // Index переиспользуется после reset_match, SpawnSeq нет
    fighters.sort_by_key(|(entity, _, seq)| combat::spawn_rank(*entity, *seq));

    fighters.into_iter().map(|(_, fighter, _)| fighter.snapshot()).collect()
}
