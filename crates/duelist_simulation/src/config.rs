//! Конфигурация арены и матча
//!
//! Создаётся один раз хостом и вставляется как Resource.
//! Никаких глобальных констант экрана: рендер-слой передаёт размеры сам.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Фиксированная частота симуляции (тиков в секунду)
pub const TICK_RATE_HZ: f64 = 60.0;

/// Арена по умолчанию: окно 1024×768
pub const DEFAULT_ARENA_WIDTH: f32 = 1024.0;
pub const DEFAULT_ARENA_HEIGHT: f32 = 768.0;
/// Ground strip height under the fighters' feet.
pub const GROUND_STRIP_HEIGHT: f32 = 120.0;

/// Стартовая позиция левого бойца (x)
pub const LEFT_SPAWN_X: f32 = 200.0;
/// Отступ правого бойца от правого края арены
pub const RIGHT_SPAWN_MARGIN: f32 = 300.0;

/// Границы арены и правила раунда.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct ArenaConfig {
    /// Y координата земли (бойцы стоят на ней)
    pub ground_y: f32,
    /// Ширина арены; бойцы клампятся в `[0, arena_width - width]`
    pub arena_width: f32,
    /// Лимит раунда в тиках. `None`: бой идёт до нокаута.
    pub round_time_limit_ticks: Option<u32>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::from_screen(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

impl ArenaConfig {
    /// Arena derived from a screen size: ground sits `GROUND_STRIP_HEIGHT` above the bottom edge.
    pub fn from_screen(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > GROUND_STRIP_HEIGHT, "arena too small: {}x{}", width, height);
        Self {
            ground_y: height - GROUND_STRIP_HEIGHT,
            arena_width: width,
            round_time_limit_ticks: None,
        }
    }

    pub fn with_round_time_limit(mut self, ticks: u32) -> Self {
        self.round_time_limit_ticks = Some(ticks);
        self
    }

    /// Spawn x for the left corner fighter.
    pub fn left_spawn_x(&self) -> f32 {
        LEFT_SPAWN_X
    }

    /// Spawn x for the right corner fighter.
    pub fn right_spawn_x(&self) -> f32 {
        (self.arena_width - RIGHT_SPAWN_MARGIN).max(0.0)
    }
}

/// Параметры запуска симуляции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    pub arena: ArenaConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: ArenaConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arena_matches_window() {
        let arena = ArenaConfig::default();
        assert_eq!(arena.arena_width, 1024.0);
        assert_eq!(arena.ground_y, 648.0);
        assert_eq!(arena.round_time_limit_ticks, None);
    }

    #[test]
    fn test_spawn_positions() {
        let arena = ArenaConfig::from_screen(1280.0, 720.0);
        assert_eq!(arena.left_spawn_x(), 200.0);
        assert_eq!(arena.right_spawn_x(), 980.0);
        assert_eq!(arena.ground_y, 600.0);
    }

    #[test]
    fn test_round_time_limit_builder() {
        let arena = ArenaConfig::default().with_round_time_limit(3600);
        assert_eq!(arena.round_time_limit_ticks, Some(3600));
    }
}
