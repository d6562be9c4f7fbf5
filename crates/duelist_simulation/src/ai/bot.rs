//! BotController: политика решений бота
//!
//! Reactive policy over four distance bands with permanent health-driven
//! adaptation. Every random draw goes through the injected generator, in a
//! fixed order, so a seeded match replays exactly.
//!
//! Поток решения:
//! 1. decision cooldown (пауза между решениями)
//! 2. distance band → действие
//! 3. адаптация по здоровью (aggression ↑, caution ↓)
//! 4. реакция на последнее действие противника-бота
//! 5. новый cooldown

use bevy::prelude::*;
use rand::Rng;

use super::difficulty::Difficulty;
use crate::components::{Fighter, FighterCommand};

// Distance bands (px)
pub const CLOSE_RANGE: f32 = 80.0;
pub const NEAR_RANGE: f32 = 150.0;
pub const MID_RANGE: f32 = 250.0;

const LOW_HEALTH_RATIO: f32 = 0.3;
const MID_HEALTH_RATIO: f32 = 0.6;

/// Вероятность рефлекторного блока за тик при низком здоровье
const REFLEX_BLOCK_CHANCE: f32 = 0.3;
const COUNTER_BLOCK_CHANCE: f32 = 0.7;
const FLANK_CHANCE: f32 = 0.6;

const MIN_DECISION_COOLDOWN: u32 = 5;
const MAX_DECISION_COOLDOWN: u32 = 30;
const DECISION_COOLDOWN_SPREAD: u32 = 5;

/// Последнее действие бота (видно противнику-боту)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum BotAction {
    Attack,
    Block,
    Advance,
    Retreat,
    Wait,
    Positioning,
    Prepare,
    CounterBlock,
    Flank,
}

impl BotAction {
    pub fn name(self) -> &'static str {
        match self {
            BotAction::Attack => "attack",
            BotAction::Block => "block",
            BotAction::Advance => "advance",
            BotAction::Retreat => "retreat",
            BotAction::Wait => "wait",
            BotAction::Positioning => "positioning",
            BotAction::Prepare => "prepare",
            BotAction::CounterBlock => "counter_block",
            BotAction::Flank => "flank",
        }
    }
}

/// Итог одного решения: действие + команды бойцу (в порядке применения)
#[derive(Clone, Debug, PartialEq)]
pub struct BotDecision {
    pub action: BotAction,
    pub commands: Vec<FighterCommand>,
}

impl BotDecision {
    /// Сбросить текущие действия бойца и применить команды.
    pub fn apply_to(&self, fighter: &mut Fighter) {
        fighter.cancel_actions();
        for command in &self.commands {
            fighter.apply(*command);
        }
    }
}

/// Bot brain attached next to a `Fighter`.
///
/// `aggression` and `caution` only move in one direction during a match.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct BotController {
    pub difficulty: Difficulty,
    pub aggression: f32,
    pub caution: f32,
    /// Base ticks between decisions
    pub reaction_time: u32,
    pub decision_cooldown_ticks: u32,
    pub last_action: Option<BotAction>,
}

impl Default for BotController {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl BotController {
    pub fn new(difficulty: Difficulty) -> Self {
        let preset = difficulty.preset();
        Self {
            difficulty,
            aggression: preset.aggression,
            caution: preset.caution,
            reaction_time: preset.reaction_time,
            decision_cooldown_ticks: 0,
            last_action: None,
        }
    }

    /// Принять решение (раз в `decision_cooldown_ticks` тиков).
    ///
    /// Returns `None` while the decision cooldown runs (it is decremented).
    pub fn decide<R: Rng>(
        &mut self,
        me: &Fighter,
        opponent_x: f32,
        opponent_last_action: Option<BotAction>,
        rng: &mut R,
    ) -> Option<BotDecision> {
        if self.decision_cooldown_ticks > 0 {
            self.decision_cooldown_ticks -= 1;
            return None;
        }

        let distance = (me.position.x - opponent_x).abs();
        let opponent_is_left = me.position.x > opponent_x;
        let toward = if opponent_is_left {
            FighterCommand::MoveLeft
        } else {
            FighterCommand::MoveRight
        };
        // Retreat и Flank уходят от противника, а не сближаются с ним:
        // шаг навстречу под видом отступления только подставляет бота под удар
        let away = if opponent_is_left {
            FighterCommand::MoveRight
        } else {
            FighterCommand::MoveLeft
        };
        let attack = FighterCommand::Attack { opponent_x };
        let block = FighterCommand::Block { opponent_x };

        let mut commands = Vec::new();
        let mut action = if distance < CLOSE_RANGE {
            if rng.gen::<f32>() < self.aggression * 1.2 {
                if rng.gen::<f32>() < 0.8 {
                    commands.push(attack);
                    BotAction::Attack
                } else {
                    commands.push(block);
                    BotAction::Block
                }
            } else if rng.gen::<f32>() < self.caution * 0.8 {
                commands.push(away);
                BotAction::Retreat
            } else {
                BotAction::Wait
            }
        } else if distance < NEAR_RANGE {
            if rng.gen::<f32>() < self.aggression {
                if rng.gen::<f32>() < 0.6 {
                    commands.push(attack);
                    BotAction::Attack
                } else {
                    commands.push(toward);
                    BotAction::Advance
                }
            } else if rng.gen::<f32>() < self.caution {
                commands.push(block);
                BotAction::Block
            } else {
                commands.push(toward);
                BotAction::Positioning
            }
        } else if distance < MID_RANGE {
            if rng.gen::<f32>() < 0.6 {
                commands.push(toward);
                BotAction::Advance
            } else if rng.gen::<f32>() < 0.3 {
                commands.push(block);
                BotAction::Prepare
            } else {
                BotAction::Wait
            }
        } else if rng.gen::<f32>() < 0.8 {
            commands.push(toward);
            BotAction::Advance
        } else {
            BotAction::Wait
        };

        self.adapt_to_health(me.health_ratio());

        match opponent_last_action {
            Some(BotAction::Attack) => {
                if rng.gen::<f32>() < COUNTER_BLOCK_CHANCE {
                    commands.push(block);
                    action = BotAction::CounterBlock;
                }
            }
            Some(BotAction::Block) => {
                if rng.gen::<f32>() < FLANK_CHANCE {
                    commands.push(away);
                    action = BotAction::Flank;
                }
            }
            _ => {}
        }

        self.last_action = Some(action);
        self.decision_cooldown_ticks = self.roll_decision_cooldown(rng);

        Some(BotDecision { action, commands })
    }

    /// Permanent adaptation to own health.
    ///
    /// A cap never lowers aggression and a floor never raises caution.
    pub fn adapt_to_health(&mut self, health_ratio: f32) {
        if health_ratio < LOW_HEALTH_RATIO {
            self.aggression = raise_capped(self.aggression, 0.2, 0.95);
            self.caution = lower_floored(self.caution, 0.1, 0.05);
        } else if health_ratio < MID_HEALTH_RATIO {
            self.aggression = raise_capped(self.aggression, 0.1, 0.8);
            self.caution = lower_floored(self.caution, 0.05, 0.2);
        }
    }

    /// Inclusive cooldown range around `reaction_time`.
    pub fn decision_cooldown_range(&self) -> (u32, u32) {
        let low = MIN_DECISION_COOLDOWN.max(self.reaction_time.saturating_sub(DECISION_COOLDOWN_SPREAD));
        let high = MAX_DECISION_COOLDOWN.min(self.reaction_time + DECISION_COOLDOWN_SPREAD);
        // Медленные пресеты упираются в верхнюю границу
        (low.min(high), high)
    }

    fn roll_decision_cooldown<R: Rng>(&self, rng: &mut R) -> u32 {
        let (low, high) = self.decision_cooldown_range();
        rng.gen_range(low..=high)
    }

    /// Рефлекторный блок при здоровье ниже 30% (шанс 0.3 за тик).
    ///
    /// The draw happens only when health is low. Returns whether a block started.
    pub fn reflex_block<R: Rng>(fighter: &mut Fighter, opponent_x: Option<f32>, rng: &mut R) -> bool {
        if fighter.health as f32 >= fighter.max_health as f32 * LOW_HEALTH_RATIO {
            return false;
        }
        if rng.gen::<f32>() >= REFLEX_BLOCK_CHANCE {
            return false;
        }

        match opponent_x {
            Some(opponent_x) => fighter.block(opponent_x),
            None => false,
        }
    }
}

fn raise_capped(value: f32, step: f32, cap: f32) -> f32 {
    (value + step).min(cap).max(value)
}

fn lower_floored(value: f32, step: f32, floor: f32) -> f32 {
    (value - step).max(floor).min(value)
}
