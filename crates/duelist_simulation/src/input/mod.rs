//! Player input → FighterCommand
//!
//! Host пишет состояние клавиш в `PlayerInput` каждый кадр.
//! Attack/block срабатывают только по нажатию (rising edge).

use bevy::prelude::*;

use crate::combat::{opponent_in, spawn_order, FighterCommandIssued, SpawnOrderQuery};
use crate::components::{Fighter, FighterCommand};

/// Удерживаемые клавиши игрока (выставляет host)
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub block: bool,
    /// Attack/block state seen on the previous tick
    previous_attack: bool,
    previous_block: bool,
}

impl PlayerInput {
    pub fn held(left: bool, right: bool, attack: bool, block: bool) -> Self {
        Self {
            left,
            right,
            attack,
            block,
            ..default()
        }
    }

    /// Команды этого тика; запоминает attack/block для edge detection.
    pub fn commands(&mut self, opponent_x: Option<f32>) -> Vec<FighterCommand> {
        // Обе стрелки: правая обрабатывается последней и побеждает
        let mut commands = vec![if self.right {
            FighterCommand::MoveRight
        } else if self.left {
            FighterCommand::MoveLeft
        } else {
            FighterCommand::StopMoving
        }];

        if let Some(opponent_x) = opponent_x {
            if self.attack && !self.previous_attack {
                commands.push(FighterCommand::Attack { opponent_x });
            }
            if self.block && !self.previous_block {
                commands.push(FighterCommand::Block { opponent_x });
            }
        }

        self.previous_attack = self.attack;
        self.previous_block = self.block;
        commands
    }
}

/// System: PlayerInput → FighterCommandIssued
pub fn translate_player_input(
    mut players: Query<(Entity, &mut PlayerInput), With<Fighter>>,
    spawned: SpawnOrderQuery,
    fighters: Query<(Entity, &Fighter)>,
    mut issued: EventWriter<FighterCommandIssued>,
) {
    let order = spawn_order(&spawned);

    for (entity, mut input) in players.iter_mut() {
        let opponent_x = opponent_in(&order, entity)
            .and_then(|opponent| fighters.get(opponent).ok())
            .map(|(_, opponent)| opponent.position.x);

        for command in input.commands(opponent_x) {
            issued.write(FighterCommandIssued {
                fighter: entity,
                command,
            });
        }
    }
}
