//! Headless поединок бот против бота
//!
//! Использование: `duelist_simulation --seed 7 --left ninja --right sumo --difficulty hard`

use clap::Parser;
use duelist_simulation::*;

/// 99 секунд раунда при 60Hz
const ROUND_TIME_LIMIT_TICKS: u32 = 99 * 60;

#[derive(Parser, Debug)]
#[command(name = "duelist_simulation")]
#[command(about = "Run a headless bot vs bot duel", long_about = None)]
struct Cli {
    /// Seed for bot decisions
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Left corner archetype
    #[arg(long, value_enum, default_value_t = Archetype::Athletic)]
    left: Archetype,

    /// Right corner archetype
    #[arg(long, value_enum, default_value_t = Archetype::Heavy)]
    right: Archetype,

    /// Difficulty of both bots
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,
}

fn main() {
    let Cli {
        seed,
        left,
        right,
        difficulty,
    } = Cli::parse();

    println!(
        "Starting duel: {} vs {} ({} bots, seed: {})",
        left.name(),
        right.name(),
        difficulty.name(),
        seed
    );

    let config = SimulationConfig {
        seed,
        arena: ArenaConfig::default().with_round_time_limit(ROUND_TIME_LIMIT_TICKS),
    };
    let mut app = create_headless_app(config);
    logger::set_log_level(logger::LogLevel::Info);

    let (left_id, right_id) = spawn_duel(
        app.world_mut(),
        FighterSetup::bot(left, difficulty),
        FighterSetup::bot(right, difficulty),
    );

    while !app.world().resource::<MatchState>().is_over() {
        run_ticks(&mut app, 1);

        let tick = app.world().resource::<MatchState>().tick;
        if tick % 100 == 0 {
            let snapshots = fighter_snapshots(app.world_mut());
            let health: Vec<String> = snapshots
                .iter()
                .map(|fighter| format!("{} {}/{}", fighter.archetype.name(), fighter.health, fighter.max_health))
                .collect();
            println!("Tick {}: {}", tick, health.join(" | "));
        }
    }

    let state = app.world().resource::<MatchState>().clone();
    match state.status {
        MatchStatus::Won { winner, .. } => {
            let side = if winner == left_id { "left" } else { "right" };
            println!("Winner: {} fighter {:?} ({:?})", side, winner, state.end_reason);
        }
        MatchStatus::Draw => println!("Draw ({:?})", state.end_reason),
        MatchStatus::InProgress => {}
    }

    for (label, fighter) in [("left", left_id), ("right", right_id)] {
        let stats = state.stats.for_fighter(fighter);
        println!(
            "{}: {} hits, {} blocks, {} damage",
            label, stats.hits_landed, stats.blocks_made, stats.damage_dealt
        );
    }
    println!("Round duration: {} ticks", state.stats.round_ticks);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["duelist_simulation"]).unwrap();
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.left, Archetype::Athletic);
        assert_eq!(cli.right, Archetype::Heavy);
        assert_eq!(cli.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_cli_parses_names() {
        let cli = Cli::try_parse_from([
            "duelist_simulation",
            "--seed",
            "7",
            "--left",
            "ninja",
            "--right",
            "sumo",
            "--difficulty",
            "insane",
        ])
        .unwrap();
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.left, Archetype::Ninja);
        assert_eq!(cli.right, Archetype::Sumo);
        assert_eq!(cli.difficulty, Difficulty::Insane);
    }

    #[test]
    fn test_cli_rejects_typos() {
        assert!(Cli::try_parse_from(["duelist_simulation", "--seed", "4x2"]).is_err());
        assert!(Cli::try_parse_from(["duelist_simulation", "--left", "sumoo"]).is_err());
        assert!(Cli::try_parse_from(["duelist_simulation", "--difficulty", "nightmare"]).is_err());
    }
}
