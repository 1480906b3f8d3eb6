//! Quoridor-Engine: a wall-racing board game engine.
//!
//! ## Usage
//!
//! - `quoridor-engine` - Show a demo game
//! - `quoridor-engine play` - Start the text protocol loop on stdin/stdout
//! - `quoridor-engine demo` - Watch two engine players race
//! - `quoridor-engine selfplay` - Run a batch of engine-vs-engine games

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quoridor_engine::protocol::ProtocolEngine;
use quoridor_engine::state::{PlayerId, apply_move, create_game, is_finished};
use quoridor_engine::strategy::{Difficulty, Strategy};

/// Quoridor-Engine: a wall-racing board game engine with MCTS search
#[derive(Parser)]
#[command(name = "quoridor-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol loop for use with front ends and scripts
    Play {
        /// Default strength for genmove
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
    },
    /// Run a single demo game with the board printed after every move
    Demo,
    /// Run a batch of engine-vs-engine games and report the result split
    Selfplay {
        /// Number of games to play
        #[arg(long, default_value_t = 10)]
        games: usize,
        /// Strength of both players
        #[arg(long, value_enum, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,
        /// Seed for the first game; successive games increment it
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play { difficulty }) => {
            let mut engine = ProtocolEngine::with_difficulty(difficulty);
            engine.run();
        }
        Some(Commands::Selfplay {
            games,
            difficulty,
            seed,
        }) => {
            run_selfplay(games, difficulty, seed)?;
        }
        Some(Commands::Demo) | None => {
            run_demo()?;
        }
    }
    Ok(())
}

/// Play one easy-vs-medium game, printing the board as it goes.
fn run_demo() -> Result<()> {
    println!("Quoridor-Engine demo: easy vs medium\n");

    let mut game = create_game(&[PlayerId(1), PlayerId(2)], 2)?;
    let mut players = [
        Strategy::for_difficulty(Difficulty::Easy),
        Strategy::for_difficulty(Difficulty::Medium),
    ];

    println!("{game}");
    while !is_finished(&game) {
        let mover = game.current_player().id;
        let mv = players[game.current].select(&game, mover)?;
        println!("player {mover}: {mv}");
        game = apply_move(&game, &mv)?;
        println!("{game}");
    }
    if let Some(winner) = game.winner {
        println!("winner: player {winner}");
    }
    Ok(())
}

/// Play `games` seeded engine-vs-engine games and print the win split.
fn run_selfplay(games: usize, difficulty: Difficulty, seed: u64) -> Result<()> {
    let mut wins = [0usize; 2];
    for n in 0..games {
        let mut game = create_game(&[PlayerId(1), PlayerId(2)], 2)?;
        let mut players = [
            Strategy::for_difficulty(difficulty).seeded(seed + 2 * n as u64),
            Strategy::for_difficulty(difficulty).seeded(seed + 2 * n as u64 + 1),
        ];
        while !is_finished(&game) {
            let mover = game.current_player().id;
            let mv = players[game.current].select(&game, mover)?;
            game = apply_move(&game, &mv)?;
        }
        if let Some(winner) = game.winner {
            let idx = if winner == PlayerId(1) { 0 } else { 1 };
            wins[idx] += 1;
            info!(game = n + 1, %winner, plies = game.history.len(), "game finished");
        }
    }
    println!(
        "{games} games at {difficulty}: player 1 won {}, player 2 won {}",
        wins[0], wins[1]
    );
    Ok(())
}
