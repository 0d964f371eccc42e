//! Headless demo driver
//!
//! Runs one session with a scripted input pattern and prints the final
//! state as JSON. Useful for eyeballing determinism:
//!
//! ```text
//! duel-sim <maze|platformer|space|puzzle> [seed] [ticks]
//! ```

use std::env;
use std::process::ExitCode;

use duel_sim::config::{MazeConfig, PlatformerConfig, PuzzleConfig, SpaceConfig};
use duel_sim::sim::puzzle::{PuzzleCommand, PuzzleInput};
use duel_sim::{Held, PerPlayer, Session, SessionConfig, SessionInput};

fn parse_config(name: &str) -> Option<SessionConfig> {
    match name {
        "maze" => Some(SessionConfig::Maze(MazeConfig::default())),
        "platformer" => Some(SessionConfig::Platformer(PlatformerConfig::default())),
        "space" => Some(SessionConfig::Space(SpaceConfig::default())),
        "puzzle" => Some(SessionConfig::Puzzle(PuzzleConfig::default())),
        _ => None,
    }
}

/// Deterministic input script: both players wiggle through a fixed pattern
/// so every variant sees some movement, jumps and fire.
fn scripted_input(config: &SessionConfig, tick: u64) -> SessionInput {
    match config {
        SessionConfig::Puzzle(_) => {
            let command = match tick % 40 {
                0 => Some(PuzzleCommand::MoveTile((tick / 40 % 16) as usize)),
                20 => Some(PuzzleCommand::MoveTile((tick / 20 % 16) as usize)),
                _ => None,
            };
            let input = PuzzleInput { command };
            SessionInput::Puzzle(PerPlayer::new(input, input))
        }
        _ => {
            let phase = tick % 120;
            let one = Held {
                right: phase < 50,
                down: (50..100).contains(&phase),
                up: phase % 90 == 0,
                fire: phase % 10 == 0,
                ..Default::default()
            };
            let two = Held {
                left: phase < 50,
                up: (50..100).contains(&phase) || phase % 70 == 0,
                fire: phase % 12 == 0,
                ..Default::default()
            };
            SessionInput::Directional(PerPlayer::new(one, two))
        }
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let variant = args.next().unwrap_or_else(|| "maze".to_string());
    let config = parse_config(&variant)
        .ok_or_else(|| format!("unknown variant {variant:?} (maze|platformer|space|puzzle)"))?;
    let seed: u64 = match args.next() {
        Some(s) => s.parse().map_err(|_| format!("bad seed {s:?}"))?,
        None => 42,
    };
    let ticks: u64 = match args.next() {
        Some(s) => s.parse().map_err(|_| format!("bad tick count {s:?}"))?,
        None => 600,
    };

    let mut session = Session::start(config.clone(), seed).map_err(|e| e.to_string())?;
    for t in 0..ticks {
        let input = scripted_input(&config, t);
        let out = session.tick(&input).map_err(|e| e.to_string())?;
        for event in &out.events {
            log::info!("tick {t}: {event:?}");
        }
        if let Some(outcome) = out.outcome {
            log::info!("session over: {} wins", outcome.winner);
            break;
        }
    }

    let json = serde_json::to_string_pretty(&session).map_err(|e| e.to_string())?;
    println!("{json}");
    session.stop();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}
