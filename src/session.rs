//! Session lifecycle
//!
//! A [`Session`] wraps one variant's state behind a uniform start/tick/stop
//! surface. The host samples both players' inputs each frame, calls [`tick`]
//! at the fixed rate, and draws from the state plus the returned events.
//!
//! [`tick`]: Session::tick

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::SimError;
use crate::input::{Held, PerPlayer};
use crate::sim::maze::MazeState;
use crate::sim::platformer::PlatformerState;
use crate::sim::puzzle::{PuzzleInput, PuzzleState};
use crate::sim::space::SpaceState;
use crate::sim::{GameEvent, Outcome};

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// One tick's worth of sampled input for both players.
///
/// The shape must match the variant: directional for maze, platformer and
/// space; discrete commands for the puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionInput {
    Directional(PerPlayer<Held>),
    Puzzle(PerPlayer<PuzzleInput>),
}

impl SessionInput {
    /// Neutral input of the right shape for a config, for hosts that tick
    /// while no keys are held.
    pub fn neutral(config: &SessionConfig) -> Self {
        match config {
            SessionConfig::Puzzle(_) => {
                SessionInput::Puzzle(PerPlayer::new(PuzzleInput::default(), PuzzleInput::default()))
            }
            _ => SessionInput::Directional(PerPlayer::new(Held::default(), Held::default())),
        }
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutput {
    pub events: Vec<GameEvent>,
    /// Set on the terminal tick and every tick after; `None` for variants
    /// that never terminate.
    pub outcome: Option<Outcome>,
}

/// A running game session. All variant state serializes, so a session can be
/// snapshotted and resumed mid-game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Session {
    Maze(MazeState),
    Platformer(PlatformerState),
    Space(SpaceState),
    Puzzle(PuzzleState),
}

impl Session {
    /// Validate the config and build the variant's initial state from the
    /// seed. Equal `(config, seed)` pairs produce identical sessions.
    pub fn start(config: SessionConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        log::info!("starting {} session (seed {seed})", config.variant_name());
        let mut rng = Pcg32::seed_from_u64(seed);
        Ok(match config {
            SessionConfig::Maze(c) => Session::Maze(MazeState::new(c, &mut rng)?),
            SessionConfig::Platformer(c) => Session::Platformer(PlatformerState::new(c, &mut rng)?),
            SessionConfig::Space(c) => Session::Space(SpaceState::new(c, seed)?),
            SessionConfig::Puzzle(c) => Session::Puzzle(PuzzleState::new(c, seed)?),
        })
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Session::Maze(_) => "maze",
            Session::Platformer(_) => "platformer",
            Session::Space(_) => "space",
            Session::Puzzle(_) => "puzzle",
        }
    }

    /// Advance one fixed timestep. Inputs of the wrong shape for the running
    /// variant are a host programming defect, reported as an error rather
    /// than guessed around.
    pub fn tick(&mut self, input: &SessionInput) -> Result<TickOutput, SimError> {
        match (self, input) {
            (Session::Maze(state), SessionInput::Directional(held)) => Ok(TickOutput {
                events: Vec::new(),
                outcome: state.tick(held),
            }),
            (Session::Platformer(state), SessionInput::Directional(held)) => Ok(TickOutput {
                events: state.tick(held),
                outcome: None,
            }),
            (Session::Space(state), SessionInput::Directional(held)) => {
                let (events, outcome) = state.tick(held);
                Ok(TickOutput { events, outcome })
            }
            (Session::Puzzle(state), SessionInput::Puzzle(commands)) => Ok(TickOutput {
                events: state.tick(commands),
                outcome: None,
            }),
            (session, _) => Err(SimError::invariant(format!(
                "input shape does not match running {} session",
                session.variant_name()
            ))),
        }
    }

    /// Terminal result, if the session has one.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Session::Maze(state) => state.winner.map(|winner| Outcome { winner }),
            Session::Space(state) => state.winner.map(|winner| Outcome { winner }),
            Session::Platformer(_) | Session::Puzzle(_) => None,
        }
    }

    /// Ticks elapsed since the session started.
    pub fn time_ticks(&self) -> u64 {
        match self {
            Session::Maze(state) => state.time_ticks,
            Session::Platformer(state) => state.time_ticks,
            Session::Space(state) => state.time_ticks,
            Session::Puzzle(state) => state.time_ticks,
        }
    }

    /// Tear the session down. Dropping is equally fine; this exists so hosts
    /// have an explicit, logged end-of-session point.
    pub fn stop(self) {
        log::info!(
            "stopping {} session after {} ticks",
            self.variant_name(),
            self.time_ticks()
        );
    }
}
