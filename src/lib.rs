//! duel-sim - a deterministic two-local-player arcade simulation engine
//!
//! Four independent real-time simulations share one engine shape:
//! - `sim::maze`: race through a procedurally carved perfect maze
//! - `sim::platformer`: continuous platform physics with timed power-ups
//! - `sim::space`: projectile duel on a bounded plane
//! - `sim::puzzle`: per-player solvable sliding 15-puzzles
//!
//! The engine never reads the keyboard and never draws. The embedding shell
//! samples held controls into [`input::Held`] once per tick, calls
//! [`session::Session::tick`], and reads the serializable state back out for
//! rendering. All randomness flows from the session seed; the same seed and
//! input script always reproduce the same state.

pub mod config;
pub mod error;
pub mod input;
pub mod session;
pub mod sim;

pub use config::SessionConfig;
pub use error::SimError;
pub use input::{Held, PerPlayer, PlayerId};
pub use session::{Session, SessionInput, TickOutput};
pub use sim::{GameEvent, Outcome};

/// Engine-wide constants
pub mod consts {
    /// Fixed simulation tick rate. The external frame pacer is expected to
    /// call `tick` at this rate; nothing inside the engine reads a clock.
    pub const TICK_HZ: u32 = 60;

    /// Duration of every time-boxed ability (5 seconds of ticks).
    pub const EFFECT_DURATION_TICKS: u32 = 5 * TICK_HZ;
}
