//! Deterministic simulation module
//!
//! All gameplay logic lives here. Every simulation must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed player processing order (player one before player two)
//! - No rendering, input, or platform dependencies

pub mod effects;
pub mod maze;
pub mod platformer;
pub mod puzzle;
pub mod space;

pub use effects::{EffectTimers, TimedEffect};

use serde::{Deserialize, Serialize};

use crate::input::PlayerId;

/// Terminal result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: PlayerId,
}

/// Render-boundary deltas produced during a tick.
///
/// The renderer draws from the session state each frame; events carry the
/// one-shot mutations (removals, hits, regenerations) that a state diff
/// would miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A pickup was consumed. `index` refers to the pickup list before any
    /// removals from this tick were applied.
    PickupCollected { player: PlayerId, index: usize },
    /// A degradable platform ran out of durability and was removed.
    PlatformDestroyed { index: usize },
    /// A projectile struck the opposing ship.
    ProjectileHit {
        shooter: PlayerId,
        absorbed_by_shield: bool,
    },
    /// A player completed their puzzle (never session-terminal).
    PuzzleCompleted { player: PlayerId },
    /// A fresh puzzle replaced a completed one for this player.
    PuzzleRegenerated { player: PlayerId },
    /// Hint token consumed; the renderer should highlight this tile.
    HintHighlight { player: PlayerId, tile_index: usize },
}
