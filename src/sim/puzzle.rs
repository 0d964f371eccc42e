//! Side-by-side sliding puzzle
//!
//! Each player works their own board of the same dimension. Boards are
//! shuffled with an inversion-parity fix so every deal is solvable. Commands
//! arrive as discrete one-per-tick requests rather than held keys; illegal
//! or spent requests are silent no-ops. Completing a board is never
//! session-terminal: it awards a bonus, then a fresh board replaces it after
//! a short delay and the one-shot assist tokens come back.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::GameEvent;
use crate::config::PuzzleConfig;
use crate::error::SimError;
use crate::input::{PerPlayer, PlayerId};

/// Points per tile in its home slot.
const SCORE_PER_CORRECT_TILE: u32 = 10;
/// Awarded once per completed board.
const COMPLETION_BONUS: u32 = 1000;
/// Ticks between completion and the replacement board appearing.
const NEW_ROUND_DELAY_TICKS: u32 = 30;

/// One discrete request. At most one per player per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleCommand {
    /// Slide the tile at this index into the adjacent empty slot.
    MoveTile(usize),
    Hint,
    Shuffle,
    Undo,
}

/// Per-player input sample for a puzzle tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleInput {
    pub command: Option<PuzzleCommand>,
}

/// Flat row-major board; 0 marks the empty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    dim: usize,
    tiles: Vec<u8>,
}

impl Board {
    /// Shuffle a solved board, then force even inversion parity by swapping
    /// two non-empty tiles if needed. With the empty slot in the last row,
    /// even parity is exactly solvability for any board dimension.
    pub fn generate(dim: usize, rng: &mut impl Rng) -> Self {
        let count = dim * dim;
        let mut tiles: Vec<u8> = (1..count as u8).collect();
        tiles.shuffle(rng);
        tiles.push(0);

        let mut board = Self { dim, tiles };
        if !board.is_solvable() {
            board.tiles.swap(0, 1);
        }
        board
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    fn inversions(&self) -> usize {
        let mut count = 0;
        for i in 0..self.tiles.len() {
            if self.tiles[i] == 0 {
                continue;
            }
            for j in i + 1..self.tiles.len() {
                if self.tiles[j] != 0 && self.tiles[j] < self.tiles[i] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Solvability for a board whose empty slot sits in the bottom row.
    /// Odd widths need even inversions; even widths fold in the empty
    /// slot's row distance from the bottom (zero here), so the same even
    /// test applies.
    fn is_solvable(&self) -> bool {
        self.inversions() % 2 == 0
    }

    fn empty_index(&self) -> usize {
        // Generation and apply_move both maintain exactly one zero.
        self.tiles.iter().position(|&t| t == 0).unwrap_or(0)
    }

    /// A move is legal when the named slot is orthogonally adjacent to the
    /// empty slot.
    pub fn is_legal_move(&self, index: usize) -> bool {
        if index >= self.tiles.len() || self.tiles[index] == 0 {
            return false;
        }
        let empty = self.empty_index();
        let (r1, c1) = (index / self.dim, index % self.dim);
        let (r2, c2) = (empty / self.dim, empty % self.dim);
        r1.abs_diff(r2) + c1.abs_diff(c2) == 1
    }

    fn apply_move(&mut self, index: usize) {
        let empty = self.empty_index();
        self.tiles.swap(index, empty);
    }

    /// Count of tiles in their home slot (the empty slot does not count).
    pub fn correct_tiles(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t != 0 && t as usize == i + 1)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.correct_tiles() == self.tiles.len() - 1
    }

    /// A random slot whose tile is out of place, for the hint highlight.
    fn misplaced_tile(&self, rng: &mut impl Rng) -> Option<usize> {
        let wrong: Vec<usize> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t != 0 && t as usize != i + 1)
            .map(|(i, _)| i)
            .collect();
        if wrong.is_empty() {
            None
        } else {
            Some(wrong[rng.random_range(0..wrong.len())])
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBoard {
    pub board: Board,
    /// Snapshots before each applied move, for undo.
    history: Vec<Vec<u8>>,
    pub moves: u32,
    /// Bonuses from completed rounds; survives regeneration.
    completion_bonus: u32,
    pub has_hint: bool,
    pub has_shuffle: bool,
    pub has_undo: bool,
    /// Countdown to the replacement board after completion. While set, all
    /// commands for this player are ignored.
    new_round_in: Option<u32>,
}

impl PlayerBoard {
    fn deal(dim: usize, rng: &mut impl Rng) -> Self {
        Self {
            board: Board::generate(dim, rng),
            history: Vec::new(),
            moves: 0,
            completion_bonus: 0,
            has_hint: true,
            has_shuffle: true,
            has_undo: true,
            new_round_in: None,
        }
    }

    /// Accumulated bonuses plus the live per-tile score.
    pub fn score(&self) -> u32 {
        self.completion_bonus + self.board.correct_tiles() as u32 * SCORE_PER_CORRECT_TILE
    }
}

/// Live puzzle state for both players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleState {
    pub config: PuzzleConfig,
    seed: u64,
    pub players: PerPlayer<PlayerBoard>,
    pub time_ticks: u64,
}

impl PuzzleState {
    pub fn new(config: PuzzleConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let dim = config.grid_dimension;
        let mut rng = Pcg32::seed_from_u64(seed);
        Ok(Self {
            config,
            seed,
            players: PerPlayer::new(
                PlayerBoard::deal(dim, &mut rng),
                PlayerBoard::deal(dim, &mut rng),
            ),
            time_ticks: 0,
        })
    }

    /// Per-player per-event RNG, derived from the session seed so replays
    /// reproduce hints, shuffles and regenerated boards exactly.
    fn event_rng(&self, id: PlayerId) -> Pcg32 {
        let salt = self
            .seed
            .wrapping_add(self.time_ticks)
            .wrapping_mul(31)
            .wrapping_add(id.index() as u64 + 1);
        Pcg32::seed_from_u64(salt)
    }

    pub fn tick(&mut self, input: &PerPlayer<PuzzleInput>) -> Vec<GameEvent> {
        self.time_ticks += 1;
        let mut events = Vec::new();
        for id in PlayerId::BOTH {
            self.tick_player(id, input.get(id), &mut events);
        }
        events
    }

    fn tick_player(&mut self, id: PlayerId, input: &PuzzleInput, events: &mut Vec<GameEvent>) {
        // Regeneration countdown runs first; commands are dead until it fires.
        if let Some(remaining) = self.players.get(id).new_round_in {
            if remaining <= 1 {
                let dim = self.config.grid_dimension;
                let mut rng = self.event_rng(id);
                let bonus = self.players.get(id).completion_bonus;
                let fresh = PlayerBoard {
                    completion_bonus: bonus,
                    ..PlayerBoard::deal(dim, &mut rng)
                };
                *self.players.get_mut(id) = fresh;
                events.push(GameEvent::PuzzleRegenerated { player: id });
                log::info!("{id} starts a fresh board at tick {}", self.time_ticks);
            } else {
                self.players.get_mut(id).new_round_in = Some(remaining - 1);
            }
            return;
        }

        let Some(command) = input.command else {
            return;
        };

        match command {
            PuzzleCommand::MoveTile(index) => self.handle_move(id, index, events),
            PuzzleCommand::Hint => {
                let mut rng = self.event_rng(id);
                let p = self.players.get_mut(id);
                if !p.has_hint {
                    return;
                }
                if let Some(tile_index) = p.board.misplaced_tile(&mut rng) {
                    p.has_hint = false;
                    events.push(GameEvent::HintHighlight {
                        player: id,
                        tile_index,
                    });
                }
            }
            PuzzleCommand::Shuffle => {
                let mut rng = self.event_rng(id);
                let dim = self.config.grid_dimension;
                let p = self.players.get_mut(id);
                if !p.has_shuffle {
                    return;
                }
                p.has_shuffle = false;
                p.board = Board::generate(dim, &mut rng);
                p.history.clear();
            }
            PuzzleCommand::Undo => {
                let p = self.players.get_mut(id);
                if !p.has_undo {
                    return;
                }
                if let Some(snapshot) = p.history.pop() {
                    p.has_undo = false;
                    p.board.tiles = snapshot;
                    p.moves = p.moves.saturating_sub(1);
                }
            }
        }
    }

    fn handle_move(&mut self, id: PlayerId, index: usize, events: &mut Vec<GameEvent>) {
        let p = self.players.get_mut(id);
        if !p.board.is_legal_move(index) {
            return;
        }
        p.history.push(p.board.tiles.clone());
        p.board.apply_move(index);
        p.moves += 1;

        if p.board.is_complete() {
            p.completion_bonus += COMPLETION_BONUS;
            p.new_round_in = Some(NEW_ROUND_DELAY_TICKS);
            events.push(GameEvent::PuzzleCompleted { player: id });
            log::info!(
                "{id} completed the board in {} moves at tick {}",
                p.moves,
                self.time_ticks
            );
        }
    }
}
