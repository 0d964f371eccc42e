//! Maze race
//!
//! Two players race through a perfect maze from the top-left corner to the
//! bottom-right. Generation is randomized depth-first carving with an
//! explicit stack, which guarantees exactly one simple path between any two
//! cells. Movement is a discrete grid transition, not continuous physics: a
//! step happens only when the shared wall is open.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Outcome;
use crate::config::MazeConfig;
use crate::error::SimError;
use crate::input::{Held, PerPlayer, PlayerId};

/// The four cardinal directions, in the order held intents are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Direction::North => 1 << 0,
            Direction::South => 1 << 1,
            Direction::West => 1 << 2,
            Direction::East => 1 << 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Grid offset; y grows southward.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

/// One grid cell: four independent wall flags, all present until carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    walls: u8,
}

impl Cell {
    fn sealed() -> Self {
        Self { walls: 0b1111 }
    }

    #[inline]
    pub fn has_wall(self, dir: Direction) -> bool {
        self.walls & dir.bit() != 0
    }

    fn clear_wall(&mut self, dir: Direction) {
        self.walls &= !dir.bit();
    }
}

/// Immutable per-session maze geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    size: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Carve a perfect maze over an NxN grid.
    ///
    /// Randomized depth-first with an explicit stack: start at (0,0), push;
    /// while the stack is nonempty, peek, pick an unvisited neighbor
    /// uniformly at random, clear the wall pair between them and push it, or
    /// pop to backtrack when none remain. Every cell is visited exactly
    /// once, so the carving forms a spanning tree of the grid.
    pub fn generate(size: usize, rng: &mut impl Rng) -> Maze {
        let mut maze = Maze {
            size,
            cells: vec![Cell::sealed(); size * size],
        };
        let mut visited = vec![false; size * size];
        let mut stack: Vec<(usize, usize)> = Vec::with_capacity(size * size);

        visited[0] = true;
        stack.push((0, 0));

        while let Some(&(x, y)) = stack.last() {
            let mut options = [(0usize, 0usize, Direction::North); 4];
            let mut count = 0;
            for dir in Direction::ALL {
                if let Some((nx, ny)) = maze.neighbor(x, y, dir) {
                    if !visited[maze.index(nx, ny)] {
                        options[count] = (nx, ny, dir);
                        count += 1;
                    }
                }
            }

            if count == 0 {
                stack.pop();
                continue;
            }

            let (nx, ny, dir) = options[rng.random_range(0..count)];
            maze.clear_wall_pair(x, y, dir);
            visited[maze.index(nx, ny)] = true;
            stack.push((nx, ny));
        }

        maze
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.size && ny < self.size).then_some((nx, ny))
    }

    /// Whether a step from (x, y) in `dir` is possible: destination in
    /// bounds and the shared wall open.
    pub fn is_open(&self, x: usize, y: usize, dir: Direction) -> bool {
        self.neighbor(x, y, dir).is_some() && !self.cell(x, y).has_wall(dir)
    }

    fn clear_wall_pair(&mut self, x: usize, y: usize, dir: Direction) {
        let (nx, ny) = self
            .neighbor(x, y, dir)
            .expect("wall pair cleared toward an in-bounds neighbor");
        let idx = self.index(x, y);
        let nidx = self.index(nx, ny);
        self.cells[idx].clear_wall(dir);
        self.cells[nidx].clear_wall(dir.opposite());
    }
}

/// Live maze race state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeState {
    pub config: MazeConfig,
    pub maze: Maze,
    /// Discrete grid positions, (x, y).
    pub positions: PerPlayer<(usize, usize)>,
    pub winner: Option<PlayerId>,
    pub time_ticks: u64,
}

impl MazeState {
    pub fn new(config: MazeConfig, rng: &mut impl Rng) -> Result<Self, SimError> {
        config.validate()?;
        let maze = Maze::generate(config.grid_size, rng);
        Ok(Self {
            config,
            maze,
            // Spawns: player one at the corner, player two one cell south.
            positions: PerPlayer::new((0, 0), (0, 1)),
            winner: None,
            time_ticks: 0,
        })
    }

    /// Bottom-right corner cell.
    pub fn goal(&self) -> (usize, usize) {
        let last = self.maze.size() - 1;
        (last, last)
    }

    /// Advance one tick.
    ///
    /// Player one's held intents are applied fully before player two's, and
    /// the win condition is checked after each applied step, so a
    /// simultaneous arrival is won by player one.
    pub fn tick(&mut self, input: &PerPlayer<Held>) -> Option<Outcome> {
        if let Some(winner) = self.winner {
            return Some(Outcome { winner });
        }
        self.time_ticks += 1;

        for id in PlayerId::BOTH {
            let held = input.get(id);
            for (active, dir) in [
                (held.up, Direction::North),
                (held.down, Direction::South),
                (held.left, Direction::West),
                (held.right, Direction::East),
            ] {
                if !active {
                    continue;
                }
                self.step(id, dir);
                if let Some(winner) = self.winner {
                    return Some(Outcome { winner });
                }
            }
        }
        None
    }

    fn step(&mut self, id: PlayerId, dir: Direction) {
        let (x, y) = *self.positions.get(id);
        if !self.maze.is_open(x, y, dir) {
            return;
        }
        let (dx, dy) = dir.offset();
        let next = (
            x.wrapping_add_signed(dx),
            y.wrapping_add_signed(dy),
        );
        *self.positions.get_mut(id) = next;

        if next == self.goal() {
            log::info!("{id} reached the maze exit at tick {}", self.time_ticks);
            self.winner = Some(id);
        }
    }
}
