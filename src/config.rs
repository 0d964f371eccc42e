//! Session configuration
//!
//! One config struct per game variant, each with tuned defaults and a
//! `validate` that rejects degenerate values before any tick runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Maze race configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Grid is `grid_size` x `grid_size` cells.
    pub grid_size: usize,
    /// World-space size of one cell, passed through to the render snapshot.
    pub cell_size: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            cell_size: 2.0,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.grid_size < 2 {
            return Err(SimError::invalid_config(format!(
                "maze grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }
        if self.cell_size <= 0.0 {
            return Err(SimError::invalid_config("maze cell_size must be positive"));
        }
        Ok(())
    }
}

/// Platformer configuration.
///
/// Coordinates are screen-style: y grows downward, so gravity is positive
/// and the jump impulse is negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformerConfig {
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Horizontal speed per tick while a direction is held.
    pub move_speed: f32,
    /// Vertical velocity set on a jump (negative = upward).
    pub jump_force: f32,
    /// Arena extent; entities are clamped inside.
    pub bounds: Vec2,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            move_speed: 5.0,
            jump_force: -12.0,
            bounds: Vec2::new(800.0, 600.0),
        }
    }
}

impl PlatformerConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.gravity <= 0.0 {
            return Err(SimError::invalid_config("gravity must be positive"));
        }
        if self.move_speed <= 0.0 {
            return Err(SimError::invalid_config("move_speed must be positive"));
        }
        if self.jump_force >= 0.0 {
            return Err(SimError::invalid_config(
                "jump_force must be negative (upward in canvas coordinates)",
            ));
        }
        if self.bounds.x <= 0.0 || self.bounds.y <= 0.0 {
            return Err(SimError::invalid_config("bounds must be positive"));
        }
        Ok(())
    }
}

/// Space duel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Arena spans +-`arena_half_extent` on both axes; each ship is confined
    /// to its own half (player one below the midline, player two above).
    pub arena_half_extent: f32,
    /// Projectile speed per tick.
    pub bullet_speed: f32,
    /// Ticks between power-up spawn attempts.
    pub powerup_spawn_interval_ticks: u32,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            arena_half_extent: 8.0,
            bullet_speed: 0.2,
            powerup_spawn_interval_ticks: 5 * crate::consts::TICK_HZ,
        }
    }
}

impl SpaceConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.arena_half_extent <= 0.0 {
            return Err(SimError::invalid_config(
                "arena_half_extent must be positive",
            ));
        }
        if self.bullet_speed <= 0.0 {
            return Err(SimError::invalid_config("bullet_speed must be positive"));
        }
        if self.powerup_spawn_interval_ticks == 0 {
            return Err(SimError::invalid_config(
                "powerup_spawn_interval_ticks must be nonzero",
            ));
        }
        Ok(())
    }
}

/// Sliding puzzle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Board is `grid_dimension` x `grid_dimension` tiles (4 = 15-puzzle).
    pub grid_dimension: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self { grid_dimension: 4 }
    }
}

impl PuzzleConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.grid_dimension < 2 {
            return Err(SimError::invalid_config(format!(
                "puzzle grid_dimension must be at least 2, got {}",
                self.grid_dimension
            )));
        }
        // Tile values are u8; 15x15 is the largest board they can index.
        if self.grid_dimension > 15 {
            return Err(SimError::invalid_config(format!(
                "puzzle grid_dimension must be at most 15, got {}",
                self.grid_dimension
            )));
        }
        Ok(())
    }
}

/// Variant selector handed to [`crate::session::Session::start`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionConfig {
    Maze(MazeConfig),
    Platformer(PlatformerConfig),
    Space(SpaceConfig),
    Puzzle(PuzzleConfig),
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            SessionConfig::Maze(c) => c.validate(),
            SessionConfig::Platformer(c) => c.validate(),
            SessionConfig::Space(c) => c.validate(),
            SessionConfig::Puzzle(c) => c.validate(),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            SessionConfig::Maze(_) => "maze",
            SessionConfig::Platformer(_) => "platformer",
            SessionConfig::Space(_) => "space",
            SessionConfig::Puzzle(_) => "puzzle",
        }
    }
}
