//! Per-tick input sampling
//!
//! The engine consumes "is this control currently held" samples, never raw
//! key codes. Key bindings (say WASD+space for one player, arrows+enter for
//! the other) live entirely outside the core: the shell resolves its
//! bindings into one [`Held`] sample per player per tick and passes them in.

use serde::{Deserialize, Serialize};

/// Identity of one of the two local players.
///
/// Per-tick processing always iterates `One` before `Two`. This ordering is
/// an observable tie-break for simultaneous events (collisions, win
/// conditions) and must be preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Fixed processing order.
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::One => write!(f, "player 1"),
            PlayerId::Two => write!(f, "player 2"),
        }
    }
}

/// Held-control sample for one player for one tick.
///
/// `fire` doubles as the action control: shoot in the space duel, jump is
/// `up` in the platformer, unused in the maze.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Held {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// A pair of per-player values addressed by [`PlayerId`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub one: T,
    pub two: T,
}

impl<T> PerPlayer<T> {
    pub fn new(one: T, two: T) -> Self {
        Self { one, two }
    }

    #[inline]
    pub fn get(&self, id: PlayerId) -> &T {
        match id {
            PlayerId::One => &self.one,
            PlayerId::Two => &self.two,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, id: PlayerId) -> &mut T {
        match id {
            PlayerId::One => &mut self.one,
            PlayerId::Two => &mut self.two,
        }
    }

    /// Iterate in the fixed processing order (player one first).
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::BOTH.iter().map(move |&id| (id, self.get(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_order_is_one_then_two() {
        let pair = PerPlayer::new('a', 'b');
        let order: Vec<_> = pair.iter().collect();
        assert_eq!(order, vec![(PlayerId::One, &'a'), (PlayerId::Two, &'b')]);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
    }
}
