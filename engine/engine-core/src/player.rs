//! Seat identifiers and per-player score maps.
//!
//! Two-player games identify seats as `+1` and `-1`. [`Player`] wraps that
//! convention in an enum, and [`Scores`] is the matching `Player -> f64` map used
//! for game scores, rollout rewards and accumulated search statistics.

use std::fmt;
use std::ops::{AddAssign, Index, IndexMut};

use crate::rules::RulesError;

/// One of the two seats in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Seat `+1`
    First,
    /// Seat `-1`
    Second,
}

impl Player {
    /// Both seats in id order (`+1` first).
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// Signed seat identifier (`+1` or `-1`).
    #[inline]
    pub fn id(self) -> i8 {
        match self {
            Player::First => 1,
            Player::Second => -1,
        }
    }

    /// The other seat.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl TryFrom<i8> for Player {
    type Error = RulesError;

    fn try_from(id: i8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Player::First),
            -1 => Ok(Player::Second),
            other => Err(RulesError::UnknownPlayer(other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.id())
    }
}

/// Numeric value per player.
///
/// Returned by the rules engine as the score of a state, threaded through
/// rollouts as the reward signal, and summed into node statistics during
/// backpropagation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scores {
    first: f64,
    second: f64,
}

impl Scores {
    /// Create a score map from the `+1` and `-1` values.
    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    /// Both entries zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// `self[player] - self[player.opponent()]`.
    #[inline]
    pub fn margin(&self, player: Player) -> f64 {
        self[player] - self[player.opponent()]
    }
}

impl Index<Player> for Scores {
    type Output = f64;

    fn index(&self, player: Player) -> &f64 {
        match player {
            Player::First => &self.first,
            Player::Second => &self.second,
        }
    }
}

impl IndexMut<Player> for Scores {
    fn index_mut(&mut self, player: Player) -> &mut f64 {
        match player {
            Player::First => &mut self.first,
            Player::Second => &mut self.second,
        }
    }
}

impl AddAssign<&Scores> for Scores {
    fn add_assign(&mut self, rhs: &Scores) {
        self.first += rhs.first;
        self.second += rhs.second;
    }
}
