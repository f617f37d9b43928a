//! Rules-engine trait consumed by the search.
//!
//! The search never inspects a board directly. Everything it needs from a game
//! (move generation, transitions, terminal detection, capture queries and
//! scoring) goes through [`Rules`], so any deterministic, perfect-information,
//! two-player game with a per-player score can be searched.

use std::fmt::{Debug, Display};

use crate::player::{Player, Scores};

/// How a capturing move wins material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinKind {
    /// Captures the line of opponent pieces the moving piece runs into.
    Approach,
    /// Captures the line of opponent pieces the moving piece moves away from.
    Remote,
}

impl Display for WinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinKind::Approach => f.write_str("APPROACH"),
            WinKind::Remote => f.write_str("REMOTE"),
        }
    }
}

/// Errors reported by a rules engine.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),
    #[error("Unknown player id: {0}")]
    UnknownPlayer(i8),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Main trait for rules engines.
///
/// # Type Parameters
///
/// * `State` - Board snapshot. The search clones it freely and only ever mutates
///   its own private copies.
/// * `Action` - Opaque move identifier, comparable and printable.
/// * `Square` - Element of a capture set (usually a board coordinate).
pub trait Rules: Debug {
    /// Game state type
    type State: Clone + Debug;

    /// Move type
    type Action: Clone + PartialEq + Debug + Display;

    /// Board coordinate reported in capture sets
    type Square: Copy + Debug;

    /// All legal moves for `player` in `state`.
    fn legal_actions(
        &self,
        state: &Self::State,
        player: Player,
    ) -> Result<Vec<Self::Action>, RulesError>;

    /// Play `action` for `player` in place.
    ///
    /// Implementations must also advance the player to move, so that
    /// `next_player` reflects the successor state.
    ///
    /// # Returns
    ///
    /// Whether the resulting state is terminal.
    fn apply(
        &self,
        state: &mut Self::State,
        action: &Self::Action,
        player: Player,
    ) -> Result<bool, RulesError>;

    /// Whether the game is over in `state`.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Opponent squares captured if `action` is played as an approach capture.
    ///
    /// `None` (or an empty set) means the move does not win by approach.
    fn approach_captures(
        &self,
        state: &Self::State,
        action: &Self::Action,
        player: Player,
    ) -> Result<Option<Vec<Self::Square>>, RulesError>;

    /// Opponent squares captured if `action` is played as a remote capture.
    ///
    /// `None` (or an empty set) means the move does not win remotely.
    fn remote_captures(
        &self,
        state: &Self::State,
        action: &Self::Action,
        player: Player,
    ) -> Result<Option<Vec<Self::Square>>, RulesError>;

    /// Copy of `action` tagged with the way it wins.
    fn with_win_kind(&self, action: &Self::Action, kind: WinKind) -> Self::Action;

    /// Per-player score of `state`.
    fn scores(&self, state: &Self::State) -> Scores;

    /// Player to move in `state`.
    fn next_player(&self, state: &Self::State) -> Player;

    /// Player who made the last move, `None` before the first move.
    fn latest_mover(&self, state: &Self::State) -> Option<Player>;
}
