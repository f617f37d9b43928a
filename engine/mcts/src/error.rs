//! Error types for the search.

use engine_core::{Player, RulesError};
use thiserror::Error;

/// Errors that can occur while building or searching a tree.
#[derive(Debug, Error)]
pub enum MctsError {
    /// An operation was invoked in a state that forbids it, e.g. expanding a
    /// node with no untried actions.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Unusable search settings: a budget with zero or both limits, an unknown
    /// policy name, a negative epsilon.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The rules engine reported no legal action in a non-terminal state.
    #[error("No legal actions for player {player} in a non-terminal state")]
    EmptyActionSet { player: Player },

    /// The root has no children to choose from because the game is over.
    #[error("Position is terminal, there is no action to choose")]
    TerminalPosition,

    #[error("Rules engine error: {0}")]
    Rules(#[from] RulesError),
}

pub type Result<T> = std::result::Result<T, MctsError>;
