//! Monte Carlo Tree Search (MCTS) for two-player capture games.
//!
//! This crate provides a game-agnostic UCB1 search that works with any game
//! implementing the `engine-core` [`Rules`](engine_core::Rules) trait.
//!
//! # Overview
//!
//! The search builds a tree one node per iteration. Each iteration consists of
//! four phases:
//!
//! 1. **Selection**: descend from the root with UCB1 while nodes are fully
//!    expanded, balancing mean reward against an exploration bonus
//! 2. **Expansion**: turn one untried action of the reached node into a child
//! 3. **Rollout**: play a private copy of the child's state forward with a
//!    rollout policy, up to a ply limit or the end of the game
//! 4. **Backpropagation**: add the final per-player scores and one visit to
//!    every node on the path back to the root
//!
//! Rewards are score margins, not win/loss values: a node's value for the
//! search agent is its accumulated own score minus the opponent's.
//!
//! # Win-strategy scoring
//!
//! Candidate actions are re-tagged with how they capture (approach or remote)
//! and scored by the number of pieces taken. Once any capture is available the
//! quiet moves are dropped, both from the tree and from greedy rollouts. See
//! [`strategy`].
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Player;
//! use games_strip::{State, Strip};
//! use mcts::Search;
//!
//! let strip = Strip::new();
//! let state = State::new();
//!
//! let mut search = Search::new(&strip, Player::First, &state, Some(5)).unwrap();
//! let action = search.best_action(Some(50), None, 0.1).unwrap();
//! println!("Best action: {}", action);
//! println!("Stats: {:?}", search.stats());
//! ```
//!
//! # Configuration
//!
//! [`SearchConfig`] controls a single search:
//!
//! - `exploration_epsilon`: UCB1 exploration weight in the tree policy (default: 0.9)
//! - `decision_epsilon`: exploration weight of the final root choice (default: 0.1)
//! - `max_rollout_depth`: rollout ply limit (default: unbounded)
//! - `win_variants`: keep both capture variants of a move, or only the larger
//!
//! [`MctsAgent`] wraps a search per move and can be built from the central
//! `engine-config` file.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Search                           │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────┐  │
//! │  │  MctsTree   │  │    Rules    │  │  RolloutPolicy   │  │
//! │  │  (arena)    │  │ (game sim)  │  │ (greedy/random)  │  │
//! │  └──────┬──────┘  └──────┬──────┘  └────────┬─────────┘  │
//! │         │                │                  │            │
//! │         ▼                ▼                  ▼            │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │        select → expand → rollout → backpropagate   │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod node;
pub mod rollout;
pub mod search;
pub mod strategy;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main types
pub use agent::MctsAgent;
pub use config::{Budget, SearchConfig};
pub use error::{MctsError, Result};
pub use node::{MctsNode, NodeId, ParentEdge};
pub use rollout::{simulate, ConfiguredRollout, GreedyCapture, RolloutPolicy, UniformRandom};
pub use search::{Search, SearchStats};
pub use strategy::{candidate_actions, ScoredAction, WinVariants};
pub use tree::{MctsTree, TreeStats};
