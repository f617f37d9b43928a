//! Core traits and types for the Blinders game engine
//!
//! This crate provides the abstractions the search is written against:
//! - `Rules`: rules-engine interface (move generation, transitions, captures, scoring)
//! - `Player`: the two seats, `+1` and `-1`
//! - `Scores`: per-player numeric values
//! - `WinKind`: how a capturing move wins (approach or remote)

pub mod player;
pub mod rules;

// Re-export main types for convenience
pub use player::{Player, Scores};
pub use rules::{Rules, RulesError, WinKind};
