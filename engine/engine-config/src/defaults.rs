//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so every component that embeds the search agrees on the same values.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    agent: AgentDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    exploration_epsilon: f64,
    decision_epsilon: f64,
    max_rollout_depth: Option<u32>,
    unbounded_rollouts: bool,
    rollout_policy: String,
    win_variants: String,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AgentDefaults {
    iterations: Option<u32>,
    time_budget_ms: Option<u64>,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn exploration_epsilon() -> f64 {
    DEFAULTS.mcts.exploration_epsilon
}
pub fn decision_epsilon() -> f64 {
    DEFAULTS.mcts.decision_epsilon
}
pub fn max_rollout_depth() -> Option<u32> {
    DEFAULTS.mcts.max_rollout_depth
}
pub fn unbounded_rollouts() -> bool {
    DEFAULTS.mcts.unbounded_rollouts
}
pub fn rollout_policy() -> &'static str {
    &DEFAULTS.mcts.rollout_policy
}
pub fn win_variants() -> &'static str {
    &DEFAULTS.mcts.win_variants
}
pub fn seed() -> Option<u64> {
    DEFAULTS.mcts.seed
}

// Agent
pub fn iterations() -> Option<u32> {
    DEFAULTS.agent.iterations
}
pub fn time_budget_ms() -> Option<u64> {
    DEFAULTS.agent.time_budget_ms
}
