//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_exploration_epsilon() -> f64 {
    defaults::exploration_epsilon()
}
fn d_decision_epsilon() -> f64 {
    defaults::decision_epsilon()
}
fn d_max_rollout_depth() -> Option<u32> {
    defaults::max_rollout_depth()
}
fn d_unbounded_rollouts() -> bool {
    defaults::unbounded_rollouts()
}
fn d_rollout_policy() -> String {
    defaults::rollout_policy().into()
}
fn d_win_variants() -> String {
    defaults::win_variants().into()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Verbosity for the binary embedding the engine. The libraries never
    /// install a subscriber themselves.
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl CommonConfig {
    /// `log_level` as a tracing level, for the embedding binary's subscriber.
    ///
    /// Returns None for a name tracing does not know.
    pub fn tracing_level(&self) -> Option<tracing::Level> {
        self.log_level.trim().parse().ok()
    }
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_exploration_epsilon")]
    pub exploration_epsilon: f64,
    #[serde(default = "d_decision_epsilon")]
    pub decision_epsilon: f64,
    /// Rollout ply limit, ignored when `unbounded_rollouts` is set
    #[serde(default = "d_max_rollout_depth")]
    pub max_rollout_depth: Option<u32>,
    /// Play every rollout to the end of the game
    #[serde(default = "d_unbounded_rollouts")]
    pub unbounded_rollouts: bool,
    /// "greedy" or "random"
    #[serde(default = "d_rollout_policy")]
    pub rollout_policy: String,
    /// "both" or "larger"
    #[serde(default = "d_win_variants")]
    pub win_variants: String,
    /// Seed for the random rollout policy (None = seeded from entropy)
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_epsilon: defaults::exploration_epsilon(),
            decision_epsilon: defaults::decision_epsilon(),
            max_rollout_depth: defaults::max_rollout_depth(),
            unbounded_rollouts: defaults::unbounded_rollouts(),
            rollout_policy: defaults::rollout_policy().into(),
            win_variants: defaults::win_variants().into(),
            seed: defaults::seed(),
        }
    }
}

impl MctsConfig {
    /// Effective rollout ply limit (None = play out to the end of the game).
    pub fn rollout_depth(&self) -> Option<u32> {
        if self.unbounded_rollouts {
            None
        } else {
            self.max_rollout_depth
        }
    }
}

/// Per-move search budget of the MCTS agent.
///
/// Exactly one of `iterations` / `time_budget_ms` is expected to be set. The
/// built-in default applies only when the `[agent]` section is missing
/// entirely; inside a present section an omitted key stays unset, so writing
/// just `time_budget_ms` switches the agent to a wall-clock budget.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            time_budget_ms: defaults::time_budget_ms(),
        }
    }
}
