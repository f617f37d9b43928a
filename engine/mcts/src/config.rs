//! Search configuration parameters.

use std::time::Duration;

use engine_config::{AgentConfig, CentralConfig};

use crate::error::{MctsError, Result};
use crate::strategy::WinVariants;

/// Configuration for one Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// UCB1 exploration weight used while descending the tree.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_epsilon: f64,

    /// UCB1 exploration weight for the final root decision.
    /// Near zero means picking the child with the best mean reward.
    pub decision_epsilon: f64,

    /// Plies simulated per rollout before scoring (None = play to the end).
    pub max_rollout_depth: Option<u32>,

    /// What to do with moves that win both by approach and by remote capture.
    pub win_variants: WinVariants,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_epsilon: 0.9,
            decision_epsilon: 0.1,
            max_rollout_depth: None,
            win_variants: WinVariants::KeepBoth,
        }
    }
}

impl SearchConfig {
    /// Build from the `[mcts]` section of the central config.
    pub fn from_central(config: &CentralConfig) -> Result<Self> {
        let mcts = &config.mcts;
        let search = Self {
            exploration_epsilon: mcts.exploration_epsilon,
            decision_epsilon: mcts.decision_epsilon,
            max_rollout_depth: mcts.rollout_depth(),
            win_variants: mcts.win_variants.parse()?,
        };
        search.validate()?;
        Ok(search)
    }

    /// Reject negative or non-finite exploration weights.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("exploration_epsilon", self.exploration_epsilon),
            ("decision_epsilon", self.decision_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MctsError::InvalidConfiguration(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Builder pattern: set the tree-policy exploration weight.
    pub fn with_exploration_epsilon(mut self, epsilon: f64) -> Self {
        self.exploration_epsilon = epsilon;
        self
    }

    /// Builder pattern: set the final-decision exploration weight.
    pub fn with_decision_epsilon(mut self, epsilon: f64) -> Self {
        self.decision_epsilon = epsilon;
        self
    }

    /// Builder pattern: set the rollout ply limit.
    pub fn with_max_rollout_depth(mut self, depth: Option<u32>) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Builder pattern: set the double-capture policy.
    pub fn with_win_variants(mut self, variants: WinVariants) -> Self {
        self.win_variants = variants;
        self
    }
}

/// When a search stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Run exactly this many iterations.
    Iterations(u32),
    /// Start new iterations until this much wall-clock time has passed.
    /// The clock is only checked between iterations.
    Time(Duration),
}

impl Budget {
    /// Budget from two optional limits, exactly one of which must be set.
    pub fn from_limits(iterations: Option<u32>, time: Option<Duration>) -> Result<Self> {
        match (iterations, time) {
            (Some(0), None) => Err(MctsError::InvalidConfiguration(
                "iteration budget must be positive".into(),
            )),
            (None, Some(time)) if time.is_zero() => Err(MctsError::InvalidConfiguration(
                "time budget must be positive".into(),
            )),
            (Some(n), None) => Ok(Budget::Iterations(n)),
            (None, Some(time)) => Ok(Budget::Time(time)),
            (None, None) => Err(MctsError::InvalidConfiguration(
                "either an iteration count or a time budget is required".into(),
            )),
            (Some(_), Some(_)) => Err(MctsError::InvalidConfiguration(
                "iteration count and time budget are mutually exclusive".into(),
            )),
        }
    }

    /// Budget from the `[agent]` section.
    pub fn from_agent_config(config: &AgentConfig) -> Result<Self> {
        Self::from_limits(
            config.iterations,
            config.time_budget_ms.map(Duration::from_millis),
        )
    }
}
