//! MCTS-based player.
//!
//! Wraps [`Search`] into an agent that picks one move per call, building a
//! fresh tree every time.

use engine_config::CentralConfig;
use engine_core::{Player, Rules};
use tracing::debug;

use crate::config::{Budget, SearchConfig};
use crate::error::{MctsError, Result};
use crate::rollout::{ConfiguredRollout, UniformRandom};
use crate::search::Search;

/// Iterations per move when nothing else is configured
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Rollout ply limit when nothing else is configured
pub const DEFAULT_ROLLOUT_DEPTH: u32 = 5;

/// Player that chooses its moves with Monte Carlo Tree Search
#[derive(Debug, Clone)]
pub struct MctsAgent {
    player: Player,
    config: SearchConfig,
    budget: Budget,
    /// Kept across moves so seeded random rollouts continue one stream
    rollout: ConfiguredRollout,
}

impl MctsAgent {
    /// Agent with greedy rollouts, 10 iterations per move and rollouts cut
    /// off after 5 plies.
    pub fn new(player: Player) -> Self {
        Self {
            player,
            config: SearchConfig::default()
                .with_max_rollout_depth(Some(DEFAULT_ROLLOUT_DEPTH)),
            budget: Budget::Iterations(DEFAULT_ITERATIONS),
            rollout: ConfiguredRollout::default(),
        }
    }

    /// Agent set up from the `[mcts]` and `[agent]` sections.
    pub fn from_config(player: Player, config: &CentralConfig) -> Result<Self> {
        let agent = Self {
            player,
            config: SearchConfig::from_central(config)?,
            budget: Budget::from_agent_config(&config.agent)?,
            rollout: ConfiguredRollout::from_config(&config.mcts)?,
        };
        debug!(
            player = %player,
            budget = ?agent.budget,
            rollout = %config.mcts.rollout_policy,
            "MCTS agent configured"
        );
        Ok(agent)
    }

    /// Switch to uniformly random rollouts with a fixed seed (for determinism)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rollout = ConfiguredRollout::Random(UniformRandom::with_seed(seed));
        self
    }

    /// Set the search configuration
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-move budget
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Choose a move for `state`.
    ///
    /// Returns `Ok(None)` when the game is already over there.
    pub fn play<R: Rules>(&mut self, rules: &R, state: &R::State) -> Result<Option<R::Action>> {
        let mut search = Search::with_config(
            rules,
            self.player,
            state,
            self.config.clone(),
            &mut self.rollout,
        )?;

        match search.search(self.budget, self.config.decision_epsilon) {
            Ok(action) => {
                let stats = search.stats();
                debug!(
                    player = %self.player,
                    action = %action,
                    iterations = stats.iterations,
                    root_visits = stats.root_visits,
                    "MCTS agent move"
                );
                Ok(Some(action))
            }
            Err(MctsError::TerminalPosition) => {
                debug!(player = %self.player, "Terminal position, no move to play");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
