//! Rollout (simulation) policies.
//!
//! A rollout plays a private copy of a state forward until the game ends or a
//! ply limit is hit, choosing each move with a [`RolloutPolicy`] among the
//! scored candidates of the player to move.

use engine_config::MctsConfig;
use engine_core::{Rules, Scores};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{MctsError, Result};
use crate::strategy::{best_scored, candidate_actions, ScoredAction, WinVariants};

/// Picks one candidate per simulated ply.
pub trait RolloutPolicy {
    /// Index into `candidates`, or None if there is nothing to choose from.
    fn choose<A>(&mut self, candidates: &[ScoredAction<A>]) -> Option<usize>;
}

impl<P: RolloutPolicy> RolloutPolicy for &mut P {
    fn choose<A>(&mut self, candidates: &[ScoredAction<A>]) -> Option<usize> {
        (**self).choose(candidates)
    }
}

/// Always plays the largest capture, first candidate on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyCapture;

impl RolloutPolicy for GreedyCapture {
    fn choose<A>(&mut self, candidates: &[ScoredAction<A>]) -> Option<usize> {
        best_scored(candidates)
    }
}

/// Plays a uniformly random candidate.
#[derive(Debug, Clone)]
pub struct UniformRandom {
    rng: ChaCha20Rng,
}

impl UniformRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Deterministic variant (used in tests and benchmarks)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl RolloutPolicy for UniformRandom {
    fn choose<A>(&mut self, candidates: &[ScoredAction<A>]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        Some(self.rng.gen_range(0..candidates.len()))
    }
}

/// Rollout policy picked by name from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredRollout {
    Greedy(GreedyCapture),
    Random(UniformRandom),
}

impl ConfiguredRollout {
    /// Build from `[mcts] rollout_policy` and `seed`.
    pub fn from_config(config: &MctsConfig) -> Result<Self> {
        match config.rollout_policy.as_str() {
            "greedy" => Ok(ConfiguredRollout::Greedy(GreedyCapture)),
            "random" => Ok(ConfiguredRollout::Random(match config.seed {
                Some(seed) => UniformRandom::with_seed(seed),
                None => UniformRandom::from_entropy(),
            })),
            other => Err(MctsError::InvalidConfiguration(format!(
                "unknown rollout_policy '{}', expected 'greedy' or 'random'",
                other
            ))),
        }
    }
}

impl Default for ConfiguredRollout {
    fn default() -> Self {
        ConfiguredRollout::Greedy(GreedyCapture)
    }
}

impl RolloutPolicy for ConfiguredRollout {
    fn choose<A>(&mut self, candidates: &[ScoredAction<A>]) -> Option<usize> {
        match self {
            ConfiguredRollout::Greedy(policy) => policy.choose(candidates),
            ConfiguredRollout::Random(policy) => policy.choose(candidates),
        }
    }
}

/// Play `start` forward and return the scores of the last simulated state.
///
/// Stops when the state is terminal or after `max_depth` plies (None plays
/// to the end). `start` itself is never modified.
pub fn simulate<R: Rules, P: RolloutPolicy>(
    rules: &R,
    start: &R::State,
    policy: &mut P,
    max_depth: Option<u32>,
    variants: WinVariants,
) -> Result<Scores> {
    let mut state = start.clone();
    let mut depth = 0u32;

    while !rules.is_terminal(&state) {
        if max_depth.is_some_and(|max| depth >= max) {
            break;
        }

        let player = rules.next_player(&state);
        let candidates = candidate_actions(rules, &state, player, variants)?;
        let index = policy
            .choose(&candidates)
            .ok_or(MctsError::EmptyActionSet { player })?;
        let chosen = candidates.get(index).ok_or_else(|| {
            MctsError::IllegalState(format!(
                "rollout policy chose index {} of {} candidates",
                index,
                candidates.len()
            ))
        })?;

        rules.apply(&mut state, &chosen.action, player)?;
        depth += 1;
    }

    Ok(rules.scores(&state))
}
