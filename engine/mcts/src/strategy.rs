//! Win-strategy action scoring.
//!
//! Every raw legal action is asked once whether it wins by approach and/or
//! by remote capture. Each applicable capture becomes its own candidate,
//! re-tagged with the win kind and scored by the number of pieces it takes.
//! Moves that capture nothing stay untagged with score 0. As soon as one
//! candidate captures, the non-capturing ones are dropped, so both the tree
//! and the greedy rollout lean towards capture-seeking play.

use std::str::FromStr;

use engine_core::{Player, Rules, WinKind};

use crate::error::{MctsError, Result};

/// A candidate action with its capture-count heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAction<A> {
    pub action: A,
    /// Opponent pieces captured (0 for a quiet move)
    pub score: usize,
}

/// What to do with a move that wins both by approach and by remote capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WinVariants {
    /// Keep both variants as independent candidates.
    #[default]
    KeepBoth,
    /// Keep only the variant with the larger capture set; approach on a tie.
    PreferLarger,
}

impl FromStr for WinVariants {
    type Err = MctsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "both" => Ok(WinVariants::KeepBoth),
            "larger" => Ok(WinVariants::PreferLarger),
            other => Err(MctsError::InvalidConfiguration(format!(
                "unknown win_variants '{}', expected 'both' or 'larger'",
                other
            ))),
        }
    }
}

fn capture_count<S>(captures: Option<Vec<S>>) -> usize {
    captures.map_or(0, |squares| squares.len())
}

/// Scored candidate actions for `player` in `state`.
///
/// The returned set is already filtered with [`retain_capturing`]. Order
/// follows the rules engine, with the approach variant ahead of the remote
/// one for the same move.
pub fn candidate_actions<R: Rules>(
    rules: &R,
    state: &R::State,
    player: Player,
    variants: WinVariants,
) -> Result<Vec<ScoredAction<R::Action>>> {
    let legal = rules.legal_actions(state, player)?;
    let mut scored = Vec::with_capacity(legal.len());

    for action in legal {
        let approach = capture_count(rules.approach_captures(state, &action, player)?);
        let remote = capture_count(rules.remote_captures(state, &action, player)?);

        if approach == 0 && remote == 0 {
            scored.push(ScoredAction { action, score: 0 });
            continue;
        }

        let (keep_approach, keep_remote) = match variants {
            WinVariants::KeepBoth => (approach > 0, remote > 0),
            WinVariants::PreferLarger => (approach > 0 && approach >= remote, remote > approach),
        };
        if keep_approach {
            scored.push(ScoredAction {
                action: rules.with_win_kind(&action, WinKind::Approach),
                score: approach,
            });
        }
        if keep_remote {
            scored.push(ScoredAction {
                action: rules.with_win_kind(&action, WinKind::Remote),
                score: remote,
            });
        }
    }

    Ok(retain_capturing(scored))
}

/// Drop zero-score candidates if at least one candidate captures.
pub fn retain_capturing<A>(mut candidates: Vec<ScoredAction<A>>) -> Vec<ScoredAction<A>> {
    if candidates.iter().any(|c| c.score > 0) {
        candidates.retain(|c| c.score > 0);
    }
    candidates
}

/// Index of the highest-scoring candidate, first one on ties.
pub fn best_scored<A>(candidates: &[ScoredAction<A>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        match best {
            Some((_, score)) if candidate.score <= score => {}
            _ => best = Some((index, candidate.score)),
        }
    }
    best.map(|(index, _)| index)
}
