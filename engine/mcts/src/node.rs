//! MCTS tree node representation.
//!
//! Each node owns a private copy of the game state it represents, the visit
//! statistics gathered through it, and the candidate actions that have not
//! been expanded into children yet.

use engine_core::{Player, Rules, Scores};

use crate::error::{MctsError, Result};
use crate::rollout::{simulate, RolloutPolicy};
use crate::strategy::{candidate_actions, ScoredAction, WinVariants};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge from a parent to one of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentEdge<A> {
    /// Action that leads from the parent to the child
    pub action: A,
    /// Parent node index
    pub node: NodeId,
}

/// A node in the MCTS tree.
#[derive(Debug)]
pub struct MctsNode<R: Rules> {
    /// Player the whole search is run for
    pub agent: Player,

    /// Incoming edge (None for root)
    pub parent: Option<ParentEdge<R::Action>>,

    /// Children in expansion order
    pub children: Vec<NodeId>,

    /// Number of backpropagation passes through this node
    pub visit_count: u32,

    /// Sum of rollout scores backpropagated through this node
    pub result_totals: Scores,

    state: R::State,
    untried_actions: Vec<ScoredAction<R::Action>>,
}

impl<R: Rules> MctsNode<R> {
    /// Create a node for `state` and score its candidate actions.
    ///
    /// Terminal states get no candidates. A non-terminal state without any
    /// legal action is a rules-engine contract violation and fails with
    /// [`MctsError::EmptyActionSet`].
    pub fn new(
        rules: &R,
        agent: Player,
        state: R::State,
        parent: Option<ParentEdge<R::Action>>,
        variants: WinVariants,
    ) -> Result<Self> {
        let untried_actions = if rules.is_terminal(&state) {
            Vec::new()
        } else {
            let player = rules.next_player(&state);
            let candidates = candidate_actions(rules, &state, player, variants)?;
            if candidates.is_empty() {
                return Err(MctsError::EmptyActionSet { player });
            }
            candidates
        };

        Ok(Self {
            agent,
            parent,
            children: Vec::new(),
            visit_count: 0,
            result_totals: Scores::zero(),
            state,
            untried_actions,
        })
    }

    #[inline]
    pub fn state(&self) -> &R::State {
        &self.state
    }

    /// Candidates not expanded yet; the last one is expanded next.
    #[inline]
    pub fn untried_actions(&self) -> &[ScoredAction<R::Action>] {
        &self.untried_actions
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Action on the incoming edge (None for root).
    pub fn action(&self) -> Option<&R::Action> {
        self.parent.as_ref().map(|edge| &edge.action)
    }

    /// Whether the game is over at this node.
    ///
    /// A state nobody has moved in yet never counts as terminal here.
    pub fn is_terminal_node(&self, rules: &R) -> bool {
        rules.latest_mover(&self.state).is_some() && rules.is_terminal(&self.state)
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// Net accumulated reward for the search agent.
    #[inline]
    pub fn q(&self) -> f64 {
        self.result_totals.margin(self.agent)
    }

    #[inline]
    pub fn n(&self) -> u32 {
        self.visit_count
    }

    /// UCB1 score as seen from the parent.
    ///
    /// UCB(c) = q(c) / n(c) + epsilon * sqrt(2 * ln(N) / n(c))
    ///
    /// Takes pre-computed ln(N) of the parent visits so siblings share it.
    #[inline]
    pub fn ucb_score(&self, parent_visits_ln: f64, epsilon: f64) -> f64 {
        debug_assert!(self.visit_count > 0, "UCB1 on an unvisited node");
        let n = self.visit_count as f64;
        self.q() / n + epsilon * (2.0 * parent_visits_ln / n).sqrt()
    }

    /// Simulate from a copy of this node's state (see [`simulate`]).
    pub fn rollout<P: RolloutPolicy>(
        &self,
        rules: &R,
        policy: &mut P,
        max_depth: Option<u32>,
        variants: WinVariants,
    ) -> Result<Scores> {
        simulate(rules, &self.state, policy, max_depth, variants)
    }

    pub(crate) fn next_untried(&self) -> Option<&ScoredAction<R::Action>> {
        self.untried_actions.last()
    }

    pub(crate) fn pop_untried(&mut self) -> Option<ScoredAction<R::Action>> {
        self.untried_actions.pop()
    }
}
