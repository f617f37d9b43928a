//! MCTS search implementation.
//!
//! Each iteration runs the four classic phases:
//! 1. Selection: descend from the root with UCB1 while nodes are fully expanded
//! 2. Expansion: turn one untried action of the reached node into a child
//! 3. Rollout: simulate from the new child with the rollout policy
//! 4. Backpropagation: add the rollout scores to every node up to the root

use std::time::{Duration, Instant};

use engine_core::{Player, Rules};
use tracing::{debug, trace};

use crate::config::{Budget, SearchConfig};
use crate::error::{MctsError, Result};
use crate::node::NodeId;
use crate::rollout::{GreedyCapture, RolloutPolicy};
use crate::tree::MctsTree;

/// Counters describing a finished (or ongoing) search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStats {
    /// Iterations completed so far
    pub iterations: u32,
    /// Nodes in the tree
    pub tree_size: usize,
    pub root_visits: u32,
    pub max_depth: u32,
    /// Wall-clock time spent in budgeted searches
    pub elapsed: Duration,
}

/// Where the tree policy stopped.
enum Selection {
    /// `node` still has untried actions; the next one becomes the rollout start
    Expand { node: NodeId, path_len: usize },
    /// Roll out from `node` itself
    Leaf { node: NodeId, path_len: usize },
}

/// MCTS search state for one decision.
///
/// The tree is built from scratch and discarded with the search; nothing is
/// reused across moves.
pub struct Search<'a, R: Rules, P: RolloutPolicy = GreedyCapture> {
    rules: &'a R,
    tree: MctsTree<R>,
    config: SearchConfig,
    policy: P,
    iterations: u32,
    elapsed: Duration,
}

impl<'a, R: Rules> Search<'a, R, GreedyCapture> {
    /// Search on behalf of `agent` from a copy of `state`, with greedy
    /// capture rollouts and default settings.
    pub fn new(
        rules: &'a R,
        agent: Player,
        state: &R::State,
        max_rollout_depth: Option<u32>,
    ) -> Result<Self> {
        let config = SearchConfig::default().with_max_rollout_depth(max_rollout_depth);
        Self::with_config(rules, agent, state, config, GreedyCapture)
    }
}

impl<'a, R: Rules, P: RolloutPolicy> Search<'a, R, P> {
    /// Search with explicit settings and rollout policy.
    pub fn with_config(
        rules: &'a R,
        agent: Player,
        state: &R::State,
        config: SearchConfig,
        policy: P,
    ) -> Result<Self> {
        config.validate()?;
        let tree = MctsTree::new(rules, agent, state.clone(), config.win_variants)?;

        Ok(Self {
            rules,
            tree,
            config,
            policy,
            iterations: 0,
            elapsed: Duration::ZERO,
        })
    }

    /// Run one select -> expand -> rollout -> backpropagate step.
    ///
    /// A new child joins the tree only once its rollout has succeeded, so a
    /// failed iteration leaves the tree as it was.
    pub fn run_iteration(&mut self) -> Result<()> {
        let (leaf, reward, path_len) = match self.tree_policy() {
            Selection::Expand { node, path_len } => {
                let child = self.tree.build_child(self.rules, node)?;
                let reward = child.rollout(
                    self.rules,
                    &mut self.policy,
                    self.config.max_rollout_depth,
                    self.config.win_variants,
                )?;
                (self.tree.attach_child(node, child), reward, path_len + 1)
            }
            Selection::Leaf { node, path_len } => {
                let reward = self.tree.get(node).rollout(
                    self.rules,
                    &mut self.policy,
                    self.config.max_rollout_depth,
                    self.config.win_variants,
                )?;
                (node, reward, path_len)
            }
        };

        self.tree.backpropagate(leaf, &reward);
        self.iterations += 1;

        trace!(
            leaf = leaf.0,
            path_len,
            margin = reward.margin(self.tree.get(leaf).agent),
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Walk from the root to the node the next rollout starts from.
    ///
    /// Stops at the first node on the way that still has untried actions.
    /// Otherwise descends by UCB1 until a terminal node (or a node without
    /// children) is reached.
    fn tree_policy(&self) -> Selection {
        let mut current = self.tree.root();
        let mut path_len = 1;

        while !self.tree.get(current).is_terminal_node(self.rules) {
            if !self.tree.get(current).is_fully_expanded() {
                return Selection::Expand {
                    node: current,
                    path_len,
                };
            }

            match self
                .tree
                .best_child(current, self.config.exploration_epsilon)
            {
                Some(child) => {
                    current = child;
                    path_len += 1;
                }
                None => break,
            }
        }

        Selection::Leaf {
            node: current,
            path_len,
        }
    }

    /// Run a budgeted search and return the chosen root action.
    ///
    /// Exactly one of `n_iterations` / `time_budget` must be given, otherwise
    /// this fails with [`MctsError::InvalidConfiguration`] before any
    /// iteration runs. `epsilon` is the exploration weight of the final
    /// choice, usually close to zero.
    pub fn best_action(
        &mut self,
        n_iterations: Option<u32>,
        time_budget: Option<Duration>,
        epsilon: f64,
    ) -> Result<R::Action> {
        let budget = Budget::from_limits(n_iterations, time_budget)?;
        self.search(budget, epsilon)
    }

    /// Run iterations until `budget` is spent, then choose a root action.
    pub fn search(&mut self, budget: Budget, epsilon: f64) -> Result<R::Action> {
        let start = Instant::now();

        match budget {
            Budget::Iterations(n) => {
                for _ in 0..n {
                    self.run_iteration()?;
                }
            }
            Budget::Time(limit) => {
                while start.elapsed() < limit {
                    self.run_iteration()?;
                }
            }
        }
        self.elapsed += start.elapsed();

        let action = self.choose_action(epsilon)?;
        let stats = self.stats();
        debug!(
            action = %action,
            iterations = stats.iterations,
            tree_size = stats.tree_size,
            max_depth = stats.max_depth,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "MCTS selected action"
        );

        Ok(action)
    }

    /// Action on the edge to the root child with the best UCB1 score.
    ///
    /// Fails with [`MctsError::TerminalPosition`] if the root has no children
    /// because the game is over there.
    pub fn choose_action(&self, epsilon: f64) -> Result<R::Action> {
        let root = self.tree.root();
        let Some(best) = self.tree.best_child(root, epsilon) else {
            if self.tree.get(root).is_fully_expanded() {
                return Err(MctsError::TerminalPosition);
            }
            return Err(MctsError::IllegalState(
                "root has not been expanded yet".into(),
            ));
        };

        self.tree
            .get(best)
            .action()
            .cloned()
            .ok_or_else(|| MctsError::IllegalState(format!("node {} has no parent edge", best.0)))
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<R> {
        &self.tree
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        let tree = self.tree.stats();
        SearchStats {
            iterations: self.iterations,
            tree_size: tree.total_nodes,
            root_visits: tree.root_visits,
            max_depth: tree.max_depth,
            elapsed: self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::UniformRandom;
    use crate::strategy::WinVariants;
    use crate::test_utils::{ScriptedAction, ScriptedRules};
    use engine_core::{Scores, WinKind};
    use games_strip::{Action, State, Strip};

    const F: Option<Player> = Some(Player::First);
    const S: Option<Player> = Some(Player::Second);

    /// Checks visit bookkeeping over the whole tree after `iterations` steps.
    fn assert_visit_counts<R: Rules>(search: &Search<'_, R, impl RolloutPolicy>, rules: &R, iterations: u32) {
        let tree = search.tree();
        assert_eq!(tree.get(tree.root()).visit_count, iterations);

        for index in 0..tree.len() {
            let id = NodeId(index as u32);
            let node = tree.get(id);
            assert!(node.visit_count >= 1, "node {} never visited", index);

            let below: u32 = node.children.iter().map(|c| tree.get(*c).visit_count).sum();
            if node.is_root() {
                // Root-level terminal rollouts aside, every visit goes to a child
                assert!(below <= node.visit_count);
            } else if !node.is_terminal_node(rules) {
                // One visit from the iteration that created the node
                assert_eq!(node.visit_count, below + 1, "node {}", index);
            }
        }
    }

    #[test]
    fn test_scenario_terminal_root() {
        let mut rules = ScriptedRules::new();
        let root = rules.position(Player::First, Some(Player::Second));
        rules.finish(root, Scores::new(2.0, 5.0));

        let mut search = Search::new(&rules, Player::First, &root, None).unwrap();
        let result = search.best_action(Some(5), None, 0.0);

        assert!(matches!(result, Err(MctsError::TerminalPosition)));
        let stats = search.stats();
        assert_eq!(stats.iterations, 5);
        assert_eq!(stats.tree_size, 1);
        assert_eq!(stats.root_visits, 5);
        let totals = search.tree().get(search.tree().root()).result_totals;
        assert_eq!(totals, Scores::new(10.0, 25.0));
    }

    #[test]
    fn test_terminal_root_without_history() {
        let mut rules = ScriptedRules::new();
        let root = rules.position(Player::First, None);
        rules.finish(root, Scores::zero());

        let mut search = Search::new(&rules, Player::First, &root, Some(3)).unwrap();
        let result = search.best_action(Some(5), None, 0.1);
        assert!(matches!(result, Err(MctsError::TerminalPosition)));
        assert_eq!(search.stats().root_visits, 5);
    }

    #[test]
    fn test_scenario_single_legal_action() {
        let mut rules = ScriptedRules::new();
        let root = rules.position(Player::First, None);
        let end = rules.position(Player::Second, Some(Player::First));
        rules.finish(end, Scores::new(0.0, 1.0));
        rules.step(root, 9, end);

        let mut search = Search::new(&rules, Player::First, &root, None).unwrap();
        search.run_iteration().unwrap();

        let tree = search.tree();
        let root_node = tree.get(tree.root());
        assert!(root_node.is_fully_expanded());
        assert_eq!(root_node.children.len(), 1);
        assert_eq!(tree.get(root_node.children[0]).visit_count, 1);

        for epsilon in [0.0, 0.1, 0.9, 100.0] {
            assert_eq!(
                search.choose_action(epsilon).unwrap(),
                ScriptedAction::plain(9)
            );
        }

        let mut fresh = Search::new(&rules, Player::First, &root, None).unwrap();
        assert_eq!(
            fresh.best_action(Some(1), None, 3.0).unwrap(),
            ScriptedAction::plain(9)
        );
    }

    #[test]
    fn test_scenario_capture_filters_quiet_action() {
        let mut rules = ScriptedRules::new();
        let root = rules.position(Player::First, None);
        let taken = rules.position(Player::Second, Some(Player::First));
        let quiet = rules.position(Player::Second, Some(Player::First));
        rules.finish(taken, Scores::new(3.0, 0.0));
        rules.finish(quiet, Scores::zero());
        rules.capture(root, 1, taken, 3, 0);
        rules.step(root, 2, quiet);

        let search = Search::new(&rules, Player::First, &root, None).unwrap();
        let untried = search.tree().get(search.tree().root()).untried_actions();
        assert_eq!(untried.len(), 1);
        assert!(untried.iter().all(|c| c.score != 0));
        assert_eq!(untried[0].action.id, 1);
    }

    #[test]
    fn test_search_prefers_better_margin() {
        // Three replies, only "2" leaves First ahead
        let mut rules = ScriptedRules::new();
        let root = rules.position(Player::First, None);
        for (id, scores) in [
            (1, Scores::new(0.0, 2.0)),
            (2, Scores::new(3.0, 1.0)),
            (3, Scores::new(1.0, 1.0)),
        ] {
            let end = rules.position(Player::Second, Some(Player::First));
            rules.finish(end, scores);
            rules.step(root, id, end);
        }

        let mut search = Search::new(&rules, Player::First, &root, None).unwrap();
        let action = search.best_action(Some(30), None, 0.0).unwrap();
        assert_eq!(action, ScriptedAction::plain(2));
        assert_visit_counts(&search, &rules, 30);
    }

    #[test]
    fn test_invalid_budget_runs_nothing() {
        let strip = Strip::new();
        let state = State::new();
        let mut search = Search::new(&strip, Player::First, &state, Some(5)).unwrap();

        let neither = search.best_action(None, None, 0.1);
        assert!(matches!(neither, Err(MctsError::InvalidConfiguration(_))));
        let both = search.best_action(Some(3), Some(Duration::from_millis(10)), 0.1);
        assert!(matches!(both, Err(MctsError::InvalidConfiguration(_))));

        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.stats().tree_size, 1);
    }

    #[test]
    fn test_choose_action_before_any_iteration() {
        let strip = Strip::new();
        let state = State::new();
        let search = Search::new(&strip, Player::First, &state, None).unwrap();
        assert!(matches!(
            search.choose_action(0.1),
            Err(MctsError::IllegalState(_))
        ));
    }

    #[test]
    fn test_failed_rollout_leaves_tree_unchanged() {
        // "1" leads into a position whose only reply gets stuck without the
        // game being over; "3" finishes normally. "3" is expanded first.
        let mut rules = ScriptedRules::new();
        let root = rules.position(Player::First, None);
        let trap = rules.position(Player::Second, Some(Player::First));
        let stuck = rules.position(Player::First, Some(Player::Second));
        let end = rules.position(Player::Second, Some(Player::First));
        rules.finish(end, Scores::new(2.0, 0.0));
        rules.step(root, 1, trap);
        rules.step(root, 3, end);
        rules.step(trap, 2, stuck);

        let mut search = Search::new(&rules, Player::First, &root, None).unwrap();
        search.run_iteration().unwrap();

        for _ in 0..2 {
            let result = search.run_iteration();
            assert!(matches!(
                result,
                Err(MctsError::EmptyActionSet {
                    player: Player::First
                })
            ));

            let tree = search.tree();
            let root_node = tree.get(tree.root());
            assert_eq!(tree.len(), 2);
            assert_eq!(root_node.visit_count, 1);
            assert_eq!(root_node.children.len(), 1);
            assert_eq!(root_node.untried_actions().len(), 1);
            assert_eq!(root_node.untried_actions()[0].action, ScriptedAction::plain(1));
            assert_eq!(tree.get(root_node.children[0]).visit_count, 1);
        }

        assert_eq!(search.stats().iterations, 1);
        assert_eq!(search.choose_action(0.0).unwrap(), ScriptedAction::plain(3));
    }

    #[test]
    fn test_invalid_epsilon_rejected() {
        let strip = Strip::new();
        let state = State::new();
        let config = SearchConfig::default().with_exploration_epsilon(-0.5);
        let result = Search::with_config(&strip, Player::First, &state, config, GreedyCapture);
        assert!(matches!(result, Err(MctsError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_strip_opening_both_variants() {
        let strip = Strip::new();
        let state = State::new();

        let mut search = Search::new(&strip, Player::First, &state, Some(5)).unwrap();
        let action = search.best_action(Some(20), None, 0.1).unwrap();
        assert_eq!((action.at, action.to), (5, 4));
        assert!(action.win_by.is_some());
        assert_eq!(search.tree().get(search.tree().root()).children.len(), 2);
        assert_visit_counts(&search, &strip, 20);

        // The caller's state is never touched
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_strip_opening_prefer_larger_keeps_approach() {
        let strip = Strip::new();
        let state = State::new();
        let config = SearchConfig::default()
            .with_max_rollout_depth(Some(5))
            .with_win_variants(WinVariants::PreferLarger);

        let mut search =
            Search::with_config(&strip, Player::First, &state, config, GreedyCapture).unwrap();
        let action = search.best_action(Some(10), None, 0.1).unwrap();
        assert_eq!(
            action,
            Action {
                at: 5,
                to: 4,
                win_by: Some(WinKind::Approach)
            }
        );
    }

    #[test]
    fn test_strip_quiet_moves_dropped_when_capture_exists() {
        // 6 -> 5 approaches both enemy pieces; 0 -> 1 and 6 -> 7 capture nothing
        let strip = Strip::new();
        //                             0  1     2     3  4  5     6  7     8
        let state = State::from_cells([F, None, None, S, S, None, F, None, None], Player::First);

        let mut search = Search::new(&strip, Player::First, &state, None).unwrap();
        assert_eq!(search.tree().get(search.tree().root()).untried_actions().len(), 1);

        let action = search.best_action(Some(50), None, 0.0).unwrap();
        assert_eq!(
            action,
            Action {
                at: 6,
                to: 5,
                win_by: Some(WinKind::Approach)
            }
        );

        let mut after = state;
        assert!(strip.apply(&mut after, &action, Player::First).unwrap());
        assert_eq!(strip.scores(&after), Scores::new(2.0, 0.0));
    }

    #[test]
    fn test_strip_visit_counts_with_random_rollouts() {
        let strip = Strip::new();
        let mut state = State::new();
        strip
            .apply(&mut state, &Action::new(5, 4), Player::First)
            .unwrap();

        let config = SearchConfig::default().with_max_rollout_depth(Some(10));
        let mut search = Search::with_config(
            &strip,
            Player::Second,
            &state,
            config,
            UniformRandom::with_seed(42),
        )
        .unwrap();

        for _ in 0..200 {
            search.run_iteration().unwrap();
        }
        assert_visit_counts(&search, &strip, 200);

        let stats = search.stats();
        assert_eq!(stats.iterations, 200);
        assert_eq!(stats.root_visits, 200);
        assert!(stats.tree_size >= 2 && stats.tree_size <= 201);
        assert!(stats.max_depth >= 1);
    }

    #[test]
    fn test_time_budget() {
        let strip = Strip::new();
        let state = State::new();
        let mut search = Search::new(&strip, Player::First, &state, Some(5)).unwrap();

        let action = search
            .best_action(None, Some(Duration::from_millis(20)), 0.1)
            .unwrap();
        assert_eq!((action.at, action.to), (5, 4));

        let stats = search.stats();
        assert!(stats.iterations >= 1);
        assert!(stats.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_seeded_searches_agree() {
        let strip = Strip::new();
        let mut state = State::new();
        strip
            .apply(&mut state, &Action::new(5, 4), Player::First)
            .unwrap();

        let run = |seed| {
            let mut search = Search::with_config(
                &strip,
                Player::Second,
                &state,
                SearchConfig::default(),
                UniformRandom::with_seed(seed),
            )
            .unwrap();
            let action = search.best_action(Some(64), None, 0.1).unwrap();
            (action, search.stats().tree_size)
        };

        assert_eq!(run(7), run(7));
    }
}
