//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! A child is always allocated after its parent and nodes are never removed,
//! so a NodeId stays valid for the lifetime of the tree.

use engine_core::{Player, Rules, Scores};

use crate::error::{MctsError, Result};
use crate::node::{MctsNode, NodeId, ParentEdge};
use crate::strategy::WinVariants;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<R: Rules> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<R>>,

    /// Root node index (always 0)
    root: NodeId,

    /// Double-capture policy applied to every node's candidates
    win_variants: WinVariants,
}

impl<R: Rules> MctsTree<R> {
    /// Create a tree whose root is a copy of `state`.
    pub fn new(rules: &R, agent: Player, state: R::State, win_variants: WinVariants) -> Result<Self> {
        let root = MctsNode::new(rules, agent, state, None, win_variants)?;
        Ok(Self {
            nodes: vec![root],
            root: NodeId(0),
            win_variants,
        })
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<R> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<R> {
        &mut self.nodes[id.index()]
    }

    fn allocate(&mut self, node: MctsNode<R>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn win_variants(&self) -> WinVariants {
        self.win_variants
    }

    /// Expand the most recently added untried action of `id` into a new child.
    ///
    /// The action is applied to a copy of the node's state for the player to
    /// move there. On error the node is left untouched.
    pub fn expand(&mut self, rules: &R, id: NodeId) -> Result<NodeId> {
        let child = self.build_child(rules, id)?;
        Ok(self.attach_child(id, child))
    }

    /// Build the child for the next untried action of `id` without adding it
    /// to the tree.
    pub(crate) fn build_child(&self, rules: &R, id: NodeId) -> Result<MctsNode<R>> {
        let node = self.get(id);
        let candidate = node.next_untried().ok_or_else(|| {
            MctsError::IllegalState(format!("expand on node {} with no untried actions", id.0))
        })?;

        let action = candidate.action.clone();
        let mut state = node.state().clone();
        let player = rules.next_player(&state);
        rules.apply(&mut state, &action, player)?;

        let edge = ParentEdge { action, node: id };
        MctsNode::new(rules, node.agent, state, Some(edge), self.win_variants)
    }

    /// Add a child made by [`build_child`](Self::build_child) below `id`,
    /// consuming the untried action it was built from.
    pub(crate) fn attach_child(&mut self, id: NodeId, child: MctsNode<R>) -> NodeId {
        debug_assert_eq!(child.parent.as_ref().map(|edge| edge.node), Some(id));
        let child_id = self.allocate(child);

        let parent = self.get_mut(id);
        parent.pop_untried();
        parent.children.push(child_id);

        child_id
    }

    /// Select the child of `id` with the highest UCB1 score.
    ///
    /// Ties go to the earliest child. Returns None if the node has no children.
    pub fn best_child(&self, id: NodeId, epsilon: f64) -> Option<NodeId> {
        let node = self.get(id);
        if node.children.is_empty() {
            return None;
        }
        debug_assert!(node.visit_count > 0, "UCB1 below an unvisited node");
        // Pre-compute ln once instead of per-child
        let parent_visits_ln = (node.visit_count as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).ucb_score(parent_visits_ln, epsilon);
            match best {
                Some((_, best_score)) if score > best_score => best = Some((child_id, score)),
                None => best = Some((child_id, score)),
                _ => {}
            }
        }
        best.map(|(id, _)| id)
    }

    /// Backpropagate rollout scores from a node to the root.
    ///
    /// Every node on the path gets one more visit and the same scores added
    /// for both players; nothing is negated or rescaled per level.
    pub fn backpropagate(&mut self, leaf_id: NodeId, scores: &Scores) {
        let mut current = Some(leaf_id);

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visit_count += 1;
            node.result_totals += scores;
            current = node.parent.as_ref().map(|edge| edge.node);
        }
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_q: root.q(),
            max_depth: self.max_depth(),
        }
    }

    /// Depth of the deepest node (root = 0).
    pub fn max_depth(&self) -> u32 {
        let mut depths = vec![0u32; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(edge) = &node.parent {
                depths[index] = depths[edge.node.index()] + 1;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    /// Accumulated net reward of the root for the search agent
    pub root_q: f64,
    pub max_depth: u32,
}
