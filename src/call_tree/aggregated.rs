//! Aggregated (unordered) call tree.
//!
//! Each node accumulates the total time and number of calls of one action
//! at one position in the call hierarchy. Children are keyed by action
//! code, so a node has at most one child per code when built through
//! [`CallTree::add_new_link_if_missing`] or a merge.

use super::base::{CallTree, CallTreeBase, NodeHandle};
use crate::actions::{ActionCode, ActionsSet};
use std::collections::HashMap;
use std::sync::Arc;

/// Cumulative statistics of one action node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedNode {
    /// Total time consumed in this node
    pub time: i64,

    /// Number of calls accumulated in this node
    pub calls_number: i64,

    /// Child nodes by action code
    pub links: HashMap<ActionCode, NodeHandle>,
}

/// Call tree of cumulative per-action statistics
#[derive(Debug, Clone)]
pub struct AggregatedTree {
    base: CallTreeBase<AggregatedNode>,
}

impl AggregatedTree {
    /// Create a tree holding only the root node
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        Self {
            base: CallTreeBase::new(actions_set),
        }
    }

    /// Overwrite the total time of `node`
    pub fn set_node_time(&mut self, node: NodeHandle, time: i64) {
        self.data_mut(node).time = time;
    }

    /// Add `delta` to the total time of `node`
    pub fn inc_node_time(&mut self, node: NodeHandle, delta: i64) {
        self.data_mut(node).time += delta;
    }

    /// Total time accumulated in `node`
    pub fn get_node_time(&self, node: NodeHandle) -> i64 {
        self.data(node).time
    }

    /// Overwrite the calls number of `node`
    pub fn set_node_calls_number(&mut self, node: NodeHandle, calls_number: i64) {
        self.data_mut(node).calls_number = calls_number;
    }

    /// Increment the calls number of `node` by one
    pub fn inc_node_calls_number(&mut self, node: NodeHandle) {
        self.data_mut(node).calls_number += 1;
    }

    /// Number of calls accumulated in `node`
    pub fn get_node_calls_number(&self, node: NodeHandle) -> i64 {
        self.data(node).calls_number
    }

    /// Check whether `node` has a child with `action_code`
    pub fn node_has_link(&self, node: NodeHandle, action_code: ActionCode) -> bool {
        self.data(node).links.contains_key(&action_code)
    }

    /// Child of `node` with `action_code`, if there is one
    pub fn get_node_link(&self, node: NodeHandle, action_code: ActionCode) -> Option<NodeHandle> {
        self.data(node).links.get(&action_code).copied()
    }

    /// Children of `node` sorted by action code
    pub fn sorted_links(&self, node: NodeHandle) -> Vec<(ActionCode, NodeHandle)> {
        let mut links: Vec<_> = self
            .data(node)
            .links
            .iter()
            .map(|(&code, &child)| (code, child))
            .collect();
        links.sort_unstable_by_key(|&(code, _)| code);
        links
    }

    pub(crate) fn data(&self, node: NodeHandle) -> &AggregatedNode {
        &self.base.node(node).data
    }

    fn data_mut(&mut self, node: NodeHandle) -> &mut AggregatedNode {
        &mut self.base.node_mut(node).data
    }
}

impl CallTree for AggregatedTree {
    type Node = AggregatedNode;

    fn base(&self) -> &CallTreeBase<AggregatedNode> {
        &self.base
    }

    /// Always allocates a new node and returns it. An existing child with
    /// the same code keeps the link, so the new node is then unreachable.
    fn add_new_link(&mut self, node: NodeHandle, action_code: ActionCode) -> NodeHandle {
        let action_node = self.base.new_node(action_code);
        self.data_mut(node)
            .links
            .entry(action_code)
            .or_insert(action_node);
        action_node
    }

    fn add_new_link_if_missing(&mut self, node: NodeHandle, action_code: ActionCode) -> NodeHandle {
        match self.get_node_link(node, action_code) {
            Some(link) => link,
            None => self.add_new_link(node, action_code),
        }
    }
}
