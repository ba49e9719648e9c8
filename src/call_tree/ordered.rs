//! Ordered call tree: the literal trace of a single invocation.
//!
//! Children keep their call order, and the same action may appear several
//! times among siblings when it was invoked repeatedly at that level.

use super::base::{CallTree, CallTreeBase, NodeHandle};
use crate::actions::{ActionCode, ActionsSet};
use std::sync::Arc;

/// Timestamps of one action invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedNode {
    /// Time when the action was started
    pub start_time: i64,

    /// Time when the action was stopped
    pub stop_time: i64,

    /// Child nodes in call order
    pub links: Vec<(ActionCode, NodeHandle)>,
}

/// Call tree preserving the exact sequence of calls
#[derive(Debug, Clone)]
pub struct OrderedTree {
    base: CallTreeBase<OrderedNode>,
}

impl OrderedTree {
    /// Create a tree holding only the root node
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        Self {
            base: CallTreeBase::new(actions_set),
        }
    }

    /// Record when the action of `node` was started
    pub fn set_node_start_time(&mut self, node: NodeHandle, time: i64) {
        self.data_mut(node).start_time = time;
    }

    /// Record when the action of `node` was stopped
    pub fn set_node_stop_time(&mut self, node: NodeHandle, time: i64) {
        self.data_mut(node).stop_time = time;
    }

    /// Start timestamp of `node`, 0 until set
    pub fn get_node_start_time(&self, node: NodeHandle) -> i64 {
        self.data(node).start_time
    }

    /// Stop timestamp of `node`, 0 until set
    pub fn get_node_stop_time(&self, node: NodeHandle) -> i64 {
        self.data(node).stop_time
    }

    /// Children of `node` in call order
    pub fn links(&self, node: NodeHandle) -> &[(ActionCode, NodeHandle)] {
        &self.data(node).links
    }

    pub(crate) fn data(&self, node: NodeHandle) -> &OrderedNode {
        &self.base.node(node).data
    }

    fn data_mut(&mut self, node: NodeHandle) -> &mut OrderedNode {
        &mut self.base.node_mut(node).data
    }
}

impl CallTree for OrderedTree {
    type Node = OrderedNode;

    fn base(&self) -> &CallTreeBase<OrderedNode> {
        &self.base
    }

    fn add_new_link(&mut self, node: NodeHandle, action_code: ActionCode) -> NodeHandle {
        let action_node = self.base.new_node(action_code);
        self.data_mut(node).links.push((action_code, action_node));
        action_node
    }

    /// Same as [`CallTree::add_new_link`]: ordered trees never coalesce
    /// siblings, every call gets its own node.
    fn add_new_link_if_missing(&mut self, node: NodeHandle, action_code: ActionCode) -> NodeHandle {
        self.add_new_link(node, action_code)
    }
}
