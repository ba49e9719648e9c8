//! Node arena shared by both call tree variants.
//!
//! Nodes live in a single append-only `Vec` and are addressed by their
//! index. Handles are never reused or invalidated: the arena only grows,
//! and the root is always the first node.

use crate::actions::{ActionCode, ActionsSet};
use crate::utils::config::ROOT_ACTION_CODE;
use std::sync::Arc;

/// Stable reference to a node inside one tree's arena
pub type NodeHandle = usize;

/// Handle value meaning "no node"
pub const NO_NODE: NodeHandle = usize::MAX;

/// A single arena slot: the action code plus variant-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct Node<N> {
    pub action_code: ActionCode,
    pub data: N,
}

/// Arena storage and root bookkeeping common to every call tree
#[derive(Debug, Clone)]
pub struct CallTreeBase<N> {
    nodes: Vec<Node<N>>,
    root: NodeHandle,
    actions_set: Arc<ActionsSet>,
}

impl<N: Default> CallTreeBase<N> {
    /// Create an arena holding only the root node
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        let mut base = Self {
            nodes: Vec::new(),
            root: NO_NODE,
            actions_set,
        };
        base.root = base.new_node(ROOT_ACTION_CODE);
        base
    }

    /// Append a fresh node and return its handle
    pub fn new_node(&mut self, action_code: ActionCode) -> NodeHandle {
        self.nodes.push(Node {
            action_code,
            data: N::default(),
        });
        self.nodes.len() - 1
    }
}

impl<N> CallTreeBase<N> {
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn actions_set(&self) -> &Arc<ActionsSet> {
        &self.actions_set
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is allocated on construction
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    /// If `node` was not issued by this arena.
    pub fn node(&self, node: NodeHandle) -> &Node<N> {
        &self.nodes[node]
    }

    /// # Panics
    /// If `node` was not issued by this arena.
    pub fn node_mut(&mut self, node: NodeHandle) -> &mut Node<N> {
        &mut self.nodes[node]
    }
}

/// Operations shared by the aggregated and the ordered call tree
pub trait CallTree {
    type Node: Default;

    fn base(&self) -> &CallTreeBase<Self::Node>;

    /// Root node of the tree, action code [`ROOT_ACTION_CODE`]
    fn root(&self) -> NodeHandle {
        self.base().root()
    }

    /// Action code of `node`
    ///
    /// # Panics
    /// If `node` was not issued by this tree.
    fn get_node_action_code(&self, node: NodeHandle) -> ActionCode {
        self.base().node(node).action_code
    }

    /// Actions set used to resolve names on export
    fn get_actions_set(&self) -> &Arc<ActionsSet> {
        self.base().actions_set()
    }

    /// Number of nodes, root included
    fn nodes_count(&self) -> usize {
        self.base().len()
    }

    /// Add a new child to `node` with `action_code`
    fn add_new_link(&mut self, node: NodeHandle, action_code: ActionCode) -> NodeHandle;

    /// Return a child of `node` with `action_code`, creating one if required
    fn add_new_link_if_missing(&mut self, node: NodeHandle, action_code: ActionCode) -> NodeHandle;
}
