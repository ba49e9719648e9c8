//! Recursive folding of call trees into cumulative statistics.
//!
//! Both variants merge into an [`AggregatedTree`]. Nodes are paired level
//! by level, starting at the two roots, and matched purely by action code:
//! names are never resolved here.

use super::aggregated::AggregatedTree;
use super::base::{CallTree, NodeHandle};
use super::ordered::OrderedTree;
use log::debug;

/// A tree whose contents can be folded into an [`AggregatedTree`]
///
/// Merging only mutates the target. Merging the same source twice doubles
/// its contribution.
pub trait MergeInto {
    fn merge_into(&self, target: &mut AggregatedTree);
}

impl MergeInto for AggregatedTree {
    /// Adds every node's time and calls onto the matching target node,
    /// creating target nodes where the path does not exist yet.
    fn merge_into(&self, target: &mut AggregatedTree) {
        debug!(
            "Merging aggregated tree ({} nodes) into tree with {} nodes",
            self.nodes_count(),
            target.nodes_count()
        );

        merge_aggregated_node(self, self.root(), target, target.root());
    }
}

impl MergeInto for OrderedTree {
    /// Each ordered node counts as exactly one call lasting
    /// `stop_time - start_time`. Repeated siblings with the same code fan
    /// into a single target child.
    fn merge_into(&self, target: &mut AggregatedTree) {
        debug!(
            "Merging ordered tree ({} nodes) into tree with {} nodes",
            self.nodes_count(),
            target.nodes_count()
        );

        merge_ordered_node(self, self.root(), target, target.root());
    }
}

fn merge_aggregated_node(
    source: &AggregatedTree,
    lhs_node: NodeHandle,
    target: &mut AggregatedTree,
    rhs_node: NodeHandle,
) {
    let lhs = source.data(lhs_node);

    target.inc_node_time(rhs_node, lhs.time);
    let calls_number = target.get_node_calls_number(rhs_node) + lhs.calls_number;
    target.set_node_calls_number(rhs_node, calls_number);

    for (&action_code, &lhs_next_node) in &lhs.links {
        let rhs_next_node = target.add_new_link_if_missing(rhs_node, action_code);
        merge_aggregated_node(source, lhs_next_node, target, rhs_next_node);
    }
}

fn merge_ordered_node(
    source: &OrderedTree,
    lhs_node: NodeHandle,
    target: &mut AggregatedTree,
    rhs_node: NodeHandle,
) {
    // No stop >= start check: a negative delta goes through unchanged
    let time_delta = source.get_node_stop_time(lhs_node) - source.get_node_start_time(lhs_node);
    target.inc_node_time(rhs_node, time_delta);
    target.inc_node_calls_number(rhs_node);

    for &(action_code, lhs_next_node) in source.links(lhs_node) {
        let rhs_next_node = target.add_new_link_if_missing(rhs_node, action_code);
        merge_ordered_node(source, lhs_next_node, target, rhs_next_node);
    }
}
