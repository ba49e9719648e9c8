//! Conversion of call trees into nested documents.
//!
//! Names are resolved through the tree's actions set here, and only here.
//! Aggregated children are emitted sorted by action code; ordered children
//! keep their call order.

use super::schema::{
    AggregatedActionDocument, AggregatedTreeDocument, CallTreeDocument, OrderedActionDocument,
    OrderedTreeDocument,
};
use crate::call_tree::{AggregatedTree, CallTree, NodeHandle, OrderedTree};
use crate::utils::error::OutputError;
use serde::Serialize;

/// A tree that can be exported as a structured document
pub trait ToDocument {
    type Document: Serialize;

    fn to_document(&self) -> Self::Document;

    /// Export as a JSON value
    fn to_json(&self) -> Result<serde_json::Value, OutputError> {
        serde_json::to_value(self.to_document()).map_err(OutputError::SerializationFailed)
    }

    /// Export as a pretty-printed JSON string
    fn to_json_string(&self) -> Result<String, OutputError> {
        serde_json::to_string_pretty(&self.to_document()).map_err(OutputError::SerializationFailed)
    }
}

impl ToDocument for AggregatedTree {
    type Document = AggregatedTreeDocument;

    fn to_document(&self) -> AggregatedTreeDocument {
        CallTreeDocument {
            actions: self
                .sorted_links(self.root())
                .into_iter()
                .map(|(_, child)| aggregated_action(self, child))
                .collect(),
        }
    }
}

impl ToDocument for OrderedTree {
    type Document = OrderedTreeDocument;

    fn to_document(&self) -> OrderedTreeDocument {
        CallTreeDocument {
            actions: self
                .links(self.root())
                .iter()
                .map(|&(_, child)| ordered_action(self, child))
                .collect(),
        }
    }
}

fn aggregated_action(tree: &AggregatedTree, node: NodeHandle) -> AggregatedActionDocument {
    let actions_set = tree.get_actions_set();

    AggregatedActionDocument {
        name: actions_set.get_action_name(tree.get_node_action_code(node)),
        time: tree.get_node_time(node),
        calls: tree.get_node_calls_number(node),
        actions: tree
            .sorted_links(node)
            .into_iter()
            .map(|(_, child)| aggregated_action(tree, child))
            .collect(),
    }
}

fn ordered_action(tree: &OrderedTree, node: NodeHandle) -> OrderedActionDocument {
    let actions_set = tree.get_actions_set();

    OrderedActionDocument {
        name: actions_set.get_action_name(tree.get_node_action_code(node)),
        start_time: tree.get_node_start_time(node),
        stop_time: tree.get_node_stop_time(node),
        actions: tree
            .links(node)
            .iter()
            .map(|&(_, child)| ordered_action(tree, child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionsSet;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_empty_trees_export_as_empty_object() {
        let actions = Arc::new(ActionsSet::new());

        let aggregated = AggregatedTree::new(Arc::clone(&actions));
        assert_eq!(aggregated.to_json().unwrap(), json!({}));

        let ordered = OrderedTree::new(actions);
        assert_eq!(ordered.to_json().unwrap(), json!({}));
    }

    #[test]
    fn test_aggregated_export() {
        let actions = Arc::new(ActionsSet::new());
        let a = actions.define_new_action("A");
        let b = actions.define_new_action("B");
        let c = actions.define_new_action("C");

        let mut tree = AggregatedTree::new(Arc::clone(&actions));
        let a_node = tree.add_new_link(tree.root(), a);
        tree.set_node_time(a_node, 10);
        tree.set_node_calls_number(a_node, 2);
        let c_node = tree.add_new_link(a_node, c);
        tree.set_node_time(c_node, 1);
        tree.set_node_calls_number(c_node, 1);
        let b_node = tree.add_new_link(a_node, b);
        tree.set_node_time(b_node, 4);
        tree.set_node_calls_number(b_node, 3);

        let expected = json!({
            "actions": [{
                "name": "A",
                "time": 10,
                "calls": 2,
                "actions": [
                    { "name": "B", "time": 4, "calls": 3 },
                    { "name": "C", "time": 1, "calls": 1 }
                ]
            }]
        });
        assert_eq!(tree.to_json().unwrap(), expected);
    }

    #[test]
    fn test_ordered_export_keeps_call_order() {
        let actions = Arc::new(ActionsSet::new());
        let a = actions.define_new_action("A");
        let b = actions.define_new_action("B");

        let mut tree = OrderedTree::new(Arc::clone(&actions));
        for (code, start, stop) in [(b, 0, 3), (a, 3, 4), (b, 4, 9)] {
            let node = tree.add_new_link(tree.root(), code);
            tree.set_node_start_time(node, start);
            tree.set_node_stop_time(node, stop);
        }

        let expected = json!({
            "actions": [
                { "name": "B", "start_time": 0, "stop_time": 3 },
                { "name": "A", "start_time": 3, "stop_time": 4 },
                { "name": "B", "start_time": 4, "stop_time": 9 }
            ]
        });
        assert_eq!(tree.to_json().unwrap(), expected);
    }

    #[test]
    fn test_unknown_codes_get_placeholder_names() {
        let actions = Arc::new(ActionsSet::new());
        let mut tree = AggregatedTree::new(actions);
        tree.add_new_link(tree.root(), 42);

        let document = tree.to_document();
        assert_eq!(document.actions[0].name, "unknown_action_42");
    }
}
