//! Exported document schema for call trees and reports.
//!
//! Field names are part of the external interface: reporting consumers
//! read `name`, `time`, `calls`, `start_time`, `stop_time` and `actions`.
//! The root of a tree only carries `actions`, and only when it is not
//! empty, so an empty tree exports as `{}`.

use serde::{Deserialize, Serialize};

/// Exported call tree: the children of the root node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct CallTreeDocument<A> {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<A>,
}

impl<A> Default for CallTreeDocument<A> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

/// One node of an exported aggregated tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedActionDocument {
    /// Action name resolved through the actions set
    pub name: String,

    /// Total time accumulated in this node
    pub time: i64,

    /// Number of calls accumulated in this node
    pub calls: i64,

    /// Nested actions, sorted by action code
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AggregatedActionDocument>,
}

/// One node of an exported ordered tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedActionDocument {
    /// Action name resolved through the actions set
    pub name: String,

    pub start_time: i64,

    pub stop_time: i64,

    /// Nested actions in call order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<OrderedActionDocument>,
}

pub type AggregatedTreeDocument = CallTreeDocument<AggregatedActionDocument>;
pub type OrderedTreeDocument = CallTreeDocument<OrderedActionDocument>;

/// Top-level statistics report written to JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// Number of traces folded into the total call tree
    pub traces_count: i64,

    /// Cumulative statistics of every collected trace
    pub total_call_tree: AggregatedTreeDocument,

    /// Most recently collected trace, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_call_tree: Option<OrderedTreeDocument>,
}

impl AggregatedActionDocument {
    /// Number of nodes in this subtree, this one included
    pub fn subtree_size(&self) -> usize {
        1 + self.actions.iter().map(Self::subtree_size).sum::<usize>()
    }
}

impl OrderedActionDocument {
    pub fn duration(&self) -> i64 {
        self.stop_time - self.start_time
    }
}
