//! Call tree engine: node arena, both tree variants, merging and the
//! concurrent aggregate.
//!
//! This module transforms per-invocation traces into:
//! - Ordered trees (literal call sequence with timestamps)
//! - Aggregated trees (cumulative time and calls per action path)

pub mod aggregated;
pub mod base;
pub mod concurrent;
pub mod merge;
pub mod ordered;

// Re-export main types
pub use aggregated::{AggregatedNode, AggregatedTree};
pub use base::{CallTree, CallTreeBase, Node, NodeHandle, NO_NODE};
pub use concurrent::{CallTreeGuard, ConcurrentCallTree};
pub use merge::MergeInto;
pub use ordered::{OrderedNode, OrderedTree};
