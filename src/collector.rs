//! Process-wide collection point for finished traces.
//!
//! Keeps the cumulative statistics of every collected trace together with
//! the most recent trace itself, and builds reports from consistent
//! snapshots of both.

use crate::actions::ActionsSet;
use crate::call_tree::{AggregatedTree, CallTree, ConcurrentCallTree, OrderedTree};
use crate::output::document::ToDocument;
use crate::output::schema::StatsReport;
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Aggregates ordered traces coming from many threads
#[derive(Debug)]
pub struct TraceCollector {
    total_call_tree: ConcurrentCallTree,
    last_call_tree: Mutex<Option<OrderedTree>>,
}

impl TraceCollector {
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        Self {
            total_call_tree: ConcurrentCallTree::new(actions_set),
            last_call_tree: Mutex::new(None),
        }
    }

    /// Fold `call_tree` into the total and keep it as the last trace
    pub fn add_tree(&self, call_tree: OrderedTree) {
        debug!("Collecting trace with {} nodes", call_tree.nodes_count());

        let mut last = self.last();
        self.total_call_tree.merge(&call_tree);
        *last = Some(call_tree);
    }

    /// Fold a locally aggregated batch of traces into the total
    ///
    /// `last_call_tree` must be the most recent trace already counted in
    /// `batch`; it is only kept, not merged again.
    pub fn add_batch(&self, batch: &AggregatedTree, last_call_tree: OrderedTree) {
        debug!("Collecting batch with {} nodes", batch.nodes_count());

        let mut last = self.last();
        self.total_call_tree.merge(batch);
        *last = Some(last_call_tree);
    }

    /// Snapshot of the cumulative statistics
    pub fn total_call_tree(&self) -> AggregatedTree {
        self.total_call_tree.copy_tree()
    }

    /// Copy of the most recently collected trace
    pub fn last_call_tree(&self) -> Option<OrderedTree> {
        self.last().clone()
    }

    /// Number of traces collected so far
    ///
    /// Every merged ordered trace counts one call on the root node.
    pub fn traces_count(&self) -> i64 {
        let guard = self.total_call_tree.lock();
        guard.get_node_calls_number(guard.root())
    }

    /// Build a report from snapshots of the total and the last trace
    ///
    /// Writers update both under the last trace lock, taken before the
    /// total's lock, so the reported last trace is always counted in the
    /// reported total.
    pub fn report(&self) -> StatsReport {
        let (total_call_tree, last_call_tree) = {
            let last = self.last();
            (self.total_call_tree(), last.clone())
        };

        StatsReport {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            traces_count: total_call_tree.get_node_calls_number(total_call_tree.root()),
            total_call_tree: total_call_tree.to_document(),
            last_call_tree: last_call_tree.as_ref().map(ToDocument::to_document),
        }
    }

    fn last(&self) -> MutexGuard<'_, Option<OrderedTree>> {
        self.last_call_tree.lock().unwrap_or_else(|poisoned| {
            warn!("Last call tree lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}
