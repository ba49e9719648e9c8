//! Shared aggregated tree protected by a single mutex.
//!
//! Producer threads merge finished traces under the lock; a reporter takes
//! snapshots with [`ConcurrentCallTree::copy_tree`] and exports them
//! without holding the lock.

use super::aggregated::AggregatedTree;
use super::base::CallTree;
use super::merge::MergeInto;
use crate::actions::ActionsSet;
use log::{debug, warn};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Aggregated tree that many threads can update concurrently
#[derive(Debug)]
pub struct ConcurrentCallTree {
    call_tree: Mutex<AggregatedTree>,
}

/// Exclusive access to the shared tree
///
/// The lock is released when the guard is dropped, whichever way the
/// holding scope is left.
pub struct CallTreeGuard<'a> {
    call_tree: MutexGuard<'a, AggregatedTree>,
}

impl ConcurrentCallTree {
    /// Create a shared tree holding only the root node
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        Self::from_tree(AggregatedTree::new(actions_set))
    }

    /// Wrap an existing aggregated tree
    pub fn from_tree(call_tree: AggregatedTree) -> Self {
        Self {
            call_tree: Mutex::new(call_tree),
        }
    }

    /// Block until the tree is available and take ownership of it
    pub fn lock(&self) -> CallTreeGuard<'_> {
        let call_tree = self.call_tree.lock().unwrap_or_else(|poisoned| {
            warn!("Call tree lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        });

        CallTreeGuard { call_tree }
    }

    /// Deep copy of the tree taken under the lock
    pub fn copy_tree(&self) -> AggregatedTree {
        let guard = self.lock();
        let copy = guard.get_tree().clone();
        drop(guard);

        debug!("Copied shared call tree ({} nodes)", copy.nodes_count());
        copy
    }

    /// Fold `source` into the shared tree under the lock
    pub fn merge<T: MergeInto + ?Sized>(&self, source: &T) {
        let mut guard = self.lock();
        source.merge_into(guard.get_tree_mut());
    }

    /// Consume the wrapper and return the tree
    pub fn into_inner(self) -> AggregatedTree {
        self.call_tree
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl CallTreeGuard<'_> {
    /// The live tree, valid while the guard is held
    pub fn get_tree(&self) -> &AggregatedTree {
        &self.call_tree
    }

    pub fn get_tree_mut(&mut self) -> &mut AggregatedTree {
        &mut self.call_tree
    }
}

impl Deref for CallTreeGuard<'_> {
    type Target = AggregatedTree;

    fn deref(&self) -> &AggregatedTree {
        self.get_tree()
    }
}

impl DerefMut for CallTreeGuard<'_> {
    fn deref_mut(&mut self) -> &mut AggregatedTree {
        self.get_tree_mut()
    }
}
