//! Start/stop instrumentation driving one ordered call tree.
//!
//! A tracer keeps the stack of currently active actions. Starting an
//! action appends a child under the innermost active one; stopping it
//! records the stop timestamp and pops it. Timestamps are nanoseconds
//! since the tracer was created unless given explicitly.
//!
//! The call tree core does not depend on this module.

use crate::actions::{ActionCode, ActionsSet};
use crate::call_tree::{CallTree, NodeHandle, OrderedTree};
use crate::utils::error::TraceError;
use log::{trace, warn};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Instant;

/// Builds the ordered call tree of a single traced execution
#[derive(Debug)]
pub struct CallTreeTracer {
    tree: OrderedTree,
    active: Vec<(ActionCode, NodeHandle)>,
    epoch: Instant,
}

impl CallTreeTracer {
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        Self {
            tree: OrderedTree::new(actions_set),
            active: Vec::new(),
            epoch: Instant::now(),
        }
    }

    /// Start `action_code` now, nested in the current action
    pub fn start_action(&mut self, action_code: ActionCode) -> Result<NodeHandle, TraceError> {
        let now = self.now();
        self.start_action_at(action_code, now)
    }

    /// Start `action_code` at `time`, nested in the current action
    ///
    /// # Errors
    /// * `TraceError::InvalidAction` - code is not in the actions set
    pub fn start_action_at(
        &mut self,
        action_code: ActionCode,
        time: i64,
    ) -> Result<NodeHandle, TraceError> {
        if !self.tree.get_actions_set().contains_code(action_code) {
            warn!("Attempt to start undefined action {}", action_code);
            return Err(TraceError::InvalidAction(action_code));
        }

        let parent = self.current_node();
        let node = self.tree.add_new_link(parent, action_code);
        self.tree.set_node_start_time(node, time);
        self.active.push((action_code, node));

        trace!("Started action {} at {} (depth {})", action_code, time, self.depth());
        Ok(node)
    }

    /// Stop `action_code` now
    pub fn stop_action(&mut self, action_code: ActionCode) -> Result<(), TraceError> {
        let now = self.now();
        self.stop_action_at(action_code, now)
    }

    /// Stop `action_code` at `time`
    ///
    /// Only the innermost active action can be stopped. On error the
    /// active stack is left unchanged.
    ///
    /// # Errors
    /// * `TraceError::NoActiveAction` - nothing has been started
    /// * `TraceError::ActionMismatch` - another action is innermost
    pub fn stop_action_at(&mut self, action_code: ActionCode, time: i64) -> Result<(), TraceError> {
        let Some(&(expected, node)) = self.active.last() else {
            warn!("Attempt to stop action {} while none is active", action_code);
            return Err(TraceError::NoActiveAction {
                action: action_code,
            });
        };

        if expected != action_code {
            warn!(
                "Attempt to stop action {} while action {} is active",
                action_code, expected
            );
            return Err(TraceError::ActionMismatch {
                expected,
                found: action_code,
            });
        }

        self.tree.set_node_stop_time(node, time);
        self.active.pop();

        trace!("Stopped action {} at {} (depth {})", action_code, time, self.depth());
        Ok(())
    }

    /// Start `action_code` and stop it when the returned guard is dropped
    pub fn guard(&mut self, action_code: ActionCode) -> Result<ActionGuard<'_>, TraceError> {
        self.start_action(action_code)?;

        Ok(ActionGuard {
            tracer: self,
            action_code,
            stopped: false,
        })
    }

    /// Node of the innermost active action, or the root when idle
    pub fn current_node(&self) -> NodeHandle {
        self.active
            .last()
            .map_or_else(|| self.tree.root(), |&(_, node)| node)
    }

    /// Number of active actions
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn tree(&self) -> &OrderedTree {
        &self.tree
    }

    /// Finish tracing and return the tree
    ///
    /// # Errors
    /// * `TraceError::UnfinishedActions` - some actions were never stopped
    pub fn finish(self) -> Result<OrderedTree, TraceError> {
        if !self.is_idle() {
            warn!("Finishing trace with {} unstopped action(s)", self.depth());
            return Err(TraceError::UnfinishedActions(self.depth()));
        }

        Ok(self.tree)
    }

    /// Return the tree as is, with unstopped actions left at stop time 0
    pub fn into_tree(self) -> OrderedTree {
        self.tree
    }

    fn now(&self) -> i64 {
        i64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }
}

/// Scope of one traced action
///
/// Dereferences to the tracer, so nested actions can be started through
/// the guard of their parent.
pub struct ActionGuard<'a> {
    tracer: &'a mut CallTreeTracer,
    action_code: ActionCode,
    stopped: bool,
}

impl ActionGuard<'_> {
    pub fn action_code(&self) -> ActionCode {
        self.action_code
    }

    /// Stop the action before the end of the scope
    pub fn stop(mut self) -> Result<(), TraceError> {
        self.stopped = true;
        self.tracer.stop_action(self.action_code)
    }
}

impl Deref for ActionGuard<'_> {
    type Target = CallTreeTracer;

    fn deref(&self) -> &CallTreeTracer {
        &*self.tracer
    }
}

impl DerefMut for ActionGuard<'_> {
    fn deref_mut(&mut self) -> &mut CallTreeTracer {
        &mut *self.tracer
    }
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }

        if let Err(e) = self.tracer.stop_action(self.action_code) {
            warn!("Action guard failed to stop action {}: {}", self.action_code, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_tracer() -> (CallTreeTracer, ActionCode, ActionCode) {
        let actions = Arc::new(ActionsSet::new());
        let a = actions.define_new_action("A");
        let b = actions.define_new_action("B");
        (CallTreeTracer::new(actions), a, b)
    }

    #[test]
    fn test_start_and_stop_builds_nested_tree() {
        let (mut tracer, a, b) = create_tracer();

        let a_node = tracer.start_action_at(a, 0).unwrap();
        let b_node = tracer.start_action_at(b, 2).unwrap();
        assert_eq!(tracer.depth(), 2);
        tracer.stop_action_at(b, 5).unwrap();
        tracer.stop_action_at(a, 10).unwrap();
        assert!(tracer.is_idle());

        let tree = tracer.finish().unwrap();
        assert_eq!(tree.links(tree.root()), &[(a, a_node)]);
        assert_eq!(tree.links(a_node), &[(b, b_node)]);
        assert_eq!(tree.get_node_start_time(b_node), 2);
        assert_eq!(tree.get_node_stop_time(b_node), 5);
        assert_eq!(tree.get_node_stop_time(a_node), 10);
    }

    #[test]
    fn test_start_undefined_action() {
        let (mut tracer, _, _) = create_tracer();

        assert_eq!(tracer.start_action(17), Err(TraceError::InvalidAction(17)));
        assert_eq!(tracer.start_action(-1), Err(TraceError::InvalidAction(-1)));
        assert_eq!(tracer.tree().nodes_count(), 1);
    }

    #[test]
    fn test_stop_without_start() {
        let (mut tracer, a, _) = create_tracer();

        assert_eq!(
            tracer.stop_action(a),
            Err(TraceError::NoActiveAction { action: a })
        );
    }

    #[test]
    fn test_stop_mismatched_action_keeps_stack() {
        let (mut tracer, a, b) = create_tracer();
        tracer.start_action(a).unwrap();

        assert_eq!(
            tracer.stop_action(b),
            Err(TraceError::ActionMismatch {
                expected: a,
                found: b
            })
        );
        assert_eq!(tracer.depth(), 1);
        assert!(tracer.stop_action(a).is_ok());
    }

    #[test]
    fn test_finish_with_forgotten_stop() {
        let (mut tracer, a, _) = create_tracer();
        tracer.start_action(a).unwrap();

        assert_eq!(tracer.finish().unwrap_err(), TraceError::UnfinishedActions(1));
    }

    #[test]
    fn test_guards_stop_on_drop() {
        let (mut tracer, a, b) = create_tracer();

        {
            let mut outer = tracer.guard(a).unwrap();
            assert_eq!(outer.action_code(), a);
            {
                let _inner = outer.guard(b).unwrap();
            }
            assert_eq!(outer.depth(), 1);
        }

        assert!(tracer.is_idle());
        let tree = tracer.finish().unwrap();
        assert_eq!(tree.nodes_count(), 3);
    }

    #[test]
    fn test_guard_stop() {
        let (mut tracer, a, _) = create_tracer();

        let guard = tracer.guard(a).unwrap();
        assert!(guard.stop().is_ok());
        assert!(tracer.is_idle());
    }

    #[test]
    fn test_timestamps_are_monotonic() {
        let (mut tracer, a, _) = create_tracer();

        let node = tracer.start_action(a).unwrap();
        tracer.stop_action(a).unwrap();

        let tree = tracer.tree();
        assert!(tree.get_node_stop_time(node) >= tree.get_node_start_time(node));
    }
}
