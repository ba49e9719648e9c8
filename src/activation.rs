//! Activation scope for tracing.
//!
//! Instrumented code calls start/stop unconditionally; whether anything is
//! recorded depends on whether tracing is active. Activations nest: only
//! the outermost `activate` creates a tracer, and only the matching last
//! `deactivate` finishes it and hands the trace out. While inactive,
//! start/stop calls are silent no-ops.

use crate::actions::{ActionCode, ActionsSet};
use crate::call_tree::{CallTree, OrderedTree};
use crate::collector::TraceCollector;
use crate::tracer::{ActionGuard, CallTreeTracer};
use crate::utils::error::TraceError;
use log::{debug, warn};
use std::sync::Arc;

/// Gates a [`CallTreeTracer`] behind a nested activation count
#[derive(Debug)]
pub struct TraceActivation {
    actions_set: Arc<ActionsSet>,
    activations: usize,
    tracer: Option<CallTreeTracer>,
}

impl TraceActivation {
    /// Create an inactive scope
    pub fn new(actions_set: Arc<ActionsSet>) -> Self {
        Self {
            actions_set,
            activations: 0,
            tracer: None,
        }
    }

    /// Activate tracing, or nest one more activation if already active
    pub fn activate(&mut self) {
        if self.tracer.is_none() {
            debug!("Tracing activated");
            self.tracer = Some(CallTreeTracer::new(Arc::clone(&self.actions_set)));
        }
        self.activations += 1;
    }

    /// Undo one activation
    ///
    /// # Returns
    /// The finished trace when this was the outermost activation,
    /// `None` while outer activations remain
    ///
    /// # Errors
    /// * `TraceError::NotActive` - tracing was not active
    /// * `TraceError::UnfinishedActions` - the trace still had open actions;
    ///   tracing is deactivated anyway and the trace is dropped
    pub fn deactivate(&mut self) -> Result<Option<OrderedTree>, TraceError> {
        if self.activations == 0 {
            warn!("Attempt to deactivate tracing while it is not active");
            return Err(TraceError::NotActive);
        }

        self.activations -= 1;
        if self.activations > 0 {
            return Ok(None);
        }

        let Some(tracer) = self.tracer.take() else {
            return Ok(None);
        };

        debug!("Tracing deactivated");
        tracer.finish().map(Some)
    }

    /// Undo one activation and hand a finished trace to `collector`
    pub fn deactivate_into(&mut self, collector: &TraceCollector) -> Result<(), TraceError> {
        if let Some(call_tree) = self.deactivate()? {
            debug!("Submitting trace with {} nodes", call_tree.nodes_count());
            collector.add_tree(call_tree);
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.activations > 0
    }

    /// Number of nested activations
    pub fn activations(&self) -> usize {
        self.activations
    }

    /// Start `action_code` if tracing is active
    pub fn start_action(&mut self, action_code: ActionCode) -> Result<(), TraceError> {
        match self.tracer.as_mut() {
            Some(tracer) => tracer.start_action(action_code).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Stop `action_code` if tracing is active
    pub fn stop_action(&mut self, action_code: ActionCode) -> Result<(), TraceError> {
        match self.tracer.as_mut() {
            Some(tracer) => tracer.stop_action(action_code),
            None => Ok(()),
        }
    }

    /// Guard for `action_code`, or `None` when tracing is inactive
    pub fn guard(
        &mut self,
        action_code: ActionCode,
    ) -> Result<Option<ActionGuard<'_>>, TraceError> {
        match self.tracer.as_mut() {
            Some(tracer) => tracer.guard(action_code).map(Some),
            None => Ok(None),
        }
    }

    /// Active tracer, if any
    pub fn tracer(&self) -> Option<&CallTreeTracer> {
        self.tracer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_activation() -> (TraceActivation, ActionCode) {
        let actions = Arc::new(ActionsSet::new());
        let action = actions.define_new_action("ACTION");
        (TraceActivation::new(actions), action)
    }

    #[test]
    fn test_inactive_by_default() {
        let (activation, _) = create_activation();

        assert!(!activation.is_active());
        assert!(activation.tracer().is_none());
    }

    #[test]
    fn test_activate_and_deactivate() {
        let (mut activation, _) = create_activation();

        activation.activate();
        assert!(activation.is_active());

        let call_tree = activation.deactivate().unwrap();
        assert!(call_tree.is_some());
        assert!(!activation.is_active());
    }

    #[test]
    fn test_nested_activation_is_counted() {
        let (mut activation, action) = create_activation();

        activation.activate();
        activation.start_action(action).unwrap();
        activation.activate();
        assert_eq!(activation.activations(), 2);

        assert!(activation.deactivate().unwrap().is_none());
        assert!(activation.is_active());

        activation.stop_action(action).unwrap();
        let call_tree = activation.deactivate().unwrap().unwrap();
        assert!(!activation.is_active());
        assert_eq!(call_tree.nodes_count(), 2);
    }

    #[test]
    fn test_deactivate_while_inactive() {
        let (mut activation, _) = create_activation();

        assert_eq!(activation.deactivate().unwrap_err(), TraceError::NotActive);
        assert!(!activation.is_active());
    }

    #[test]
    fn test_start_and_stop_while_inactive_are_noops() {
        let (mut activation, action) = create_activation();

        assert_eq!(activation.start_action(action), Ok(()));
        assert_eq!(activation.stop_action(action), Ok(()));
        assert_eq!(activation.start_action(-1), Ok(()));
        assert!(activation.guard(action).unwrap().is_none());
        assert!(activation.tracer().is_none());
    }

    #[test]
    fn test_forgotten_stop_reported_at_deactivation() {
        let (mut activation, action) = create_activation();

        activation.activate();
        activation.start_action(action).unwrap();

        assert_eq!(
            activation.deactivate().unwrap_err(),
            TraceError::UnfinishedActions(1)
        );
        assert!(!activation.is_active());
    }
}
