//! React Trace
//!
//! In-process call-tree engine for lightweight action tracing.
//!
//! Each traced execution builds an [`OrderedTree`](call_tree::OrderedTree)
//! locally, usually through a [`CallTreeTracer`](tracer::CallTreeTracer).
//! Finished traces are merged into one shared
//! [`ConcurrentCallTree`](call_tree::ConcurrentCallTree) holding cumulative
//! per-action statistics, and a reporter exports consistent snapshots of it.
//!
//! ## Getting Started
//!
//! ```
//! use react_trace::actions::ActionsSet;
//! use react_trace::call_tree::{AggregatedTree, MergeInto};
//! use react_trace::output::ToDocument;
//! use react_trace::tracer::CallTreeTracer;
//! use std::sync::Arc;
//!
//! let actions = Arc::new(ActionsSet::new());
//! let handle_request = actions.define_new_action("handle_request");
//!
//! let mut tracer = CallTreeTracer::new(Arc::clone(&actions));
//! tracer.start_action_at(handle_request, 0).unwrap();
//! tracer.stop_action_at(handle_request, 10).unwrap();
//! let trace = tracer.finish().unwrap();
//!
//! let mut total = AggregatedTree::new(actions);
//! trace.merge_into(&mut total);
//!
//! let json = total.to_json().unwrap();
//! assert_eq!(json["actions"][0]["time"], 10);
//! ```

pub mod actions;
pub mod activation;
pub mod call_tree;
pub mod collector;
pub mod commands;
pub mod output;
pub mod tracer;
pub mod utils;
