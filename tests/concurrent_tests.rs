use pretty_assertions::assert_eq;
use react_trace::actions::ActionsSet;
use react_trace::call_tree::{AggregatedTree, CallTree, ConcurrentCallTree, MergeInto, OrderedTree};
use react_trace::collector::TraceCollector;
use react_trace::output::ToDocument;
use react_trace::tracer::CallTreeTracer;
use std::sync::Arc;
use std::thread;

fn trace_request(actions: &Arc<ActionsSet>, outer: i32, inner: i32, repeats: i64) -> OrderedTree {
    let mut tracer = CallTreeTracer::new(Arc::clone(actions));
    tracer.start_action_at(outer, 0).unwrap();
    for i in 0..repeats {
        tracer.start_action_at(inner, i * 10).unwrap();
        tracer.stop_action_at(inner, i * 10 + 3).unwrap();
    }
    tracer.stop_action_at(outer, 100).unwrap();
    tracer.finish().unwrap()
}

#[test]
fn test_copy_tree_is_a_consistent_independent_snapshot() {
    let actions = Arc::new(ActionsSet::new());
    let a = actions.define_new_action("A");
    let b = actions.define_new_action("B");
    let shared = ConcurrentCallTree::new(Arc::clone(&actions));

    shared.merge(&trace_request(&actions, a, b, 2));

    let mut copy = shared.copy_tree();
    assert_eq!(copy.to_document(), shared.copy_tree().to_document());

    let a_node = copy.get_node_link(copy.root(), a).unwrap();
    copy.inc_node_time(a_node, 1_000);
    copy.inc_node_calls_number(a_node);

    let original = shared.copy_tree().to_document();
    assert_eq!(original.actions[0].time, 100);
    assert_eq!(original.actions[0].calls, 1);
}

#[test]
fn test_merge_under_explicit_lock() {
    let actions = Arc::new(ActionsSet::new());
    let a = actions.define_new_action("A");
    let b = actions.define_new_action("B");
    let shared = ConcurrentCallTree::new(Arc::clone(&actions));
    let trace = trace_request(&actions, a, b, 1);

    {
        let mut guard = shared.lock();
        trace.merge_into(guard.get_tree_mut());
        trace.merge_into(&mut guard);
    }

    let total = shared.copy_tree().to_document();
    assert_eq!(total.actions[0].calls, 2);
    assert_eq!(total.actions[0].actions[0].time, 6);
}

#[test]
fn test_producers_and_reporter() {
    const THREADS: usize = 6;
    const TRACES: usize = 200;

    let actions = Arc::new(ActionsSet::new());
    let a = actions.define_new_action("A");
    let b = actions.define_new_action("B");
    let collector = TraceCollector::new(Arc::clone(&actions));

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..TRACES {
                    collector.add_tree(trace_request(&actions, a, b, 3));
                }
            });
        }

        scope.spawn(|| {
            for _ in 0..50 {
                let snapshot = collector.total_call_tree();
                let document = snapshot.to_document();
                if let Some(a_document) = document.actions.first() {
                    // Merges are atomic: every snapshot sees whole traces
                    assert_eq!(a_document.actions[0].calls, a_document.calls * 3);
                    assert_eq!(a_document.time, a_document.calls * 100);
                }
            }
        });
    });

    let expected_calls = (THREADS * TRACES) as i64;
    assert_eq!(collector.traces_count(), expected_calls);

    let report = collector.report();
    assert_eq!(report.total_call_tree.actions[0].calls, expected_calls);
    assert_eq!(report.total_call_tree.actions[0].actions[0].calls, expected_calls * 3);
    assert_eq!(report.total_call_tree.actions[0].actions[0].time, expected_calls * 9);
}

#[test]
fn test_per_thread_batches_match_direct_merges() {
    let actions = Arc::new(ActionsSet::new());
    let a = actions.define_new_action("A");
    let b = actions.define_new_action("B");

    let direct = ConcurrentCallTree::new(Arc::clone(&actions));
    let batched = ConcurrentCallTree::new(Arc::clone(&actions));

    thread::scope(|scope| {
        for repeats in 1..=4 {
            let (actions, direct, batched) = (&actions, &direct, &batched);
            scope.spawn(move || {
                let mut batch = AggregatedTree::new(Arc::clone(actions));
                for _ in 0..25 {
                    let trace = trace_request(actions, a, b, repeats);
                    direct.merge(&trace);
                    trace.merge_into(&mut batch);
                }
                batched.merge(&batch);
            });
        }
    });

    assert_eq!(direct.copy_tree().to_document(), batched.copy_tree().to_document());
}
