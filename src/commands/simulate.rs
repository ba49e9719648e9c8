//! Simulate command implementation.
//!
//! The simulate command:
//! 1. Defines a synthetic request-handling workload
//! 2. Runs producer threads that trace requests into ordered trees
//! 3. Folds traces into per-thread batches, then into the shared aggregate
//! 4. Takes periodic snapshots from the reporting thread
//! 5. Writes the final report

use super::models::SimulateArgs;
use super::utils::print_action_tree;
use crate::actions::{ActionCode, ActionsSet};
use crate::call_tree::{AggregatedTree, CallTree, MergeInto, OrderedTree};
use crate::collector::TraceCollector;
use crate::output::write_report;
use crate::tracer::CallTreeTracer;
use crate::utils::error::TraceError;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Action codes of the synthetic workload
#[derive(Debug, Clone, Copy)]
struct Workload {
    handle_request: ActionCode,
    parse_request: ActionCode,
    read_cache: ActionCode,
    query_backend: ActionCode,
    serialize_response: ActionCode,
}

impl Workload {
    fn define(actions: &ActionsSet) -> Self {
        Self {
            handle_request: actions.define_new_action("handle_request"),
            parse_request: actions.define_new_action("parse_request"),
            read_cache: actions.define_new_action("read_cache"),
            query_backend: actions.define_new_action("query_backend"),
            serialize_response: actions.define_new_action("serialize_response"),
        }
    }
}

/// Execute the simulate command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Instrumentation misuse inside a producer thread
/// * Producer thread panics
/// * Report write errors
pub fn execute_simulate(args: SimulateArgs) -> Result<()> {
    let start_time = Instant::now();

    info!(
        "Starting simulation: {} thread(s) x {} request(s), batch size {}, report every {}ms",
        args.threads,
        args.iterations,
        args.batch_size,
        args.report_interval.as_millis()
    );

    let actions = Arc::new(ActionsSet::new());
    let workload = Workload::define(&actions);
    let collector = TraceCollector::new(Arc::clone(&actions));

    thread::scope(|scope| -> Result<()> {
        let producers: Vec<_> = (0..args.threads)
            .map(|thread_index| {
                let (collector, actions, args) = (&collector, &actions, &args);
                scope.spawn(move || run_producer(collector, workload, actions, thread_index, args))
            })
            .collect();

        // This thread acts as the reporter until every producer is done
        while !producers.iter().all(|producer| producer.is_finished()) {
            thread::sleep(args.report_interval);

            let snapshot = collector.total_call_tree();
            debug!(
                "Snapshot: {} trace(s), {} node(s)",
                snapshot.get_node_calls_number(snapshot.root()),
                snapshot.nodes_count()
            );
        }

        for producer in producers {
            producer
                .join()
                .map_err(|_| anyhow!("Producer thread panicked"))?
                .context("Producer failed to trace a request")?;
        }

        Ok(())
    })?;

    let report = collector.report();
    info!("Collected {} trace(s)", report.traces_count);

    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("CALL TREE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Traces: {}", report.traces_count);
        println!();
        print_action_tree(&report.total_call_tree.actions, 0);
        println!("{}", "=".repeat(80));
    }

    info!(
        "Simulation completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate simulate arguments
///
/// **Public** - can be called before execute_simulate for early validation
pub fn validate_args(args: &SimulateArgs) -> Result<()> {
    if args.threads == 0 {
        anyhow::bail!("threads must be greater than 0");
    }

    if args.threads > 1024 {
        anyhow::bail!("threads is too large (max 1024)");
    }

    if args.iterations == 0 {
        anyhow::bail!("iterations must be greater than 0");
    }

    if args.batch_size == 0 {
        anyhow::bail!("batch_size must be greater than 0");
    }

    if args.report_interval.is_zero() {
        anyhow::bail!("report interval must be greater than 0");
    }

    Ok(())
}

/// Trace `args.iterations` requests and hand them to the collector in batches
fn run_producer(
    collector: &TraceCollector,
    workload: Workload,
    actions: &Arc<ActionsSet>,
    thread_index: usize,
    args: &SimulateArgs,
) -> Result<(), TraceError> {
    let mut batch = AggregatedTree::new(Arc::clone(actions));
    let mut pending = 0;

    for iteration in 0..args.iterations {
        let seed = (thread_index * args.iterations + iteration) as u64;
        let trace = trace_request(workload, actions, seed)?;

        trace.merge_into(&mut batch);
        pending += 1;

        if pending == args.batch_size || iteration + 1 == args.iterations {
            collector.add_batch(&batch, trace);
            batch = AggregatedTree::new(Arc::clone(actions));
            pending = 0;
        }
    }

    debug!("Producer {} finished", thread_index);
    Ok(())
}

/// Trace one synthetic request
///
/// `seed` varies the shape: one to three cache reads, and a backend
/// query for every fourth request.
fn trace_request(
    workload: Workload,
    actions: &Arc<ActionsSet>,
    seed: u64,
) -> Result<OrderedTree, TraceError> {
    let mut tracer = CallTreeTracer::new(Arc::clone(actions));

    {
        let mut request = tracer.guard(workload.handle_request)?;

        {
            let _parse = request.guard(workload.parse_request)?;
            busy_work(16 + seed % 64);
        }

        for lookup in 0..1 + seed % 3 {
            let _cache = request.guard(workload.read_cache)?;
            busy_work(8 + lookup * 4);
        }

        if seed % 4 == 0 {
            let _backend = request.guard(workload.query_backend)?;
            busy_work(512);
        }

        let serialize = request.guard(workload.serialize_response)?;
        busy_work(32);
        serialize.stop()?;
    }

    tracer.finish()
}

fn busy_work(rounds: u64) -> u64 {
    (0..rounds * 100).fold(0u64, |acc, x| black_box(acc.wrapping_mul(31).wrapping_add(x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::read_report;
    use std::time::Duration;

    #[test]
    fn test_validate_args() {
        assert!(validate_args(&SimulateArgs::default()).is_ok());

        let args = SimulateArgs {
            threads: 0,
            ..SimulateArgs::default()
        };
        assert!(validate_args(&args).is_err());

        let args = SimulateArgs {
            batch_size: 0,
            ..SimulateArgs::default()
        };
        assert!(validate_args(&args).is_err());

        let args = SimulateArgs {
            report_interval: Duration::ZERO,
            ..SimulateArgs::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_trace_request_shape() {
        let actions = Arc::new(ActionsSet::new());
        let workload = Workload::define(&actions);

        // seed 2: three cache reads, no backend query
        let trace = trace_request(workload, &actions, 2).unwrap();
        let request = trace.links(trace.root())[0].1;
        let codes: Vec<_> = trace.links(request).iter().map(|&(code, _)| code).collect();

        assert_eq!(
            codes,
            vec![
                workload.parse_request,
                workload.read_cache,
                workload.read_cache,
                workload.read_cache,
                workload.serialize_response,
            ]
        );
    }

    #[test]
    fn test_execute_simulate_writes_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("stats.json");

        let args = SimulateArgs {
            threads: 3,
            iterations: 10,
            batch_size: 4,
            report_interval: Duration::from_millis(1),
            output_json: output.clone(),
            print_summary: false,
        };
        execute_simulate(args).unwrap();

        let report = read_report(&output).unwrap();
        assert_eq!(report.traces_count, 30);

        let request = &report.total_call_tree.actions[0];
        assert_eq!(request.name, "handle_request");
        assert_eq!(request.calls, 30);

        let read_cache = request
            .actions
            .iter()
            .find(|action| action.name == "read_cache")
            .unwrap();
        // seeds 0..30: 1 + seed % 3 reads each
        assert_eq!(read_cache.calls, 60);
        assert!(report.last_call_tree.is_some());
    }
}
