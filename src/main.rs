//! Transfer Engine demo CLI
//!
//! Runs concurrency scenarios against the in-memory ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --scenario stress --accounts 4 --workers 8 --transfers-per-worker 1000
//! cargo run -- --scenario deadlock
//! ```
//!
//! The stress scenario spreads opposing transfer workloads across worker
//! threads and verifies the conservation invariant when they finish. The
//! deadlock scenario drives the deliberately unordered naive path into a
//! circular wait and reports it via the external liveness probe.
//!
//! # Exit Codes
//!
//! - 0: Scenario completed (for `deadlock`, the expected circular wait occurred)
//! - 1: Setup error or invariant violation

use rust_transfer_engine::cli::{self, CliArgs, Scenario};
use rust_transfer_engine::core::{AccountRegistry, TracingTelemetry, TransferCoordinator};
use rust_transfer_engine::harness::{all_complete_within, run_workload, TransferJob};
use std::process;
use std::sync::{Arc, Barrier};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = cli::parse_args();

    let result = match args.scenario {
        Scenario::Stress => run_stress(&args),
        Scenario::Deadlock => run_deadlock_demo(&args),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

/// Conservation workload: opposing transfers over a ring of accounts
fn run_stress(args: &CliArgs) -> Result<(), String> {
    if args.accounts < 2 {
        return Err("stress scenario needs at least 2 accounts".to_string());
    }
    if args.amount <= 0 {
        return Err("amount must be positive".to_string());
    }

    let registry = Arc::new(AccountRegistry::new());
    for id in 1..=args.accounts {
        registry
            .create_account(id, args.initial_balance)
            .map_err(|e| e.to_string())?;
    }
    let expected_total = registry.total_balance();

    let coordinator =
        TransferCoordinator::with_telemetry(Arc::clone(&registry), Arc::new(TracingTelemetry));

    // Each worker pushes funds one step around the ring; neighbours push in
    // both directions, so every adjacent pair sees opposing traffic.
    let workers = args.worker_count();
    let jobs: Vec<TransferJob> = (0..workers)
        .map(|worker| {
            let source = (worker as u32 % args.accounts) + 1;
            let destination = (source % args.accounts) + 1;
            let (source, destination) = if worker % 2 == 0 {
                (source, destination)
            } else {
                (destination, source)
            };
            TransferJob {
                source,
                destination,
                amount: args.amount,
                repeat: args.transfers_per_worker,
            }
        })
        .collect();

    tracing::info!(
        workers,
        accounts = args.accounts,
        transfers_per_worker = args.transfers_per_worker,
        amount = args.amount,
        "starting stress workload"
    );

    let report = run_workload(&coordinator, &jobs);
    let final_total = registry.total_balance();

    tracing::info!(
        committed = report.committed,
        insufficient = report.insufficient,
        rejected = report.rejected,
        final_total,
        "workload finished"
    );
    for id in registry.account_ids() {
        if let Some(account) = registry.get(id) {
            println!("account {:>4}: {}", id, account.balance());
        }
    }
    println!("total: {} (expected {})", final_total, expected_total);

    if final_total != expected_total {
        return Err(format!(
            "conservation invariant violated: expected {}, got {}",
            expected_total, final_total
        ));
    }
    Ok(())
}

/// Deadlock demonstration: the naive path in opposite directions
///
/// Each thread takes its first lock and then waits on a shared barrier, so
/// both hold one lock before either attempts its second. The liveness probe
/// reports the resulting circular wait.
fn run_deadlock_demo(args: &CliArgs) -> Result<(), String> {
    if args.initial_balance < 0 {
        return Err("initial balance must be non-negative".to_string());
    }

    let registry = Arc::new(AccountRegistry::new());
    registry
        .create_account(1, args.initial_balance.max(1000))
        .map_err(|e| e.to_string())?;
    registry
        .create_account(2, args.initial_balance.max(1000))
        .map_err(|e| e.to_string())?;

    let coordinator = Arc::new(TransferCoordinator::with_telemetry(
        registry,
        Arc::new(TracingTelemetry),
    ));
    let handoff = Arc::new(Barrier::new(2));

    let forward = {
        let coordinator = Arc::clone(&coordinator);
        let handoff = Arc::clone(&handoff);
        move || {
            coordinator.naive_transfer_with_handoff(1, 2, 100, || {
                handoff.wait();
            });
        }
    };
    let backward = {
        let coordinator = Arc::clone(&coordinator);
        let handoff = Arc::clone(&handoff);
        move || {
            coordinator.naive_transfer_with_handoff(2, 1, 100, || {
                handoff.wait();
            });
        }
    };

    tracing::info!("starting opposing naive transfers with forced handoff");
    let completed = all_complete_within(
        vec![
            Box::new(forward) as Box<dyn FnOnce() + Send>,
            Box::new(backward),
        ],
        Duration::from_millis(2000),
    );

    if completed {
        println!("no deadlock: both naive transfers returned");
    } else {
        println!("deadlock detected: naive transfers still blocked after 2000ms");
    }
    Ok(())
}
