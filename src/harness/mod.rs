//! Concurrent workload harness and invariant checking
//!
//! Not production code, but integral to validating the engine: this module
//! drives many concurrent transfers against a coordinator and provides the
//! external liveness probe that turns "a thread never returned" into a
//! reportable result. True deadlock has no unwinding signal from inside the
//! stuck threads, so detection has to live out here.

use crate::core::TransferCoordinator;
use crate::types::{AccountId, TransferOutcome};
use std::sync::mpsc;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

/// One worker's share of a concurrent workload
///
/// The worker issues `repeat` transfers of `amount` from `source` to
/// `destination` through the coordinator's safe path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferJob {
    /// Account to debit
    pub source: AccountId,
    /// Account to credit
    pub destination: AccountId,
    /// Amount per transfer, positive
    pub amount: i64,
    /// Number of transfers this worker issues
    pub repeat: usize,
}

/// Tally of outcomes across a completed workload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadReport {
    /// Calls that returned `Success`
    pub committed: usize,
    /// Calls that returned `InsufficientFunds`
    pub insufficient: usize,
    /// Calls that returned `InvalidArgument`
    pub rejected: usize,
}

impl WorkloadReport {
    /// Total calls that returned, regardless of outcome
    pub fn completed(&self) -> usize {
        self.committed + self.insufficient + self.rejected
    }

    fn record(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Success => self.committed += 1,
            TransferOutcome::InsufficientFunds => self.insufficient += 1,
            TransferOutcome::InvalidArgument => self.rejected += 1,
        }
    }

    fn merge(&mut self, other: WorkloadReport) {
        self.committed += other.committed;
        self.insufficient += other.insufficient;
        self.rejected += other.rejected;
    }
}

/// Run one OS thread per job and tally every outcome
///
/// All workers start together behind a barrier so the transfers genuinely
/// overlap rather than trickling in as threads spawn. Returns once every
/// worker has finished; with the safe path this always happens, which is
/// itself the deadlock-freedom property under test.
///
/// # Panics
///
/// Propagates a panic from any worker thread.
pub fn run_workload(coordinator: &TransferCoordinator, jobs: &[TransferJob]) -> WorkloadReport {
    let barrier = Barrier::new(jobs.len());

    let mut total = WorkloadReport::default();
    thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|job| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let mut report = WorkloadReport::default();
                    for _ in 0..job.repeat {
                        report.record(coordinator.transfer(
                            job.source,
                            job.destination,
                            job.amount,
                        ));
                    }
                    report
                })
            })
            .collect();

        for handle in handles {
            total.merge(handle.join().expect("workload worker panicked"));
        }
    });
    total
}

/// External liveness probe: do all operations return within `timeout`?
///
/// Each operation runs on its own detached thread and signals completion over
/// a channel; the probe waits on the channel with a deadline instead of
/// joining. `false` means at least one operation was still running when the
/// deadline passed, which is the positive deadlock signal for the naive
/// transfer path. Stuck threads are left behind; they hold no resources the
/// caller needs and die with the process.
pub fn all_complete_within(
    ops: Vec<Box<dyn FnOnce() + Send + 'static>>,
    timeout: Duration,
) -> bool {
    let (sender, receiver) = mpsc::channel();
    let expected = ops.len();

    for op in ops {
        let sender = sender.clone();
        thread::spawn(move || {
            op();
            // Receiver may be gone if an earlier op already timed out.
            let _ = sender.send(());
        });
    }
    drop(sender);

    let deadline = Instant::now() + timeout;
    for _ in 0..expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if receiver.recv_timeout(remaining).is_err() {
            return false;
        }
    }
    true
}

/// Default worker count for demo workloads: one per logical CPU
pub fn default_workers() -> usize {
    num_cpus::get()
}
