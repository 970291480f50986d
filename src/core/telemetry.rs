//! Telemetry sink for transfer outcomes
//!
//! The coordinator reports every finished call (method name, elapsed time,
//! outcome) to an injectable sink. Telemetry is a side effect only: it runs
//! after all locks are released and is never required for correctness.

use crate::types::TransferOutcome;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Receiver for transfer outcome events
///
/// Implementations must be cheap and non-blocking; the coordinator calls the
/// sink once per transfer, on the calling thread, after lock release.
pub trait TelemetrySink: Send + Sync {
    /// Called once per finished transfer call
    ///
    /// # Arguments
    ///
    /// * `method` - Name of the entry point ("transfer" or "naive_transfer")
    /// * `elapsed` - Wall-clock duration of the call, including lock waits
    /// * `outcome` - Terminal state of the call
    fn on_transfer_outcome(&self, method: &'static str, elapsed: Duration, outcome: TransferOutcome);
}

/// Sink that discards all events
///
/// The default when no sink is injected.
#[derive(Debug, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn on_transfer_outcome(
        &self,
        _method: &'static str,
        _elapsed: Duration,
        _outcome: TransferOutcome,
    ) {
    }
}

/// Sink that emits one `tracing` event per transfer
///
/// Successful transfers log at DEBUG (they dominate any healthy workload);
/// rejections log at INFO.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn on_transfer_outcome(&self, method: &'static str, elapsed: Duration, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Success => {
                tracing::debug!(method, elapsed_us = elapsed.as_micros() as u64, outcome = outcome.as_str());
            }
            _ => {
                tracing::info!(method, elapsed_us = elapsed.as_micros() as u64, outcome = outcome.as_str());
            }
        }
    }
}

/// One recorded telemetry event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    /// Entry point that produced the event
    pub method: &'static str,
    /// Wall-clock duration of the call
    pub elapsed: Duration,
    /// Terminal state of the call
    pub outcome: TransferOutcome,
}

/// Sink that records every event in memory
///
/// Test support: lets assertions inspect exactly which events the coordinator
/// emitted and in what order (per thread).
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events recorded so far
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no events have been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn on_transfer_outcome(&self, method: &'static str, elapsed: Duration, outcome: TransferOutcome) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TelemetryEvent {
                method,
                elapsed,
                outcome,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_captures_events_in_order() {
        let sink = RecordingTelemetry::new();

        sink.on_transfer_outcome("transfer", Duration::from_micros(12), TransferOutcome::Success);
        sink.on_transfer_outcome(
            "transfer",
            Duration::from_micros(3),
            TransferOutcome::InsufficientFunds,
        );

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome, TransferOutcome::Success);
        assert_eq!(events[1].outcome, TransferOutcome::InsufficientFunds);
        assert_eq!(events[1].method, "transfer");
    }

    #[test]
    fn test_recording_sink_starts_empty() {
        let sink = RecordingTelemetry::new();

        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_noop_sink_accepts_events() {
        let sink = NoopTelemetry;

        sink.on_transfer_outcome(
            "naive_transfer",
            Duration::ZERO,
            TransferOutcome::InvalidArgument,
        );
    }
}
