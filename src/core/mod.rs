//! Core engine module
//!
//! This module contains the transfer engine's moving parts:
//! - `registry` - Account creation and id resolution
//! - `coordinator` - The ordered locking protocol and the naive comparison path
//! - `telemetry` - Injectable outcome-event sink

pub mod coordinator;
pub mod registry;
pub mod telemetry;

pub use coordinator::TransferCoordinator;
pub use registry::AccountRegistry;
pub use telemetry::{
    NoopTelemetry, RecordingTelemetry, TelemetryEvent, TelemetrySink, TracingTelemetry,
};
