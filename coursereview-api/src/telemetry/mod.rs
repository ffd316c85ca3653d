//! Course Review Telemetry - Logging Infrastructure
//!
//! Structured logging through `tracing`, with an `EnvFilter` and either
//! human-readable or JSON output.

pub mod tracer;

pub use tracer::{init_tracer, LogFormat, TelemetryConfig};
