//! drive-report: score, timeline and gauge geometry for driving reports.
//!
//! Report payloads go in, render-ready frames come out. The crate never
//! draws and never performs I/O; every computation is deterministic.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ReportEngine, ReportEngineConfig, ReportPayload};
pub use error::{ReportError, ReportResult};
