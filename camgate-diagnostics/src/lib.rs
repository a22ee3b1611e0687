//! # Camgate Diagnostics
//!
//! Logging setup and outcome reporting for camgate.
//! Provides the tracing subscriber bootstrap and serialisable outcome
//! reports that flag unclassifiable results as defects.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod debug_logger;
pub mod outcome_report;

// Re-export main types
pub use debug_logger::{DebugLogger, DiagnosticsError, DEFAULT_FILTER};
pub use outcome_report::OutcomeReport;
