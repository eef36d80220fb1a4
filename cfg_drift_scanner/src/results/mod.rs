//! # Results Module
//!
//! Result rows, report sinks and the run-level audit report.
//!
//! ## Core Types
//! - [`ComplianceResult`] - One report row per (device, category, template)
//! - [`ReportSink`] - Append-only row destination ([`CsvReportSink`], [`MemorySink`])
//! - [`AuditReport`] - Summary of a whole run, serialisable to JSON

pub mod report;
pub mod sink;
pub mod types;

pub use report::{AuditReport, AuditStatus, AuditSummary, CategoryReport, HostContext};
pub use sink::{CsvReportSink, MemorySink, ReportError, ReportSink};
pub use types::{ComplianceResult, ReportStatus, Verdict};
