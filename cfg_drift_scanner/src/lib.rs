// Internal modules
pub mod api;
pub mod discovery;
pub mod drift;
pub mod evaluation;
pub mod results;

// Re-export key types for library consumers
pub use api::{AuditError, AuditSettings, DriftAuditor, SettingsError};
pub use drift::{DriftComparator, DriftError, DriftReport, DriftRequest, ExternalDiff, LineDiffer};
pub use evaluation::{
    CategoryKind, CategoryOutcome, CategorySpec, ComplianceEvaluator, Violation, ViolationPolicy,
};
pub use results::{AuditReport, ComplianceResult, CsvReportSink, MemorySink, ReportSink};
