//! # Public API
//!
//! High-level entry points: settings, the audit orchestrator and its errors.

pub mod auditor;
pub mod errors;
pub mod settings;

pub use auditor::DriftAuditor;
pub use errors::AuditError;
pub use settings::{AuditSettings, SettingsError};
