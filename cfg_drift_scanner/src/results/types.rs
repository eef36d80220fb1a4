//! # Compliance Result Types
//!
//! One [`ComplianceResult`] row is produced per (device, category, template)
//! evaluation. Rows carry the report-level status; the intent-level verdict
//! survives as a prefix of the details text.

use cfg_drift_engine::config::constants::report::ROW_TIMESTAMP_FORMAT;
use cfg_drift_engine::ComplianceMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent-level outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    /// Required configuration absent
    Missing,
    /// Forbidden configuration present
    Forbidden,
    /// Banner present but content mismatched
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Missing => "MISSING",
            Self::Forbidden => "FORBIDDEN",
            Self::Fail => "FAIL",
        }
    }

    /// Status written to reports
    pub fn report_status(&self) -> ReportStatus {
        match self {
            Self::Pass => ReportStatus::Pass,
            Self::Missing | Self::Forbidden | Self::Fail => ReportStatus::Failed,
        }
    }

    /// Verdicts whose name is preserved in the details column
    fn details_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Missing | Self::Forbidden => Some(self.as_str()),
            Self::Pass | Self::Fail => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAILED")]
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Local time, second precision
    pub timestamp: String,
    pub device: String,
    pub category: String,
    /// Template identifier, `N/A` or `any template`
    pub template: String,
    pub status: ReportStatus,
    pub verdict: Verdict,
    pub mode: ComplianceMode,
    pub details: String,
}

impl ComplianceResult {
    /// Record a verdict stamped with the current local time
    pub fn record(
        device: &str,
        category: &str,
        template: &str,
        verdict: Verdict,
        mode: ComplianceMode,
        details: &str,
    ) -> Self {
        let timestamp = chrono::Local::now()
            .format(ROW_TIMESTAMP_FORMAT)
            .to_string();
        Self::with_timestamp(timestamp, device, category, template, verdict, mode, details)
    }

    /// Record a verdict with an explicit timestamp
    pub fn with_timestamp(
        timestamp: impl Into<String>,
        device: &str,
        category: &str,
        template: &str,
        verdict: Verdict,
        mode: ComplianceMode,
        details: &str,
    ) -> Self {
        let details = match verdict.details_prefix() {
            Some(prefix) if !details.starts_with(prefix) => {
                if details.is_empty() {
                    prefix.to_string()
                } else {
                    format!("{prefix}: {details}")
                }
            }
            _ => details.to_string(),
        };

        Self {
            timestamp: timestamp.into(),
            device: device.to_string(),
            category: category.to_string(),
            template: template.to_string(),
            status: verdict.report_status(),
            verdict,
            mode,
            details,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == ReportStatus::Pass
    }

    /// Columns in report order
    pub fn to_row(&self) -> [&str; 7] {
        [
            self.timestamp.as_str(),
            self.device.as_str(),
            self.category.as_str(),
            self.template.as_str(),
            self.status.as_str(),
            self.mode.as_str(),
            self.details.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(verdict: Verdict, details: &str) -> ComplianceResult {
        ComplianceResult::with_timestamp(
            "2025-09-25T12:00:00",
            "spine01",
            "aaa",
            "any template",
            verdict,
            ComplianceMode::Strict,
            details,
        )
    }

    #[test]
    fn test_missing_and_forbidden_map_to_failed() {
        let missing = row(Verdict::Missing, "No aaa configuration found");
        assert_eq!(missing.status, ReportStatus::Failed);
        assert_eq!(missing.details, "MISSING: No aaa configuration found");

        let forbidden = row(Verdict::Forbidden, "Found: feature bash");
        assert_eq!(forbidden.details, "FORBIDDEN: Found: feature bash");
    }

    #[test]
    fn test_prefix_not_duplicated() {
        let missing = row(Verdict::Missing, "MISSING: already tagged");
        assert_eq!(missing.details, "MISSING: already tagged");

        let empty = row(Verdict::Forbidden, "");
        assert_eq!(empty.details, "FORBIDDEN");
    }

    #[test]
    fn test_pass_and_fail_keep_details() {
        let pass = row(Verdict::Pass, "Exact match");
        assert!(pass.is_pass());
        assert_eq!(pass.details, "Exact match");

        let fail = row(Verdict::Fail, "Banner content mismatch");
        assert_eq!(fail.status, ReportStatus::Failed);
        assert_eq!(fail.details, "Banner content mismatch");
    }

    #[test]
    fn test_row_layout() {
        let pass = row(Verdict::Pass, "Exact match");
        assert_eq!(
            pass.to_row(),
            [
                "2025-09-25T12:00:00",
                "spine01",
                "aaa",
                "any template",
                "PASS",
                "strict",
                "Exact match"
            ]
        );
    }

    #[test]
    fn test_record_uses_second_precision_timestamp() {
        let result = ComplianceResult::record(
            "leaf01",
            "ntp",
            "ntp.cfg",
            Verdict::Pass,
            ComplianceMode::Loose,
            "Configuration present (loose mode)",
        );
        assert_eq!(result.timestamp.len(), "2025-09-25T12:00:00".len());
        assert!(chrono::NaiveDateTime::parse_from_str(&result.timestamp, ROW_TIMESTAMP_FORMAT).is_ok());
    }
}
