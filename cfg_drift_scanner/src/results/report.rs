//! Run-level audit summary

use crate::evaluation::{CategoryKind, CategoryOutcome, Violation, ViolationPolicy};
use chrono::{DateTime, Utc};
use cfg_drift_engine::ComplianceMode;
use serde::Serialize;

/// Host the audit ran on
#[derive(Debug, Clone, Serialize)]
pub struct HostContext {
    pub hostname: String,
    pub os_info: String,
}

impl HostContext {
    pub fn from_system() -> Self {
        Self {
            hostname: hostname::get()
                .unwrap_or_else(|_| std::ffi::OsString::from("unknown"))
                .to_string_lossy()
                .to_string(),
            os_info: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

/// Run start/end in UTC
#[derive(Debug, Clone, Serialize)]
pub struct TimestampInfo {
    pub run_start: DateTime<Utc>,
    pub run_end: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Overall verdict of an audit run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// No category violated
    Compliant,
    /// At least one category violated
    NonCompliant,
    /// Nothing was evaluated
    Skipped,
}

/// One category's entry in the report
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub name: String,
    pub kind: CategoryKind,
    #[serde(flatten)]
    pub outcome: CategoryOutcome,
}

/// Counters across all categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub categories_evaluated: usize,
    pub categories_skipped: usize,
    pub categories_violated: usize,
    pub rows_passed: usize,
    pub rows_failed: usize,
    pub violations: usize,
}

/// Complete record of one audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub run_id: String,
    pub host: HostContext,
    pub timestamp: TimestampInfo,
    pub mode: ComplianceMode,
    pub violation_policy: ViolationPolicy,
    /// Snapshot directory evaluated, if one was found
    pub snapshot: Option<String>,
    /// Why nothing was evaluated, when the run was skipped outright
    pub skip_reason: Option<String>,
    pub devices: Vec<String>,
    pub categories: Vec<CategoryReport>,
    /// Categories not evaluated because an earlier one violated with fail-fast set
    pub not_evaluated: Vec<String>,
    pub report_file: Option<String>,
    pub summary: AuditSummary,
    pub status: AuditStatus,
}

impl AuditReport {
    pub fn new(mode: ComplianceMode, violation_policy: ViolationPolicy) -> Self {
        let now = Utc::now();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            host: HostContext::from_system(),
            timestamp: TimestampInfo {
                run_start: now,
                run_end: now,
                duration_ms: 0,
            },
            mode,
            violation_policy,
            snapshot: None,
            skip_reason: None,
            devices: Vec::new(),
            categories: Vec::new(),
            not_evaluated: Vec::new(),
            report_file: None,
            summary: AuditSummary::default(),
            status: AuditStatus::Skipped,
        }
    }

    pub fn add_category(&mut self, name: &str, kind: CategoryKind, outcome: CategoryOutcome) {
        self.categories.push(CategoryReport {
            name: name.to_string(),
            kind,
            outcome,
        });
    }

    /// Stamp the end time and compute counters and status
    pub fn finalize(&mut self) {
        self.timestamp.run_end = Utc::now();
        self.timestamp.duration_ms = (self.timestamp.run_end - self.timestamp.run_start)
            .num_milliseconds()
            .max(0) as u64;

        let mut summary = AuditSummary::default();
        for category in &self.categories {
            if category.outcome.is_skipped() {
                summary.categories_skipped += 1;
                continue;
            }
            summary.categories_evaluated += 1;
            let tally = category.outcome.tally();
            summary.rows_passed += tally.passed;
            summary.rows_failed += tally.failed;
            if category.outcome.is_violated() {
                summary.categories_violated += 1;
                summary.violations += category.outcome.violations().len();
            }
        }

        self.status = if summary.categories_violated > 0 {
            AuditStatus::NonCompliant
        } else if summary.categories_evaluated == 0 {
            AuditStatus::Skipped
        } else {
            AuditStatus::Compliant
        };
        self.summary = summary;
    }

    pub fn has_violations(&self) -> bool {
        self.categories
            .iter()
            .any(|category| category.outcome.is_violated())
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.categories
            .iter()
            .flat_map(|category| category.outcome.violations())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.timestamp.duration_ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{CategoryTally, ViolationKind};

    fn tally(passed: usize, failed: usize) -> CategoryTally {
        CategoryTally {
            devices_evaluated: passed + failed,
            passed,
            failed,
        }
    }

    #[test]
    fn test_finalize_counts_and_status() {
        let mut report = AuditReport::new(ComplianceMode::Strict, ViolationPolicy::AbortCategory);
        report.add_category("ntp", CategoryKind::Required, CategoryOutcome::skipped("none"));
        report.add_category(
            "aaa",
            CategoryKind::Required,
            CategoryOutcome::Completed { tally: tally(3, 0) },
        );
        report.add_category(
            "features",
            CategoryKind::Forbidden,
            CategoryOutcome::Violated {
                tally: tally(1, 1),
                violations: vec![Violation::new(
                    "leaf01",
                    "features",
                    ViolationKind::ForbiddenFound {
                        source: "leaf01.cfg".to_string(),
                        hits: Vec::new(),
                    },
                )],
            },
        );
        report.finalize();

        assert_eq!(report.status, AuditStatus::NonCompliant);
        assert_eq!(report.summary.categories_evaluated, 2);
        assert_eq!(report.summary.categories_skipped, 1);
        assert_eq!(report.summary.categories_violated, 1);
        assert_eq!(report.summary.rows_passed, 4);
        assert_eq!(report.summary.rows_failed, 1);
        assert!(report.has_violations());
        assert_eq!(report.violations().count(), 1);
    }

    #[test]
    fn test_empty_run_is_skipped() {
        let mut report = AuditReport::new(ComplianceMode::Loose, ViolationPolicy::PerDevice);
        report.finalize();
        assert_eq!(report.status, AuditStatus::Skipped);
        assert!(!report.run_id.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut report = AuditReport::new(ComplianceMode::Strict, ViolationPolicy::AbortCategory);
        report.add_category(
            "aaa",
            CategoryKind::Required,
            CategoryOutcome::Completed { tally: tally(1, 0) },
        );
        report.finalize();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["mode"], "strict");
        assert_eq!(value["violation_policy"], "abort-category");
        assert_eq!(value["status"], "compliant");
        assert_eq!(value["categories"][0]["outcome"], "completed");
        assert_eq!(value["categories"][0]["kind"], "required");
    }
}
