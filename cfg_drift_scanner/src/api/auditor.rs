//! # Drift Auditor
//!
//! Runs a complete compliance audit: selects the snapshot, loads device
//! configurations once, builds the category plan from the template
//! directories and evaluates every category in order.

use super::errors::AuditError;
use super::settings::AuditSettings;
use crate::discovery::{discover_categories, find_latest_snapshot_dir, load_device_documents};
use crate::evaluation::{CategoryKind, CategorySpec, ComplianceEvaluator};
use crate::results::{AuditReport, CsvReportSink, MemorySink, ReportSink};
use cfg_drift_engine::config::constants::fragments::BANNER_CATEGORY;
use cfg_drift_engine::logging::codes;
use cfg_drift_engine::{load_fragment_dir, load_fragments, FragmentSet};
use cfg_drift_engine::{log_info, log_success};

/// Orchestrates one audit run
#[derive(Debug, Clone)]
pub struct DriftAuditor {
    settings: AuditSettings,
}

impl DriftAuditor {
    pub fn new(settings: AuditSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AuditSettings {
        &self.settings
    }

    /// Run with the sink the settings ask for: a CSV report or in-memory rows
    pub fn run(&self) -> Result<AuditReport, AuditError> {
        if self.settings.csv_output {
            let mut sink = CsvReportSink::new(&self.settings.results_dir)
                .with_echo(self.settings.echoes_csv());
            self.run_with_sink(&mut sink)
        } else {
            let mut sink = MemorySink::new();
            self.run_with_sink(&mut sink)
        }
    }

    /// Run, flushing rows to `sink`
    pub fn run_with_sink(&self, sink: &mut dyn ReportSink) -> Result<AuditReport, AuditError> {
        let settings = &self.settings;
        let mut report = AuditReport::new(settings.mode, settings.violation_policy);

        let snapshot = find_latest_snapshot_dir(
            &settings.snapshots_dir,
            settings.snapshot_timestamp.as_deref(),
        )?;
        let Some(snapshot) = snapshot else {
            report.skip_reason = Some(format!(
                "No snapshot directory found in '{}'",
                settings.snapshots_dir.display()
            ));
            report.finalize();
            return Ok(report);
        };
        report.snapshot = Some(snapshot.display().to_string());

        let documents = load_device_documents(&snapshot)?;
        if documents.is_empty() {
            report.skip_reason = Some(format!("No .cfg files in '{}'", snapshot.display()));
            report.finalize();
            return Ok(report);
        }
        report.devices = documents
            .iter()
            .map(|doc| doc.device().to_string())
            .collect();

        let plan = self.category_plan()?;
        log_info!("Audit plan ready",
            "snapshot" => snapshot.display(),
            "devices" => documents.len(),
            "categories" => plan.len(),
            "mode" => settings.mode
        );

        let evaluator =
            ComplianceEvaluator::new(settings.mode).with_policy(settings.violation_policy);

        for (index, spec) in plan.iter().enumerate() {
            let outcome = evaluator.evaluate(spec, &documents, sink)?;
            let violated = outcome.is_violated();
            report.add_category(&spec.name, spec.kind, outcome);

            if violated && settings.fail_fast {
                report.not_evaluated = plan[index + 1..]
                    .iter()
                    .map(|remaining| remaining.name.clone())
                    .collect();
                break;
            }
        }

        report.report_file = sink.location().map(|path| path.display().to_string());
        report.finalize();

        log_success!(codes::success::AUDIT_COMPLETE, "Audit complete",
            "run_id" => &report.run_id,
            "violated" => report.summary.categories_violated,
            "duration_ms" => report.timestamp.duration_ms
        );

        Ok(report)
    }

    /// Categories to evaluate: required (expected directory) first, then forbidden
    pub fn category_plan(&self) -> Result<Vec<CategorySpec>, AuditError> {
        let settings = &self.settings;
        let mut plan = Vec::new();

        let mut required = discover_categories(&settings.expected_dir)?;
        if !required.iter().any(|name| name == BANNER_CATEGORY) && settings.fragments_dir.is_dir()
        {
            required.push(BANNER_CATEGORY.to_string());
            required.sort();
        }

        for name in required {
            if name == BANNER_CATEGORY {
                let templates = self.banner_templates()?;
                plan.push(CategorySpec::new(name, CategoryKind::Banner, templates));
            } else {
                let templates = load_fragments(&settings.expected_dir, &name)?;
                plan.push(CategorySpec::new(name, CategoryKind::Required, templates));
            }
        }

        for name in discover_categories(&settings.forbidden_dir)? {
            let templates = load_fragments(&settings.forbidden_dir, &name)?;
            plan.push(CategorySpec::new(name, CategoryKind::Forbidden, templates));
        }

        Ok(plan)
    }

    /// Banner templates from the expected directory, else the fragments directory
    fn banner_templates(&self) -> Result<FragmentSet, AuditError> {
        let templates = load_fragments(&self.settings.expected_dir, BANNER_CATEGORY)?;
        if !templates.is_empty() {
            return Ok(templates);
        }
        Ok(load_fragment_dir(&self.settings.fragments_dir, BANNER_CATEGORY)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::ViolationPolicy;
    use crate::results::AuditStatus;
    use cfg_drift_engine::ComplianceMode;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Lab layout: one snapshot, aaa + banners required, features forbidden
    fn lab(root: &Path) -> AuditSettings {
        let snap = root.join("snapshots/2025-09-25T12:00:00Z");
        write(
            &snap.join("spine01.cfg"),
            "hostname spine01\naaa new-model\nbanner motd ^C\nAuthorized access only\n^C\n",
        );
        write(
            &snap.join("leaf01.cfg"),
            "hostname leaf01\nfeature bash\nbanner motd ^C\nAuthorized access only\n^C\n",
        );

        let expected = root.join("golden/expected");
        write(&expected.join("aaa/aaa.cfg"), "aaa new-model\n");
        write(
            &expected.join("banners/motd.cfg"),
            "! Generated 2025-09-01 UTC\nbanner motd ^C\nAuthorized access only\n^C\n",
        );
        let forbidden = root.join("golden/forbidden");
        write(&forbidden.join("features/bash.cfg"), "feature bash\n");

        AuditSettings::new()
            .with_snapshots_dir(root.join("snapshots"))
            .with_expected_dir(expected)
            .with_forbidden_dir(forbidden)
            .with_fragments_dir(root.join("fragments/banners"))
            .with_results_dir(root.join("results"))
    }

    #[test]
    fn test_category_plan_order_and_kinds() {
        let temp_dir = tempdir().unwrap();
        let auditor = DriftAuditor::new(lab(temp_dir.path()));

        let plan: Vec<(String, CategoryKind)> = auditor
            .category_plan()
            .unwrap()
            .into_iter()
            .map(|spec| (spec.name, spec.kind))
            .collect();

        assert_eq!(
            plan,
            vec![
                ("aaa".to_string(), CategoryKind::Required),
                ("banners".to_string(), CategoryKind::Banner),
                ("features".to_string(), CategoryKind::Forbidden),
            ]
        );
    }

    #[test]
    fn test_strict_run_reports_violations() {
        let temp_dir = tempdir().unwrap();
        let auditor = DriftAuditor::new(lab(temp_dir.path()));
        let mut sink = MemorySink::new();

        let report = auditor.run_with_sink(&mut sink).unwrap();

        assert_eq!(report.devices, vec!["leaf01", "spine01"]);
        assert_eq!(report.status, AuditStatus::NonCompliant);
        let violated: Vec<&str> = report
            .violations()
            .map(|violation| violation.category.as_str())
            .collect();
        assert_eq!(violated, vec!["aaa", "features"]);
        // banners passed for both devices
        assert_eq!(report.categories[1].outcome.tally().passed, 2);
    }

    #[test]
    fn test_fail_fast_stops_after_first_violation() {
        let temp_dir = tempdir().unwrap();
        let settings = lab(temp_dir.path()).with_fail_fast(true);
        let mut sink = MemorySink::new();

        let report = DriftAuditor::new(settings).run_with_sink(&mut sink).unwrap();

        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.not_evaluated, vec!["banners", "features"]);
    }

    #[test]
    fn test_loose_mode_only_fails_forbidden() {
        let temp_dir = tempdir().unwrap();
        let settings = lab(temp_dir.path())
            .with_mode(ComplianceMode::Loose)
            .with_violation_policy(ViolationPolicy::PerDevice);
        let mut sink = MemorySink::new();

        let report = DriftAuditor::new(settings).run_with_sink(&mut sink).unwrap();

        assert_eq!(report.summary.categories_violated, 1);
        assert_eq!(report.categories[0].outcome.tally().failed, 1);
        assert!(sink
            .rows()
            .iter()
            .any(|row| row.details == "MISSING: No aaa configuration found"));
    }

    #[test]
    fn test_missing_snapshot_skips_run() {
        let temp_dir = tempdir().unwrap();
        let settings = AuditSettings::new().with_snapshots_dir(temp_dir.path().join("nothing"));

        let report = DriftAuditor::new(settings).run().unwrap();

        assert_eq!(report.status, AuditStatus::Skipped);
        assert!(report.skip_reason.unwrap().starts_with("No snapshot directory found"));
    }

    #[test]
    fn test_csv_report_written_to_results_dir() {
        let temp_dir = tempdir().unwrap();
        let settings = lab(temp_dir.path()).with_csv_output(true);

        let report = DriftAuditor::new(settings).run().unwrap();

        let path = report.report_file.expect("csv report path");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Timestamp,Device,Category,Template_Used,Status,Mode,Details"));
        assert!(content.contains("spine01,banners,motd.cfg,PASS,strict,Exact match"));
        assert!(content.contains("leaf01,aaa,any template,FAILED,strict,MISSING: No aaa configuration found"));
    }

    #[test]
    fn test_banner_templates_fall_back_to_fragments_dir() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        let settings = lab(root);
        fs::remove_dir_all(root.join("golden/expected/banners")).unwrap();
        write(
            &root.join("fragments/banners/motd.cfg"),
            "banner motd ^C\nAuthorized access only\n^C\n",
        );

        let plan = DriftAuditor::new(settings).category_plan().unwrap();
        let banners = plan.iter().find(|spec| spec.kind == CategoryKind::Banner).unwrap();
        assert_eq!(banners.templates.len(), 1);
    }
}
