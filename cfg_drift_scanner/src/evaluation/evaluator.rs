//! # Compliance Evaluator
//!
//! Applies one category's policy to every device of a snapshot and emits a
//! result row per (device, category, template) check.
//!
//! ## Policies
//!
//! - **Required**: the first template (identifier order) contained in the
//!   device text passes. A miss is a violation in strict mode only; loose
//!   mode records the failed row and moves on.
//! - **Banner**: the device must carry a complete banner block in either
//!   mode. Strict mode additionally requires the normalized block to equal
//!   a template.
//! - **Forbidden**: every pattern gets a row per device; any hit is a
//!   violation. Mode has no effect.
//!
//! Rows are flushed to the sink before a violation is surfaced and when the
//! category finishes.

use super::outcome::{CategoryKind, CategoryOutcome, CategoryTally, Violation, ViolationKind};
use super::policy::ViolationPolicy;
use crate::results::{ComplianceResult, ReportError, ReportSink, Verdict};
use cfg_drift_engine::config::constants::report::{ANY_TEMPLATE, NO_TEMPLATE};
use cfg_drift_engine::logging::{self, codes};
use cfg_drift_engine::{
    extract_banner, find_forbidden, first_match, matching_banner_template, ComplianceMode,
    ConfigDocument, FragmentSet,
};
use cfg_drift_engine::{log_debug, log_error, log_info, log_success};
use std::ops::ControlFlow;

/// Errors that stop an evaluation outright
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// A category ready for evaluation
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub name: String,
    pub kind: CategoryKind,
    pub templates: FragmentSet,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, kind: CategoryKind, templates: FragmentSet) -> Self {
        Self {
            name: name.into(),
            kind,
            templates,
        }
    }

    /// Directory label used in skip messages
    fn template_location(&self) -> String {
        match self.templates.source_dir() {
            Some(dir) => format!("'{}/'", dir.display()),
            None => format!("'{}/'", self.name),
        }
    }
}

/// Rows accumulated for one category between flushes
struct RowBatch<'a, 's> {
    category: &'a str,
    mode: ComplianceMode,
    rows: Vec<ComplianceResult>,
    tally: CategoryTally,
    sink: &'s mut dyn ReportSink,
}

impl<'a, 's> RowBatch<'a, 's> {
    fn new(category: &'a str, mode: ComplianceMode, sink: &'s mut dyn ReportSink) -> Self {
        Self {
            category,
            mode,
            rows: Vec::new(),
            tally: CategoryTally::default(),
            sink,
        }
    }

    fn push(&mut self, device: &str, template: &str, verdict: Verdict, details: &str) {
        let row =
            ComplianceResult::record(device, self.category, template, verdict, self.mode, details);
        if row.is_pass() {
            self.tally.passed += 1;
        } else {
            self.tally.failed += 1;
        }
        self.rows.push(row);
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        let rows = std::mem::take(&mut self.rows);
        self.sink.append(&rows)
    }
}

/// Evaluates categories under one mode and violation policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceEvaluator {
    mode: ComplianceMode,
    policy: ViolationPolicy,
}

impl ComplianceEvaluator {
    pub fn new(mode: ComplianceMode) -> Self {
        Self {
            mode,
            policy: ViolationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> ComplianceMode {
        self.mode
    }

    pub fn policy(&self) -> ViolationPolicy {
        self.policy
    }

    /// Evaluate one category over every device
    pub fn evaluate(
        &self,
        spec: &CategorySpec,
        devices: &[ConfigDocument],
        sink: &mut dyn ReportSink,
    ) -> Result<CategoryOutcome, EvaluationError> {
        if spec.templates.is_empty() {
            let reason = format!(
                "No {} templates found in {}",
                spec.name,
                spec.template_location()
            );
            log_info!("Skipping category", "category" => &spec.name, "reason" => &reason);
            return Ok(CategoryOutcome::skipped(reason));
        }

        if devices.is_empty() {
            return Ok(CategoryOutcome::skipped("No device configurations"));
        }

        log_info!("Evaluating category",
            "category" => &spec.name,
            "kind" => spec.kind,
            "mode" => self.mode,
            "templates" => spec.templates.len(),
            "devices" => devices.len()
        );

        let mut batch = RowBatch::new(&spec.name, self.mode, sink);
        let mut violations = Vec::new();

        for document in devices {
            logging::set_device_context(document.device(), Some(&spec.name));
            batch.tally.devices_evaluated += 1;

            let violation = match spec.kind {
                CategoryKind::Required => self.check_required(document, spec, &mut batch),
                CategoryKind::Banner => self.check_banner(document, spec, &mut batch),
                CategoryKind::Forbidden => check_forbidden(document, spec, &mut batch),
            };

            let Some(violation) = violation else {
                continue;
            };

            let flow = self.on_violation(violation, &mut violations, &mut batch);
            logging::clear_device_context();
            if flow?.is_break() {
                return Ok(CategoryOutcome::Violated {
                    tally: batch.tally,
                    violations,
                });
            }
        }
        logging::clear_device_context();

        batch.flush()?;
        let tally = batch.tally;

        if violations.is_empty() {
            log_success!(codes::success::CATEGORY_PASSED, "Category evaluated",
                "category" => &spec.name,
                "passed" => tally.passed,
                "failed" => tally.failed
            );
            Ok(CategoryOutcome::Completed { tally })
        } else {
            Ok(CategoryOutcome::Violated { tally, violations })
        }
    }

    fn on_violation(
        &self,
        violation: Violation,
        violations: &mut Vec<Violation>,
        batch: &mut RowBatch<'_, '_>,
    ) -> Result<ControlFlow<()>, ReportError> {
        log_error!(violation.code(), "Compliance violation",
            "device" => &violation.device,
            "category" => &violation.category
        );
        violations.push(violation);
        batch.flush()?;

        if self.policy.stops_category() {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }

    fn check_required(
        &self,
        document: &ConfigDocument,
        spec: &CategorySpec,
        batch: &mut RowBatch<'_, '_>,
    ) -> Option<Violation> {
        let device = document.device();

        if let Some(template) = first_match(document.lines(), &spec.templates) {
            let details = match self.mode {
                ComplianceMode::Strict => "Exact match",
                ComplianceMode::Loose => "Configuration present (loose mode)",
            };
            batch.push(device, &template.identifier, Verdict::Pass, details);
            return None;
        }

        let details = format!("No {} configuration found", spec.name);
        batch.push(device, ANY_TEMPLATE, Verdict::Missing, &details);

        if !self.mode.is_strict() {
            log_debug!("Required configuration missing in loose mode", "device" => device);
            return None;
        }

        Some(Violation::new(
            device,
            &spec.name,
            ViolationKind::MissingRequired {
                templates_checked: spec.templates.len(),
            },
        ))
    }

    fn check_banner(
        &self,
        document: &ConfigDocument,
        spec: &CategorySpec,
        batch: &mut RowBatch<'_, '_>,
    ) -> Option<Violation> {
        let device = document.device();
        let extracted = extract_banner(document.lines());

        let Some(block) = extracted.as_ref().filter(|block| block.is_complete()) else {
            batch.push(device, NO_TEMPLATE, Verdict::Missing, "No complete banner found");
            return Some(Violation::new(
                device,
                &spec.name,
                ViolationKind::IncompleteBanner {
                    source: document.source_label(),
                    partial_block: extracted.is_some(),
                },
            ));
        };

        if !self.mode.is_strict() {
            batch.push(device, ANY_TEMPLATE, Verdict::Pass, "Banner present (loose mode)");
            return None;
        }

        match matching_banner_template(block, &spec.templates) {
            Some(template) => {
                batch.push(device, &template.identifier, Verdict::Pass, "Exact match");
                None
            }
            None => {
                batch.push(device, ANY_TEMPLATE, Verdict::Fail, "Banner content mismatch");
                Some(Violation::new(
                    device,
                    &spec.name,
                    ViolationKind::BannerMismatch {
                        templates_checked: spec.templates.len(),
                    },
                ))
            }
        }
    }
}

fn check_forbidden(
    document: &ConfigDocument,
    spec: &CategorySpec,
    batch: &mut RowBatch<'_, '_>,
) -> Option<Violation> {
    let device = document.device();
    let hits = find_forbidden(document.lines(), &spec.templates);

    for pattern in &spec.templates {
        match hits.iter().find(|hit| hit.identifier == pattern.identifier) {
            Some(hit) => batch.push(
                device,
                &pattern.identifier,
                Verdict::Forbidden,
                &format!("Found: {}", hit.content),
            ),
            None => batch.push(
                device,
                &pattern.identifier,
                Verdict::Pass,
                "Not found (compliant)",
            ),
        }
    }

    if hits.is_empty() {
        return None;
    }

    Some(Violation::new(
        device,
        &spec.name,
        ViolationKind::ForbiddenFound {
            source: document.source_label(),
            hits,
        },
    ))
}
