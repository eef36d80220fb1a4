//! # cfg-drift CLI

mod cli;

use cfg_drift_engine::config::LoggingPreferences;
use cfg_drift_engine::logging::{self, codes, FacadeLogger, LogLevel, LoggingService, StructuredLogger};
use cfg_drift_engine::{log_error, log_info};
use cfg_drift_scanner::drift::ExternalDiff;
use cfg_drift_scanner::results::{AuditStatus, CategoryReport};
use cfg_drift_scanner::{
    AuditReport, AuditSettings, CategoryOutcome, DriftAuditor, DriftComparator, DriftRequest,
};
use clap::Parser;
use cli::{AuditArgs, Cli, Command, CompareArgs, LevelChoice};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Warning: {}", e);
    }

    match &cli.cmd {
        Command::Audit(args) => run_audit(args),
        Command::Compare(args) => run_compare(args),
    }
}

/// Pin preferences, install env_logger, then route engine events through it
fn init_logging(cli: &Cli) -> Result<(), String> {
    let mut preferences = LoggingPreferences::default();
    if let Some(level) = cli.log_level {
        preferences.min_log_level = level.into();
    }
    if cli.structured_logs {
        preferences.use_structured_logging = true;
    }
    let level = if preferences.enable_console_logging {
        preferences.min_log_level
    } else {
        LogLevel::Error
    };
    let structured = preferences.use_structured_logging;
    logging::config::init_runtime_preferences(preferences)?;

    env_logger::Builder::new()
        .filter_level(facade_filter(level))
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .map_err(|e| e.to_string())?;

    let service = if structured {
        LoggingService::new(Arc::new(StructuredLogger::new(level)), level)
    } else {
        LoggingService::new(Arc::new(FacadeLogger), level)
    };
    logging::init_global_logging_with_service(Arc::new(service))
}

fn facade_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    }
}

impl From<LevelChoice> for LogLevel {
    fn from(choice: LevelChoice) -> Self {
        match choice {
            LevelChoice::Error => LogLevel::Error,
            LevelChoice::Warning => LogLevel::Warning,
            LevelChoice::Info => LogLevel::Info,
            LevelChoice::Debug => LogLevel::Debug,
        }
    }
}

fn run_audit(args: &AuditArgs) -> ExitCode {
    let base = match &args.config {
        Some(path) => match AuditSettings::from_toml_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
        None => AuditSettings::default(),
    };
    let settings = args.apply(base);
    if settings.print_csv && !settings.csv_output {
        eprintln!("Note: --print-csv has no effect without --csv-output");
    }

    log_info!(
        "cfg-drift audit starting",
        "mode" => settings.mode,
        "policy" => settings.violation_policy
    );

    let auditor = DriftAuditor::new(settings);
    let report = match auditor.run() {
        Ok(report) => report,
        Err(e) => {
            log_error!(codes::system::INTERNAL_ERROR, "Audit aborted", "error" => &e);
            eprintln!("Error: {}", e.user_message());
            return ExitCode::from(2);
        }
    };

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: could not serialize report: {}", e);
                return ExitCode::from(2);
            }
        }
    } else {
        print_audit_summary(&report);
    }

    if report.has_violations() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_audit_summary(report: &AuditReport) {
    println!("\n=== Audit Results ===");
    if let Some(reason) = &report.skip_reason {
        println!("Skipping compliance test: {}", reason);
        return;
    }
    if let Some(snapshot) = &report.snapshot {
        println!("Snapshot: {}", snapshot);
    }
    println!("Mode: {}", report.mode);
    println!("Devices: {}", report.devices.len());

    for category in &report.categories {
        println!("{}", category_line(category));
        for violation in category.outcome.violations() {
            println!("      {}", violation);
        }
    }
    if !report.not_evaluated.is_empty() {
        println!("Not evaluated: {}", report.not_evaluated.join(", "));
    }

    let status = match report.status {
        AuditStatus::Compliant => "COMPLIANT",
        AuditStatus::NonCompliant => "NON-COMPLIANT",
        AuditStatus::Skipped => "SKIPPED",
    };
    println!("Status: {}", status);
    println!("Passed: {}", report.summary.rows_passed);
    println!("Failed: {}", report.summary.rows_failed);
    println!("Violations: {}", report.summary.violations);
    println!("Duration: {:.2}s", report.duration_seconds());

    if let Some(file) = &report.report_file {
        println!("\n[OK] Results saved to: {}", file);
    }
}

/// One summary line per category; counts are devices and result rows
fn category_line(category: &CategoryReport) -> String {
    match &category.outcome {
        CategoryOutcome::Skipped { reason } => {
            format!("  [SKIP] {:<12} {}", category.name, reason)
        }
        CategoryOutcome::Completed { tally } => format!(
            "  [OK]   {:<12} {} devices, {} rows passed",
            category.name, tally.devices_evaluated, tally.passed
        ),
        CategoryOutcome::Violated { tally, .. } => format!(
            "  [FAIL] {:<12} {} devices, {} rows passed, {} rows failed",
            category.name, tally.devices_evaluated, tally.passed, tally.failed
        ),
    }
}

fn run_compare(args: &CompareArgs) -> ExitCode {
    let mut request = DriftRequest::new(&args.snapshots_dir, args.snapshot_a.as_str());
    if let Some(b) = &args.snapshot_b {
        request = request.with_snapshot_b(b.as_str());
    }
    if let Some(device) = &args.device_filter {
        request = request.with_device_filter(device.as_str());
    }

    let comparator = DriftComparator::new(ExternalDiff::new(args.color));
    let report = match comparator.compare(&request) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: could not serialize comparison: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", report);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfg_drift_scanner::evaluation::CategoryTally;
    use cfg_drift_scanner::CategoryKind;

    fn forbidden_report(outcome: CategoryOutcome) -> CategoryReport {
        CategoryReport {
            name: "features".to_string(),
            kind: CategoryKind::Forbidden,
            outcome,
        }
    }

    #[test]
    fn test_category_line_separates_devices_from_rows() {
        // Two devices checked against two forbidden patterns each
        let tally = CategoryTally {
            devices_evaluated: 2,
            passed: 4,
            failed: 0,
        };
        let line = category_line(&forbidden_report(CategoryOutcome::Completed { tally }));

        assert!(line.starts_with("  [OK]"));
        assert!(line.contains("2 devices, 4 rows passed"));
        assert!(!line.contains("4/2"));
    }

    #[test]
    fn test_category_line_for_violation_and_skip() {
        let tally = CategoryTally {
            devices_evaluated: 2,
            passed: 3,
            failed: 1,
        };
        let violated = category_line(&forbidden_report(CategoryOutcome::Violated {
            tally,
            violations: Vec::new(),
        }));
        assert!(violated.starts_with("  [FAIL]"));
        assert!(violated.contains("3 rows passed, 1 rows failed"));

        let skipped = category_line(&forbidden_report(CategoryOutcome::skipped("no templates")));
        assert!(skipped.starts_with("  [SKIP]"));
        assert!(skipped.is_ascii());
    }
}
