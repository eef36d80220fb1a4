use cfg_drift_engine::ComplianceMode;
use cfg_drift_scanner::{AuditSettings, ViolationPolicy};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cfg-drift",
    version,
    about = "Network configuration compliance audit and snapshot drift comparison"
)]
pub struct Cli {
    /// Engine log level; overrides CFG_DRIFT_LOG_LEVEL
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LevelChoice>,

    /// Emit engine events as JSON lines on stderr
    #[arg(long, global = true)]
    pub structured_logs: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Audit the latest (or a chosen) snapshot against golden and forbidden fragments
    Audit(AuditArgs),

    /// Show device additions, removals and diffs between two snapshots
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// TOML settings file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Banner validation mode (default: strict)
    #[arg(long, value_enum)]
    pub drift_mode: Option<DriftMode>,

    /// Base snapshots directory (default: snapshots)
    #[arg(long)]
    pub snap_directory: Option<PathBuf>,

    /// Snapshot directory name to audit (default: most recent)
    #[arg(long)]
    pub snap_timestamp: Option<String>,

    /// Approved banner fragments (default: fragments/banners)
    #[arg(long)]
    pub fragments_dir: Option<PathBuf>,

    /// Required configuration templates, one subdirectory per category
    #[arg(long)]
    pub expected_dir: Option<PathBuf>,

    /// Forbidden configuration patterns, one subdirectory per category
    #[arg(long)]
    pub forbidden_dir: Option<PathBuf>,

    /// Write a CSV compliance report to the results directory
    #[arg(long)]
    pub csv_output: bool,

    /// Print CSV rows to the terminal (requires --csv-output)
    #[arg(long)]
    pub print_csv: bool,

    /// Directory for CSV reports (default: results)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Evaluate every device of a category instead of stopping at the first violation
    #[arg(long)]
    pub isolate_devices: bool,

    /// Stop the run after the first violated category
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the audit report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AuditArgs {
    /// Layer flags over file or default settings
    pub fn apply(&self, mut settings: AuditSettings) -> AuditSettings {
        if let Some(mode) = self.drift_mode {
            settings.mode = mode.into();
        }
        if let Some(dir) = &self.snap_directory {
            settings.snapshots_dir = dir.clone();
        }
        if let Some(ts) = &self.snap_timestamp {
            settings.snapshot_timestamp = Some(ts.clone());
        }
        if let Some(dir) = &self.fragments_dir {
            settings.fragments_dir = dir.clone();
        }
        if let Some(dir) = &self.expected_dir {
            settings.expected_dir = dir.clone();
        }
        if let Some(dir) = &self.forbidden_dir {
            settings.forbidden_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            settings.results_dir = dir.clone();
        }
        if self.isolate_devices {
            settings.violation_policy = ViolationPolicy::PerDevice;
        }
        settings.csv_output |= self.csv_output;
        settings.print_csv |= self.print_csv;
        settings.fail_fast |= self.fail_fast;
        settings
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Base snapshots directory
    #[arg(long, default_value = "snapshots")]
    pub snapshots_dir: PathBuf,

    /// First (older) snapshot timestamp
    #[arg(long)]
    pub snapshot_a: String,

    /// Second (newer) snapshot timestamp (default: latest)
    #[arg(long)]
    pub snapshot_b: Option<String>,

    /// Only compare this device
    #[arg(long)]
    pub device_filter: Option<String>,

    /// Use colordiff for colored output (falls back to diff if not installed)
    #[arg(long)]
    pub color: bool,

    /// Print the comparison as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum DriftMode {
    Strict,
    Loose,
}

impl From<DriftMode> for ComplianceMode {
    fn from(mode: DriftMode) -> Self {
        match mode {
            DriftMode::Strict => ComplianceMode::Strict,
            DriftMode::Loose => ComplianceMode::Loose,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LevelChoice {
    Error,
    Warning,
    Info,
    Debug,
}
