//! # Audit Settings
//!
//! Immutable run configuration, built once at start-up from defaults, an
//! optional TOML file and command-line overrides, then passed by reference
//! to everything that needs it.

use crate::evaluation::ViolationPolicy;
use cfg_drift_engine::ComplianceMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings loading errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for one audit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditSettings {
    /// Root holding timestamped snapshot directories
    pub snapshots_dir: PathBuf,

    /// Snapshot directory name to audit; latest when unset
    pub snapshot_timestamp: Option<String>,

    /// Banner templates used when the expected directory has none
    pub fragments_dir: PathBuf,

    /// One subdirectory of required templates per category
    pub expected_dir: PathBuf,

    /// One subdirectory of forbidden patterns per category
    pub forbidden_dir: PathBuf,

    pub mode: ComplianceMode,

    /// Write the CSV report
    pub csv_output: bool,

    /// Echo CSV rows to stdout (only with `csv_output`)
    pub print_csv: bool,

    pub results_dir: PathBuf,

    pub violation_policy: ViolationPolicy,

    /// Stop the run after the first violated category
    pub fail_fast: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            snapshots_dir: PathBuf::from("snapshots"),
            snapshot_timestamp: None,
            fragments_dir: PathBuf::from("fragments/banners"),
            expected_dir: PathBuf::from("supreme_golden_cfg/expected_Q1/fragments"),
            forbidden_dir: PathBuf::from("supreme_golden_cfg/forbidden_Q1/fragments"),
            mode: ComplianceMode::Strict,
            csv_output: false,
            print_csv: false,
            results_dir: PathBuf::from("results"),
            violation_policy: ViolationPolicy::AbortCategory,
            fail_fast: false,
        }
    }
}

impl AuditSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file; absent keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn with_snapshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshots_dir = dir.into();
        self
    }

    pub fn with_snapshot_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.snapshot_timestamp = Some(timestamp.into());
        self
    }

    pub fn with_fragments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fragments_dir = dir.into();
        self
    }

    pub fn with_expected_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.expected_dir = dir.into();
        self
    }

    pub fn with_forbidden_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.forbidden_dir = dir.into();
        self
    }

    pub fn with_mode(mut self, mode: ComplianceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_csv_output(mut self, enabled: bool) -> Self {
        self.csv_output = enabled;
        self
    }

    pub fn with_print_csv(mut self, enabled: bool) -> Self {
        self.print_csv = enabled;
        self
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn with_violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.violation_policy = policy;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether rows are echoed to stdout
    pub fn echoes_csv(&self) -> bool {
        self.csv_output && self.print_csv
    }
}
