//! # Drift Comparator
//!
//! Compares two snapshot directories: device-set deltas plus a unified
//! diff per device present in both. Diff tool failures are recorded per
//! device and never stop the comparison.

use super::differ::{DiffOutcome, LineDiffer};
use crate::discovery::{collect_device_configs, find_snapshot_directories, DiscoveryError};
use cfg_drift_engine::logging::codes;
use cfg_drift_engine::{log_error, log_info, log_success, log_warning};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Drift comparison errors
#[derive(Debug, thiserror::Error)]
pub enum DriftError {
    #[error("No snapshots found in {root}")]
    NoSnapshots { root: String },

    #[error("Snapshot '{name}' not found.\nAvailable: {}", .available.join(", "))]
    UnknownSnapshot {
        name: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

impl DriftError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownSnapshot { .. })
    }
}

/// What to compare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftRequest {
    pub snapshots_root: PathBuf,
    /// Older snapshot name
    pub snapshot_a: String,
    /// Newer snapshot name; latest when absent
    pub snapshot_b: Option<String>,
    /// Only diff this device
    pub device_filter: Option<String>,
}

impl DriftRequest {
    pub fn new(snapshots_root: impl Into<PathBuf>, snapshot_a: impl Into<String>) -> Self {
        Self {
            snapshots_root: snapshots_root.into(),
            snapshot_a: snapshot_a.into(),
            snapshot_b: None,
            device_filter: None,
        }
    }

    pub fn with_snapshot_b(mut self, snapshot_b: impl Into<String>) -> Self {
        self.snapshot_b = Some(snapshot_b.into());
        self
    }

    pub fn with_device_filter(mut self, device: impl Into<String>) -> Self {
        self.device_filter = Some(device.into());
        self
    }
}

/// Per-device comparison result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceDrift {
    Unchanged,
    Changed { diff: String },
    /// Tool exited with a status above 1
    ToolFailed { stderr: String },
    /// Tool could not be run
    ToolError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceComparison {
    pub device: String,
    #[serde(flatten)]
    pub drift: DeviceDrift,
}

/// Outcome of comparing two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub snapshot_a: String,
    pub snapshot_b: String,
    /// Devices only in B
    pub new_devices: Vec<String>,
    /// Devices only in A
    pub removed_devices: Vec<String>,
    /// Common devices that were compared, in name order
    pub devices: Vec<DeviceComparison>,
}

impl DriftReport {
    pub fn changed_devices(&self) -> impl Iterator<Item = &str> {
        self.devices
            .iter()
            .filter(|entry| matches!(entry.drift, DeviceDrift::Changed { .. }))
            .map(|entry| entry.device.as_str())
    }

    pub fn has_drift(&self) -> bool {
        !self.new_devices.is_empty()
            || !self.removed_devices.is_empty()
            || self.changed_devices().next().is_some()
    }

    pub fn tool_failures(&self) -> usize {
        self.devices
            .iter()
            .filter(|entry| {
                matches!(
                    entry.drift,
                    DeviceDrift::ToolFailed { .. } | DeviceDrift::ToolError { .. }
                )
            })
            .count()
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Comparing {} -> {}", self.snapshot_a, self.snapshot_b)?;
        if !self.new_devices.is_empty() {
            writeln!(f, "# NEW: {}", self.new_devices.join(", "))?;
        }
        if !self.removed_devices.is_empty() {
            writeln!(f, "# REMOVED: {}", self.removed_devices.join(", "))?;
        }

        for entry in &self.devices {
            match &entry.drift {
                DeviceDrift::Unchanged => {}
                DeviceDrift::Changed { diff } => {
                    writeln!(f, "\n## {}", entry.device)?;
                    writeln!(f, "{diff}")?;
                }
                DeviceDrift::ToolFailed { stderr } => {
                    writeln!(f, "Error comparing {}: {stderr}", entry.device)?;
                }
                DeviceDrift::ToolError { message } => {
                    writeln!(f, "Error running diff for {}: {message}", entry.device)?;
                }
            }
        }
        Ok(())
    }
}

/// Compares snapshots using a [`LineDiffer`]
pub struct DriftComparator<D: LineDiffer> {
    differ: D,
}

impl<D: LineDiffer> DriftComparator<D> {
    pub fn new(differ: D) -> Self {
        Self { differ }
    }

    pub fn differ(&self) -> &D {
        &self.differ
    }

    /// Validate snapshot names and compare them
    pub fn compare(&self, request: &DriftRequest) -> Result<DriftReport, DriftError> {
        let root = &request.snapshots_root;
        let available = find_snapshot_directories(root)?;

        let Some(latest) = available.last() else {
            log_error!(codes::discovery::SNAPSHOT_NOT_FOUND, "No snapshots found",
                "root" => root.display()
            );
            return Err(DriftError::NoSnapshots {
                root: root.display().to_string(),
            });
        };

        let snapshot_b = request.snapshot_b.clone().unwrap_or_else(|| latest.clone());
        for name in [&request.snapshot_a, &snapshot_b] {
            if !available.contains(name) {
                log_error!(codes::drift::SNAPSHOT_UNKNOWN, "Unknown snapshot", "name" => name);
                return Err(DriftError::UnknownSnapshot {
                    name: name.clone(),
                    available: available.clone(),
                });
            }
        }

        self.compare_dirs(
            &request.snapshot_a,
            &root.join(&request.snapshot_a),
            &snapshot_b,
            &root.join(&snapshot_b),
            request.device_filter.as_deref(),
        )
    }

    /// Compare two snapshot directories without name validation
    pub fn compare_dirs(
        &self,
        name_a: &str,
        dir_a: &Path,
        name_b: &str,
        dir_b: &Path,
        device_filter: Option<&str>,
    ) -> Result<DriftReport, DriftError> {
        log_info!("Comparing snapshots",
            "from" => name_a,
            "to" => name_b,
            "tool" => self.differ.name()
        );

        let old: BTreeMap<String, PathBuf> = collect_device_configs(dir_a)?
            .into_iter()
            .map(|config| (config.device, config.path))
            .collect();
        let new: BTreeMap<String, PathBuf> = collect_device_configs(dir_b)?
            .into_iter()
            .map(|config| (config.device, config.path))
            .collect();

        let new_devices = new
            .keys()
            .filter(|device| !old.contains_key(*device))
            .cloned()
            .collect();
        let removed_devices = old
            .keys()
            .filter(|device| !new.contains_key(*device))
            .cloned()
            .collect();

        let mut devices = Vec::new();
        for (device, old_path) in &old {
            let Some(new_path) = new.get(device) else {
                continue;
            };
            if device_filter.is_some_and(|wanted| wanted != device.as_str()) {
                continue;
            }

            let drift = match self.differ.diff(old_path, new_path) {
                Ok(DiffOutcome::Identical) => DeviceDrift::Unchanged,
                Ok(DiffOutcome::Differs(diff)) => DeviceDrift::Changed { diff },
                Ok(DiffOutcome::Failed { stderr }) => {
                    log_warning!(code = codes::drift::DIFF_TOOL_FAILED, "Diff tool reported an error",
                        "device" => device
                    );
                    DeviceDrift::ToolFailed { stderr }
                }
                Err(e) => {
                    log_warning!(code = codes::drift::DIFF_TOOL_FAILED, "Diff tool could not run",
                        "device" => device,
                        "error" => &e
                    );
                    DeviceDrift::ToolError {
                        message: e.to_string(),
                    }
                }
            };

            devices.push(DeviceComparison {
                device: device.clone(),
                drift,
            });
        }

        let report = DriftReport {
            snapshot_a: name_a.to_string(),
            snapshot_b: name_b.to_string(),
            new_devices,
            removed_devices,
            devices,
        };

        log_success!(codes::success::DRIFT_COMPARISON_COMPLETE, "Snapshot comparison complete",
            "compared" => report.devices.len(),
            "changed" => report.changed_devices().count()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::command::CommandError;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Compares file contents in memory
    struct ContentDiffer;

    impl LineDiffer for ContentDiffer {
        fn diff(&self, old: &Path, new: &Path) -> Result<DiffOutcome, CommandError> {
            let read = |path: &Path| {
                fs::read_to_string(path).map_err(|e| CommandError::ExecutionFailed {
                    program: "memory".to_string(),
                    reason: e.to_string(),
                })
            };
            let (a, b) = (read(old)?, read(new)?);
            if a == b {
                Ok(DiffOutcome::Identical)
            } else {
                Ok(DiffOutcome::Differs(format!("-{}\n+{}", a.trim(), b.trim())))
            }
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct BrokenDiffer;

    impl LineDiffer for BrokenDiffer {
        fn diff(&self, _old: &Path, _new: &Path) -> Result<DiffOutcome, CommandError> {
            Ok(DiffOutcome::Failed {
                stderr: "diff: unreadable".to_string(),
            })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    const SNAP_A: &str = "2025-09-24T12:00:00Z";
    const SNAP_B: &str = "2025-09-25T12:00:00Z";

    fn snapshots() -> TempDir {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join(SNAP_A);
        let b = temp_dir.path().join(SNAP_B);
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::create_dir_all(temp_dir.path().join("examples")).unwrap();

        fs::write(a.join("core01.cfg"), "hostname core01\n").unwrap();
        fs::write(a.join("spine01.cfg"), "ntp server 10.0.0.1\n").unwrap();
        fs::write(b.join("spine01.cfg"), "ntp server 10.0.0.2\n").unwrap();
        fs::write(b.join("leaf01.cfg"), "hostname leaf01\n").unwrap();
        temp_dir
    }

    #[test]
    fn test_device_set_delta() {
        let temp_dir = snapshots();
        let request = DriftRequest::new(temp_dir.path(), SNAP_A);

        let report = DriftComparator::new(ContentDiffer).compare(&request).unwrap();

        assert_eq!(report.snapshot_b, SNAP_B);
        assert_eq!(report.new_devices, vec!["leaf01"]);
        assert_eq!(report.removed_devices, vec!["core01"]);
        assert_eq!(report.devices.len(), 1);
        assert_eq!(report.changed_devices().collect::<Vec<_>>(), vec!["spine01"]);
        assert!(report.has_drift());
    }

    #[test]
    fn test_rendered_report() {
        let temp_dir = snapshots();
        let request = DriftRequest::new(temp_dir.path(), SNAP_A).with_snapshot_b(SNAP_B);
        let report = DriftComparator::new(ContentDiffer).compare(&request).unwrap();

        assert_eq!(
            report.to_string(),
            format!(
                "# Comparing {SNAP_A} -> {SNAP_B}\n# NEW: leaf01\n# REMOVED: core01\n\n## spine01\n-ntp server 10.0.0.1\n+ntp server 10.0.0.2\n"
            )
        );
    }

    #[test]
    fn test_device_filter_limits_diffs() {
        let temp_dir = snapshots();
        let request = DriftRequest::new(temp_dir.path(), SNAP_A).with_device_filter("leaf01");
        let report = DriftComparator::new(ContentDiffer).compare(&request).unwrap();

        // Deltas are still reported, only the diff set is filtered
        assert!(report.devices.is_empty());
        assert_eq!(report.new_devices, vec!["leaf01"]);
    }

    #[test]
    fn test_unknown_snapshot_lists_available() {
        let temp_dir = snapshots();
        let request = DriftRequest::new(temp_dir.path(), "2020-01-01T00:00:00Z");

        let err = DriftComparator::new(ContentDiffer).compare(&request).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            format!("Snapshot '2020-01-01T00:00:00Z' not found.\nAvailable: {SNAP_A}, {SNAP_B}")
        );
    }

    #[test]
    fn test_no_snapshots() {
        let temp_dir = tempdir().unwrap();
        let request = DriftRequest::new(temp_dir.path(), SNAP_A);
        assert!(matches!(
            DriftComparator::new(ContentDiffer).compare(&request),
            Err(DriftError::NoSnapshots { .. })
        ));
    }

    #[test]
    fn test_tool_failures_do_not_stop_comparison() {
        let temp_dir = snapshots();
        let request = DriftRequest::new(temp_dir.path(), SNAP_A);
        let report = DriftComparator::new(BrokenDiffer).compare(&request).unwrap();

        assert_eq!(report.tool_failures(), 1);
        assert!(report
            .to_string()
            .contains("Error comparing spine01: diff: unreadable"));
    }
}
