//! # Snapshot and Category Discovery
//!
//! File-system listing for the audit: snapshot directories under a root,
//! device `.cfg` files inside a snapshot, and category subdirectories under
//! the expected and forbidden template roots. Absent directories produce
//! empty listings; callers treat those as skips.

use cfg_drift_engine::config::constants::fragments::CONFIG_EXTENSION;
use cfg_drift_engine::config::constants::snapshots::RESERVED_NAMES;
use cfg_drift_engine::logging::codes;
use cfg_drift_engine::{log_debug, log_success, log_warning};
use cfg_drift_engine::{ConfigDocument, DocumentError};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to list directory '{path}': {source}")]
    ListDirectory {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// A device configuration file inside a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// File stem, e.g. `spine01` for `spine01.cfg`
    pub device: String,
    pub path: PathBuf,
}

impl DeviceConfig {
    pub fn load(&self) -> Result<ConfigDocument, DocumentError> {
        ConfigDocument::read(self.device.clone(), &self.path)
    }
}

/// Immediate children of `dir` in file-name order; a missing directory is empty
fn child_entries(dir: &Path) -> Result<Vec<DirEntry>, DiscoveryError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DiscoveryError::ListDirectory {
            path: dir.display().to_string(),
            source,
        })
}

fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().to_string()
}

/// Snapshot directory to audit: `snap_ts` under `root` when given,
/// otherwise the last subdirectory in sorted order
pub fn find_latest_snapshot_dir(
    root: &Path,
    snap_ts: Option<&str>,
) -> Result<Option<PathBuf>, DiscoveryError> {
    let selected = match snap_ts {
        Some(ts) => {
            let candidate = root.join(ts);
            candidate.is_dir().then_some(candidate)
        }
        None => child_entries(root)?
            .into_iter()
            .filter(|entry| entry.file_type().is_dir())
            .last()
            .map(DirEntry::into_path),
    };

    match &selected {
        Some(dir) => log_success!(codes::success::SNAPSHOT_DISCOVERED, "Snapshot selected",
            "path" => dir.display()
        ),
        None => log_warning!(code = codes::discovery::SNAPSHOT_NOT_FOUND, "No snapshot directory found",
            "root" => root.display()
        ),
    }

    Ok(selected)
}

/// Device `.cfg` files in a snapshot, sorted by file name
pub fn collect_device_configs(snapshot_dir: &Path) -> Result<Vec<DeviceConfig>, DiscoveryError> {
    let configs: Vec<DeviceConfig> = child_entries(snapshot_dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == CONFIG_EXTENSION)
        })
        .filter_map(|entry| {
            let device = entry.path().file_stem()?.to_string_lossy().to_string();
            Some(DeviceConfig {
                device,
                path: entry.into_path(),
            })
        })
        .collect();

    if configs.is_empty() {
        log_warning!(code = codes::discovery::NO_DEVICE_CONFIGS, "No device configurations found",
            "snapshot" => snapshot_dir.display()
        );
    } else {
        log_debug!("Device configurations collected",
            "snapshot" => snapshot_dir.display(),
            "count" => configs.len()
        );
    }

    Ok(configs)
}

/// Read every device configuration of a snapshot
pub fn load_device_documents(snapshot_dir: &Path) -> Result<Vec<ConfigDocument>, DiscoveryError> {
    collect_device_configs(snapshot_dir)?
        .iter()
        .map(|config| config.load().map_err(DiscoveryError::from))
        .collect()
}

/// Category names: sorted subdirectories of a template root
pub fn discover_categories(template_root: &Path) -> Result<Vec<String>, DiscoveryError> {
    if !template_root.is_dir() {
        log_warning!(code = codes::discovery::CATEGORY_DIR_MISSING, "Template directory not found",
            "path" => template_root.display()
        );
        return Ok(Vec::new());
    }

    Ok(child_entries(template_root)?
        .iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(entry_name)
        .collect())
}

/// Whether a directory name looks like an ISO-8601 snapshot stamp
pub fn is_snapshot_name(name: &str) -> bool {
    !RESERVED_NAMES.contains(&name) && name.contains('T') && (name.contains('Z') || name.contains(':'))
}

/// Sorted snapshot names under `root` usable for drift comparison
pub fn find_snapshot_directories(root: &Path) -> Result<Vec<String>, DiscoveryError> {
    Ok(child_entries(root)?
        .iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(entry_name)
        .filter(|name| is_snapshot_name(name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_latest_snapshot_is_last_sorted() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("2025-09-24T12:00:00Z")).unwrap();
        fs::create_dir(root.join("2025-09-25T12:00:00Z")).unwrap();
        fs::write(root.join("zzz.txt"), "not a directory").unwrap();

        let latest = find_latest_snapshot_dir(root, None).unwrap().unwrap();
        assert!(latest.ends_with("2025-09-25T12:00:00Z"));
    }

    #[test]
    fn test_explicit_snapshot_must_exist() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("2025-09-24T12:00:00Z")).unwrap();

        let chosen = find_latest_snapshot_dir(root, Some("2025-09-24T12:00:00Z")).unwrap();
        assert!(chosen.unwrap().ends_with("2025-09-24T12:00:00Z"));
        assert!(find_latest_snapshot_dir(root, Some("2030-01-01T00:00:00Z")).unwrap().is_none());
    }

    #[test]
    fn test_missing_root_has_no_snapshot() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("snapshots");
        assert!(find_latest_snapshot_dir(&missing, None).unwrap().is_none());
        assert!(find_snapshot_directories(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_collect_device_configs() {
        let temp_dir = tempdir().unwrap();
        let snap = temp_dir.path();
        fs::write(snap.join("spine01.cfg"), "hostname spine01").unwrap();
        fs::write(snap.join("core01.cfg"), "hostname core01").unwrap();
        fs::write(snap.join("README.md"), "notes").unwrap();

        let configs = collect_device_configs(snap).unwrap();
        let devices: Vec<&str> = configs.iter().map(|c| c.device.as_str()).collect();
        assert_eq!(devices, vec!["core01", "spine01"]);

        let documents = load_device_documents(snap).unwrap();
        assert_eq!(documents[1].lines(), &["hostname spine01"]);
    }

    #[test]
    fn test_discover_categories() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        for name in ["ntp", "aaa", "banners"] {
            fs::create_dir(root.join(name)).unwrap();
        }
        fs::write(root.join("stray.cfg"), "x").unwrap();

        assert_eq!(discover_categories(root).unwrap(), vec!["aaa", "banners", "ntp"]);
        assert!(discover_categories(&root.join("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_names() {
        assert!(is_snapshot_name("2025-09-25T12:00:00Z"));
        assert!(is_snapshot_name("2025-09-25T12:00"));
        assert!(!is_snapshot_name("2025-09-25"));
        assert!(!is_snapshot_name("examples"));
        assert!(!is_snapshot_name("Tmp"));
    }

    #[test]
    fn test_find_snapshot_directories_filters_names() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        for name in ["2025-09-25T12:00:00Z", "2025-09-24T08:00:00Z", "examples", "scratch"] {
            fs::create_dir(root.join(name)).unwrap();
        }

        assert_eq!(
            find_snapshot_directories(root).unwrap(),
            vec!["2025-09-24T08:00:00Z", "2025-09-25T12:00:00Z"]
        );
    }
}
