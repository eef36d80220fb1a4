//! # Fragment Loader
//!
//! Reads the fragment files of one category (`<base>/<category>/*.cfg`) and
//! keeps each template's raw and normalized text, keyed by file name.

use crate::config::constants::fragments::CONFIG_EXTENSION;
use crate::document::{decode_permissive, split_lines};
use crate::logging::codes;
use crate::normalize::normalize_lines;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while loading fragments
#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    #[error("Failed to list fragment directory '{path}': {source}")]
    ListDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read fragment '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One golden or forbidden template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub category: String,
    /// File name including extension
    pub identifier: String,
    pub raw: String,
    pub normalized: String,
}

impl Fragment {
    pub fn new(
        category: impl Into<String>,
        identifier: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let raw = raw.into();
        let normalized = normalize_lines(&split_lines(&raw));
        Self {
            category: category.into(),
            identifier: identifier.into(),
            raw,
            normalized,
        }
    }

    /// Lower-cased, trimmed form used for substring containment
    pub fn search_key(&self) -> String {
        self.normalized.trim().to_lowercase()
    }
}

/// Templates of one category, iterated in identifier order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    category: String,
    source_dir: Option<PathBuf>,
    fragments: BTreeMap<String, Fragment>,
}

impl FragmentSet {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            source_dir: None,
            fragments: BTreeMap::new(),
        }
    }

    /// Build a set from in-memory `(identifier, content)` pairs
    pub fn from_pairs<I, K, V>(category: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new(category);
        for (identifier, content) in pairs {
            set.insert(Fragment::new(category, identifier, content));
        }
        set
    }

    /// Insert a fragment, replacing any with the same identifier
    pub fn insert(&mut self, fragment: Fragment) {
        self.fragments.insert(fragment.identifier.clone(), fragment);
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Directory the set was loaded from, if any
    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    pub fn get(&self, identifier: &str) -> Option<&Fragment> {
        self.fragments.get(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.values()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Identifier to normalized content mapping
    pub fn normalized_map(&self) -> BTreeMap<&str, &str> {
        self.fragments
            .iter()
            .map(|(id, fragment)| (id.as_str(), fragment.normalized.as_str()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FragmentSet {
    type Item = &'a Fragment;
    type IntoIter = std::collections::btree_map::Values<'a, String, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.values()
    }
}

/// Load all fragments of `category` under `base_dir`.
///
/// A missing category directory yields an empty set.
pub fn load_fragments(base_dir: &Path, category: &str) -> Result<FragmentSet, FragmentError> {
    load_fragment_dir(&base_dir.join(category), category)
}

/// Load the fragments stored directly in `dir`, labelled with `category`
pub fn load_fragment_dir(dir: &Path, category: &str) -> Result<FragmentSet, FragmentError> {
    let dir = dir.to_path_buf();
    let mut set = FragmentSet::new(category);
    set.source_dir = Some(dir.clone());

    if !dir.is_dir() {
        crate::log_debug!("Fragment directory not present",
            "category" => category,
            "path" => dir.display()
        );
        return Ok(set);
    }

    let entries = fs::read_dir(&dir).map_err(|source| FragmentError::ListDirectory {
        path: dir.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| FragmentError::ListDirectory {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || !has_config_extension(&path) {
            continue;
        }

        let identifier = entry.file_name().to_string_lossy().to_string();
        let bytes = fs::read(&path).map_err(|source| {
            crate::log_error!(codes::fragments::FRAGMENT_READ_FAILED,
                "Failed to read fragment",
                "path" => path.display()
            );
            FragmentError::Read {
                path: path.display().to_string(),
                source,
            }
        })?;

        set.insert(Fragment::new(category, identifier, decode_permissive(&bytes)));
    }

    crate::log_success!(codes::success::FRAGMENTS_LOADED,
        "Fragments loaded",
        "category" => category,
        "count" => set.len()
    );

    Ok(set)
}

fn has_config_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(&format!(".{CONFIG_EXTENSION}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = tempdir().unwrap();
        let set = load_fragments(temp_dir.path(), "ntp").unwrap();

        assert!(set.is_empty());
        assert_eq!(set.category(), "ntp");
    }

    #[test]
    fn test_loads_only_cfg_files_sorted() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("aaa");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("b_tacacs.cfg"), "aaa   new-model\n").unwrap();
        fs::write(dir.join("a_local.cfg"), "! Generated 2025-01-01\naaa authentication login default local\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.join("nested.cfg")).unwrap();

        let set = load_fragments(temp_dir.path(), "aaa").unwrap();
        let ids: Vec<&str> = set.identifiers().collect();

        assert_eq!(ids, vec!["a_local.cfg", "b_tacacs.cfg"]);
        assert_eq!(set.get("b_tacacs.cfg").unwrap().normalized, "aaa new-model");
        assert_eq!(
            set.get("a_local.cfg").unwrap().normalized,
            "aaa authentication login default local"
        );
        assert_eq!(set.source_dir(), Some(dir.as_path()));
    }

    #[test]
    fn test_invalid_bytes_are_dropped() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("snmp");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("snmp.cfg"), b"snmp-server \xfe\xffcommunity RO\n").unwrap();

        let set = load_fragments(temp_dir.path(), "snmp").unwrap();
        assert_eq!(set.get("snmp.cfg").unwrap().normalized, "snmp-server community RO");
    }

    #[test]
    fn test_load_fragment_dir_uses_given_label() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("fragments").join("motd");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("motd.cfg"), "banner motd ^C\nHi\n^C\n").unwrap();

        let set = load_fragment_dir(&dir, "banners").unwrap();
        assert_eq!(set.category(), "banners");
        assert_eq!(set.get("motd.cfg").unwrap().category, "banners");
    }

    #[test]
    fn test_from_pairs_and_search_key() {
        let set = FragmentSet::from_pairs("features", [("bash.cfg", "  Feature   Bash  ")]);
        let fragment = set.get("bash.cfg").unwrap();

        assert_eq!(fragment.raw, "  Feature   Bash  ");
        assert_eq!(fragment.search_key(), "feature bash");
        assert_eq!(set.normalized_map().get("bash.cfg"), Some(&"Feature Bash"));
    }
}
