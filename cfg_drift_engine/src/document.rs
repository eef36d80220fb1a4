//! # Device configuration documents
//!
//! A [`ConfigDocument`] is the captured configuration of one device in one
//! snapshot, held as ordered raw lines. Files are decoded permissively:
//! invalid UTF-8 sequences are dropped rather than failing the read.

use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while loading a device configuration
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read configuration '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One device's configuration snapshot, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    device: String,
    snapshot: Option<String>,
    path: Option<PathBuf>,
    lines: Vec<String>,
}

impl ConfigDocument {
    /// Build a document from in-memory text
    pub fn from_text(device: impl Into<String>, text: &str) -> Self {
        Self {
            device: device.into(),
            snapshot: None,
            path: None,
            lines: split_lines(text),
        }
    }

    /// Build a document from already split lines
    pub fn from_lines<S: AsRef<str>>(device: impl Into<String>, lines: &[S]) -> Self {
        Self {
            device: device.into(),
            snapshot: None,
            path: None,
            lines: lines.iter().map(|l| l.as_ref().to_string()).collect(),
        }
    }

    /// Read a device configuration file; the snapshot is the parent directory name
    pub fn read(device: impl Into<String>, path: &Path) -> Result<Self, DocumentError> {
        let lines = read_lines(path)?;
        let snapshot = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string());

        Ok(Self {
            device: device.into(),
            snapshot,
            path: Some(path.to_path_buf()),
            lines,
        })
    }

    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Location used in violation messages
    pub fn source_label(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => format!("<{}>", self.device),
        }
    }
}

/// Read a file as lines, dropping undecodable bytes
pub fn read_lines(path: &Path) -> Result<Vec<String>, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(split_lines(&decode_permissive(&bytes)))
}

/// Decode UTF-8, silently skipping invalid byte sequences
pub fn decode_permissive(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Split on `\n`, `\r\n` and bare `\r`; no trailing empty line for a final break
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_split_lines_handles_all_breaks() {
        assert_eq!(split_lines("a\r\nb\rc\nd\n"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_decode_permissive_drops_invalid_bytes() {
        let bytes = b"hostname sp\xffine01\n";
        assert_eq!(decode_permissive(bytes), "hostname spine01\n");
    }

    #[test]
    fn test_read_sets_snapshot_from_parent_directory() {
        let temp_dir = tempdir().unwrap();
        let snap = temp_dir.path().join("2025-09-25T12:00:00Z");
        fs::create_dir(&snap).unwrap();
        let file = snap.join("spine01.cfg");
        fs::write(&file, "hostname spine01\naaa new-model\n").unwrap();

        let doc = ConfigDocument::read("spine01", &file).unwrap();
        assert_eq!(doc.device(), "spine01");
        assert_eq!(doc.snapshot(), Some("2025-09-25T12:00:00Z"));
        assert_eq!(doc.lines(), &["hostname spine01", "aaa new-model"]);
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let result = ConfigDocument::read("ghost", &temp_dir.path().join("ghost.cfg"));
        assert!(matches!(result, Err(DocumentError::Read { .. })));
    }
}
