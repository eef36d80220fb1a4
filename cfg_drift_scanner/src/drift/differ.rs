//! Line differ abstraction over external diff tools

use super::command::{CommandError, SystemCommandExecutor};
use cfg_drift_engine::config::constants::drift::{COLOR_DIFF_PROGRAM, DIFF_PROGRAM};
use cfg_drift_engine::log_warning;
use cfg_drift_engine::logging::codes;
use std::path::Path;

/// Result of diffing two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    Identical,
    /// Unified diff text
    Differs(String),
    /// The tool ran but reported trouble (exit status above 1)
    Failed { stderr: String },
}

/// Produces a unified diff between two configuration files
pub trait LineDiffer {
    fn diff(&self, old: &Path, new: &Path) -> Result<DiffOutcome, CommandError>;

    /// Program or implementation name for logs
    fn name(&self) -> &str;
}

/// `diff -u` or `colordiff -u` run through the command executor
#[derive(Debug, Clone)]
pub struct ExternalDiff {
    executor: SystemCommandExecutor,
    program: String,
}

impl ExternalDiff {
    /// Plain `diff`, or `colordiff` when `color` is set and the tool answers `--version`
    pub fn new(color: bool) -> Self {
        let mut executor = SystemCommandExecutor::new();
        executor.allow_commands(&[DIFF_PROGRAM, COLOR_DIFF_PROGRAM]);

        let program = if color && executor.probe(COLOR_DIFF_PROGRAM) {
            COLOR_DIFF_PROGRAM
        } else {
            if color {
                log_warning!(code = codes::drift::DIFF_TOOL_UNAVAILABLE,
                    "colordiff unavailable, falling back to diff"
                );
            }
            DIFF_PROGRAM
        };

        Self {
            executor,
            program: program.to_string(),
        }
    }

    /// Use a specific executor and program
    pub fn with_executor(executor: SystemCommandExecutor, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }
}

impl LineDiffer for ExternalDiff {
    fn diff(&self, old: &Path, new: &Path) -> Result<DiffOutcome, CommandError> {
        let output = self.executor.unified_diff(&self.program, old, new)?;
        Ok(match output.exit_code {
            0 => DiffOutcome::Identical,
            1 => DiffOutcome::Differs(output.stdout),
            _ => DiffOutcome::Failed {
                stderr: output.stderr,
            },
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_plain_diff_without_color() {
        assert_eq!(ExternalDiff::new(false).name(), "diff");
    }

    #[test]
    fn test_unlisted_program_is_rejected() {
        let differ = ExternalDiff::with_executor(SystemCommandExecutor::new(), "diff");
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("a.cfg");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            differ.diff(&file, &file),
            Err(CommandError::SecurityViolation { .. })
        ));
    }

    #[test]
    fn test_real_diff_when_installed() {
        let differ = ExternalDiff::new(false);
        let temp_dir = tempdir().unwrap();
        let old = temp_dir.path().join("old.cfg");
        let new = temp_dir.path().join("new.cfg");
        fs::write(&old, "hostname r1\nntp server 10.0.0.1\n").unwrap();
        fs::write(&new, "hostname r1\nntp server 10.0.0.2\n").unwrap();

        match differ.diff(&old, &new) {
            Ok(DiffOutcome::Differs(text)) => {
                assert!(text.contains("-ntp server 10.0.0.1"));
                assert!(text.contains("+ntp server 10.0.0.2"));
                assert_eq!(differ.diff(&old, &old).unwrap(), DiffOutcome::Identical);
            }
            // Environments without diff on the tool path
            Err(CommandError::ProgramNotFound { .. }) => {}
            other => panic!("unexpected diff result: {other:?}"),
        }
    }
}
