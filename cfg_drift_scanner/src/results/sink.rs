//! # Report Sinks
//!
//! Append-only destinations for result rows. A sink receives rows in
//! batches; the evaluator flushes a batch when a category finishes and
//! before a violation is surfaced.

use super::types::ComplianceResult;
use cfg_drift_engine::config::constants::report::{CSV_HEADER, FILE_PREFIX, FILE_STAMP_FORMAT};
use cfg_drift_engine::logging::codes;
use cfg_drift_engine::{log_error, log_success};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Report persistence errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to create results directory '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open report '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to flush report '{path}': {source}")]
    Flush {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for compliance result rows
pub trait ReportSink {
    /// Append one batch of rows
    fn append(&mut self, rows: &[ComplianceResult]) -> Result<(), ReportError>;

    /// File backing the sink, if any
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// CSV report shared by every batch of one run
#[derive(Debug)]
pub struct CsvReportSink {
    path: PathBuf,
    echo: bool,
    rows_written: usize,
}

impl CsvReportSink {
    /// Report under `results_dir` named after the current minute
    pub fn new(results_dir: &Path) -> Self {
        let stamp = chrono::Local::now().format(FILE_STAMP_FORMAT);
        Self::at_path(results_dir.join(format!("{FILE_PREFIX}{stamp}.csv")))
    }

    /// Report at an explicit path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            echo: false,
            rows_written: 0,
        }
    }

    /// Also print each appended batch to stdout as comma-joined values
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_batch(&mut self, rows: &[ComplianceResult]) -> Result<(), ReportError> {
        let display = self.path.display().to_string();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::CreateDirectory {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let is_new = !self.path.is_file();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ReportError::Open {
                path: display.clone(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            writer
                .write_record(CSV_HEADER)
                .map_err(|source| ReportError::Write {
                    path: display.clone(),
                    source,
                })?;
        }

        for row in rows {
            writer
                .write_record(row.to_row())
                .map_err(|source| ReportError::Write {
                    path: display.clone(),
                    source,
                })?;
        }

        writer.flush().map_err(|source| ReportError::Flush {
            path: display,
            source,
        })?;

        self.rows_written += rows.len();
        Ok(())
    }
}

impl ReportSink for CsvReportSink {
    fn append(&mut self, rows: &[ComplianceResult]) -> Result<(), ReportError> {
        if let Err(e) = self.write_batch(rows) {
            log_error!(codes::report::REPORT_WRITE_FAILED, "Report write failed",
                "path" => self.path.display(),
                "error" => &e
            );
            return Err(e);
        }

        log_success!(codes::success::REPORT_WRITTEN, "Report rows appended",
            "path" => self.path.display(),
            "rows" => rows.len()
        );

        if self.echo {
            for row in rows {
                println!("{}", row.to_row().join(","));
            }
        }

        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// In-memory sink that keeps every row and batch boundary
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<ComplianceResult>,
    batches: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ComplianceResult] {
        &self.rows
    }

    /// Number of `append` calls received
    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn into_rows(self) -> Vec<ComplianceResult> {
        self.rows
    }
}

impl ReportSink for MemorySink {
    fn append(&mut self, rows: &[ComplianceResult]) -> Result<(), ReportError> {
        self.rows.extend_from_slice(rows);
        self.batches += 1;
        Ok(())
    }
}
