//! # Audit Errors

use super::settings::SettingsError;
use crate::discovery::DiscoveryError;
use crate::evaluation::EvaluationError;
use cfg_drift_engine::FragmentError;

/// Infrastructure failures that stop an audit run
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Fragment error: {0}")]
    Fragments(#[from] FragmentError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl AuditError {
    /// Whether fixing input files or flags would let a rerun succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AuditError::Settings(_) | AuditError::Fragments(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            AuditError::Settings(e) => format!("Could not load settings: {}", e),
            AuditError::Discovery(e) => format!("Could not read snapshots: {}", e),
            AuditError::Fragments(e) => format!("Could not read templates: {}", e),
            AuditError::Evaluation(e) => format!("Could not write results: {}", e),
        }
    }
}
