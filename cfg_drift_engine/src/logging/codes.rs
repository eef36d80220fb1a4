//! Consolidated event codes and classification system
//!
//! Single source of truth for every code the audit emits, with the metadata
//! used to classify and render it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Snapshot and category discovery codes
pub mod discovery {
    use super::Code;

    pub const SNAPSHOT_NOT_FOUND: Code = Code::new("E005");
    pub const NO_DEVICE_CONFIGS: Code = Code::new("E006");
    pub const CATEGORY_DIR_MISSING: Code = Code::new("E007");
    pub const UNREADABLE_CONFIG: Code = Code::new("E008");
}

/// Fragment loading codes
pub mod fragments {
    use super::Code;

    pub const FRAGMENT_READ_FAILED: Code = Code::new("E020");
    pub const NO_TEMPLATES: Code = Code::new("E021");
}

/// Compliance evaluation codes
pub mod evaluation {
    use super::Code;

    pub const REQUIRED_CONFIG_MISSING: Code = Code::new("E040");
    pub const FORBIDDEN_CONFIG_FOUND: Code = Code::new("E041");
    pub const BANNER_ABSENT: Code = Code::new("E042");
    pub const BANNER_UNTERMINATED: Code = Code::new("E043");
    pub const BANNER_MISMATCH: Code = Code::new("E044");
}

/// Snapshot drift comparison codes
pub mod drift {
    use super::Code;

    pub const DIFF_TOOL_FAILED: Code = Code::new("E060");
    pub const DIFF_TOOL_UNAVAILABLE: Code = Code::new("E061");
    pub const SNAPSHOT_UNKNOWN: Code = Code::new("E062");
}

/// Report sink codes
pub mod report {
    use super::Code;

    pub const REPORT_WRITE_FAILED: Code = Code::new("E080");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const SNAPSHOT_DISCOVERED: Code = Code::new("I006");
    pub const FRAGMENTS_LOADED: Code = Code::new("I020");
    pub const CATEGORY_PASSED: Code = Code::new("I040");
    pub const AUDIT_COMPLETE: Code = Code::new("I041");
    pub const DRIFT_COMPARISON_COMPLETE: Code = Code::new("I060");
    pub const REPORT_WRITTEN: Code = Code::new("I080");
}

// ============================================================================
// CODE METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

const REGISTRY_ENTRIES: &[CodeMetadata] = &[
    CodeMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal system error",
        "File a bug report with the run log attached",
    ),
    CodeMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or settings initialization failure",
        "Check the settings file and environment overrides",
    ),
    CodeMetadata::new(
        "E005",
        "Discovery",
        Severity::Medium,
        true,
        false,
        "No snapshot directory found",
        "Check --snap-directory and --snap-timestamp",
    ),
    CodeMetadata::new(
        "E006",
        "Discovery",
        Severity::Medium,
        true,
        false,
        "Snapshot directory contains no device configurations",
        "Capture device configurations into the snapshot directory",
    ),
    CodeMetadata::new(
        "E007",
        "Discovery",
        Severity::Low,
        true,
        false,
        "Category directory is missing",
        "Create the category directory or ignore the skipped category",
    ),
    CodeMetadata::new(
        "E008",
        "Discovery",
        Severity::High,
        false,
        true,
        "Device configuration could not be read",
        "Check file permissions in the snapshot directory",
    ),
    CodeMetadata::new(
        "E020",
        "Fragments",
        Severity::High,
        false,
        true,
        "Fragment file could not be read",
        "Check file permissions in the fragment directory",
    ),
    CodeMetadata::new(
        "E021",
        "Fragments",
        Severity::Low,
        true,
        false,
        "Category has no templates; evaluation skipped",
        "Add fragment files to the category directory",
    ),
    CodeMetadata::new(
        "E040",
        "Evaluation",
        Severity::High,
        true,
        false,
        "Required configuration missing from device",
        "Apply one of the approved templates to the device",
    ),
    CodeMetadata::new(
        "E041",
        "Evaluation",
        Severity::High,
        true,
        false,
        "Forbidden configuration present on device",
        "Remove the forbidden configuration from the device",
    ),
    CodeMetadata::new(
        "E042",
        "Evaluation",
        Severity::High,
        true,
        false,
        "No banner declaration found on device",
        "Configure an approved banner",
    ),
    CodeMetadata::new(
        "E043",
        "Evaluation",
        Severity::High,
        true,
        false,
        "Banner block is not terminated by its delimiter",
        "Terminate the banner with the delimiter on its own line",
    ),
    CodeMetadata::new(
        "E044",
        "Evaluation",
        Severity::High,
        true,
        false,
        "Banner content does not match any approved template",
        "Replace the banner with an approved template",
    ),
    CodeMetadata::new(
        "E060",
        "Drift",
        Severity::Medium,
        true,
        false,
        "External diff tool reported an error",
        "Check that both configuration files are readable",
    ),
    CodeMetadata::new(
        "E061",
        "Drift",
        Severity::Medium,
        true,
        false,
        "External diff tool is not available",
        "Install diffutils (and colordiff for colored output)",
    ),
    CodeMetadata::new(
        "E062",
        "Drift",
        Severity::Medium,
        true,
        false,
        "Requested snapshot does not exist",
        "Pick one of the listed snapshot timestamps",
    ),
    CodeMetadata::new(
        "E080",
        "Report",
        Severity::Critical,
        false,
        true,
        "Compliance report could not be written",
        "Check the results directory permissions and free space",
    ),
    CodeMetadata::new(
        "I004",
        "System",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "Ready to audit",
    ),
    CodeMetadata::new(
        "I006",
        "Discovery",
        Severity::Low,
        true,
        false,
        "Snapshot directory selected",
        "Device configurations ready for evaluation",
    ),
    CodeMetadata::new(
        "I020",
        "Fragments",
        Severity::Low,
        true,
        false,
        "Fragments loaded and normalized",
        "Templates ready for matching",
    ),
    CodeMetadata::new(
        "I040",
        "Evaluation",
        Severity::Low,
        true,
        false,
        "Category evaluated without violations",
        "No action required",
    ),
    CodeMetadata::new(
        "I041",
        "Evaluation",
        Severity::Low,
        true,
        false,
        "Audit run completed",
        "Review the summary and report",
    ),
    CodeMetadata::new(
        "I060",
        "Drift",
        Severity::Low,
        true,
        false,
        "Snapshot comparison completed",
        "Review the drift report",
    ),
    CodeMetadata::new(
        "I080",
        "Report",
        Severity::Low,
        true,
        false,
        "Compliance rows appended to report",
        "No action required",
    ),
];

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_code_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the condition behind a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if a code requires halting the run
pub fn requires_halt(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
