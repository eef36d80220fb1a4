//! Outcome values of a category evaluation

use cfg_drift_engine::logging::codes;
use cfg_drift_engine::logging::Code;
use cfg_drift_engine::PatternHit;
use serde::Serialize;
use std::fmt;

/// Which policy a category is evaluated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Templates of which one must be present
    Required,
    /// Banner templates compared as whole blocks
    Banner,
    /// Patterns that must be absent
    Forbidden,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Banner => "banner",
            Self::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a device violated a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    MissingRequired {
        templates_checked: usize,
    },
    /// No banner block, or one shorter than header + content + terminator
    IncompleteBanner {
        source: String,
        partial_block: bool,
    },
    BannerMismatch {
        templates_checked: usize,
    },
    ForbiddenFound {
        source: String,
        hits: Vec<PatternHit>,
    },
}

/// A compliance violation for one device in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub device: String,
    pub category: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(device: &str, category: &str, kind: ViolationKind) -> Self {
        Self {
            device: device.to_string(),
            category: category.to_string(),
            kind,
        }
    }

    /// Log code for this violation
    pub fn code(&self) -> Code {
        match &self.kind {
            ViolationKind::MissingRequired { .. } => codes::evaluation::REQUIRED_CONFIG_MISSING,
            ViolationKind::IncompleteBanner {
                partial_block: true,
                ..
            } => codes::evaluation::BANNER_UNTERMINATED,
            ViolationKind::IncompleteBanner { .. } => codes::evaluation::BANNER_ABSENT,
            ViolationKind::BannerMismatch { .. } => codes::evaluation::BANNER_MISMATCH,
            ViolationKind::ForbiddenFound { .. } => codes::evaluation::FORBIDDEN_CONFIG_FOUND,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (device, category) = (&self.device, &self.category);
        match &self.kind {
            ViolationKind::MissingRequired { templates_checked } => write!(
                f,
                "{device}: No {category} configuration found matching templates in \
                 expected_dir/{category}/ ({templates_checked} templates checked)"
            ),
            ViolationKind::IncompleteBanner { source, .. } => write!(
                f,
                "{device}: No complete banner found in {source}. \
                 Expected: header + content + terminator"
            ),
            ViolationKind::BannerMismatch { templates_checked } => write!(
                f,
                "{device}: Banner doesn't match any expected template in '{category}/' \
                 ({templates_checked} templates checked)"
            ),
            ViolationKind::ForbiddenFound { source, hits } => {
                let detected = hits
                    .iter()
                    .map(|hit| format!("'{}' (from {})", hit.content, hit.identifier))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "{device}: Found forbidden {category} configuration in {source}:\n  \
                     Forbidden patterns detected: {detected}\n  \
                     These patterns are forbidden per forbidden_dir/{category}/"
                )
            }
        }
    }
}

/// Row counts for one evaluated category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub devices_evaluated: usize,
    pub passed: usize,
    pub failed: usize,
}

impl CategoryTally {
    pub fn rows(&self) -> usize {
        self.passed + self.failed
    }
}

/// Result of evaluating one category over a set of devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CategoryOutcome {
    /// Nothing to evaluate (no templates, no devices)
    Skipped { reason: String },
    /// Every device evaluated without violation; loose-mode misses count as failed rows
    Completed { tally: CategoryTally },
    /// At least one device violated the category
    Violated {
        tally: CategoryTally,
        violations: Vec<Violation>,
    },
}

impl CategoryOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_violated(&self) -> bool {
        matches!(self, Self::Violated { .. })
    }

    pub fn tally(&self) -> CategoryTally {
        match self {
            Self::Skipped { .. } => CategoryTally::default(),
            Self::Completed { tally } | Self::Violated { tally, .. } => *tally,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Violated { violations, .. } => violations,
            _ => &[],
        }
    }
}
