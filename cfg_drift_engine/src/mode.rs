use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison policy for required categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceMode {
    /// Banner text must equal a template; a missing required block fails the category
    #[default]
    Strict,
    /// Presence is enough; banner content is never compared
    Loose,
}

impl ComplianceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Loose => "loose",
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "loose" => Ok(Self::Loose),
            other => Err(format!(
                "invalid compliance mode '{other}' (expected 'strict' or 'loose')"
            )),
        }
    }
}
