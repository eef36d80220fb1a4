use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a violation does to the rest of its category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationPolicy {
    /// Stop evaluating the category at the first violating device
    #[default]
    AbortCategory,
    /// Evaluate every device and collect all violations
    PerDevice,
}

impl ViolationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbortCategory => "abort-category",
            Self::PerDevice => "per-device",
        }
    }

    pub fn stops_category(&self) -> bool {
        matches!(self, Self::AbortCategory)
    }
}

impl fmt::Display for ViolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort-category" => Ok(Self::AbortCategory),
            "per-device" => Ok(Self::PerDevice),
            other => Err(format!(
                "invalid violation policy '{other}' (expected 'abort-category' or 'per-device')"
            )),
        }
    }
}
