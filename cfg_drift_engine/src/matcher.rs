//! # Pattern Matcher
//!
//! Containment checks of fragment text against device configuration.
//!
//! Templates are normalized when loaded; device text is only joined and
//! lower-cased here. Banner templates are the exception and compare by
//! equality of normalized text.

use crate::banner::BannerBlock;
use crate::fragments::{Fragment, FragmentSet};
use serde::Serialize;

/// A pattern found in device text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternHit {
    pub identifier: String,
    /// Trimmed normalized pattern content
    pub content: String,
}

impl PatternHit {
    fn from_fragment(fragment: &Fragment) -> Self {
        Self {
            identifier: fragment.identifier.clone(),
            content: fragment.normalized.trim().to_string(),
        }
    }
}

/// Device configuration prepared for case-insensitive containment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableText {
    lowered: String,
}

impl SearchableText {
    /// Join raw lines with newlines and lower-case them
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            lowered: joined.to_lowercase(),
        }
    }

    /// Whether the fragment's normalized text occurs in the device text
    pub fn contains(&self, fragment: &Fragment) -> bool {
        self.lowered.contains(&fragment.search_key())
    }

    pub fn as_str(&self) -> &str {
        &self.lowered
    }
}

/// Every pattern present in the device text, in identifier order
pub fn find_forbidden<S: AsRef<str>>(lines: &[S], patterns: &FragmentSet) -> Vec<PatternHit> {
    let text = SearchableText::from_lines(lines);
    patterns
        .iter()
        .filter(|fragment| text.contains(fragment))
        .map(PatternHit::from_fragment)
        .collect()
}

/// First template, in identifier order, present in the device text
pub fn first_match<'a, S: AsRef<str>>(
    lines: &[S],
    templates: &'a FragmentSet,
) -> Option<&'a Fragment> {
    let text = SearchableText::from_lines(lines);
    templates.iter().find(|fragment| text.contains(fragment))
}

/// First template whose normalized text equals the normalized banner block
pub fn matching_banner_template<'a>(
    block: &BannerBlock,
    templates: &'a FragmentSet,
) -> Option<&'a Fragment> {
    let normalized = block.normalized();
    templates
        .iter()
        .find(|fragment| fragment.normalized == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::extract_banner;

    fn device() -> Vec<&'static str> {
        vec![
            "hostname leaf01",
            "Feature Bash",
            "aaa new-model",
            "ntp server 10.0.0.1",
        ]
    }

    #[test]
    fn test_forbidden_match_is_case_insensitive() {
        let patterns = FragmentSet::from_pairs("features", [("bash.cfg", "feature bash")]);
        let hits = find_forbidden(&device(), &patterns);

        assert_eq!(
            hits,
            vec![PatternHit {
                identifier: "bash.cfg".to_string(),
                content: "feature bash".to_string(),
            }]
        );
    }

    #[test]
    fn test_find_forbidden_returns_every_hit() {
        let patterns = FragmentSet::from_pairs(
            "protocols",
            [
                ("telnet.cfg", "transport input telnet"),
                ("ntp.cfg", "NTP server"),
                ("bash.cfg", "feature bash"),
            ],
        );
        let hits: Vec<String> = find_forbidden(&device(), &patterns)
            .into_iter()
            .map(|hit| hit.identifier)
            .collect();

        assert_eq!(hits, vec!["bash.cfg", "ntp.cfg"]);
    }

    #[test]
    fn test_first_match_uses_identifier_order() {
        let templates = FragmentSet::from_pairs(
            "aaa",
            [("z_model.cfg", "aaa new-model"), ("a_model.cfg", "AAA NEW-MODEL")],
        );
        let hit = first_match(&device(), &templates).unwrap();
        assert_eq!(hit.identifier, "a_model.cfg");
    }

    #[test]
    fn test_first_match_spans_lines() {
        let templates = FragmentSet::from_pairs("mixed", [("pair.cfg", "feature bash\naaa new-model")]);
        assert!(first_match(&device(), &templates).is_some());
    }

    #[test]
    fn test_device_text_is_not_normalized() {
        let templates = FragmentSet::from_pairs("ntp", [("ntp.cfg", "ntp   server 10.0.0.1")]);
        let spaced = ["ntp  server 10.0.0.1"];

        // Template collapses to single spaces, device text keeps its spacing
        assert!(first_match(&spaced, &templates).is_none());
        assert!(first_match(&device(), &templates).is_some());
    }

    #[test]
    fn test_no_match() {
        let templates = FragmentSet::from_pairs("snmp", [("snmp.cfg", "snmp-server community")]);
        assert!(first_match(&device(), &templates).is_none());
        assert!(find_forbidden(&device(), &templates).is_empty());
    }

    #[test]
    fn test_banner_template_equality() {
        let templates = FragmentSet::from_pairs(
            "banners",
            [
                ("motd.cfg", "banner motd ^C\n  Authorized  access only\n^C\n"),
                ("other.cfg", "banner motd ^C\nWelcome\n^C"),
            ],
        );
        let lines = ["banner motd ^C", "Authorized access only", "^C"];
        let block = extract_banner(&lines).unwrap();

        let hit = matching_banner_template(&block, &templates).unwrap();
        assert_eq!(hit.identifier, "motd.cfg");

        let lines = ["banner motd ^C", "Authorized access only!", "^C"];
        let block = extract_banner(&lines).unwrap();
        assert!(matching_banner_template(&block, &templates).is_none());
    }
}
