//! # Text Normalizer
//!
//! Canonical comparison form for fragment and banner text. Volatile
//! generated comment lines (`! Generated ...`, build stamps, dates, time
//! zones) are dropped, every retained line is trimmed with internal
//! whitespace collapsed, and leading/trailing blank lines are removed.

use regex::Regex;
use std::sync::OnceLock;

static GENERATED_COMMENT: OnceLock<Regex> = OnceLock::new();

fn generated_comment_pattern() -> &'static Regex {
    GENERATED_COMMENT.get_or_init(|| {
        Regex::new(r"(?i)^\s*!.*(generated|build|\d{4}-\d{2}-\d{2}|utc|local)")
            .unwrap_or_else(|e| panic!("generated comment pattern is invalid: {e}"))
    })
}

/// True for comment lines carrying generated or timestamp noise
pub fn is_generated_comment(line: &str) -> bool {
    generated_comment_pattern().is_match(line)
}

/// Trim a line and collapse runs of whitespace to one space
pub fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize lines into one canonical string
pub fn normalize_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let cleaned: Vec<String> = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !is_generated_comment(line))
        .map(collapse_whitespace)
        .collect();

    let start = cleaned
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(cleaned.len());
    let end = cleaned
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(start, |idx| idx + 1);

    cleaned[start..end].join("\n").trim().to_string()
}

/// Normalize a block of text; splits on line breaks first
pub fn normalize_text(text: &str) -> String {
    normalize_lines(&crate::document::split_lines(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_comment_detection() {
        assert!(is_generated_comment("! Generated by config-backup"));
        assert!(is_generated_comment("   !Last BUILD 42"));
        assert!(is_generated_comment("! saved 2025-09-25 12:00"));
        assert!(is_generated_comment("! time zone utc"));
        assert!(is_generated_comment("!local time"));
        assert!(!is_generated_comment("! regular comment"));
        assert!(!is_generated_comment("hostname build-server"));
        assert!(!is_generated_comment("banner motd ^C"));
    }

    #[test]
    fn test_collapses_whitespace_and_trims_blank_edges() {
        let lines = [
            "",
            "  ",
            "aaa   new-model  ",
            "",
            "\taaa authentication login default   local-case",
            "   ",
        ];
        assert_eq!(
            normalize_lines(&lines),
            "aaa new-model\n\naaa authentication login default local-case"
        );
    }

    #[test]
    fn test_removes_generated_lines_anywhere() {
        let lines = [
            "! Generated 2025-09-25",
            "ntp server 10.0.0.1",
            "! build 1.2.3",
            "ntp server 10.0.0.2",
            "! exported UTC",
        ];
        assert_eq!(
            normalize_lines(&lines),
            "ntp server 10.0.0.1\nntp server 10.0.0.2"
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let samples = [
            "  banner motd ^C\n  Authorized   access only \n! Generated 2025-01-01\n^C  \n\n",
            "\n\n\n",
            "! only a comment\n",
            "logging host 10.1.1.1\n\n\n\nlogging trap informational",
            "\t! build 7\n  snmp-server community  s3cret  RO\n",
        ];

        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(normalize_lines(&empty), "");
        assert_eq!(normalize_text(""), "");
    }
}
