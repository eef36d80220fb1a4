//! # Banner Extractor
//!
//! Single-pass scan for the first `banner <type> <delimiter>` declaration in
//! a configuration and collection of its block. The block is returned as
//! `[header, content..., terminator]`; a block whose delimiter never recurs
//! is returned as far as it got and reports itself as unterminated.
//!
//! Delimiters are arbitrary tokens. A caret-notation control character
//! (`^C`) or a single punctuation character (`#`) may be glued to the start
//! of the inline content, e.g. `banner motd ^CHi^C`. A token that only
//! repeats that unit (`%%`, `^C^C`) is taken whole as the delimiter.

use crate::normalize::normalize_lines;

/// Minimum length of a block that has header, content and terminator
pub const COMPLETE_BLOCK_LINES: usize = 3;

const BANNER_KEYWORD: &str = "banner ";

/// Banner block extracted from a device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerBlock {
    kind: String,
    delimiter: String,
    lines: Vec<String>,
    terminated: bool,
}

impl BannerBlock {
    /// Banner type from the header (`motd`, `login`, `exec`, ...)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Header, content and (when found) terminator lines in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the delimiter recurred before end of input
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Complete blocks carry at least header, one content line and terminator
    pub fn is_complete(&self) -> bool {
        self.lines.len() >= COMPLETE_BLOCK_LINES
    }

    pub fn header(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }

    /// Lines between header and terminator
    pub fn content_lines(&self) -> &[String] {
        let end = if self.terminated {
            self.lines.len().saturating_sub(1)
        } else {
            self.lines.len()
        };
        &self.lines[1.min(end)..end]
    }

    /// Canonical text of the whole block for template comparison
    pub fn normalized(&self) -> String {
        normalize_lines(&self.lines)
    }
}

/// Extract the first banner block, or `None` when no declaration qualifies
pub fn extract_banner<S: AsRef<str>>(lines: &[S]) -> Option<BannerBlock> {
    for (index, raw) in lines.iter().enumerate() {
        let line = raw.as_ref();
        let stripped = line.trim();
        if !stripped.starts_with(BANNER_KEYWORD) {
            continue;
        }

        let spans = field_spans(stripped, 4);
        if spans.len() < 3 {
            continue;
        }

        let kind = &stripped[spans[1].0..spans[1].1];
        let token = &stripped[spans[2].0..spans[2].1];
        let (delimiter, glued) = split_delimiter(token);

        let inline = if glued {
            Some(&stripped[spans[2].0 + delimiter.len()..])
        } else {
            spans.get(3).map(|&(start, end)| &stripped[start..end])
        };

        let mut block = BannerBlock {
            kind: kind.to_string(),
            delimiter: delimiter.to_string(),
            lines: vec![line.to_string()],
            terminated: false,
        };

        if let Some(content) = inline {
            if let Some(body) = content.strip_suffix(delimiter) {
                block.lines.push(body.to_string());
                block.lines.push(delimiter.to_string());
                block.terminated = true;
                return Some(block);
            }
            block.lines.push(content.to_string());
        }

        for next in &lines[index + 1..] {
            let next = next.as_ref();
            if next.trim() == delimiter {
                block.lines.push(next.trim().to_string());
                block.terminated = true;
                return Some(block);
            }
            block.lines.push(next.to_string());
        }

        return Some(block);
    }

    None
}

/// Separate the delimiter from content glued onto it.
///
/// Returns the delimiter and whether inline content follows it inside the
/// same token. A token made only of repeats of its leading unit (`%%`,
/// `@@`, `^C^C`) is a delimiter in its own right.
fn split_delimiter(token: &str) -> (&str, bool) {
    let mut chars = token.char_indices();
    let Some((_, first)) = chars.next() else {
        return (token, false);
    };
    let Some((second_at, _)) = chars.next() else {
        return (token, false);
    };

    let unit_len = if first == '^' {
        chars.next().map_or(token.len(), |(at, _)| at)
    } else if !first.is_alphanumeric() {
        second_at
    } else {
        return (token, false);
    };

    let (unit, rest) = token.split_at(unit_len);
    if rest.is_empty() || rest.trim_start_matches(unit).is_empty() {
        return (token, false);
    }
    (unit, true)
}

/// Byte spans of up to `max_fields` whitespace-separated fields; the last
/// field runs to the end of the text.
fn field_spans(text: &str, max_fields: usize) -> Vec<(usize, usize)> {
    let end_of_text = text.trim_end().len();
    let mut spans = Vec::new();
    let mut idx = 0;

    while spans.len() < max_fields {
        let rest = &text[idx..];
        idx += rest.len() - rest.trim_start().len();
        if idx >= end_of_text {
            break;
        }

        if spans.len() + 1 == max_fields {
            spans.push((idx, end_of_text));
            break;
        }

        let rest = &text[idx..];
        let field_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        spans.push((idx, idx + field_len));
        idx += field_len;
    }

    spans
}
