//! Byte-level scanning helpers for LaTeX source
//!
//! All helpers work on `doc.as_bytes()` with an exclusive `end` bound, so a
//! scan never runs past the region it was asked to look at.

use phf::{phf_map, phf_set};

use crate::utils::changes::Range;

/// Rule commands, with the number of required `{}` arguments
pub static RULE_COMMANDS: phf::Map<&'static str, usize> = phf_map! {
    "hline" => 0,
    "cline" => 1,
    "toprule" => 0,
    "midrule" => 0,
    "bottomrule" => 0,
    "cmidrule" => 1,
};

/// Float environments that may carry a caption for the tabular inside
pub static FLOAT_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "table",
    "table*",
    "sidewaystable",
    "wraptable",
};

/// Width of the UTF-8 sequence starting with `lead`
pub fn char_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

pub fn skip_whitespace(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Position of the line break ending the line at `pos` (or `end`)
pub fn line_end(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos] != b'\n' {
        pos += 1;
    }
    pos
}

/// End of the control sequence whose backslash is at `pos`
///
/// Letters form a name (`\hline`); anything else is a one-symbol sequence
/// (`\\`, `\&`, `\%`).
pub fn command_name_end(bytes: &[u8], pos: usize, end: usize) -> usize {
    let mut i = pos + 1;
    while i < end && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    if i == pos + 1 && i < end {
        i += char_width(bytes[i]);
    }
    i.min(end)
}

/// Index of the `}` matching the `{` at `open`
pub fn find_group_end(bytes: &[u8], open: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < end {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// End of an optional `[...]` or `(...)` group starting exactly at `pos`
pub fn optional_group_end(bytes: &[u8], pos: usize, end: usize) -> Option<usize> {
    let close = match bytes.get(pos) {
        Some(b'[') if pos < end => b']',
        Some(b'(') if pos < end => b')',
        _ => return None,
    };
    let mut i = pos + 1;
    while i < end && bytes[i] != close {
        i += 1;
    }
    (i < end).then_some(i + 1)
}

/// End of a command's arguments
///
/// Optional `(..)`/`[..]` groups must directly follow the name (as in
/// `\cmidrule(lr){2-3}` or `\caption[short]{long}`); the `required` brace
/// groups may be preceded by whitespace. Trailing whitespace is not included.
pub fn command_end(bytes: &[u8], name_end: usize, end: usize, required: usize) -> usize {
    let mut pos = name_end;
    while let Some(next) = optional_group_end(bytes, pos, end) {
        pos = next;
    }
    for _ in 0..required {
        let open = skip_whitespace(bytes, pos, end);
        if open >= end || bytes[open] != b'{' {
            break;
        }
        match find_group_end(bytes, open, end) {
            Some(close) => pos = close + 1,
            None => return end,
        }
    }
    pos
}

/// `from..to` without surrounding whitespace; blank text gives a cursor at `from`
pub fn trimmed_range(doc: &str, from: usize, to: usize) -> Range {
    let text = &doc[from..to];
    let trimmed_start = text.trim_start();
    if trimmed_start.is_empty() {
        return Range::cursor(from);
    }
    let lead = text.len() - trimmed_start.len();
    let trail = text.len() - text.trim_end().len();
    Range::new(from + lead, to - trail)
}

/// Whether `pos` sits after an unescaped `%` on its line
pub fn is_commented(doc: &str, pos: usize) -> bool {
    let bytes = doc.as_bytes();
    let start = doc[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut i = start;
    while i < pos {
        match bytes[i] {
            b'\\' => i += 2,
            b'%' => return true,
            _ => i += 1,
        }
    }
    false
}
