//! Line and blank-line helpers
//!
//! Used when a caption is placed next to a table: the inserted block must land
//! on its own line, and blank runs at the destination are consumed so that
//! moving a caption back and forth does not accumulate empty lines.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::changes::Range;

/// Vertical direction relative to a position in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Above,
    Below,
}

/// A line of the document, `to` excludes the line break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    pub from: usize,
    pub to: usize,
}

impl Line {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }

    pub fn text<'a>(&self, doc: &'a str) -> &'a str {
        &doc[self.from..self.to]
    }

    /// Empty or whitespace only
    pub fn is_blank(&self, doc: &str) -> bool {
        self.text(doc).trim().is_empty()
    }
}

/// The line containing `pos` (clamped to the document)
pub fn line_at(doc: &str, pos: usize) -> Line {
    let mut pos = pos.min(doc.len());
    while !doc.is_char_boundary(pos) {
        pos -= 1;
    }
    let from = doc[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let to = doc[pos..].find('\n').map(|i| pos + i).unwrap_or(doc.len());
    let number = doc[..from].matches('\n').count() + 1;
    Line { number, from, to }
}

fn previous_line(doc: &str, line: &Line) -> Option<Line> {
    (line.from > 0).then(|| line_at(doc, line.from - 1))
}

fn next_line(doc: &str, line: &Line) -> Option<Line> {
    (line.to < doc.len()).then(|| line_at(doc, line.to + 1))
}

/// Start of the earliest blank line among up to `limit` lines above `line`
pub fn extend_backwards_over_empty_lines(doc: &str, line: &Line, limit: usize) -> usize {
    let mut from = line.from;
    let mut current = *line;
    for _ in 0..limit {
        match previous_line(doc, &current) {
            Some(prev) if prev.is_blank(doc) => {
                from = prev.from;
                current = prev;
            }
            _ => break,
        }
    }
    from
}

/// End of the last blank line among up to `limit` lines below `line`
pub fn extend_forwards_over_empty_lines(doc: &str, line: &Line, limit: usize) -> usize {
    let mut to = line.to;
    let mut current = *line;
    for _ in 0..limit {
        match next_line(doc, &current) {
            Some(next) if next.is_blank(doc) => {
                to = next.to;
                current = next;
            }
            _ => break,
        }
    }
    to
}

/// Where to insert a block so it sits on its own line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyLineInsertion {
    pub pos: usize,
    pub prefix: &'static str,
    pub suffix: &'static str,
}

/// Find an insertion point on a line of its own next to `pos`
///
/// If the line at `pos` already is blank the block goes right there. Otherwise
/// the neighbouring line in `direction` is used, and a line break is added to
/// `prefix`/`suffix` whenever that neighbour has text of its own.
pub fn ensure_empty_line(doc: &str, pos: usize, direction: Direction) -> EmptyLineInsertion {
    let line = line_at(doc, pos);
    if line.is_blank(doc) {
        return EmptyLineInsertion {
            pos: pos.min(doc.len()),
            prefix: "",
            suffix: "",
        };
    }

    match direction {
        Direction::Below => match next_line(doc, &line) {
            Some(next) => EmptyLineInsertion {
                pos: next.from,
                prefix: "",
                suffix: if next.is_empty() { "" } else { "\n" },
            },
            None => EmptyLineInsertion {
                pos: doc.len(),
                prefix: "\n",
                suffix: "",
            },
        },
        Direction::Above => match previous_line(doc, &line) {
            Some(prev) => EmptyLineInsertion {
                pos: prev.to,
                prefix: if prev.is_empty() { "" } else { "\n" },
                suffix: "",
            },
            None => EmptyLineInsertion {
                pos: 0,
                prefix: "",
                suffix: "\n",
            },
        },
    }
}

/// The range to replace when inserting at `pos`, swallowing up to `lines` blank lines
pub fn gobble_empty_lines(doc: &str, pos: usize, lines: usize, direction: Direction) -> Range {
    let line = line_at(doc, pos);
    if !line.is_empty() {
        return Range::cursor(pos);
    }
    match direction {
        Direction::Above => Range::new(extend_backwards_over_empty_lines(doc, &line, lines), pos),
        Direction::Below => Range::new(pos, extend_forwards_over_empty_lines(doc, &line, lines)),
    }
}

/// Widen `range` to its whole line (including the line break) if nothing else is on that line
pub fn whole_line_extent(doc: &str, range: Range) -> Range {
    let line = line_at(doc, range.from);
    if range.to > line.to || line.text(doc).trim() != range.slice(doc).trim() {
        return range;
    }
    if line.to < doc.len() {
        Range::new(line.from, line.to + 1)
    } else if line.from > 0 {
        Range::new(line.from - 1, line.to)
    } else {
        Range::new(line.from, line.to)
    }
}
