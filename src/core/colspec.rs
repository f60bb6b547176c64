//! Column specifier grammar
//!
//! Reads and writes the compact per-column descriptor of a `tabular`
//! (`|l|c|r|`, `p{2cm}`, `>{\bfseries}c`). The same grammar serves the
//! table-level declaration and the embedded specifier of a `\multicolumn`.
//!
//! `generate_column_specification(&parse_column_specifications(s)) == s` for
//! every specifier made of letters and `|`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl ColumnAlignment {
    /// Parse from LaTeX column letter
    pub fn from_latex_char(c: char) -> Self {
        match c {
            'c' => ColumnAlignment::Center,
            'r' => ColumnAlignment::Right,
            // l, and the paragraph types p/m/b/X which typeset flush left
            _ => ColumnAlignment::Left,
        }
    }

    /// Convert to LaTeX column letter
    pub fn to_latex_char(&self) -> char {
        match self {
            ColumnAlignment::Left => 'l',
            ColumnAlignment::Center => 'c',
            ColumnAlignment::Right => 'r',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnAlignment::Left => "left",
            ColumnAlignment::Center => "center",
            ColumnAlignment::Right => "right",
        }
    }
}

/// One column of a specifier
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnDefinition {
    pub alignment: ColumnAlignment,
    /// Number of `|` rules left of the column
    pub border_left: usize,
    /// Number of `|` rules right of the column
    pub border_right: usize,
    /// Raw column text without borders, e.g. `l`, `p{2cm}`, `>{\bfseries}c`
    pub content: String,
}

impl ColumnDefinition {
    /// A plain borderless column
    pub fn new(alignment: ColumnAlignment) -> Self {
        ColumnDefinition {
            alignment,
            border_left: 0,
            border_right: 0,
            content: alignment.to_latex_char().to_string(),
        }
    }

    /// Switch the column to `alignment`, returns whether anything changed
    ///
    /// Markup in front of the column letter (`>{...}`) is kept; the letter and
    /// any width argument are replaced by the single alignment letter.
    pub fn set_alignment(&mut self, alignment: ColumnAlignment) -> bool {
        if self.alignment == alignment {
            return false;
        }
        self.alignment = alignment;
        let letter_at = column_letter_offset(&self.content).unwrap_or(0);
        self.content.truncate(letter_at);
        self.content.push(alignment.to_latex_char());
        true
    }
}

/// Byte offset of the first letter outside any `{}` group
fn column_letter_offset(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in content.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && c.is_ascii_alphabetic() => return Some(i),
            _ => {}
        }
    }
    None
}

/// Read a balanced `{...}` group starting at the `{` at byte `start`
///
/// Returns the byte offset just past the closing brace (or the end of input).
fn group_end(spec: &str, start: usize) -> usize {
    let mut depth = 0usize;
    for (i, c) in spec[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return start + i + 1;
                }
            }
            _ => {}
        }
    }
    spec.len()
}

/// Parse a column specifier into its columns
pub fn parse_column_specifications(specification: &str) -> Vec<ColumnDefinition> {
    let mut columns: Vec<ColumnDefinition> = Vec::new();
    // `|` seen before the next column letter
    let mut pending_borders = 0;
    // Markup such as `>{...}` or `@{...}` waiting for the next column letter
    let mut prefix = String::new();

    let mut pos = 0;
    while let Some(c) = specification[pos..].chars().next() {
        let next = pos + c.len_utf8();
        match c {
            '|' => match columns.last_mut() {
                Some(last) if prefix.is_empty() && pending_borders == 0 => {
                    last.border_right += 1;
                }
                _ => pending_borders += 1,
            },
            '{' => {
                let end = group_end(specification, pos);
                let group = &specification[pos..end];
                match columns.last_mut() {
                    Some(last) if prefix.is_empty() && pending_borders == 0 => {
                        last.content.push_str(group)
                    }
                    _ => prefix.push_str(group),
                }
                pos = end;
                continue;
            }
            c if c.is_whitespace() => {}
            c if c.is_ascii_alphabetic() => {
                prefix.push(c);
                columns.push(ColumnDefinition {
                    alignment: ColumnAlignment::from_latex_char(c),
                    border_left: pending_borders,
                    border_right: 0,
                    content: std::mem::take(&mut prefix),
                });
                pending_borders = 0;
            }
            other => prefix.push(other),
        }
        pos = next;
    }

    if let Some(last) = columns.last_mut() {
        last.content.push_str(&prefix);
        last.border_right += pending_borders;
    }
    columns
}

/// Render columns back into a specifier
pub fn generate_column_specification(columns: &[ColumnDefinition]) -> String {
    columns
        .iter()
        .map(|column| {
            format!(
                "{}{}{}",
                "|".repeat(column.border_left),
                column.content,
                "|".repeat(column.border_right)
            )
        })
        .collect()
}

/// Rewrite a specifier so every column has exactly one rule on each side
///
/// Existing rules are collapsed, so the result is the same for `lcr`,
/// `|l|c|r|` and `||l||c|r`. Bracketed content passes through unchanged.
pub fn add_column_borders_to_specification(specification: &str) -> String {
    let mut columns = parse_column_specifications(specification);
    for (i, column) in columns.iter_mut().enumerate() {
        column.border_left = usize::from(i == 0);
        column.border_right = 1;
    }
    generate_column_specification(&columns)
}

/// Remove every `|` outside bracketed content
pub fn remove_column_borders_from_specification(specification: &str) -> String {
    let mut depth = 0usize;
    let mut output = String::with_capacity(specification.len());
    for c in specification.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => continue,
            _ => {}
        }
        output.push(c);
    }
    output
}
