//! Options for the edit planners
//!
//! Carries the literal LaTeX tokens the planners emit, so callers with a
//! house style (`\\` vs `\tabularnewline`, booktabs rules) can swap them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::colspec::ColumnAlignment;

/// Options for table edits
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditOptions {
    /// Token inserted for every new cell boundary
    /// Default: `" &"`
    pub cell_separator: String,

    /// Token ending an inserted row
    /// Default: `"\\"`
    pub row_terminator: String,

    /// Horizontal rule used by the fully bordered theme
    /// Default: `"\hline"`
    pub hline: String,

    /// Caption inserted when a table has none
    pub default_caption: String,

    /// Label inserted along with a new caption
    pub default_label: String,

    /// Alignment letter of a freshly merged cell
    /// Default: center
    pub merge_alignment: ColumnAlignment,

    /// Give a merged cell the outer `|` rules of the columns it replaces
    /// Default: true
    pub merge_inherits_borders: bool,

    /// Blank lines swallowed at the destination of a moved caption
    /// Default: 2
    pub blank_lines_to_consume: usize,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            cell_separator: " &".to_string(),
            row_terminator: "\\\\".to_string(),
            hline: "\\hline".to_string(),
            default_caption: "\\caption{Caption}".to_string(),
            default_label: "\\label{tab:my_table}".to_string(),
            merge_alignment: ColumnAlignment::Center,
            merge_inherits_borders: true,
            blank_lines_to_consume: 2,
        }
    }
}

impl EditOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Merged cells are always centred and borderless
    pub fn legacy() -> Self {
        Self {
            merge_inherits_borders: false,
            ..Self::default()
        }
    }

    /// Bare separator written between cells restored by an unmerge
    pub fn bare_separator(&self) -> &str {
        self.cell_separator.trim()
    }
}
