//! # tabedit
//!
//! Structural edit planner for LaTeX `tabular` environments.
//!
//! ## Features
//!
//! - **Pure planners**: every command maps a table snapshot and a selection
//!   to one batch of non-overlapping text replacements
//! - **Column specifier grammar**: round-trips `|l|c|r|`, `p{2cm}`, `>{..}c`
//! - **Merged cells**: `\multicolumn` aware insertion, removal and alignment
//! - **Captions**: moves or removes a caption and label next to the table
//! - **WASM Support**: compiles to WebAssembly for browser editors
//!
//! ## Usage Examples
//!
//! ### Editing a table in one step
//!
//! ```rust
//! use tabedit::{edit_table, TableCommand, TableSelection};
//! use tabedit::core::ColumnAlignment;
//!
//! let doc = r"\begin{tabular}{lcr} a & b & c \\ d & e & f \\ \end{tabular}";
//! let column = TableSelection::new((0, 1).into(), (1, 1).into());
//! let edited = edit_table(
//!     doc,
//!     0,
//!     column,
//!     &TableCommand::SetAlignment { alignment: ColumnAlignment::Right },
//! )
//! .unwrap();
//! assert!(edited.starts_with(r"\begin{tabular}{lrr}"));
//! ```
//!
//! ### Planning without applying
//!
//! ```rust
//! use tabedit::{parse_table, EditOptions, TableCommand, TableSelection};
//!
//! let doc = r"\begin{tabular}{ll} a & b \\ \end{tabular}";
//! let snapshot = parse_table(doc).unwrap();
//! let selection = TableSelection::new((0, 0).into(), (0, 1).into());
//! let outcome = TableCommand::MergeCells.plan(&snapshot, &selection, &EditOptions::default());
//! assert_eq!(outcome.changes.len(), 1);
//! ```

/// Core editing modules
pub mod core;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core types and functions
pub use core::commands;
pub use core::{
    apply_command, parse_table, parse_table_at, parse_tables, BorderTheme, CellPosition,
    CommandOutcome, EditOptions, EditResult, TableCommand, TableSelection, TableSnapshot,
};

// Re-export utilities
pub use utils::changes::{ChangeSet, ChangeSpec, Range};
pub use utils::error::{TableError, TableResult};
pub use utils::lines::Direction;

/// Apply `command` to the table at `offset` and return the edited document
///
/// # Arguments
/// * `doc` - LaTeX source
/// * `offset` - Byte offset inside the table to edit
/// * `selection` - Selected cells
/// * `command` - The edit to perform
pub fn edit_table(
    doc: &str,
    offset: usize,
    selection: TableSelection,
    command: &TableCommand,
) -> TableResult<String> {
    edit_table_with_options(doc, offset, selection, command, &EditOptions::default())
}

/// Apply `command` to the table at `offset` with custom options
pub fn edit_table_with_options(
    doc: &str,
    offset: usize,
    selection: TableSelection,
    command: &TableCommand,
    options: &EditOptions,
) -> TableResult<String> {
    apply_command(doc, offset, Some(selection), command, options).map(|result| result.document)
}
