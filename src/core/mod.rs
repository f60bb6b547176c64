//! Core table editing modules
//!
//! This module contains the editing engine:
//! - `colspec`: column specifier grammar
//! - `model`: read-only table snapshot and selection
//! - `parser`: reference scanner producing snapshots from LaTeX source
//! - `commands`: structural edit planners

pub mod colspec;
pub mod commands;
pub mod model;
pub mod options;
pub mod parser;

// Re-export main types and functions
pub use colspec::{
    add_column_borders_to_specification, generate_column_specification,
    parse_column_specifications, remove_column_borders_from_specification, ColumnAlignment,
    ColumnDefinition,
};
pub use commands::{apply_command, BorderTheme, CommandOutcome, EditResult, TableCommand};
pub use model::{CellPosition, TableSelection, TableSnapshot};
pub use options::EditOptions;
pub use parser::{parse_table, parse_table_at, parse_tables};
