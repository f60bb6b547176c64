//! Error handling for Tabedit
//!
//! Planners never fail: an inapplicable command yields an empty change set.
//! The error type covers the collaborators around them, i.e. the reference
//! scanner, change application and selection validation.

use std::fmt;

/// Table editing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The source could not be scanned into a table model
    ParseError {
        message: String,
        offset: Option<usize>,
    },
    /// A change lies outside the document or splits a character
    InvalidRange {
        from: usize,
        to: usize,
        length: usize,
    },
    /// Two changes of one batch overlap
    OverlappingChanges {
        first: (usize, usize),
        second: (usize, usize),
    },
    /// A selection addresses cells outside the table
    InvalidSelection { message: String },
    /// IO error (CLI only)
    IoError { message: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::ParseError { message, offset } => {
                if let Some(o) = offset {
                    write!(f, "Parse error at offset {}: {}", o, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            TableError::InvalidRange { from, to, length } => {
                write!(
                    f,
                    "Invalid range {}..{} for document of length {}",
                    from, to, length
                )
            }
            TableError::OverlappingChanges { first, second } => {
                write!(
                    f,
                    "Overlapping changes {}..{} and {}..{}",
                    first.0, first.1, second.0, second.1
                )
            }
            TableError::InvalidSelection { message } => {
                write!(f, "Invalid selection: {}", message)
            }
            TableError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

// Convenience constructors for errors
impl TableError {
    pub fn parse(message: impl Into<String>) -> Self {
        TableError::ParseError {
            message: message.into(),
            offset: None,
        }
    }

    pub fn parse_at(message: impl Into<String>, offset: usize) -> Self {
        TableError::ParseError {
            message: message.into(),
            offset: Some(offset),
        }
    }

    pub fn selection(message: impl Into<String>) -> Self {
        TableError::InvalidSelection {
            message: message.into(),
        }
    }
}
