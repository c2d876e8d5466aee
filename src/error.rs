//! Error types shared by the loader, the query engine, and the formatter.

use std::io;
use thiserror::Error;

/// Errors produced by the search library.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The raw index is not a sequence of well-formed entries.
    ///
    /// `position` is the zero-based index of the offending entry, or `None`
    /// when the document as a whole could not be parsed.
    #[error("{}", format_error_message(.position, .message))]
    Format {
        position: Option<usize>,
        message: String,
    },

    /// The query string is empty or cannot be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Direct access past the end of the store.
    #[error("entry index {index} out of range (store has {len} entries)")]
    OutOfRange { index: usize, len: usize },

    /// I/O error while reading an index file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SearchError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        SearchError::Format {
            position: None,
            message: message.into(),
        }
    }

    pub(crate) fn entry(position: usize, message: impl Into<String>) -> Self {
        SearchError::Format {
            position: Some(position),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        SearchError::InvalidQuery(message.into())
    }
}

fn format_error_message(position: &Option<usize>, message: &str) -> String {
    match position {
        Some(pos) => format!("malformed index entry at position {}: {}", pos, message),
        None => format!("malformed index: {}", message),
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_reports_position() {
        let err = SearchError::entry(3, "missing field `text`");
        assert_eq!(
            err.to_string(),
            "malformed index entry at position 3: missing field `text`"
        );
    }

    #[test]
    fn test_format_error_without_position() {
        let err = SearchError::format("expected an array");
        assert_eq!(err.to_string(), "malformed index: expected an array");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = SearchError::OutOfRange { index: 7, len: 2 };
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("2 entries"));
    }
}
