//! Error types for format resolution and parsing.

use std::fmt;

/// Where in the input a syntax error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// A location in the character stream.
    Text {
        /// 1-based line number.
        line: usize,
        /// 1-based column, counted in characters.
        column: usize,
        /// 0-based byte offset from the start of the document.
        offset: usize,
    },
    /// A JSON pointer into a JSON-LD document (e.g. `/@graph/0/name`).
    Path(String),
}

impl Position {
    /// Computes the line/column of a byte offset in `text`.
    ///
    /// Offsets past the end (or inside a multi-byte character) are clamped to
    /// the nearest preceding character boundary.
    #[must_use]
    pub fn at_offset(text: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (i, c) in text.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position::Text {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Text { line, column, .. } => write!(f, "line {line}, column {column}"),
            Position::Path(pointer) if pointer.is_empty() => f.write_str("document root"),
            Position::Path(pointer) => write!(f, "{pointer}"),
        }
    }
}

/// A grammar violation: malformed IRI, unterminated literal, undeclared
/// prefix, invalid JSON structure and the like.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at {position}: {message}")]
pub struct SyntaxError {
    /// Location of the fault.
    pub position: Position,
    /// What was wrong.
    pub message: String,
}

impl SyntaxError {
    /// Creates a syntax error at a text location.
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Creates a syntax error at a byte offset of `text`.
    pub fn at(text: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::new(Position::at_offset(text, offset), message)
    }
}

/// The content type matched no supported grammar.
///
/// Carries the content type exactly as the caller supplied it, parameters
/// included.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported serialization format: {content_type}")]
pub struct UnsupportedFormat {
    /// The unstripped content type.
    pub content_type: String,
}

/// Error returned by [`SerializedFormParser::parse`](crate::SerializedFormParser::parse).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No grammar is registered for the content type.
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    /// The document violates its grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The supplied base IRI is not absolute.
    #[error("base IRI is not absolute: {0}")]
    InvalidBase(String),

    /// The input stream could not be read.
    #[error("failed to read serialized graph: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_line_and_column() {
        let text = "ab\ncd\nef";
        assert_eq!(
            Position::at_offset(text, 4),
            Position::Text {
                line: 2,
                column: 2,
                offset: 4
            }
        );
        assert_eq!(
            Position::at_offset(text, 0),
            Position::Text {
                line: 1,
                column: 1,
                offset: 0
            }
        );
    }

    #[test]
    fn messages_name_the_location() {
        let err = SyntaxError::at("x\ny", 2, "unexpected character");
        assert_eq!(
            err.to_string(),
            "syntax error at line 2, column 1: unexpected character"
        );
        let err = ParseError::from(UnsupportedFormat {
            content_type: "text/csv;header=present".to_owned(),
        });
        assert!(err.to_string().contains("text/csv;header=present"));
    }
}
