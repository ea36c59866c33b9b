use crate::base::TextRange;

/// A syntax error recorded during parsing.
///
/// Parse errors are data, not failures: the parser recovers and keeps
/// producing a partial tree so resolution stays usable while the user is
/// mid-edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{range:?}: {message}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse output: the (possibly partial) content plus any errors.
#[derive(Debug)]
pub struct ParseResult<T> {
    pub content: T,
    pub errors: Vec<ParseError>,
}

impl<T> ParseResult<T> {
    pub fn ok(content: T) -> Self {
        Self {
            content,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(content: T, errors: Vec<ParseError>) -> Self {
        Self { content, errors }
    }

    /// Check if parsing succeeded without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
