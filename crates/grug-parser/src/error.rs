use std::fmt;

use grug_common::CompileError;

/// A fatal parse error, reported with the 1-based line of the token that
/// triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(CompileError);

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(CompileError::new(message))
    }

    pub fn message(&self) -> &str {
        self.0.message()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}
