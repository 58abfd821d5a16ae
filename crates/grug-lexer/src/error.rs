use std::fmt;

use grug_common::CompileError;

/// A fatal tokenizer error.
///
/// The scan stops at the first one; there is no partial token stream
/// returned on failure, and no recoverable error token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerError(CompileError);

impl TokenizerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(CompileError::new(message))
    }

    pub fn message(&self) -> &str {
        self.0.message()
    }
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TokenizerError {}
