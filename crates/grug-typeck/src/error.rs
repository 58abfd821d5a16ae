use std::fmt;

use grug_common::CompileError;

/// A fatal error raised while loading the mod API or propagating types
/// through a parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError(CompileError);

impl TypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(CompileError::new(message))
    }

    pub fn message(&self) -> &str {
        self.0.message()
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TypeError {}
