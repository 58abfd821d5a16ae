//! Shared types for the grug engine.
//!
//! Holds the token vocabulary, the closed `Type` set, and the plain-string
//! diagnostic convention every compile stage (tokenizer, parser, type
//! propagator) uses to report fatal errors.

pub mod diagnostic;
pub mod token;
pub mod ty;

pub use diagnostic::CompileError;
pub use token::{keyword_from_str, Token, TokenKind};
pub use ty::Type;
