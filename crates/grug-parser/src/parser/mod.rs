mod expressions;
mod items;

use std::collections::HashSet;

use grug_common::diagnostic::line_of;
use grug_common::{Token, TokenKind};

use crate::ast::{CompiledFile, DeclKind, Declaration};
use crate::error::ParseError;

/// Parsing nesting (expression depth and block nesting together) is capped
/// the same way the interpreter caps call-stack depth.
pub const MAX_PARSE_DEPTH: usize = 100;
pub(crate) const SPACES_PER_INDENT: usize = 4;

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    /// Every name that has appeared as a call's callee so far, in any
    /// expression position (global initializers, on-function bodies,
    /// helper bodies). Checked against each helper's own name the moment
    /// it's defined, enforcing call-before-define.
    called_names: HashSet<String>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            called_names: HashSet::new(),
        }
    }

    pub fn parse(&mut self) -> Result<CompiledFile, ParseError> {
        let mut declarations = Vec::new();
        let mut last_kind: Option<DeclKind> = None;
        let mut last_was_comment = false;
        let mut first = true;
        while self.peek_kind() != TokenKind::Eof {
            // A comment needs no blank line on either side: it can sit
            // glued directly against the item before or after it. The
            // blank-line rule only governs the gap between two real items.
            if !first && !last_was_comment && self.peek_kind() != TokenKind::Comment {
                let both_globals = last_kind == Some(DeclKind::Global) && self.next_is_global();
                if both_globals {
                    if self.peek_kind() == TokenKind::Newline {
                        return Err(self.error("a blank line isn't allowed between two consecutive global variables"));
                    }
                } else {
                    self.expect(TokenKind::Newline)?;
                    declarations.push(Declaration::EmptyLine);
                }
            }
            first = false;

            let decl = self.parse_declaration()?;
            last_was_comment = matches!(decl, Declaration::Comment(_));
            if let Some(kind) = decl.kind() {
                if let Some(last) = last_kind {
                    if kind < last {
                        return Err(self.error(
                            "globals must come before any on-function, and on-functions before any helper function",
                        ));
                    }
                }
                last_kind = Some(kind);
            }
            declarations.push(decl);
        }

        let mut file = CompiledFile::default();
        for decl in declarations {
            match decl {
                Declaration::Global(g) => file.global_variables.push(g),
                Declaration::OnFn(f) => file.on_fns.push(f),
                Declaration::HelperFn(f) => file.helper_fns.push(f),
                Declaration::Comment(_) | Declaration::EmptyLine => {}
            }
        }
        Ok(file)
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens.get(self.pos).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn current(&self) -> &'t Token {
        match self.tokens.get(self.pos) {
            Some(tok) => tok,
            None => self.tokens.last().expect("token stream always ends with Eof"),
        }
    }

    fn bump(&mut self) -> &'t Token {
        let tok = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'t Token, ParseError> {
        if self.peek_kind() == kind {
            Ok(self.bump())
        } else {
            let found = self.peek_kind();
            Err(self.error(format!("expected {kind:?}, found {found:?}")))
        }
    }

    fn expect_word(&mut self) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Word)?.lexeme.clone())
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let line = line_of(self.tokens, self.pos);
        ParseError::new(format!("line {line}: {}", message.into()))
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(self.error("nesting exceeds the maximum depth"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}
