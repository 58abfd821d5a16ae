use serde::Serialize;

/// A single lexical token.
///
/// Tokens carry no position by construction: a compile stage that needs a
/// line number recomputes it on demand by counting `Newline` tokens up to
/// the token's index (see [`crate::diagnostic::line_of`]). This trades a
/// few bytes of storage for never having a stale span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }
}

/// Every kind of token the tokenizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ── Delimiters ───────────────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,

    // ── Operators and punctuation ───────────────────────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Comma,
    Colon,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `>=`
    GtEq,
    /// `<=`
    LtEq,
    Gt,
    Lt,

    // ── Keywords ─────────────────────────────────────────────────────
    And,
    Or,
    Not,
    True,
    False,
    If,
    Else,
    While,
    Break,
    Return,
    Continue,

    // ── Identifiers and literals ─────────────────────────────────────
    Word,
    Number,
    String,
    Comment,

    // ── Whitespace (structurally significant) ────────────────────────
    /// A single space between two tokens on the same line.
    Space,
    /// A run of 2+ spaces, always a multiple of 4.
    Indentation,
    Newline,

    Eof,
}

/// Look up a keyword from its string representation.
///
/// The tokenizer only calls this once it has already scanned the full
/// identifier run, so a word boundary is implicit.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "break" => Some(TokenKind::Break),
        "return" => Some(TokenKind::Return),
        "continue" => Some(TokenKind::Continue),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_all_keywords() {
        let keywords = [
            ("and", TokenKind::And),
            ("or", TokenKind::Or),
            ("not", TokenKind::Not),
            ("true", TokenKind::True),
            ("false", TokenKind::False),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("while", TokenKind::While),
            ("break", TokenKind::Break),
            ("return", TokenKind::Return),
            ("continue", TokenKind::Continue),
        ];
        for (s, expected) in keywords {
            assert_eq!(keyword_from_str(s), Some(expected));
        }
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("iffy"), None);
        assert_eq!(keyword_from_str("And"), None); // case-sensitive
        assert_eq!(keyword_from_str(""), None);
    }

    #[test]
    fn token_new_constructor() {
        let tok = Token::new(TokenKind::Word, "on_tick");
        assert_eq!(tok.kind, TokenKind::Word);
        assert_eq!(tok.lexeme, "on_tick");
    }
}
