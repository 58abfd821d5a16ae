//! Tokenizer for grug source files.
//!
//! Walks source text into a flat token stream, including structurally
//! significant whitespace (`Space`, `Indentation`, `Newline`) that the
//! parser later uses to enforce blank-line and indentation discipline.
//! Nothing here is recoverable: the first malformed character aborts the
//! whole scan and no partial token stream is returned.

mod cursor;
mod error;

use cursor::Cursor;
use grug_common::diagnostic::char_line_of;
use grug_common::{keyword_from_str, Token, TokenKind};

pub use error::TokenizerError;

const SPACES_PER_INDENT: usize = 4;

pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);

    while let Some(c) = cursor.peek() {
        match c {
            '(' => single(&mut cursor, &mut tokens, TokenKind::LParen),
            ')' => single(&mut cursor, &mut tokens, TokenKind::RParen),
            '{' => single(&mut cursor, &mut tokens, TokenKind::LBrace),
            '}' => single(&mut cursor, &mut tokens, TokenKind::RBrace),
            '+' => single(&mut cursor, &mut tokens, TokenKind::Plus),
            '-' => single(&mut cursor, &mut tokens, TokenKind::Minus),
            '*' => single(&mut cursor, &mut tokens, TokenKind::Star),
            '/' => single(&mut cursor, &mut tokens, TokenKind::Slash),
            ',' => single(&mut cursor, &mut tokens, TokenKind::Comma),
            ':' => single(&mut cursor, &mut tokens, TokenKind::Colon),
            '=' => lex_maybe_eq(&mut cursor, &mut tokens, '=', TokenKind::Assign, TokenKind::EqEq),
            '!' => lex_bang(&mut cursor, source, &mut tokens)?,
            '>' => lex_maybe_eq(&mut cursor, &mut tokens, '=', TokenKind::Gt, TokenKind::GtEq),
            '<' => lex_maybe_eq(&mut cursor, &mut tokens, '=', TokenKind::Lt, TokenKind::LtEq),
            '\n' => {
                cursor.advance();
                tokens.push(Token::new(TokenKind::Newline, "\n"));
            }
            '\r' => lex_crlf(&mut cursor, source, &mut tokens)?,
            ' ' => lex_whitespace(&mut cursor, source, &mut tokens)?,
            '#' => lex_comment(&mut cursor, source, &mut tokens)?,
            '"' => lex_string(&mut cursor, source, &mut tokens)?,
            c if c.is_ascii_digit() => lex_number(&mut cursor, source, &mut tokens)?,
            c if is_ident_start(c) => lex_word(&mut cursor, &mut tokens),
            c => {
                let start = cursor.pos();
                return Err(error_at(source, start, format!("Unexpected character '{c}'")));
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, ""));
    Ok(tokens)
}

fn single(cursor: &mut Cursor, tokens: &mut Vec<Token>, kind: TokenKind) {
    let start = cursor.pos();
    cursor.advance();
    tokens.push(Token::new(kind, cursor.slice(start, cursor.pos())));
}

fn lex_maybe_eq(
    cursor: &mut Cursor,
    tokens: &mut Vec<Token>,
    next: char,
    single_kind: TokenKind,
    double_kind: TokenKind,
) {
    let start = cursor.pos();
    cursor.advance();
    if cursor.peek() == Some(next) {
        cursor.advance();
        tokens.push(Token::new(double_kind, cursor.slice(start, cursor.pos())));
    } else {
        tokens.push(Token::new(single_kind, cursor.slice(start, cursor.pos())));
    }
}

fn lex_bang(cursor: &mut Cursor, source: &str, tokens: &mut Vec<Token>) -> Result<(), TokenizerError> {
    let start = cursor.pos();
    cursor.advance();
    if cursor.peek() == Some('=') {
        cursor.advance();
        tokens.push(Token::new(TokenKind::NotEq, cursor.slice(start, cursor.pos())));
        Ok(())
    } else {
        Err(error_at(source, start, "Expected '=' after '!'".to_string()))
    }
}

fn lex_crlf(cursor: &mut Cursor, source: &str, tokens: &mut Vec<Token>) -> Result<(), TokenizerError> {
    let start = cursor.pos();
    cursor.advance();
    if cursor.peek() == Some('\n') {
        cursor.advance();
        tokens.push(Token::new(TokenKind::Newline, cursor.slice(start, cursor.pos())));
        Ok(())
    } else {
        Err(error_at(source, start, "Expected '\\n' after '\\r'".to_string()))
    }
}

fn lex_whitespace(cursor: &mut Cursor, source: &str, tokens: &mut Vec<Token>) -> Result<(), TokenizerError> {
    let start = cursor.pos();
    cursor.eat_while(|c| c == ' ');
    let len = cursor.pos() - start;
    let lexeme = cursor.slice(start, cursor.pos());
    if len == 1 {
        tokens.push(Token::new(TokenKind::Space, lexeme));
        Ok(())
    } else if len % SPACES_PER_INDENT == 0 {
        tokens.push(Token::new(TokenKind::Indentation, lexeme));
        Ok(())
    } else {
        Err(error_at(
            source,
            start,
            format!("Indentation must be a multiple of {SPACES_PER_INDENT} spaces, got {len}"),
        ))
    }
}

fn lex_comment(cursor: &mut Cursor, source: &str, tokens: &mut Vec<Token>) -> Result<(), TokenizerError> {
    let start = cursor.pos();
    cursor.advance(); // '#'
    if cursor.peek() != Some(' ') {
        return Err(error_at(source, start, "Expected a single space after '#'".to_string()));
    }
    cursor.advance(); // the space
    let content_start = cursor.pos();
    cursor.eat_while(|c| c != '\n' && c != '\r');
    let content = cursor.slice(content_start, cursor.pos());
    if content.is_empty() {
        return Err(error_at(source, start, "Comments can't be empty".to_string()));
    }
    if content.ends_with(' ') || content.ends_with('\t') {
        return Err(error_at(source, start, "Comments can't have trailing whitespace".to_string()));
    }
    if content.chars().any(|c| c.is_control()) {
        return Err(error_at(
            source,
            start,
            "Comments can only contain printable characters".to_string(),
        ));
    }
    tokens.push(Token::new(TokenKind::Comment, cursor.slice(start, cursor.pos())));
    Ok(())
}

fn lex_string(cursor: &mut Cursor, source: &str, tokens: &mut Vec<Token>) -> Result<(), TokenizerError> {
    let start = cursor.pos();
    cursor.advance(); // opening quote
    loop {
        match cursor.peek() {
            Some('"') => {
                cursor.advance();
                break;
            }
            Some('\n') | Some('\r') | None => {
                return Err(error_at(source, start, "Unterminated string".to_string()));
            }
            Some(_) => {
                cursor.advance();
            }
        }
    }
    tokens.push(Token::new(TokenKind::String, cursor.slice(start, cursor.pos())));
    Ok(())
}

fn lex_number(cursor: &mut Cursor, source: &str, tokens: &mut Vec<Token>) -> Result<(), TokenizerError> {
    let start = cursor.pos();
    cursor.eat_while(|c| c.is_ascii_digit());
    if cursor.peek() == Some('.') {
        let dot_pos = cursor.pos();
        cursor.advance();
        if !cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(error_at(source, dot_pos, "Missing digit after decimal point".to_string()));
        }
        cursor.eat_while(|c| c.is_ascii_digit());
        if cursor.peek() == Some('.') {
            return Err(error_at(
                source,
                cursor.pos(),
                "A number can't have more than one decimal point".to_string(),
            ));
        }
    }
    tokens.push(Token::new(TokenKind::Number, cursor.slice(start, cursor.pos())));
    Ok(())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex_word(cursor: &mut Cursor, tokens: &mut Vec<Token>) {
    let start = cursor.pos();
    cursor.advance();
    cursor.eat_while(is_ident_continue);
    let word = cursor.slice(start, cursor.pos());
    let kind = keyword_from_str(word).unwrap_or(TokenKind::Word);
    tokens.push(Token::new(kind, word));
}

fn error_at(source: &str, pos: usize, message: String) -> TokenizerError {
    let line = char_line_of(source, pos);
    TokenizerError::new(format!("line {line}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_keywords_and_identifiers() {
        assert_eq!(
            kinds("if else while"),
            vec![
                TokenKind::If,
                TokenKind::Space,
                TokenKind::Else,
                TokenKind::Space,
                TokenKind::While,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("iffy"), vec![TokenKind::Word, TokenKind::Eof]);
    }

    #[test]
    fn tokenizes_operators() {
        let toks = tokenize("== != >= <= > < = + - * /").unwrap();
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::EqEq));
        assert!(kinds.contains(&TokenKind::NotEq));
        assert!(kinds.contains(&TokenKind::GtEq));
        assert!(kinds.contains(&TokenKind::LtEq));
        assert!(kinds.contains(&TokenKind::Gt));
        assert!(kinds.contains(&TokenKind::Lt));
        assert!(kinds.contains(&TokenKind::Assign));
    }

    #[test]
    fn bare_bang_is_fatal() {
        assert!(tokenize("!").is_err());
        assert!(tokenize("a != b").is_ok());
    }

    #[test]
    fn tokenizes_numbers() {
        assert_eq!(kinds("123"), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("3.14"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn rejects_trailing_decimal_point() {
        let err = tokenize("3.").unwrap_err();
        assert!(err.message().contains("Missing digit"));
    }

    #[test]
    fn rejects_two_decimal_points() {
        let err = tokenize("3.1.4").unwrap_err();
        assert!(err.message().contains("more than one decimal point"));
    }

    #[test]
    fn tokenizes_strings() {
        assert_eq!(kinds("\"hello\""), vec![TokenKind::String, TokenKind::Eof]);
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = tokenize("\"hello").unwrap_err();
        assert!(err.message().contains("Unterminated string"));
    }

    #[test]
    fn tokenizes_comments() {
        let toks = tokenize("# a comment").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Comment);
        assert_eq!(toks[0].lexeme, "# a comment");
    }

    #[test]
    fn rejects_comment_without_space() {
        assert!(tokenize("#no space").is_err());
    }

    #[test]
    fn rejects_empty_comment() {
        assert!(tokenize("# ").is_err());
    }

    #[test]
    fn rejects_comment_trailing_whitespace() {
        assert!(tokenize("# trailing ").is_err());
    }

    #[test]
    fn single_space_is_space_token() {
        assert_eq!(kinds("a b"), vec![TokenKind::Word, TokenKind::Space, TokenKind::Word, TokenKind::Eof]);
    }

    #[test]
    fn four_spaces_is_indentation_token() {
        assert_eq!(kinds("    a"), vec![TokenKind::Indentation, TokenKind::Word, TokenKind::Eof]);
    }

    #[test]
    fn non_multiple_of_four_indentation_is_fatal() {
        assert!(tokenize("   a").is_err());
        assert!(tokenize("  a").is_err());
    }

    #[test]
    fn crlf_is_single_newline_token() {
        assert_eq!(kinds("a\r\nb"), vec![TokenKind::Word, TokenKind::Newline, TokenKind::Word, TokenKind::Eof]);
    }

    #[test]
    fn lone_cr_is_fatal() {
        assert!(tokenize("a\rb").is_err());
    }

    #[test]
    fn unexpected_character_is_fatal() {
        assert!(tokenize("@").is_err());
    }
}
