//! Recursive-descent parser for grug source text.
//!
//! Tokens carry no position, so diagnostics recompute a line number from
//! the token's index on demand. Whitespace tokens (`Space`, `Indentation`,
//! `Newline`) are not skipped here the way a typical lexer-consumer would
//! skip them; the grammar consumes them at precise points to enforce the
//! single-space-around-operators and indentation-nesting discipline of
//! grug source files.

pub mod ast;
mod error;
mod parser;

use grug_common::Token;

pub use ast::CompiledFile;
pub use error::ParseError;
pub use parser::MAX_PARSE_DEPTH;

pub fn parse(tokens: &[Token]) -> Result<CompiledFile, ParseError> {
    parser::Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{BinaryOp, Expr, Statement};

    fn toks(source: &str) -> Vec<Token> {
        grug_lexer::tokenize(source).expect("source should tokenize")
    }

    #[test]
    fn parses_global_variable() {
        let file = parse(&toks("health: number = 100\n")).unwrap();
        assert_eq!(file.global_variables.len(), 1);
        assert_eq!(file.global_variables[0].name, "health");
    }

    #[test]
    fn parses_on_fn_with_call_statement() {
        let src = "on_spawn() {\n    print_string(\"hi\")\n}\n";
        let file = parse(&toks(src)).unwrap();
        assert_eq!(file.on_fns.len(), 1);
        assert_eq!(file.on_fns[0].name, "on_spawn");
        assert_eq!(file.on_fns[0].body.len(), 1);
        assert!(matches!(file.on_fns[0].body[0], Statement::Call(Expr::Call { .. })));
    }

    #[test]
    fn parses_helper_fn_with_return_type() {
        let src = "on_tick() {\n    double(2)\n}\n\ndouble(x: number): number {\n    return x * 2\n}\n";
        let file = parse(&toks(src)).unwrap();
        assert_eq!(file.helper_fns.len(), 1);
        let helper = &file.helper_fns[0];
        assert_eq!(helper.name, "double");
        assert_eq!(helper.arguments.len(), 1);
        assert!(matches!(helper.body[0], Statement::Return(Some(_))));
    }

    #[test]
    fn rejects_helper_fn_never_called_before_its_definition() {
        let src = "double(x: number): number {\n    return x * 2\n}\n";
        assert!(parse(&toks(src)).is_err());
    }

    #[test]
    fn rejects_blank_line_between_two_globals() {
        let src = "a: number = 1\n\nb: number = 2\n";
        assert!(parse(&toks(src)).is_err());
    }

    #[test]
    fn accepts_two_consecutive_globals_with_no_blank_line() {
        let src = "a: number = 1\nb: number = 2\n";
        let file = parse(&toks(src)).unwrap();
        assert_eq!(file.global_variables.len(), 2);
    }

    #[test]
    fn rejects_global_after_an_on_fn() {
        let src = "on_tick() {\n    break\n}\n\na: number = 1\n";
        assert!(parse(&toks(src)).is_err());
    }

    #[test]
    fn parses_a_comment_between_items() {
        let src = "a: number = 1\n\n# a helper\non_tick() {\n    break\n}\n";
        let file = parse(&toks(src)).unwrap();
        assert_eq!(file.global_variables.len(), 1);
        assert_eq!(file.on_fns.len(), 1);
    }

    #[test]
    fn parses_a_comment_and_blank_line_inside_a_block() {
        let src = "on_tick() {\n    # count it\n    counter = 1\n\n    break\n}\n";
        let file = parse(&toks(src)).unwrap();
        assert!(matches!(file.on_fns[0].body[0], Statement::Comment(_)));
        assert!(matches!(file.on_fns[0].body[2], Statement::EmptyLine));
    }

    #[test]
    fn parses_if_else_statement() {
        let src = "on_tick() {\n    if true {\n        return\n    } else {\n        return\n    }\n}\n";
        let file = parse(&toks(src)).unwrap();
        let Statement::If { if_body, else_body, .. } = &file.on_fns[0].body[0] else {
            panic!("expected an if statement");
        };
        assert_eq!(if_body.len(), 1);
        assert_eq!(else_body.len(), 1);
    }

    #[test]
    fn parses_while_statement() {
        let src = "on_tick() {\n    while true {\n        break\n    }\n}\n";
        let file = parse(&toks(src)).unwrap();
        assert!(matches!(file.on_fns[0].body[0], Statement::While { .. }));
    }

    #[test]
    fn binary_operator_requires_exactly_one_space() {
        let src = "x: number = 1+2\n";
        assert!(parse(&toks(src)).is_err());
    }

    #[test]
    fn binary_expression_parses_with_single_spaces() {
        let file = parse(&toks("x: number = 1 + 2\n")).unwrap();
        let Expr::Binary { op, .. } = &file.global_variables[0].value else {
            panic!("expected a binary expression");
        };
        assert_eq!(*op, BinaryOp::Plus);
    }

    #[test]
    fn rejects_wrong_indentation_multiple() {
        let src = "on_tick() {\n  return\n}\n";
        // the lexer itself rejects non-multiple-of-4 indentation
        assert!(grug_lexer::tokenize(src).is_err());
    }

    #[test]
    fn empty_block_is_rejected() {
        let src = "on_tick() {\n}\n";
        assert!(parse(&toks(src)).is_err());
    }

    #[test]
    fn parses_reassignment_statement() {
        let src = "on_tick() {\n    x = 5\n}\n";
        // `x` was never declared here, but the parser doesn't check that;
        // the type propagator does.
        let file = parse(&toks(src)).unwrap();
        assert!(matches!(
            file.on_fns[0].body[0],
            Statement::Variable { declared_type: None, .. }
        ));
    }
}
