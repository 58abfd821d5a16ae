use grug_common::Type;

use super::expr::Expr;

/// A statement inside an on-function or helper-function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `name: type = value` (declaration) or `name = value` (reassignment,
    /// when `declared_type` is `None`).
    Variable {
        name: String,
        declared_type: Option<Type>,
        declared_type_name: Option<String>,
        value: Expr,
    },
    /// A bare call expression used as a statement.
    Call(Expr),
    If {
        condition: Expr,
        if_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },
    While {
        condition: Expr,
        body: Vec<Statement>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    /// A `# ...` comment line, kept only for the statement list's shape.
    Comment(String),
    /// A blank line between statements.
    EmptyLine,
}
