mod expr;
mod item;
mod stmt;

pub use expr::{BinaryOp, Expr, ExprResult, UnaryOp};
pub use item::{Argument, CompiledFile, GlobalVariable, HelperFn, OnFn};
pub(crate) use item::{DeclKind, Declaration};
pub use stmt::Statement;
