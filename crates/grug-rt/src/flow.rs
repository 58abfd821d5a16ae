use crate::value::Value;

/// How a statement (or block of statements) finished executing.
///
/// Control flow is an explicit enum threaded back up through
/// `exec_statement`/`exec_statements` rather than `break`/`continue`/
/// `return` unwinding through exceptions: a `break` three blocks deep is
/// just a `Flow::Broke` that every enclosing `if` passes straight through
/// until a `while` loop catches it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Broke,
    Continued,
    Returned(Option<Value>),
}

impl Flow {
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }
}
