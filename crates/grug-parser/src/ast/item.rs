use grug_common::Type;

use super::expr::Expr;
use super::stmt::Statement;

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVariable {
    pub name: String,
    pub declared_type: Type,
    pub declared_type_name: Option<String>,
    pub value: Expr,
}

/// An `on_`-prefixed function, invoked by the host engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OnFn {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub body: Vec<Statement>,
}

/// A helper function, callable only from other grug code.
#[derive(Debug, Clone, PartialEq)]
pub struct HelperFn {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub return_type: Option<Type>,
    pub return_type_name: Option<String>,
    pub body: Vec<Statement>,
}

/// The parsed form of a single grug source file, before type propagation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledFile {
    pub global_variables: Vec<GlobalVariable>,
    pub on_fns: Vec<OnFn>,
    pub helper_fns: Vec<HelperFn>,
}

/// A single top-level item as the parser encounters it, in source order.
/// Folded into a [`CompiledFile`] once the whole file has been read and its
/// ordering and blank-line rules have been checked; `Comment`/`EmptyLine`
/// don't carry forward since nothing downstream of parsing consumes them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Declaration {
    Global(GlobalVariable),
    OnFn(OnFn),
    HelperFn(HelperFn),
    Comment(String),
    EmptyLine,
}

/// The three kinds of top-level item the ordering rule actually cares
/// about: globals must come first, then on-functions, then helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum DeclKind {
    Global,
    OnFn,
    HelperFn,
}

impl Declaration {
    pub(crate) fn kind(&self) -> Option<DeclKind> {
        match self {
            Declaration::Global(_) => Some(DeclKind::Global),
            Declaration::OnFn(_) => Some(DeclKind::OnFn),
            Declaration::HelperFn(_) => Some(DeclKind::HelperFn),
            Declaration::Comment(_) | Declaration::EmptyLine => None,
        }
    }
}
