use rustc_hash::FxHashMap;

use grug_common::Type;

/// What the propagator knows about one variable: its closed type, plus an
/// entity-type tag when `ty` is `Type::Id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: Type,
    pub type_name: Option<String>,
}

/// A stack of lexical scopes, searched innermost-first.
///
/// Function bodies push a scope on entry and pop it on exit; `if`/`while`
/// bodies do the same for their own blocks, so a variable declared inside
/// one doesn't leak into a sibling branch or past the loop.
pub struct TypeEnv {
    scopes: Vec<FxHashMap<String, Binding>>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the global scope");
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: Type, type_name: Option<String>) {
        self.scopes
            .last_mut()
            .expect("at least one scope")
            .insert(name.into(), Binding { ty, type_name });
    }

    /// Binds a new variable, rejecting the reserved name `me` and rejecting
    /// any name already bound in an outer or the current scope. Used for
    /// every declaration a script makes; `me` itself is seeded with
    /// [`Self::insert`] instead, since it isn't a script declaration.
    pub fn declare(&mut self, name: impl Into<String>, ty: Type, type_name: Option<String>) -> Result<(), String> {
        let name = name.into();
        if name == "me" {
            return Err("'me' is reserved and can't be declared".to_string());
        }
        if self.lookup(&name).is_some() {
            return Err(format!("'{name}' shadows an existing variable"));
        }
        self.insert(name, ty, type_name);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Whether `name` is bound in the outermost (global) scope.
    pub fn is_global(&self, name: &str) -> bool {
        self.scopes[0].contains_key(name)
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_rejects_shadowing_an_outer_binding() {
        let mut env = TypeEnv::new();
        env.declare("x", Type::Number, None).unwrap();
        env.push_scope();
        assert!(env.declare("x", Type::Bool, None).is_err());
        assert_eq!(env.lookup("x").unwrap().ty, Type::Number);
    }

    #[test]
    fn declare_rejects_the_reserved_name_me() {
        let mut env = TypeEnv::new();
        assert!(env.declare("me", Type::Id, Some("dog".to_string())).is_err());
    }

    #[test]
    fn pop_scope_removes_locals() {
        let mut env = TypeEnv::new();
        env.push_scope();
        env.insert("y", Type::Bool, None);
        env.pop_scope();
        assert!(env.lookup("y").is_none());
    }

    #[test]
    fn is_global_checks_outermost_scope_only() {
        let mut env = TypeEnv::new();
        env.insert("g", Type::Number, None);
        env.push_scope();
        env.insert("l", Type::Number, None);
        assert!(env.is_global("g"));
        assert!(!env.is_global("l"));
    }
}
