use crate::game_fn::GameFn;

/// A bundle of game functions registered under a common name prefix.
///
/// Mirrors how the standard library package registers its functions: a
/// package with an empty prefix contributes names as-is (`print_string`),
/// while a non-empty prefix namespaces them (`physics_apply_force`).
pub struct Package {
    pub prefix: String,
    pub game_fns: Vec<(String, GameFn)>,
}

impl Package {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            game_fns: Vec::new(),
        }
    }

    pub fn add(mut self, name: impl Into<String>, f: GameFn) -> Self {
        self.game_fns.push((name.into(), f));
        self
    }

    /// The fully-qualified names this package contributes to a runtime's
    /// game-function table.
    pub fn into_named_fns(self) -> Vec<(String, GameFn)> {
        if self.prefix.is_empty() {
            self.game_fns
        } else {
            self.game_fns
                .into_iter()
                .map(|(name, f)| (format!("{}_{}", self.prefix, name), f))
                .collect()
        }
    }
}
