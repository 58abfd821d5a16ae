use std::fmt;

/// The three ways an otherwise well-typed on-function can fail at
/// runtime. Every one of them is fatal to the call that raised it; none
/// is a panic, since a single misbehaving entity must not take down the
/// host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Helper-function call nesting exceeded the depth ceiling.
    StackOverflow,
    /// The on-function ran past its configured wall-clock budget.
    TimeLimitExceeded,
    /// A game function returned an error.
    GameFnError,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuntimeErrorKind::StackOverflow => "stack overflow",
            RuntimeErrorKind::TimeLimitExceeded => "time limit exceeded",
            RuntimeErrorKind::GameFnError => "game function error",
        };
        write!(f, "{s}")
    }
}

/// What the host's runtime error callback receives: the failure kind, a
/// human-readable reason, which outermost on-function was executing, and
/// which source file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub reason: String,
    pub on_fn_name: String,
    pub file_path: String,
}

impl RuntimeError {
    pub fn new(
        kind: RuntimeErrorKind,
        reason: impl Into<String>,
        on_fn_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            reason: reason.into(),
            on_fn_name: on_fn_name.into(),
            file_path: file_path.into(),
        }
    }

    pub fn stack_overflow(fn_name: &str, on_fn_name: &str, file_path: &str) -> Self {
        Self::new(
            RuntimeErrorKind::StackOverflow,
            format!("call to '{fn_name}' exceeded the maximum call depth"),
            on_fn_name,
            file_path,
        )
    }

    pub fn time_limit_exceeded(on_fn_name: &str, file_path: &str) -> Self {
        Self::new(
            RuntimeErrorKind::TimeLimitExceeded,
            format!("'{on_fn_name}' exceeded its time limit"),
            on_fn_name,
            file_path,
        )
    }

    pub fn game_fn_error(fn_name: &str, message: &str, on_fn_name: &str, file_path: &str) -> Self {
        Self::new(
            RuntimeErrorKind::GameFnError,
            format!("game function '{fn_name}' failed: {message}"),
            on_fn_name,
            file_path,
        )
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (in '{}', {})", self.kind, self.reason, self.on_fn_name, self.file_path)
    }
}

impl std::error::Error for RuntimeError {}

/// The callback the host registers to observe runtime errors. Invoked
/// once per error, just before the error unwinds the on-function call
/// that raised it.
pub type RuntimeErrorHandler = Box<dyn Fn(&RuntimeError) + Send + Sync>;

pub fn default_runtime_error_handler() -> RuntimeErrorHandler {
    Box::new(|err: &RuntimeError| {
        eprintln!("grug runtime error: {err}");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_reason() {
        let err = RuntimeError::stack_overflow("helper_recurse", "on_tick", "mods/foo/bar-Counter.grug");
        let rendered = err.to_string();
        assert!(rendered.starts_with("stack overflow:"));
        assert!(rendered.contains("on_tick"));
        assert!(rendered.contains("bar-Counter.grug"));
    }
}
