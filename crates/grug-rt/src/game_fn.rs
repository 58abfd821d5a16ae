use crate::value::Value;

/// A host-implemented function callable from grug scripts.
///
/// Returning `Err` raises a [`crate::RuntimeErrorKind::GameFnError`] in
/// the calling on-function; there's no panic boundary here because a
/// single bad game function must not crash the host.
pub type GameFn = Box<dyn Fn(&[Value]) -> Result<Option<Value>, String> + Send + Sync>;
