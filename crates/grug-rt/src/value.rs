use std::fmt;

/// A runtime value.
///
/// `resource` and `entity` don't survive past the type propagator as
/// distinct runtime representations: both are plain strings by the time
/// the interpreter sees them, formatted once when their literal is first
/// evaluated (`{mod}/{path}` for a resource, `{mod}:{name}` for an entity
/// reference that doesn't already carry a mod prefix).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    /// An opaque engine-assigned handle.
    Id(u64),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Id(id) => write!(f, "{id}"),
        }
    }
}
