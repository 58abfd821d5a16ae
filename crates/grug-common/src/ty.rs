use std::fmt;

use serde::Serialize;

/// The closed set of types in grug.
///
/// `Resource` and `Entity` are refinements of `String` that only arise at
/// argument positions once the type propagator rewrites a `StringExpr`;
/// they never appear as a variable's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Bool,
    Number,
    String,
    Resource,
    Entity,
    /// An opaque 64-bit handle, optionally tagged with an entity-type name
    /// carried alongside in `type_name` wherever a `Type::Id` appears.
    Id,
}

impl Type {
    /// Parse a type name the way the mod API / source text spells it.
    ///
    /// Anything that isn't one of the five named primitives is an entity
    /// tag and is treated as `Type::Id` with that tag carried alongside.
    pub fn from_name(name: &str) -> Type {
        match name {
            "bool" => Type::Bool,
            "number" => Type::Number,
            "string" => Type::String,
            "resource" => Type::Resource,
            "entity" => Type::Entity,
            _ => Type::Id,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Type::Bool => "bool",
            Type::Number => "number",
            Type::String => "string",
            Type::Resource => "resource",
            Type::Entity => "entity",
            Type::Id => "id",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_maps_primitives() {
        assert_eq!(Type::from_name("bool"), Type::Bool);
        assert_eq!(Type::from_name("number"), Type::Number);
        assert_eq!(Type::from_name("string"), Type::String);
        assert_eq!(Type::from_name("resource"), Type::Resource);
        assert_eq!(Type::from_name("entity"), Type::Entity);
    }

    #[test]
    fn from_name_maps_unknown_to_id() {
        assert_eq!(Type::from_name("id"), Type::Id);
        assert_eq!(Type::from_name("Dog"), Type::Id);
        assert_eq!(Type::from_name("Cat"), Type::Id);
    }
}
