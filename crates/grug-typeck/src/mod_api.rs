use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::TypeError;

/// The host-defined interface grug scripts are validated and run against:
/// which entity types exist, which `on_` functions the engine calls on
/// them, and which game functions scripts may call.
///
/// Field order is load-bearing: every map here must already be sorted by
/// key in `mod_api.json`, and [`load`] rejects the file otherwise. This is
/// why every map is an [`IndexMap`] rather than a `BTreeMap` — the latter
/// would silently re-sort the keys and hide a violation instead of
/// catching it.
#[derive(Debug, Clone, Deserialize)]
pub struct ModApi {
    pub entities: IndexMap<String, EntityApi>,
    #[serde(default)]
    pub game_functions: IndexMap<String, GameFnApi>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityApi {
    #[serde(default)]
    pub on_functions: IndexMap<String, OnFnApi>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnFnApi {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ApiArgument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameFnApi {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ApiArgument>,
    #[serde(default)]
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Required file extension (e.g. `".png"`) for a `resource`-typed argument.
    #[serde(default)]
    pub resource_extension: Option<String>,
    /// Entity-type tag for an `id`-typed argument, as an alternative to
    /// spelling the tag directly in `type`.
    #[serde(default)]
    pub entity_type: Option<String>,
}

pub fn load(json: &str) -> Result<ModApi, TypeError> {
    let api: ModApi =
        serde_json::from_str(json).map_err(|e| TypeError::new(format!("invalid mod_api.json: {e}")))?;

    check_sorted("entities", api.entities.keys())?;
    for (entity_name, entity) in &api.entities {
        check_sorted(
            &format!("entities.{entity_name}.on_functions"),
            entity.on_functions.keys(),
        )?;
    }
    check_sorted("game_functions", api.game_functions.keys())?;

    Ok(api)
}

fn check_sorted<'a>(context: &str, keys: impl Iterator<Item = &'a String>) -> Result<(), TypeError> {
    let mut previous: Option<&String> = None;
    for key in keys {
        if let Some(prev) = previous {
            if key < prev {
                return Err(TypeError::new(format!(
                    "{context} must be declared in alphabetical order, but '{key}' comes after '{prev}'"
                )));
            }
        }
        previous = Some(key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_minimal_mod_api() {
        let json = r#"{
            "entities": {
                "dog": { "on_functions": { "on_spawn": { "arguments": [] } } }
            },
            "game_functions": {
                "print_string": { "arguments": [{ "name": "string", "type": "string" }] }
            }
        }"#;
        let api = load(json).unwrap();
        assert!(api.entities.contains_key("dog"));
        assert!(api.game_functions.contains_key("print_string"));
    }

    #[test]
    fn rejects_unsorted_entities() {
        let json = r#"{
            "entities": {
                "wolf": { "on_functions": {} },
                "dog": { "on_functions": {} }
            }
        }"#;
        assert!(load(json).is_err());
    }

    #[test]
    fn rejects_unsorted_on_functions() {
        let json = r#"{
            "entities": {
                "dog": {
                    "on_functions": {
                        "on_tick": { "arguments": [] },
                        "on_spawn": { "arguments": [] }
                    }
                }
            }
        }"#;
        assert!(load(json).is_err());
    }
}
