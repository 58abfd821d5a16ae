//! Type propagation and mod API validation for grug.
//!
//! Runs after parsing: loads and validates `mod_api.json`, then walks a
//! parsed file in three passes — globals, `on_` functions, helper
//! functions — back-annotating every expression's [`ExprResult`] and
//! rejecting anything the closed type system doesn't allow.

mod env;
mod error;
mod mod_api;
mod propagator;
mod validate;

pub use error::TypeError;
pub use mod_api::{load as load_mod_api, ApiArgument, EntityApi, GameFnApi, ModApi, OnFnApi};
pub use propagator::check;
pub use validate::{validate_entity_string, validate_resource_string};

#[cfg(test)]
mod tests {
    use super::*;
    use grug_parser::CompiledFile;

    fn parse(source: &str) -> CompiledFile {
        let tokens = grug_lexer::tokenize(source).expect("tokenizes");
        grug_parser::parse(&tokens).expect("parses")
    }

    const API: &str = r#"{
        "entities": {
            "dog": {
                "on_functions": {
                    "on_spawn": { "arguments": [] },
                    "on_tick": { "arguments": [] }
                }
            }
        },
        "game_functions": {
            "print_number": { "arguments": [{ "name": "n", "type": "number" }] }
        }
    }"#;

    #[test]
    fn checks_a_well_formed_file() {
        let mut file = parse("on_spawn() {\n    print_number(1)\n}\n");
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_ok());
    }

    #[test]
    fn rejects_undeclared_on_fn() {
        let mut file = parse("on_despawn() {\n    print_number(1)\n}\n");
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_err());
    }

    #[test]
    fn rejects_wrong_argument_type() {
        let mut file = parse("on_spawn() {\n    print_number(true)\n}\n");
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_err());
    }

    #[test]
    fn rejects_out_of_order_on_fns() {
        let mut file = parse("on_tick() {\n    print_number(1)\n}\n\non_spawn() {\n    print_number(1)\n}\n");
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_err());
    }

    #[test]
    fn helper_function_can_be_called_before_its_definition() {
        let src = "on_spawn() {\n    helper_double(1)\n}\n\nhelper_double(x: number): number {\n    return x * 2\n}\n";
        let mut file = parse(src);
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_ok());
    }

    #[test]
    fn rejects_global_initializer_calling_helper_fn() {
        let src = "count: number = helper_one()\n\non_spawn() {\n    print_number(1)\n}\n\nhelper_one(): number {\n    return 1\n}\n";
        let mut file = parse(src);
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_err());
    }

    #[test]
    fn rejects_break_outside_loop() {
        let src = "on_spawn() {\n    break\n}\n";
        let mut file = parse(src);
        let api = load_mod_api(API).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_err());
    }

    #[test]
    fn id_wildcard_matches_tagged_id() {
        let api_json = r#"{
            "entities": {
                "dog": {
                    "on_functions": {
                        "on_spawn": { "arguments": [{ "name": "target", "type": "id" }] }
                    }
                }
            },
            "game_functions": {}
        }"#;
        let mut file = parse("on_spawn(target: id) {\n    x: id = target\n}\n");
        let api = load_mod_api(api_json).unwrap();
        assert!(check(&mut file, &api, "dog", "vanilla").is_ok());
    }
}
