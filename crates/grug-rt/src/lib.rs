//! Tree-walking interpreter and runtime driver for compiled grug files.

mod config;
mod engine;
mod entity;
mod error;
mod flow;
mod game_fn;
mod interpreter;
mod package;
mod value;

pub use config::EngineConfig;
pub use engine::GrugRuntime;
pub use entity::Entity;
pub use error::{default_runtime_error_handler, RuntimeError, RuntimeErrorHandler, RuntimeErrorKind};
pub use flow::Flow;
pub use game_fn::GameFn;
pub use interpreter::MAX_DEPTH;
pub use package::Package;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use grug_typeck::ModApi;

    fn compile(source: &str, mod_api: &ModApi, entity_type: &str) -> grug_parser::ast::CompiledFile {
        let tokens = grug_lexer::tokenize(source).expect("tokenizes");
        let mut file = grug_parser::parse(&tokens).expect("parses");
        grug_typeck::check(&mut file, mod_api, entity_type, "test_mod").expect("type-checks");
        file
    }

    fn counter_mod_api() -> ModApi {
        let json = r#"
        {
            "entities": {
                "counter": {
                    "on_functions": {
                        "on_tick": { "arguments": [] }
                    }
                }
            },
            "game_functions": {
                "print_number": { "arguments": [ { "name": "n", "type": "number" } ] }
            }
        }
        "#;
        grug_typeck::load_mod_api(json).expect("loads")
    }

    #[test]
    fn runs_a_global_counter_across_calls() {
        let mod_api = counter_mod_api();
        let source = "counter: number = 0\n\non_tick() {\n    counter = counter + 1\n}\n";
        let file = compile(source, &mod_api, "counter");

        let mut runtime = GrugRuntime::new(mod_api, EngineConfig::default());
        runtime.load_file("test_mod", "counter", "test_mod/counter-Counter.grug", file);
        let mut entity = runtime.spawn_entity("counter").expect("spawns");

        runtime.call_on_fn(&mut entity, "on_tick", &[]).expect("calls");
        runtime.call_on_fn(&mut entity, "on_tick", &[]).expect("calls");

        assert_eq!(entity.global("counter"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn calls_a_registered_game_function() {
        let mod_api = counter_mod_api();
        let source = "counter: number = 0\n\non_tick() {\n    print_number(counter)\n}\n";
        let file = compile(source, &mod_api, "counter");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let mut runtime = GrugRuntime::new(mod_api, EngineConfig::default());
        runtime.register_package(Package::new("").add(
            "print_number",
            Box::new(move |args: &[Value]| {
                seen_clone.lock().unwrap().push(args[0].as_number().unwrap());
                Ok(None)
            }),
        ));
        runtime.load_file("test_mod", "counter", "test_mod/counter-Counter.grug", file);
        let mut entity = runtime.spawn_entity("counter").expect("spawns");

        runtime.call_on_fn(&mut entity, "on_tick", &[]).expect("calls");
        assert_eq!(*seen.lock().unwrap(), vec![0.0]);
    }

    #[test]
    fn division_by_zero_does_not_trap() {
        let mod_api = counter_mod_api();
        let source = "counter: number = 0\n\non_tick() {\n    counter = 1 / counter\n}\n";
        let file = compile(source, &mod_api, "counter");

        let mut runtime = GrugRuntime::new(mod_api, EngineConfig::default());
        runtime.load_file("test_mod", "counter", "test_mod/counter-Counter.grug", file);
        let mut entity = runtime.spawn_entity("counter").expect("spawns");
        runtime.call_on_fn(&mut entity, "on_tick", &[]).expect("calls");

        match entity.global("counter") {
            Some(Value::Number(n)) => assert!(n.is_infinite()),
            other => panic!("expected an infinite number, got {other:?}"),
        }
    }

    #[test]
    fn a_failing_game_function_surfaces_as_game_fn_error() {
        let mod_api = counter_mod_api();
        let source = "counter: number = 0\n\non_tick() {\n    print_number(counter)\n}\n";
        let file = compile(source, &mod_api, "counter");

        let mut runtime = GrugRuntime::new(mod_api, EngineConfig::default());
        runtime.register_package(
            Package::new("").add("print_number", Box::new(|_args: &[Value]| Err("boom".to_string()))),
        );
        runtime.load_file("test_mod", "counter", "test_mod/counter-Counter.grug", file);
        let mut entity = runtime.spawn_entity("counter").expect("spawns");

        let err = runtime.call_on_fn(&mut entity, "on_tick", &[]).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::GameFnError);
    }

    #[test]
    fn an_infinite_loop_hits_the_time_limit() {
        let mod_api = counter_mod_api();
        let source = "counter: number = 0\n\non_tick() {\n    while true {\n        counter = counter + 1\n    }\n}\n";
        let file = compile(source, &mod_api, "counter");

        let mut runtime = GrugRuntime::new(mod_api, EngineConfig { on_fn_time_limit_ms: 0, ..EngineConfig::default() });
        runtime.load_file("test_mod", "counter", "test_mod/counter-Counter.grug", file);
        let mut entity = runtime.spawn_entity("counter").expect("spawns");

        let err = runtime.call_on_fn(&mut entity, "on_tick", &[]).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::TimeLimitExceeded);
    }

    #[test]
    fn unbounded_recursion_is_a_stack_overflow() {
        let json = r#"
        {
            "entities": {
                "counter": {
                    "on_functions": {
                        "on_tick": { "arguments": [] }
                    }
                }
            },
            "game_functions": {}
        }
        "#;
        let mod_api = grug_typeck::load_mod_api(json).expect("loads");
        let source = concat!(
            "on_tick() {\n",
            "    recurse()\n",
            "}\n",
            "\n",
            "recurse() {\n",
            "    recurse()\n",
            "}\n",
        );
        let file = compile(source, &mod_api, "counter");

        let mut runtime = GrugRuntime::new(mod_api, EngineConfig::default());
        runtime.load_file("test_mod", "counter", "test_mod/counter-Counter.grug", file);
        let mut entity = runtime.spawn_entity("counter").expect("spawns");

        let err = runtime.call_on_fn(&mut entity, "on_tick", &[]).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::StackOverflow);
    }
}
