use std::cell::Cell;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use grug_parser::ast::CompiledFile;
use grug_typeck::ModApi;

use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::error::{RuntimeError, RuntimeErrorHandler};
use crate::flow::Flow;
use crate::game_fn::GameFn;
use crate::interpreter::Interpreter;
use crate::package::Package;
use crate::value::Value;

struct LoadedFile {
    mod_name: String,
    file_path: String,
    compiled: CompiledFile,
}

/// The runtime driver: owns the mod API, the registered game-function
/// table, every loaded compiled file, and the id counter used to spawn
/// entities. Single-threaded; nothing here is `Sync` by accident.
pub struct GrugRuntime {
    mod_api: ModApi,
    game_fns: FxHashMap<String, GameFn>,
    files: FxHashMap<String, LoadedFile>,
    time_limit: Duration,
    error_handler: RuntimeErrorHandler,
    next_id: u64,
    /// Function-call depth, shared across every entity's invocations so a
    /// hook re-entering the engine through a game function still counts
    /// against the same stack-overflow ceiling.
    fn_depth: Cell<usize>,
}

impl GrugRuntime {
    pub fn new(mod_api: ModApi, config: EngineConfig) -> Self {
        let EngineConfig {
            on_fn_time_limit_ms,
            packages,
            runtime_error_handler,
            ..
        } = config;

        let mut runtime = Self {
            mod_api,
            game_fns: FxHashMap::default(),
            files: FxHashMap::default(),
            time_limit: Duration::from_millis(on_fn_time_limit_ms),
            error_handler: runtime_error_handler,
            next_id: 1,
            fn_depth: Cell::new(0),
        };
        for package in packages {
            runtime.register_package(package);
        }
        runtime
    }

    pub fn set_error_handler(&mut self, handler: RuntimeErrorHandler) {
        self.error_handler = handler;
    }

    pub fn mod_api(&self) -> &ModApi {
        &self.mod_api
    }

    /// Registers every game function a package contributes, under its
    /// namespaced name. Later registrations silently replace earlier ones
    /// with the same name, mirroring how a later-loaded mod overrides an
    /// earlier one's game function of the same name.
    pub fn register_package(&mut self, package: Package) {
        for (name, f) in package.into_named_fns() {
            self.game_fns.insert(name, f);
        }
    }

    /// Loads a type-checked file as the implementation for `entity_type`.
    /// Replaces whatever file previously implemented that entity type.
    pub fn load_file(
        &mut self,
        mod_name: impl Into<String>,
        entity_type: impl Into<String>,
        file_path: impl Into<String>,
        compiled: CompiledFile,
    ) {
        self.files.insert(
            entity_type.into(),
            LoadedFile {
                mod_name: mod_name.into(),
                file_path: file_path.into(),
                compiled,
            },
        );
    }

    /// Allocates a new entity of `entity_type`, running its global
    /// variable initializers once against an empty scope.
    pub fn spawn_entity(&mut self, entity_type: &str) -> Result<Entity, RuntimeError> {
        let loaded = self
            .files
            .get(entity_type)
            .unwrap_or_else(|| panic!("no compiled file loaded for entity type '{entity_type}'"));

        let mut globals = FxHashMap::default();
        {
            let mut interpreter = Interpreter {
                runtime: self,
                file: &loaded.compiled,
                globals: &mut globals,
                locals: vec![FxHashMap::default()],
                start_time: Instant::now(),
                time_limit: Duration::MAX,
                current_mod: &loaded.mod_name,
                on_fn_name: "<entity init>",
                file_path: &loaded.file_path,
            };
            for global in &loaded.compiled.global_variables {
                let value = interpreter.eval_expr(&global.value)?;
                interpreter.globals.insert(global.name.clone(), value);
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        Ok(Entity {
            id,
            entity_type: entity_type.to_string(),
            mod_name: loaded.mod_name.clone(),
            globals,
            on_fn_depth: 0,
            start_time: None,
        })
    }

    /// Calls an on-function against a spawned entity. A nested call made
    /// while already inside an on-function invocation (reached through a
    /// game function calling back into the script) shares the outer
    /// call's wall-clock budget rather than resetting it.
    pub fn call_on_fn(&self, entity: &mut Entity, on_fn_name: &str, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        let loaded = self
            .files
            .get(entity.entity_type.as_str())
            .unwrap_or_else(|| panic!("no compiled file loaded for entity type '{}'", entity.entity_type));
        let on_fn = loaded
            .compiled
            .on_fns
            .iter()
            .find(|f| f.name == on_fn_name)
            .unwrap_or_else(|| panic!("entity type '{}' has no on-function '{on_fn_name}'", entity.entity_type));

        if entity.on_fn_depth == 0 {
            entity.start_time = Some(Instant::now());
        }
        entity.on_fn_depth += 1;
        let start_time = entity.start_time.expect("start_time set above");

        let mut locals = vec![FxHashMap::default()];
        for (param, value) in on_fn.arguments.iter().zip(args.iter()) {
            locals[0].insert(param.name.clone(), value.clone());
        }

        let mut interpreter = Interpreter {
            runtime: self,
            file: &loaded.compiled,
            globals: &mut entity.globals,
            locals,
            start_time,
            time_limit: self.time_limit,
            current_mod: &loaded.mod_name,
            on_fn_name,
            file_path: &loaded.file_path,
        };

        let result = interpreter.exec_statements(&on_fn.body);
        entity.on_fn_depth -= 1;

        match result? {
            Flow::Returned(value) => Ok(value),
            _ => Ok(None),
        }
    }

    /// Increments the shared function-call depth and returns the new
    /// value. Paired with [`Self::pop_call_frame`] around every helper
    /// call, regardless of which entity or interpreter made it.
    pub(crate) fn push_call_frame(&self) -> usize {
        let depth = self.fn_depth.get() + 1;
        self.fn_depth.set(depth);
        depth
    }

    pub(crate) fn pop_call_frame(&self) {
        self.fn_depth.set(self.fn_depth.get() - 1);
    }

    pub(crate) fn call_game_fn(&self, name: &str, args: &[Value]) -> Result<Option<Value>, String> {
        match self.game_fns.get(name) {
            Some(f) => f(args),
            None => Err(format!("no game function registered under '{name}'")),
        }
    }

    pub(crate) fn report_error(&self, err: &RuntimeError) {
        (self.error_handler)(err);
    }
}
