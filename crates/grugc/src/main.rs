//! The grug compiler/runtime CLI.
//!
//! Provides the `grugc` command with the following subcommands:
//!
//! - `grugc check` - Type-check every mod file under a mods directory
//! - `grugc run <entity-type> <on-fn>` - Spawn one entity and call an
//!   on-function on it once
//!
//! Options:
//! - `--mods-dir` - Root directory of mods (default "mods")
//! - `--mod-api` - Path to mod_api.json (default "mod_api.json")

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

mod discovery;

#[derive(Parser)]
#[command(name = "grugc", version, about = "The grug scripting engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check every .grug file under the mods directory
    Check {
        #[arg(long = "mods-dir", default_value = "mods")]
        mods_dir: PathBuf,

        #[arg(long = "mod-api", default_value = "mod_api.json")]
        mod_api_path: PathBuf,
    },
    /// Spawn one entity of the given type and call an on-function on it
    Run {
        #[arg(long = "mods-dir", default_value = "mods")]
        mods_dir: PathBuf,

        #[arg(long = "mod-api", default_value = "mod_api.json")]
        mod_api_path: PathBuf,

        /// Entity type to spawn, e.g. "Gun"
        entity_type: String,

        /// on_ function to call, e.g. "on_tick"
        on_fn: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { mods_dir, mod_api_path } => check(&mods_dir, &mod_api_path),
        Commands::Run {
            mods_dir,
            mod_api_path,
            entity_type,
            on_fn,
        } => run(&mods_dir, &mod_api_path, &entity_type, &on_fn),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn load_mod_api(mod_api_path: &Path) -> Result<grug_typeck::ModApi, String> {
    let json = std::fs::read_to_string(mod_api_path)
        .map_err(|e| format!("failed to read '{}': {e}", mod_api_path.display()))?;
    grug_typeck::load_mod_api(&json).map_err(|e| e.to_string())
}

fn compile_file(
    source: &str,
    mod_api: &grug_typeck::ModApi,
    entity_type: &str,
    mod_name: &str,
) -> Result<grug_parser::ast::CompiledFile, String> {
    let tokens = grug_lexer::tokenize(source).map_err(|e| e.to_string())?;
    let mut file = grug_parser::parse(&tokens).map_err(|e| e.to_string())?;
    grug_typeck::check(&mut file, mod_api, entity_type, mod_name).map_err(|e| e.to_string())?;
    Ok(file)
}

/// Type-checks every `.grug` file under `mods_dir`, mirroring the
/// original engine's whole-tree `compile_all_mods` pass.
fn check(mods_dir: &Path, mod_api_path: &Path) -> Result<(), String> {
    let mod_api = load_mod_api(mod_api_path)?;
    let files = discovery::discover_mod_files(mods_dir)?;
    if files.is_empty() {
        return Err(format!("no .grug files found under '{}'", mods_dir.display()));
    }

    for file in &files {
        let source = std::fs::read_to_string(&file.absolute_path)
            .map_err(|e| format!("failed to read '{}': {e}", file.absolute_path.display()))?;
        compile_file(&source, &mod_api, &file.entity_type, &file.mod_name)
            .map_err(|e| format!("{}: {e}", file.relative_path))?;
        println!("ok: {}", file.relative_path);
    }

    Ok(())
}

/// Loads every file implementing `entity_type`, spawns one instance of
/// it, and calls `on_fn` on it once, with the built-in stdlib package
/// registered as game functions.
fn run(mods_dir: &Path, mod_api_path: &Path, entity_type: &str, on_fn: &str) -> Result<(), String> {
    let mod_api = load_mod_api(mod_api_path)?;
    let files = discovery::discover_mod_files(mods_dir)?;
    let matching: Vec<_> = files.iter().filter(|f| f.entity_type == entity_type).collect();
    if matching.is_empty() {
        return Err(format!(
            "no file under '{}' implements entity type '{entity_type}'",
            mods_dir.display()
        ));
    }

    let mut runtime = grug_rt::GrugRuntime::new(
        mod_api.clone(),
        grug_rt::EngineConfig {
            mods_dir_path: mods_dir.to_path_buf(),
            mod_api_path: mod_api_path.to_path_buf(),
            packages: vec![grug_stdlib::package()],
            ..grug_rt::EngineConfig::default()
        },
    );

    for discovered in &matching {
        let source = std::fs::read_to_string(&discovered.absolute_path)
            .map_err(|e| format!("failed to read '{}': {e}", discovered.absolute_path.display()))?;
        let file = compile_file(&source, &mod_api, &discovered.entity_type, &discovered.mod_name)
            .map_err(|e| format!("{}: {e}", discovered.relative_path))?;
        runtime.load_file(
            discovered.mod_name.clone(),
            discovered.entity_type.clone(),
            discovered.relative_path.clone(),
            file,
        );
    }

    let mut entity = runtime.spawn_entity(entity_type).map_err(|e| e.to_string())?;
    runtime.call_on_fn(&mut entity, on_fn, &[]).map_err(|e| e.to_string())?;
    Ok(())
}
