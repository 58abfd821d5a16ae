//! End-to-end integration tests for the grugc CLI.
//!
//! Each test builds a throwaway mods directory, invokes the built `grugc`
//! binary against it, and asserts on the process's exit status and output.

use std::path::PathBuf;
use std::process::Command;

fn find_grugc() -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("cannot find current exe")
        .parent()
        .expect("cannot find parent dir")
        .to_path_buf();

    if path.file_name().map_or(false, |n| n == "deps") {
        path = path.parent().unwrap().to_path_buf();
    }

    let grugc = path.join("grugc");
    assert!(
        grugc.exists(),
        "grugc binary not found at {}. Run `cargo build -p grugc` first.",
        grugc.display()
    );
    grugc
}

const MOD_API: &str = r#"
{
    "entities": {
        "Counter": {
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

fn write_mod_tree(mods_dir: &std::path::Path, source: &str) {
    let mod_dir = mods_dir.join("counters");
    std::fs::create_dir_all(&mod_dir).expect("failed to create mod dir");
    std::fs::write(mod_dir.join("basic-Counter.grug"), source).expect("failed to write grug file");
}

#[test]
fn check_reports_ok_for_a_well_formed_mod() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let mods_dir = temp_dir.path().join("mods");
    write_mod_tree(&mods_dir, "counter: number = 0\n\non_tick() {\n    counter = counter + 1\n}\n");

    let mod_api_path = temp_dir.path().join("mod_api.json");
    std::fs::write(&mod_api_path, MOD_API).expect("failed to write mod_api.json");

    let output = Command::new(find_grugc())
        .args(["check", "--mods-dir"])
        .arg(&mods_dir)
        .args(["--mod-api"])
        .arg(&mod_api_path)
        .output()
        .expect("failed to invoke grugc");

    assert!(
        output.status.success(),
        "grugc check failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("ok: counters/basic-Counter.grug"));
}

#[test]
fn check_reports_a_type_error_and_exits_nonzero() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let mods_dir = temp_dir.path().join("mods");
    write_mod_tree(&mods_dir, "counter: number = true\n\non_tick() {\n}\n");

    let mod_api_path = temp_dir.path().join("mod_api.json");
    std::fs::write(&mod_api_path, MOD_API).expect("failed to write mod_api.json");

    let output = Command::new(find_grugc())
        .args(["check", "--mods-dir"])
        .arg(&mods_dir)
        .args(["--mod-api"])
        .arg(&mod_api_path)
        .output()
        .expect("failed to invoke grugc");

    assert!(!output.status.success(), "expected check to fail but it succeeded");
}

#[test]
fn run_spawns_an_entity_and_calls_an_on_function() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let mods_dir = temp_dir.path().join("mods");
    write_mod_tree(
        &mods_dir,
        "counter: number = 0\n\non_tick() {\n    counter = counter + 1\n    print_number(counter)\n}\n",
    );

    let mod_api_path = temp_dir.path().join("mod_api.json");
    std::fs::write(&mod_api_path, MOD_API).expect("failed to write mod_api.json");

    let output = Command::new(find_grugc())
        .args(["run", "--mods-dir"])
        .arg(&mods_dir)
        .args(["--mod-api"])
        .arg(&mod_api_path)
        .args(["Counter", "on_tick"])
        .output()
        .expect("failed to invoke grugc");

    assert!(
        output.status.success(),
        "grugc run failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn run_fails_when_no_file_implements_the_entity_type() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let mods_dir = temp_dir.path().join("mods");
    write_mod_tree(&mods_dir, "counter: number = 0\n\non_tick() {\n}\n");

    let mod_api_path = temp_dir.path().join("mod_api.json");
    std::fs::write(&mod_api_path, MOD_API).expect("failed to write mod_api.json");

    let output = Command::new(find_grugc())
        .args(["run", "--mods-dir"])
        .arg(&mods_dir)
        .args(["--mod-api"])
        .arg(&mod_api_path)
        .args(["Gun", "on_tick"])
        .output()
        .expect("failed to invoke grugc");

    assert!(!output.status.success(), "expected run to fail but it succeeded");
}
