use std::path::PathBuf;
use std::time::Duration;

use crate::error::{default_runtime_error_handler, RuntimeErrorHandler};
use crate::package::Package;

/// Everything needed to construct a [`crate::GrugRuntime`]: where the mod
/// API and mod tree live on disk, the wall-clock budget per outermost
/// on-function call, which game-function packages to register at
/// startup, and how to observe runtime errors.
///
/// `mod_api_path`/`mods_dir_path` are carried here as plain configuration
/// even though `grug-rt` never touches the filesystem itself — reading
/// them and feeding the results to [`crate::GrugRuntime::load_file`] is
/// `grugc`'s job, not the engine's.
pub struct EngineConfig {
    pub mod_api_path: PathBuf,
    pub mods_dir_path: PathBuf,
    pub on_fn_time_limit_ms: u64,
    pub packages: Vec<Package>,
    pub runtime_error_handler: RuntimeErrorHandler,
}

impl EngineConfig {
    pub fn on_fn_time_limit(&self) -> Duration {
        Duration::from_millis(self.on_fn_time_limit_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mod_api_path: PathBuf::from("mod_api.json"),
            mods_dir_path: PathBuf::from("mods"),
            on_fn_time_limit_ms: 100,
            packages: Vec::new(),
            runtime_error_handler: default_runtime_error_handler(),
        }
    }
}
