use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// Persistent state for one spawned instance of an entity type, carried
/// across every `call_on_fn` invocation made against it.
///
/// `on_fn_depth` tracks on-function re-entrancy (an on-function calling a
/// game function that, in turn, calls back into another on-function on
/// the same entity) so that only the outermost call starts the wall-clock
/// budget; a re-entrant call inherits the budget already in flight.
pub struct Entity {
    pub id: u64,
    pub entity_type: String,
    pub mod_name: String,
    pub(crate) globals: FxHashMap<String, Value>,
    pub(crate) on_fn_depth: usize,
    pub(crate) start_time: Option<Instant>,
}

impl Entity {
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }
}
