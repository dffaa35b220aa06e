// === PUBLIC CONTRACT ===
// Other crates consume the records module through the contract only
pub mod contract;

pub use contract::{
    client, error, model, Credentials, NewSched, NewUser, RecordId, RecordKind, Sched, SchedPatch,
    User, UserPatch,
};

// === MODULE DEFINITION ===
pub mod config;
pub mod module;
pub use module::RecordsModule;

// === INTERNAL MODULES ===
// Exposed for tests; not a stable API. Use `contract` instead.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
