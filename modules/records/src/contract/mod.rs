pub mod client;
pub mod error;
pub mod model;

pub use model::{
    Credentials, NewSched, NewUser, RecordId, RecordKind, Sched, SchedPatch, User, UserPatch,
};
