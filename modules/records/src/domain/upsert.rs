//! Write rules shared by users and schedules: required-field checks on
//! create and the "non-empty wins" merge on update.

use crate::contract::model::{NewSched, NewUser, Sched, SchedPatch, User, UserPatch};
use crate::domain::error::DomainError;

/// Inputs that name the fields a create must carry.
pub trait RequiredFields {
    fn required(&self) -> Vec<(&'static str, Option<&str>)>;
}

impl RequiredFields for NewUser {
    fn required(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("fullname", self.fullname.as_deref()),
            ("username", self.username.as_deref()),
            ("password", self.password.as_deref()),
            ("address", self.address.as_deref()),
        ]
    }
}

impl RequiredFields for NewSched {
    fn required(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![("title", self.title.as_deref()), ("reason", self.reason.as_deref())]
    }
}

/// Absent and empty values both count as missing; nothing is trimmed.
pub fn check_required<T: RequiredFields>(input: &T) -> Result<(), DomainError> {
    let missing: Vec<&'static str> = input
        .required()
        .into_iter()
        .filter(|(_, value)| value.map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::missing_fields(missing))
    }
}

/// Records that accept a partial update.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

fn merge_field(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming.filter(|v| !v.is_empty()) {
        *slot = Some(value);
    }
}

impl Merge for User {
    type Patch = UserPatch;

    fn merge(&mut self, patch: UserPatch) {
        merge_field(&mut self.fullname, patch.fullname);
        merge_field(&mut self.username, patch.username);
        merge_field(&mut self.password, patch.password);
        merge_field(&mut self.address, patch.address);
    }
}

impl Merge for Sched {
    type Patch = SchedPatch;

    fn merge(&mut self, patch: SchedPatch) {
        merge_field(&mut self.date, patch.date);
        merge_field(&mut self.time, patch.time);
        merge_field(&mut self.title, patch.title);
        merge_field(&mut self.reason, patch.reason);
    }
}
