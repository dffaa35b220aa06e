use std::fmt;

/// Surrogate key assigned by the store.
pub type RecordId = i32;

/// Which record family an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Sched,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Sched => f.write_str("schedule"),
        }
    }
}

/// Stored user account (no serde: transport shapes live in `api::rest::dto`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub fullname: Option<String>,
    /// Login name; not unique in the store.
    pub username: Option<String>,
    /// Cleartext secret.
    pub password: Option<String>,
    pub address: Option<String>,
}

/// Data for creating a user; every field is required to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// Partial update; only non-empty values are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// Stored appointment. `date` and `time` are free-form strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sched {
    pub id: RecordId,
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

/// Data for creating an appointment; `title` and `reason` are required.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSched {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedPatch {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

/// Login name + secret presented for a credential check.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
