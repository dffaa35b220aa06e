use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{
    Credentials, NewSched, NewUser, RecordId, Sched, SchedPatch, User, UserPatch,
};

/// Response envelope shared by every record endpoint: `{"message", "data"?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn with_data(message: &str, data: T) -> Self {
        Self {
            message: message.to_owned(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            data: None,
        }
    }
}

/// Message-only envelope (successful deletes, login, all errors)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

/// REST DTO for a stored user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserDto {
    pub id: RecordId,
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// REST DTO for creating a user; `name` and `email` are accepted as aliases.
/// Sending a field under both its name and its alias is a malformed payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    #[serde(alias = "name")]
    pub fullname: Option<String>,
    #[serde(alias = "email")]
    pub username: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// REST DTO for updating a user (partial, non-empty values win)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserReq {
    #[serde(alias = "name")]
    pub fullname: Option<String>,
    #[serde(alias = "email")]
    pub username: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// REST DTO for a stored schedule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SchedDto {
    pub id: RecordId,
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSchedReq {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSchedReq {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

/// JSON login body, used when no `Authorization` header is sent
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResp {
    pub response: String,
}

// Documentation-only shapes of the envelope, one per payload type.

#[derive(ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub data: UserDto,
}

#[derive(ToSchema)]
pub struct UserListEnvelope {
    pub message: String,
    pub data: Vec<UserDto>,
}

#[derive(ToSchema)]
pub struct SchedEnvelope {
    pub message: String,
    pub data: SchedDto,
}

#[derive(ToSchema)]
pub struct SchedListEnvelope {
    pub message: String,
    pub data: Vec<SchedDto>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            fullname: u.fullname,
            username: u.username,
            password: u.password,
            address: u.address,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            fullname: req.fullname,
            username: req.username,
            password: req.password,
            address: req.address,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            fullname: req.fullname,
            username: req.username,
            password: req.password,
            address: req.address,
        }
    }
}

impl From<Sched> for SchedDto {
    fn from(s: Sched) -> Self {
        Self {
            id: s.id,
            date: s.date,
            time: s.time,
            title: s.title,
            reason: s.reason,
        }
    }
}

impl From<CreateSchedReq> for NewSched {
    fn from(req: CreateSchedReq) -> Self {
        Self {
            date: req.date,
            time: req.time,
            title: req.title,
            reason: req.reason,
        }
    }
}

impl From<UpdateSchedReq> for SchedPatch {
    fn from(req: UpdateSchedReq) -> Self {
        Self {
            date: req.date,
            time: req.time,
            title: req.title,
            reason: req.reason,
        }
    }
}

impl From<LoginReq> for Credentials {
    fn from(req: LoginReq) -> Self {
        Self {
            username: req.username,
            password: req.password,
        }
    }
}
