use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use crate::api::rest::dto::MessageDto;
use crate::contract::model::RecordKind;
use crate::domain::error::DomainError;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INVALID_PAYLOAD: &str = "Invalid request payload";
pub const UPDATE_PAYLOAD: &str = "request failed";
pub const EMPTY_ID: &str = "id cannot be empty";
pub const BAD_CREDENTIALS: &str = "Invalid username or password";
pub const AUTH_HEADER_INVALID: &str = "Authorization header missing or invalid";
pub const AUTH_PAYLOAD_INVALID: &str = "Invalid authorization payload";

/// Which endpoint failed; picks the client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    List,
    Get,
    Update,
    Delete,
    Search,
    Login,
}

/// Error response: status plus a message-only envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn empty_id() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, EMPTY_ID)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Undecodable body. Updates answer with their own legacy wording.
    pub fn bad_payload(op: Op, rejection: &JsonRejection) -> Self {
        warn!("Rejected request payload: {}", rejection.body_text());
        let message = if op == Op::Update {
            UPDATE_PAYLOAD
        } else {
            INVALID_PAYLOAD
        };
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Path id that is not a number: treated like a missing record.
    pub fn unknown_id(kind: RecordKind, op: Op) -> Self {
        Self::new(StatusCode::BAD_REQUEST, lookup_failure(kind, op))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageDto {
            message: self.message.to_owned(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Message for a failed operation on `kind`.
pub fn failure_message(kind: RecordKind, op: Op) -> &'static str {
    match (kind, op) {
        (RecordKind::User, Op::Create) => "Could not create user",
        (RecordKind::User, Op::List) => "could not get users",
        (RecordKind::User, Op::Get) => "could not get the user",
        (RecordKind::User, Op::Update) => "could not update the user",
        (RecordKind::User, Op::Delete) => "could not delete user",
        (RecordKind::User, Op::Search) => "could not search users",
        (RecordKind::Sched, Op::Create) => "Could not create schedule",
        (RecordKind::Sched, Op::List | Op::Search) => "could not get schedules",
        (RecordKind::Sched, Op::Get) => "could not get the schedule",
        (RecordKind::Sched, Op::Update) => "could not update the schedule",
        (RecordKind::Sched, Op::Delete) => "could not delete schedule",
        (_, Op::Login) => BAD_CREDENTIALS,
    }
}

/// Message when the target record could not be loaded.
fn lookup_failure(kind: RecordKind, op: Op) -> &'static str {
    match (kind, op) {
        (RecordKind::User, Op::Update) => "could not retrieve the user",
        (RecordKind::Sched, Op::Update) => "could not retrieve the schedule",
        _ => failure_message(kind, op),
    }
}

/// Map a domain error to the response for `op` on `kind`. Store details are
/// logged here and never reach the client.
pub fn map_domain_error(e: &DomainError, kind: RecordKind, op: Op) -> ApiError {
    match e {
        DomainError::Validation { missing } => {
            warn!(?missing, "Rejected {kind} without required fields");
            ApiError::new(StatusCode::BAD_REQUEST, MISSING_FIELDS)
        }
        DomainError::NotFound { .. } => {
            warn!("{}", e);
            ApiError::new(StatusCode::BAD_REQUEST, lookup_failure(kind, op))
        }
        DomainError::Authentication => ApiError::unauthorized(BAD_CREDENTIALS),
        DomainError::Store { message } if op == Op::Login => {
            error!("Credential lookup failed: {}", message);
            ApiError::unauthorized(BAD_CREDENTIALS)
        }
        DomainError::Store { message } => {
            error!("{:?} {} failed: {}", op, kind, message);
            ApiError::new(StatusCode::BAD_REQUEST, failure_message(kind, op))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_missing_fields() {
        let err = map_domain_error(
            &DomainError::missing_fields(vec!["title"]),
            RecordKind::Sched,
            Op::Create,
        );
        assert_eq!(err, ApiError::new(StatusCode::BAD_REQUEST, MISSING_FIELDS));
    }

    #[test]
    fn update_distinguishes_lookup_from_save() {
        let lookup = map_domain_error(&DomainError::user_not_found(9), RecordKind::User, Op::Update);
        assert_eq!(lookup.message(), "could not retrieve the user");

        let save = map_domain_error(&DomainError::store("boom"), RecordKind::User, Op::Update);
        assert_eq!(save.message(), "could not update the user");
        assert_eq!(save.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_during_login_fail_closed() {
        let err = map_domain_error(&DomainError::store("down"), RecordKind::User, Op::Login);
        assert_eq!(err, ApiError::unauthorized(BAD_CREDENTIALS));
    }

    #[test]
    fn not_found_on_get_is_400() {
        let err = map_domain_error(&DomainError::sched_not_found(3), RecordKind::Sched, Op::Get);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "could not get the schedule");
    }
}
