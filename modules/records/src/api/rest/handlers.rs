use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path},
    http::HeaderMap,
    response::Json,
    Extension,
};
use tracing::{info, warn};

use crate::api::rest::auth::credentials_from_request;
use crate::api::rest::dto::{
    ChatReq, ChatResp, CreateSchedReq, CreateUserReq, Envelope, SchedDto, UpdateSchedReq,
    UpdateUserReq, UserDto,
};
use crate::api::rest::error::{map_domain_error, ApiError, Op};
use crate::contract::model::{RecordId, RecordKind};
use crate::domain::chat::ChatBot;
use crate::domain::service::Service;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Path identifiers arrive as text: blank is a server error, non-numeric
/// behaves like an unknown record.
fn parse_id(raw: &str, kind: RecordKind, op: Op) -> Result<RecordId, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::empty_id());
    }
    raw.parse().map_err(|_| {
        warn!("Unparseable {} id '{}'", kind, raw);
        ApiError::unknown_id(kind, op)
    })
}

// ---- users ----

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 200, description = "User has been added", body = crate::api::rest::dto::UserEnvelope),
        (status = 400, description = "Missing required fields or store failure", body = crate::api::rest::dto::MessageDto),
        (status = 422, description = "Malformed payload", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<CreateUserReq>, JsonRejection>,
) -> ApiResult<UserDto> {
    let Json(req) = payload.map_err(|e| ApiError::bad_payload(Op::Create, &e))?;
    info!(username = ?req.username, "Creating user");

    let user = svc
        .create_user(req.into())
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Create))?;
    Ok(Json(Envelope::with_data("User has been added", user.into())))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "users fetched successfully", body = crate::api::rest::dto::UserListEnvelope),
        (status = 400, description = "Store failure", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn list_users(Extension(svc): Extension<Arc<Service>>) -> ApiResult<Vec<UserDto>> {
    let users = svc
        .list_users()
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::List))?;
    let dtos = users.into_iter().map(UserDto::from).collect();
    Ok(Json(Envelope::with_data("users fetched successfully", dtos)))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "user id fetched successfully", body = crate::api::rest::dto::UserEnvelope),
        (status = 400, description = "Unknown id", body = crate::api::rest::dto::MessageDto),
        (status = 500, description = "Empty id", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> ApiResult<UserDto> {
    let id = parse_id(&raw_id, RecordKind::User, Op::Get)?;
    let user = svc
        .get_user(id)
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Get))?;
    Ok(Json(Envelope::with_data("user id fetched successfully", user.into())))
}

/// Update an existing user; empty or absent fields keep their stored value
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "user updated successfully", body = crate::api::rest::dto::UserEnvelope),
        (status = 400, description = "Unknown id or store failure", body = crate::api::rest::dto::MessageDto),
        (status = 422, description = "Malformed payload", body = crate::api::rest::dto::MessageDto),
        (status = 500, description = "Empty id", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateUserReq>, JsonRejection>,
) -> ApiResult<UserDto> {
    let id = parse_id(&raw_id, RecordKind::User, Op::Update)?;
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            // An unknown id outranks a malformed body.
            svc.get_user(id)
                .await
                .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Update))?;
            return Err(ApiError::bad_payload(Op::Update, &rejection));
        }
    };
    info!(user_id = id, "Updating user");

    let user = svc
        .update_user(id, req.into())
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Update))?;
    Ok(Json(Envelope::with_data("user updated successfully", user.into())))
}

/// Delete a user by ID
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "user deleted successfully", body = crate::api::rest::dto::MessageDto),
        (status = 400, description = "No such row or store failure", body = crate::api::rest::dto::MessageDto),
        (status = 500, description = "Empty id", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&raw_id, RecordKind::User, Op::Delete)?;
    info!(user_id = id, "Deleting user");

    svc.delete_user(id)
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Delete))?;
    Ok(Json(Envelope::message("user deleted successfully")))
}

/// Substring search on fullname and address
#[utoipa::path(
    get,
    path = "/users/search/{query}",
    tag = "users",
    params(("query" = String, Path, description = "Text to look for")),
    responses(
        (status = 200, description = "users fetched successfully", body = crate::api::rest::dto::UserListEnvelope),
        (status = 400, description = "Store failure", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn search_users(
    Extension(svc): Extension<Arc<Service>>,
    Path(query): Path<String>,
) -> ApiResult<Vec<UserDto>> {
    run_search(&svc, &query).await
}

/// Search with an empty query: every user
#[utoipa::path(
    get,
    path = "/users/search",
    tag = "users",
    responses(
        (status = 200, description = "users fetched successfully", body = crate::api::rest::dto::UserListEnvelope),
        (status = 400, description = "Store failure", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn search_all_users(Extension(svc): Extension<Arc<Service>>) -> ApiResult<Vec<UserDto>> {
    run_search(&svc, "").await
}

async fn run_search(svc: &Service, query: &str) -> ApiResult<Vec<UserDto>> {
    let users = svc
        .search_users(query)
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Search))?;
    let dtos = users.into_iter().map(UserDto::from).collect();
    Ok(Json(Envelope::with_data("users fetched successfully", dtos)))
}

/// Check a login name + secret, from a Basic header or a JSON body
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = crate::api::rest::dto::LoginReq, description = "Used only when no Authorization header is sent"),
    responses(
        (status = 200, description = "Login successful", body = crate::api::rest::dto::MessageDto),
        (status = 401, description = "Bad credentials or malformed header", body = crate::api::rest::dto::MessageDto),
        (status = 422, description = "Malformed payload", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<()> {
    let credentials = credentials_from_request(&headers, &body)?;
    svc.authenticate(credentials)
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::User, Op::Login))?;
    Ok(Json(Envelope::message("Login successful")))
}

// ---- schedules ----

/// Create a new schedule
#[utoipa::path(
    post,
    path = "/scheds",
    tag = "schedules",
    request_body = CreateSchedReq,
    responses(
        (status = 200, description = "Schedule has been added", body = crate::api::rest::dto::SchedEnvelope),
        (status = 400, description = "Missing required fields or store failure", body = crate::api::rest::dto::MessageDto),
        (status = 422, description = "Malformed payload", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn create_sched(
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<CreateSchedReq>, JsonRejection>,
) -> ApiResult<SchedDto> {
    let Json(req) = payload.map_err(|e| ApiError::bad_payload(Op::Create, &e))?;
    info!(title = ?req.title, "Creating schedule");

    let sched = svc
        .create_sched(req.into())
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::Sched, Op::Create))?;
    Ok(Json(Envelope::with_data("Schedule has been added", sched.into())))
}

/// List all schedules
#[utoipa::path(
    get,
    path = "/scheds",
    tag = "schedules",
    responses(
        (status = 200, description = "schedules fetched successfully", body = crate::api::rest::dto::SchedListEnvelope),
        (status = 400, description = "Store failure", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn list_scheds(Extension(svc): Extension<Arc<Service>>) -> ApiResult<Vec<SchedDto>> {
    let scheds = svc
        .list_scheds()
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::Sched, Op::List))?;
    let dtos = scheds.into_iter().map(SchedDto::from).collect();
    Ok(Json(Envelope::with_data("schedules fetched successfully", dtos)))
}

/// Get a specific schedule by ID
#[utoipa::path(
    get,
    path = "/scheds/{id}",
    tag = "schedules",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "schedule id fetched successfully", body = crate::api::rest::dto::SchedEnvelope),
        (status = 400, description = "Unknown id", body = crate::api::rest::dto::MessageDto),
        (status = 500, description = "Empty id", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn get_sched(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> ApiResult<SchedDto> {
    let id = parse_id(&raw_id, RecordKind::Sched, Op::Get)?;
    let sched = svc
        .get_sched(id)
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::Sched, Op::Get))?;
    Ok(Json(Envelope::with_data("schedule id fetched successfully", sched.into())))
}

/// Update an existing schedule; empty or absent fields keep their stored value
#[utoipa::path(
    put,
    path = "/scheds/{id}",
    tag = "schedules",
    params(("id" = String, Path, description = "Schedule id")),
    request_body = UpdateSchedReq,
    responses(
        (status = 200, description = "schedule updated successfully", body = crate::api::rest::dto::SchedEnvelope),
        (status = 400, description = "Unknown id or store failure", body = crate::api::rest::dto::MessageDto),
        (status = 422, description = "Malformed payload", body = crate::api::rest::dto::MessageDto),
        (status = 500, description = "Empty id", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn update_sched(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateSchedReq>, JsonRejection>,
) -> ApiResult<SchedDto> {
    let id = parse_id(&raw_id, RecordKind::Sched, Op::Update)?;
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            svc.get_sched(id)
                .await
                .map_err(|e| map_domain_error(&e, RecordKind::Sched, Op::Update))?;
            return Err(ApiError::bad_payload(Op::Update, &rejection));
        }
    };
    info!(sched_id = id, "Updating schedule");

    let sched = svc
        .update_sched(id, req.into())
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::Sched, Op::Update))?;
    Ok(Json(Envelope::with_data("schedule updated successfully", sched.into())))
}

/// Delete a schedule by ID
#[utoipa::path(
    delete,
    path = "/scheds/{id}",
    tag = "schedules",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "schedule deleted successfully", body = crate::api::rest::dto::MessageDto),
        (status = 400, description = "No such row or store failure", body = crate::api::rest::dto::MessageDto),
        (status = 500, description = "Empty id", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn delete_sched(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&raw_id, RecordKind::Sched, Op::Delete)?;
    info!(sched_id = id, "Deleting schedule");

    svc.delete_sched(id)
        .await
        .map_err(|e| map_domain_error(&e, RecordKind::Sched, Op::Delete))?;
    Ok(Json(Envelope::message("schedule deleted successfully")))
}

// ---- chat ----

/// Canned help-desk answer for a question
#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "Reply", body = ChatResp),
        (status = 422, description = "Malformed payload", body = crate::api::rest::dto::MessageDto)
    )
)]
pub async fn chat(
    Extension(bot): Extension<Arc<ChatBot>>,
    payload: Result<Json<ChatReq>, JsonRejection>,
) -> Result<Json<ChatResp>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_payload(Op::Create, &e))?;
    Ok(Json(ChatResp {
        response: bot.reply(&req.message).to_owned(),
    }))
}
