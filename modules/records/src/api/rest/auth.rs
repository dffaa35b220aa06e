//! Credential extraction for `POST /login`: HTTP Basic header first, JSON body otherwise.

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use crate::api::rest::dto::LoginReq;
use crate::api::rest::error::{
    ApiError, AUTH_HEADER_INVALID, AUTH_PAYLOAD_INVALID, BAD_CREDENTIALS, INVALID_PAYLOAD,
};
use crate::contract::model::Credentials;

pub fn credentials_from_request(headers: &HeaderMap, body: &[u8]) -> Result<Credentials, ApiError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::unauthorized(AUTH_HEADER_INVALID))?;
        return parse_basic(value);
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("Login without header or body");
        return Err(ApiError::unauthorized(AUTH_HEADER_INVALID));
    }

    serde_json::from_slice::<LoginReq>(body)
        .map(Credentials::from)
        .map_err(|e| {
            warn!("Rejected login payload: {}", e);
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, INVALID_PAYLOAD)
        })
}

/// `Basic base64(username:password)`; the password may itself contain `:`.
fn parse_basic(value: &str) -> Result<Credentials, ApiError> {
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| ApiError::unauthorized(AUTH_HEADER_INVALID))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(ApiError::unauthorized(AUTH_HEADER_INVALID));
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|raw| String::from_utf8(raw).ok())
        .ok_or_else(|| ApiError::unauthorized(AUTH_PAYLOAD_INVALID))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| ApiError::unauthorized(BAD_CREDENTIALS))?;

    Ok(Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}
