//! Classification of `/api/user` requests.
//!
//! Cases are evaluated in order and the first match wins:
//!
//! 1. `GET` with `id` → [`UserRequest::FetchOne`]
//! 2. `GET` → [`UserRequest::FetchAll`]
//! 3. `POST` with `email`, `password` and `username` keys → [`UserRequest::CreateUserAndProfile`]
//! 4. `PUT` with `id` and a non-empty body → [`UserRequest::UpdateById`]
//! 5. anything else → [`RequestRejection::Unsupported`]

use axum::http::Method;
use serde_json::{Map, Value};
use validator::Validate;

use crate::features::users::dtos::CreateUserProfileDto;
use crate::features::users::models::ProfileChanges;

pub const UNSUPPORTED_REQUEST: &str = "User service: non supported request";

/// Keys a `POST` body must carry to create a user
const SIGN_UP_KEYS: [&str; 3] = ["email", "password", "username"];

#[derive(Debug)]
pub enum UserRequest {
    FetchOne { id: String },
    FetchAll,
    CreateUserAndProfile(CreateUserProfileDto),
    UpdateById { id: String, changes: ProfileChanges },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestRejection {
    #[error("{}", UNSUPPORTED_REQUEST)]
    Unsupported,

    #[error("User service: invalid request body: {0}")]
    InvalidBody(String),
}

impl UserRequest {
    pub fn classify(
        method: &Method,
        id: Option<String>,
        body: &[u8],
    ) -> Result<Self, RequestRejection> {
        let body = if [Method::POST, Method::PUT, Method::DELETE].contains(method) {
            parse_body(body)?
        } else {
            Map::new()
        };

        match (method, id) {
            (&Method::GET, Some(id)) => Ok(UserRequest::FetchOne { id }),
            (&Method::GET, None) => Ok(UserRequest::FetchAll),
            (&Method::POST, _) if SIGN_UP_KEYS.iter().all(|k| body.contains_key(*k)) => {
                let dto: CreateUserProfileDto = serde_json::from_value(Value::Object(body))
                    .map_err(|e| RequestRejection::InvalidBody(e.to_string()))?;
                dto.validate()
                    .map_err(|e| RequestRejection::InvalidBody(e.to_string()))?;
                Ok(UserRequest::CreateUserAndProfile(dto))
            }
            (&Method::PUT, Some(id)) => {
                let changes: ProfileChanges = serde_json::from_value(Value::Object(body))
                    .map_err(|e| RequestRejection::InvalidBody(e.to_string()))?;
                if changes.is_empty() {
                    return Err(RequestRejection::Unsupported);
                }
                Ok(UserRequest::UpdateById { id, changes })
            }
            _ => Err(RequestRejection::Unsupported),
        }
    }
}

/// JSON object body; an empty body reads as `{}`
fn parse_body(body: &[u8]) -> Result<Map<String, Value>, RequestRejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RequestRejection::InvalidBody(
            "body must be a JSON object".to_string(),
        )),
        Err(e) => Err(RequestRejection::InvalidBody(e.to_string())),
    }
}
