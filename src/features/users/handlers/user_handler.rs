use crate::core::error::Result;
use crate::features::users::dtos::{CreateUserProfileDto, UserQuery};
use crate::features::users::models::Profile;
use crate::features::users::request::UserRequest;
use crate::features::users::services::UserService;
use crate::shared::types::BackendResponse;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[utoipa::path(
    method(get, post, put),
    path = "/api/user",
    params(UserQuery),
    request_body(
        content = CreateUserProfileDto,
        description = "POST: sign-up credentials and profile fields. PUT: any of `username`, `website`, `avatar_url`."
    ),
    responses(
        (status = 200, description = "Profile fetched, listed or updated", body = BackendResponse<Vec<Profile>>),
        (status = 201, description = "User and profile created", body = BackendResponse<Vec<Profile>>),
        (status = 400, description = "Unsupported or invalid request", body = String, content_type = "text/plain"),
        (status = 406, description = "No profile matches the given id", body = BackendResponse<Profile>),
        (status = 500, description = "Sign-up failed", body = BackendResponse<Profile>),
        (status = 502, description = "Backend unreachable", body = BackendResponse<Profile>)
    ),
    tag = "users"
)]
pub async fn handle_user_request(
    State(service): State<Arc<UserService>>,
    method: Method,
    Query(query): Query<UserQuery>,
    body: Bytes,
) -> Result<Response> {
    let request = match UserRequest::classify(&method, query.id, &body) {
        Ok(request) => request,
        Err(rejection) => {
            service
                .logger()
                .warn("userHandler", format!("{} rejected: {}", method, rejection));
            return Ok((StatusCode::BAD_REQUEST, rejection.to_string()).into_response());
        }
    };

    let response = match request {
        UserRequest::FetchOne { id } => respond(service.get_user_by_id(&id).await?),
        UserRequest::FetchAll => respond(service.get_all_users().await?),
        UserRequest::CreateUserAndProfile(dto) => {
            respond(service.create_user_and_profile(&dto).await?)
        }
        UserRequest::UpdateById { id, changes } => {
            respond(service.update_profile_by_id(&id, &changes).await?)
        }
    };

    Ok(response)
}

/// Answer with the backend status and the full triple as body
fn respond<T: Serialize>(response: BackendResponse<T>) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(response)).into_response()
}
