use crate::features::users::handlers::user_handler;
use crate::features::users::services::UserService;
use axum::{routing::any, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/user", any(user_handler::handle_user_request))
        .with_state(service)
}
