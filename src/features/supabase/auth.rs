use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::supabase::backend::AuthBackend;
use crate::features::supabase::client::{decode_error, decode_response, SupabaseClient};
use crate::features::supabase::models::{AuthResponse, AuthUser, Session, UserSignUp};
use crate::shared::types::BackendResponse;

impl SupabaseClient {
    /// Invalidate the session's refresh tokens on the auth service
    pub async fn sign_out_session(&self, session: &Session) -> Result<BackendResponse<()>> {
        let (status, body) = self
            .send("signOut", self.sign_out_request(session))
            .await?;
        decode_response::<()>(status, &body)
    }

    fn sign_out_request(&self, session: &Session) -> RequestBuilder {
        let url = format!("{}/logout", self.config().auth_url());
        self.with_access_token(&session.access_token)
            .request(Method::POST, &url)
    }

    fn sign_up_request(&self, credentials: &UserSignUp) -> RequestBuilder {
        let url = format!("{}/signup", self.config().auth_url());
        self.request(Method::POST, &url).json(credentials)
    }
}

#[async_trait]
impl AuthBackend for SupabaseClient {
    async fn sign_up(&self, credentials: &UserSignUp) -> Result<AuthResponse> {
        let (status, body) = self
            .send("signUp", self.sign_up_request(credentials))
            .await?;
        decode_sign_up(status, &body)
    }
}

/// Sign-up answers with the bare user when email confirmation is pending,
/// or with a session that nests the user under `user`.
pub(crate) fn decode_sign_up(status: u16, body: &str) -> Result<AuthResponse> {
    if !(200..300).contains(&status) {
        return Ok(BackendResponse::failed(status, decode_error(status, body)));
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        AppError::ExternalServiceError(format!("Failed to parse sign-up response: {}", e))
    })?;

    let user_value = match value.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => value,
    };

    let user = serde_json::from_value::<AuthUser>(user_value).map_err(|e| {
        AppError::ExternalServiceError(format!("Sign-up response has no user: {}", e))
    })?;

    Ok(BackendResponse::ok(status, Some(user)))
}
