use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::types::BackendResponse;

/// Authenticated session as issued by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Sign-up credentials; consumed once, never stored
#[derive(Debug, Clone, Serialize)]
pub struct UserSignUp {
    pub email: String,
    pub password: String,
}

/// User record returned by sign-up. Fields other than `id` and `email` are
/// kept as-is so the original payload can be echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type AuthResponse = BackendResponse<AuthUser>;
