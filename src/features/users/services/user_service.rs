use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::core::logging::Logger;
use crate::features::supabase::backend::{AuthBackend, ProfileStore};
use crate::features::supabase::models::{AuthResponse, UserSignUp};
use crate::features::users::dtos::CreateUserProfileDto;
use crate::features::users::models::{NewProfile, Profile, ProfileChanges};
use crate::shared::types::{BackendError, BackendResponse};

/// Status answered when sign-up fails in the combined create flow
pub const SIGN_UP_FAILED_STATUS: u16 = 500;

/// Service behind `/api/user`: sign-up and `profiles` CRUD via the backend
pub struct UserService {
    auth: Arc<dyn AuthBackend>,
    profiles: Arc<dyn ProfileStore>,
    logger: Arc<Logger>,
}

impl UserService {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        profiles: Arc<dyn ProfileStore>,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            auth,
            profiles,
            logger,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Create an auth identity; the backend answer is returned unchanged
    pub async fn create_user(&self, user: &UserSignUp) -> Result<AuthResponse> {
        let context = format!("createUser ({})", user.email);
        let response = self.auth.sign_up(user).await?;

        if let Some(error) = &response.error {
            self.logger.error(&context, error);
        }
        if response.data.is_some() {
            self.logger.debug(&context, "created");
        }

        Ok(response)
    }

    pub async fn get_all_users(&self) -> Result<BackendResponse<Vec<Profile>>> {
        let response = self.profiles.select_all().await?;
        self.log_outcome("getAllUsers", &response);
        Ok(response)
    }

    /// Zero matching rows comes back as status 406 and is not logged as an error
    pub async fn get_user_by_id(&self, user_id: &str) -> Result<BackendResponse<Profile>> {
        let response = self.profiles.select_by_id(user_id).await?;
        self.log_outcome(&format!("getUserById({})", user_id), &response);
        Ok(response)
    }

    /// Insert a profile row. `profile.id` must reference an existing auth
    /// user; the foreign key is enforced by the backend only.
    pub async fn create_profile(
        &self,
        profile: &NewProfile,
    ) -> Result<BackendResponse<Vec<Profile>>> {
        let response = self.profiles.insert(profile).await?;
        self.log_outcome(
            &format!("createProfile ({}, ID: {})", profile.username, profile.id),
            &response,
        );
        Ok(response)
    }

    /// Sign up, then insert the profile bound to the new user.
    ///
    /// A failed sign-up short-circuits with status 500 and the sign-up error.
    /// A failed profile insert is not compensated: the auth identity stays
    /// without a profile row.
    pub async fn create_user_and_profile(
        &self,
        dto: &CreateUserProfileDto,
    ) -> Result<BackendResponse<Value>> {
        let sign_up = match self.create_user(&dto.sign_up()).await {
            Ok(response) => response,
            Err(e) => {
                return Ok(BackendResponse::failed(
                    SIGN_UP_FAILED_STATUS,
                    BackendError::new(e.to_string()),
                ))
            }
        };

        if let Some(error) = sign_up.error {
            return Ok(BackendResponse {
                data: sign_up.data.map(to_json).transpose()?,
                error: Some(error),
                status: SIGN_UP_FAILED_STATUS,
            });
        }

        let Some(user) = sign_up.data else {
            return Ok(BackendResponse::failed(
                SIGN_UP_FAILED_STATUS,
                BackendError::new("Sign-up returned no user"),
            ));
        };

        let profile = dto.profile_for(&user.id);
        let response = self.create_profile(&profile).await?;

        if response.failure().is_some() {
            self.logger.warn(
                "createUserAndProfile",
                format!("auth user {} was created without a profile row", user.id),
            );
        }

        Ok(BackendResponse {
            data: response.data.map(to_json).transpose()?,
            error: response.error,
            status: response.status,
        })
    }

    /// Apply a partial update to the profile matching `id`. Every present
    /// field of `changes` is sent as-is.
    pub async fn update_profile_by_id(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<BackendResponse<Vec<Profile>>> {
        let response = self.profiles.update_by_id(id, changes).await?;
        self.log_outcome(&format!("updateProfileById({})", id), &response);
        Ok(response)
    }

    fn log_outcome<T>(&self, context: &str, response: &BackendResponse<T>) {
        if let Some(error) = response.failure() {
            self.logger
                .error(context, format!("{} {}", response.status, error));
        }
        if response.data.is_some() {
            self.logger.debug(context, response.status);
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize response data: {}", e)))
}
