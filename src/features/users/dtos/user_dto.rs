use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::supabase::models::UserSignUp;
use crate::features::users::models::NewProfile;

/// Query string of `/api/user`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Profile (auth user) ID; selects a single profile for GET, the target row for PUT
    pub id: Option<String>,
}

/// Request DTO for signing up a user together with their profile
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserProfileDto {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    #[validate(length(min = 1, max = 128, message = "Username must be 1-128 characters"))]
    pub username: String,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl CreateUserProfileDto {
    pub fn sign_up(&self) -> UserSignUp {
        UserSignUp {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Profile row for the new auth user; blank optional fields are omitted
    pub fn profile_for(&self, user_id: &str) -> NewProfile {
        NewProfile {
            id: user_id.to_string(),
            username: self.username.clone(),
            website: non_blank(&self.website),
            avatar_url: non_blank(&self.avatar_url),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{Password, SafeEmail, Username};
    use fake::Fake;

    fn dto() -> CreateUserProfileDto {
        CreateUserProfileDto {
            email: SafeEmail().fake(),
            password: Password(8..16).fake(),
            username: Username().fake(),
            website: None,
            avatar_url: None,
        }
    }

    #[test]
    fn test_valid_dto() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let dto = CreateUserProfileDto {
            email: "not-an-email".to_string(),
            ..dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_empty_password_and_username() {
        let dto = CreateUserProfileDto {
            password: String::new(),
            username: String::new(),
            ..dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_profile_for_skips_blank_optionals() {
        let dto = CreateUserProfileDto {
            website: Some(String::new()),
            avatar_url: Some("u1.png".to_string()),
            ..dto()
        };
        let profile = dto.profile_for("u1");
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.username, dto.username);
        assert!(profile.website.is_none());
        assert_eq!(profile.avatar_url.as_deref(), Some("u1.png"));
    }
}
