use utoipa::{Modify, OpenApi};

use crate::features::users::dtos::CreateUserProfileDto;
use crate::features::users::handlers::user_handler;
use crate::features::users::models::{Profile, ProfileChanges, ProfileFields};
use crate::shared::types::{BackendError, BackendResponse};

#[derive(OpenApi)]
#[openapi(
    paths(user_handler::handle_user_request),
    components(
        schemas(
            BackendError,
            Profile,
            ProfileFields,
            ProfileChanges,
            CreateUserProfileDto,
            BackendResponse<Profile>,
            BackendResponse<Vec<Profile>>,
        )
    ),
    tags(
        (name = "users", description = "User sign-up and profile management"),
    ),
    info(
        title = "Profiles API",
        version = "0.1.0",
        description = "User sign-up and profile management",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_path_is_documented() {
        let openapi = ApiDoc::openapi();
        let item = openapi.paths.paths.get("/api/user").unwrap();

        assert!(item.get.is_some());
        assert!(item.post.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_none());
    }

    #[test]
    fn test_info_modifier_overrides_defaults() {
        let mut openapi = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Desc".to_string(),
        }
        .modify(&mut openapi);

        assert_eq!(openapi.info.title, "Custom");
        assert_eq!(openapi.info.version, "9.9.9");
        assert_eq!(openapi.info.description.as_deref(), Some("Desc"));
    }
}
