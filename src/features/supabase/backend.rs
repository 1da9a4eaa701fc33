use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::supabase::models::{AuthResponse, Session, UserSignUp};
use crate::features::supabase::storage::AvatarFile;
use crate::features::users::models::{
    NewProfile, Profile, ProfileChanges, ProfileFields, ProfileUpsert,
};
use crate::shared::types::BackendResponse;

/// Account creation on the auth service
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_up(&self, credentials: &UserSignUp) -> Result<AuthResponse>;
}

/// Access to the `profiles` table with the service's own credentials.
///
/// `Err` means the backend could not be reached or answered with an
/// undecodable body; errors the backend reports are carried in the response.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn select_all(&self) -> Result<BackendResponse<Vec<Profile>>>;

    /// Single-row select; zero rows yields status 406
    async fn select_by_id(&self, id: &str) -> Result<BackendResponse<Profile>>;

    async fn insert(&self, profile: &NewProfile) -> Result<BackendResponse<Vec<Profile>>>;

    async fn update_by_id(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<BackendResponse<Vec<Profile>>>;
}

/// Operations scoped to the signed-in user's session
#[async_trait]
pub trait AccountBackend: Send + Sync {
    async fn fetch_own_profile(
        &self,
        session: &Session,
    ) -> Result<BackendResponse<ProfileFields>>;

    /// Insert-or-update keyed by `id`, no payload returned
    async fn upsert_own_profile(
        &self,
        session: &Session,
        record: &ProfileUpsert,
    ) -> Result<BackendResponse<()>>;

    async fn sign_out(&self, session: &Session) -> Result<BackendResponse<()>>;
}

/// Stores an avatar image and returns the path to save in `avatar_url`
#[async_trait]
pub trait AvatarUploader: Send + Sync {
    async fn upload(&self, session: &Session, file: AvatarFile) -> Result<String>;
}
