use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};

use crate::core::error::Result;
use crate::features::supabase::backend::{AccountBackend, ProfileStore};
use crate::features::supabase::client::{decode_response, SupabaseClient};
use crate::features::supabase::models::Session;
use crate::features::users::models::{
    NewProfile, Profile, ProfileChanges, ProfileFields, ProfileUpsert, PROFILES_TABLE,
};
use crate::shared::types::BackendResponse;

/// Makes PostgREST answer with a single object, or 406 when no row matched
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
const UPSERT_MINIMAL: &str = "resolution=merge-duplicates,return=minimal";

impl SupabaseClient {
    fn profiles_url(&self) -> String {
        format!("{}/{}", self.config().rest_url(), PROFILES_TABLE)
    }

    /// `id=eq.<id>` filter, URL-encoded
    fn id_filter(id: &str) -> String {
        format!("id=eq.{}", urlencoding::encode(id))
    }

    fn select_all_request(&self) -> RequestBuilder {
        let url = format!("{}?select=*", self.profiles_url());
        self.request(Method::GET, &url)
    }

    fn select_single_request(&self, columns: &str, id: &str) -> RequestBuilder {
        let url = format!(
            "{}?select={}&{}",
            self.profiles_url(),
            columns,
            Self::id_filter(id)
        );
        self.request(Method::GET, &url)
            .header("Accept", SINGLE_OBJECT)
    }

    fn insert_request(&self, profile: &NewProfile) -> RequestBuilder {
        self.request(Method::POST, &self.profiles_url())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(profile)
    }

    fn update_request(&self, id: &str, changes: &ProfileChanges) -> RequestBuilder {
        let url = format!("{}?{}", self.profiles_url(), Self::id_filter(id));
        self.request(Method::PATCH, &url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(changes)
    }

    fn own_profile_request(&self, session: &Session) -> RequestBuilder {
        self.with_access_token(&session.access_token)
            .select_single_request(ProfileFields::COLUMNS, &session.user.id)
    }

    fn upsert_request(&self, session: &Session, record: &ProfileUpsert) -> RequestBuilder {
        self.with_access_token(&session.access_token)
            .request(Method::POST, &self.profiles_url())
            .header("Prefer", UPSERT_MINIMAL)
            .json(record)
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn select_all(&self) -> Result<BackendResponse<Vec<Profile>>> {
        let (status, body) = self
            .send("selectProfiles", self.select_all_request())
            .await?;
        decode_response(status, &body)
    }

    async fn select_by_id(&self, id: &str) -> Result<BackendResponse<Profile>> {
        let request = self.select_single_request("*", id);
        let (status, body) = self.send("selectProfile", request).await?;
        decode_response(status, &body)
    }

    async fn insert(&self, profile: &NewProfile) -> Result<BackendResponse<Vec<Profile>>> {
        let (status, body) = self
            .send("insertProfile", self.insert_request(profile))
            .await?;
        decode_response(status, &body)
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<BackendResponse<Vec<Profile>>> {
        let (status, body) = self
            .send("updateProfile", self.update_request(id, changes))
            .await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl AccountBackend for SupabaseClient {
    async fn fetch_own_profile(
        &self,
        session: &Session,
    ) -> Result<BackendResponse<ProfileFields>> {
        let (status, body) = self
            .send("fetchOwnProfile", self.own_profile_request(session))
            .await?;
        decode_response(status, &body)
    }

    async fn upsert_own_profile(
        &self,
        session: &Session,
        record: &ProfileUpsert,
    ) -> Result<BackendResponse<()>> {
        let (status, body) = self
            .send("upsertOwnProfile", self.upsert_request(session, record))
            .await?;
        decode_response(status, &body)
    }

    async fn sign_out(&self, session: &Session) -> Result<BackendResponse<()>> {
        self.sign_out_session(session).await
    }
}
