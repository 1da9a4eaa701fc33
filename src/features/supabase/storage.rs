use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::supabase::backend::AvatarUploader;
use crate::features::supabase::client::{decode_error, SupabaseClient};
use crate::features::supabase::models::Session;

/// Image picked by the user for upload
#[derive(Debug, Clone)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AvatarFile {
    /// Extension of the original file name, lowercased
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Random object path keeping the original extension
    fn object_path(&self) -> String {
        let id = Uuid::new_v4();
        match self.extension() {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        }
    }
}

/// Uploads avatars into a storage bucket under the user's session
pub struct SupabaseAvatarStorage {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseAvatarStorage {
    pub fn new(client: SupabaseClient) -> Self {
        let bucket = client.config().avatar_bucket.clone();
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload_request(&self, session: &Session, path: &str, file: AvatarFile) -> RequestBuilder {
        let url = format!(
            "{}/object/{}/{}",
            self.client.config().storage_url(),
            self.bucket,
            path
        );

        self.client
            .with_access_token(&session.access_token)
            .request(Method::POST, &url)
            .header("Content-Type", file.content_type)
            .header("x-upsert", "false")
            .body(file.bytes)
    }
}

#[async_trait]
impl AvatarUploader for SupabaseAvatarStorage {
    async fn upload(&self, session: &Session, file: AvatarFile) -> Result<String> {
        if file.bytes.is_empty() {
            return Err(AppError::BadRequest(
                "You must select an image to upload.".to_string(),
            ));
        }

        let path = file.object_path();
        let request = self.upload_request(session, &path, file);

        let (status, body) = self.client.send("uploadAvatar", request).await?;
        if !(200..300).contains(&status) {
            let error = decode_error(status, &body);
            self.client
                .logger()
                .error("uploadAvatar", format!("HTTP {} {}", status, error));
            return Err(AppError::ExternalServiceError(error.message));
        }

        self.client
            .logger()
            .debug("uploadAvatar", format!("stored {}/{}", self.bucket, path));
        Ok(path)
    }
}
