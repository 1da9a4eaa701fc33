use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::logging::Logger;
use crate::features::account::notifier::Notifier;
use crate::features::supabase::backend::{AccountBackend, AvatarUploader};
use crate::features::supabase::models::Session;
use crate::features::supabase::storage::AvatarFile;
use crate::features::users::models::{ProfileFields, ProfileUpsert};

pub const SUBMIT_LABEL: &str = "Update";
pub const SUBMIT_LABEL_LOADING: &str = "Loading ...";

/// Form state shown by the editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    /// Read-only, taken from the session
    pub email: Option<String>,
    pub username: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileForm {
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            username: self.username.clone(),
            website: self.website.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    fn apply(&mut self, fields: ProfileFields) {
        self.username = fields.username;
        self.website = fields.website;
        self.avatar_url = fields.avatar_url;
    }
}

/// Account editor for the signed-in user's profile.
///
/// `loading` is true until the first request settles, then while any fetch or
/// write is in flight. Every request and local edit takes a new generation; a
/// fetched profile is only applied if nothing newer happened meanwhile.
pub struct ProfileEditor {
    backend: Arc<dyn AccountBackend>,
    uploader: Arc<dyn AvatarUploader>,
    notifier: Arc<dyn Notifier>,
    logger: Arc<Logger>,
    session: RwLock<Session>,
    form: RwLock<ProfileForm>,
    loading: LoadingState,
    generation: AtomicU64,
}

#[derive(Default)]
struct LoadingState {
    in_flight: AtomicUsize,
    settled: AtomicBool,
}

impl LoadingState {
    fn acquire(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { state: self }
    }

    fn is_loading(&self) -> bool {
        !self.settled.load(Ordering::SeqCst) || self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// Counts one in-flight request for as long as it lives
struct LoadingGuard<'a> {
    state: &'a LoadingState,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.settled.store(true, Ordering::SeqCst);
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ProfileEditor {
    pub fn new(
        session: Session,
        backend: Arc<dyn AccountBackend>,
        uploader: Arc<dyn AvatarUploader>,
        notifier: Arc<dyn Notifier>,
        logger: Arc<Logger>,
    ) -> Self {
        let form = ProfileForm {
            email: session.user.email.clone(),
            ..Default::default()
        };

        Self {
            backend,
            uploader,
            notifier,
            logger,
            session: RwLock::new(session),
            form: RwLock::new(form),
            loading: LoadingState::default(),
            generation: AtomicU64::new(0),
        }
    }

    /// Initial load
    pub async fn mount(&self) {
        self.get_profile().await;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }

    pub async fn form(&self) -> ProfileForm {
        self.form.read().await.clone()
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn set_username(&self, username: impl Into<String>) {
        self.next_generation();
        self.form.write().await.username = Some(username.into());
    }

    pub async fn set_website(&self, website: impl Into<String>) {
        self.next_generation();
        self.form.write().await.website = Some(website.into());
    }

    /// Load the session user's profile into the form.
    ///
    /// Zero rows (406) leaves the form untouched without alerting.
    pub async fn get_profile(&self) {
        let _loading = self.loading.acquire();
        let generation = self.next_generation();
        let session = self.session().await;
        let context = format!("getProfile({})", session.user.id);

        let response = match self.backend.fetch_own_profile(&session).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.error(&context, &e);
                self.notifier.alert(&e.to_string());
                return;
            }
        };

        if let Some(error) = response.failure() {
            self.logger
                .error(&context, format!("{} {}", response.status, error));
            self.notifier.alert(&error.message);
            return;
        }

        let Some(fields) = response.data else {
            self.logger.debug(&context, "no profile yet");
            return;
        };

        if !self.is_current(generation) {
            self.logger.debug(&context, "discarding stale profile");
            return;
        }

        let mut form = self.form.write().await;
        // An edit may have landed while waiting for the lock
        if self.is_current(generation) {
            form.apply(fields);
        }
    }

    /// Insert-or-update the session user's profile with `fields`, stamped
    /// with the current time
    pub async fn update_profile(&self, fields: ProfileFields) {
        let _loading = self.loading.acquire();
        self.next_generation();
        let session = self.session().await;
        let context = format!("updateProfile({})", session.user.id);
        let record = ProfileUpsert::new(session.user.id.clone(), fields, Utc::now());

        match self.backend.upsert_own_profile(&session, &record).await {
            Ok(response) => match response.error {
                Some(error) => {
                    self.logger
                        .error(&context, format!("{} {}", response.status, error));
                    self.notifier.alert(&error.message);
                }
                None => self.logger.debug(&context, response.status),
            },
            Err(e) => {
                self.logger.error(&context, &e);
                self.notifier.alert(&e.to_string());
            }
        }
    }

    /// Persist the form as it currently stands
    pub async fn submit(&self) {
        let fields = self.form.read().await.fields();
        self.update_profile(fields).await;
    }

    /// Replace the session; re-fetches only when it actually changed.
    /// The previous user's fields are cleared first. Returns whether a fetch ran.
    pub async fn on_session_change(&self, session: Session) -> bool {
        {
            let mut current = self.session.write().await;
            if *current == session {
                return false;
            }
            self.next_generation();
            *self.form.write().await = ProfileForm {
                email: session.user.email.clone(),
                ..Default::default()
            };
            *current = session;
        }

        self.get_profile().await;
        true
    }

    /// Hand the file to the uploader, then store the returned path
    pub async fn upload_avatar(&self, file: AvatarFile) {
        let session = self.session().await;
        let uploaded = {
            let _loading = self.loading.acquire();
            self.uploader.upload(&session, file).await
        };

        match uploaded {
            Ok(url) => self.on_avatar_uploaded(url).await,
            Err(e) => {
                self.logger
                    .error(&format!("uploadAvatar({})", session.user.id), &e);
                self.notifier.alert(&e.to_string());
            }
        }
    }

    /// Set the avatar locally and persist it right away
    pub async fn on_avatar_uploaded(&self, url: impl Into<String>) {
        self.next_generation();
        let fields = {
            let mut form = self.form.write().await;
            form.avatar_url = Some(url.into());
            form.fields()
        };
        self.update_profile(fields).await;
    }

    pub async fn sign_out(&self) {
        let session = self.session().await;
        match self.backend.sign_out(&session).await {
            Ok(response) => {
                if let Some(error) = response.error {
                    self.notifier.alert(&error.message);
                }
            }
            Err(e) => self.notifier.alert(&e.to_string()),
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
