//! In-memory stand-ins for the backend, used by unit and HTTP tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Map;
use tokio::sync::Notify;

use crate::core::error::{AppError, Result};
use crate::features::account::Notifier;
use crate::features::supabase::backend::{
    AccountBackend, AuthBackend, AvatarUploader, ProfileStore,
};
use crate::features::supabase::models::{
    AuthResponse, AuthUser, Session, SessionUser, UserSignUp,
};
use crate::features::supabase::storage::AvatarFile;
use crate::features::users::models::{
    NewProfile, Profile, ProfileChanges, ProfileFields, ProfileUpsert,
};
use crate::shared::types::{BackendError, BackendResponse, NO_ROWS_STATUS};

pub fn sample_profile(id: &str, username: &str) -> Profile {
    Profile {
        id: id.to_string(),
        username: Some(username.to_string()),
        website: None,
        avatar_url: None,
        updated_at: None,
    }
}

pub fn sample_session(user_id: &str, email: &str) -> Session {
    Session {
        access_token: format!("token-{}", user_id),
        user: SessionUser {
            id: user_id.to_string(),
            email: Some(email.to_string()),
        },
    }
}

pub fn no_rows<T>() -> BackendResponse<T> {
    BackendResponse::failed(
        NO_ROWS_STATUS,
        BackendError::new("JSON object requested, multiple (or no) rows returned")
            .with_code("PGRST116"),
    )
}

fn unreachable_error() -> AppError {
    AppError::ExternalServiceError("connection refused".to_string())
}

// =============================================================================
// AUTH
// =============================================================================

enum SignUpOutcome {
    User(String),
    Failure(u16, BackendError),
    Unreachable,
}

pub struct FakeAuthBackend {
    outcome: SignUpOutcome,
    sign_ups: Mutex<Vec<UserSignUp>>,
}

impl FakeAuthBackend {
    fn with_outcome(outcome: SignUpOutcome) -> Self {
        Self {
            outcome,
            sign_ups: Mutex::new(Vec::new()),
        }
    }

    /// Every sign-up succeeds and creates a user with `user_id`
    pub fn signing_up(user_id: &str) -> Self {
        Self::with_outcome(SignUpOutcome::User(user_id.to_string()))
    }

    pub fn failing(status: u16, error: BackendError) -> Self {
        Self::with_outcome(SignUpOutcome::Failure(status, error))
    }

    pub fn unreachable() -> Self {
        Self::with_outcome(SignUpOutcome::Unreachable)
    }

    pub fn sign_ups(&self) -> Vec<UserSignUp> {
        self.sign_ups.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthBackend for FakeAuthBackend {
    async fn sign_up(&self, credentials: &UserSignUp) -> Result<AuthResponse> {
        self.sign_ups.lock().unwrap().push(credentials.clone());
        match &self.outcome {
            SignUpOutcome::User(id) => Ok(BackendResponse::ok(
                200,
                Some(AuthUser {
                    id: id.clone(),
                    email: Some(credentials.email.clone()),
                    extra: Map::new(),
                }),
            )),
            SignUpOutcome::Failure(status, error) => {
                Ok(BackendResponse::failed(*status, error.clone()))
            }
            SignUpOutcome::Unreachable => Err(unreachable_error()),
        }
    }
}

// =============================================================================
// PROFILES TABLE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    SelectAll,
    SelectById(String),
    Insert(NewProfile),
    Update(String, ProfileChanges),
}

#[derive(Default)]
pub struct FakeProfileStore {
    profiles: Mutex<Vec<Profile>>,
    calls: Mutex<Vec<StoreCall>>,
    insert_response: Option<BackendResponse<Vec<Profile>>>,
    unreachable: bool,
}

impl FakeProfileStore {
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    /// Answer every insert with `response` instead of storing the row
    pub fn with_insert_response(mut self, response: BackendResponse<Vec<Profile>>) -> Self {
        self.insert_response = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.profiles.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.unreachable {
            return Err(unreachable_error());
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn select_all(&self) -> Result<BackendResponse<Vec<Profile>>> {
        self.record(StoreCall::SelectAll)?;
        Ok(BackendResponse::ok(200, Some(self.profiles())))
    }

    async fn select_by_id(&self, id: &str) -> Result<BackendResponse<Profile>> {
        self.record(StoreCall::SelectById(id.to_string()))?;
        Ok(match self.profiles().into_iter().find(|p| p.id == id) {
            Some(profile) => BackendResponse::ok(200, Some(profile)),
            None => no_rows(),
        })
    }

    async fn insert(&self, profile: &NewProfile) -> Result<BackendResponse<Vec<Profile>>> {
        self.record(StoreCall::Insert(profile.clone()))?;
        if let Some(response) = &self.insert_response {
            return Ok(response.clone());
        }

        let row = Profile {
            id: profile.id.clone(),
            username: Some(profile.username.clone()),
            website: profile.website.clone(),
            avatar_url: profile.avatar_url.clone(),
            updated_at: None,
        };
        self.profiles.lock().unwrap().push(row.clone());
        Ok(BackendResponse::ok(201, Some(vec![row])))
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<BackendResponse<Vec<Profile>>> {
        self.record(StoreCall::Update(id.to_string(), changes.clone()))?;

        let mut profiles = self.profiles.lock().unwrap();
        let updated: Vec<Profile> = profiles
            .iter_mut()
            .filter(|p| p.id == id)
            .map(|p| {
                if let Some(username) = &changes.username {
                    p.username = username.clone();
                }
                if let Some(website) = &changes.website {
                    p.website = website.clone();
                }
                if let Some(avatar_url) = &changes.avatar_url {
                    p.avatar_url = avatar_url.clone();
                }
                p.clone()
            })
            .collect();

        Ok(BackendResponse::ok(200, Some(updated)))
    }
}

// =============================================================================
// ACCOUNT (SESSION-SCOPED)
// =============================================================================

pub enum FakeReply<T> {
    Response(BackendResponse<T>),
    Unreachable,
}

impl<T> FakeReply<T> {
    fn into_result(self) -> Result<BackendResponse<T>> {
        match self {
            FakeReply::Response(response) => Ok(response),
            FakeReply::Unreachable => Err(unreachable_error()),
        }
    }
}

struct FetchStep {
    reply: FakeReply<ProfileFields>,
    gate: Option<Arc<Notify>>,
}

/// Session-scoped backend. Fetches pop scripted replies (406 once the
/// script runs out); upserts succeed unless an error is set.
#[derive(Default)]
pub struct FakeAccountBackend {
    fetch_script: Mutex<VecDeque<FetchStep>>,
    fetches: AtomicUsize,
    upsert_error: Mutex<Option<BackendError>>,
    upserts: Mutex<Vec<ProfileUpsert>>,
    sign_outs: Mutex<Vec<Session>>,
}

impl FakeAccountBackend {
    pub fn push_fetch(&self, reply: FakeReply<ProfileFields>) {
        self.fetch_script
            .lock()
            .unwrap()
            .push_back(FetchStep { reply, gate: None });
    }

    /// Like [`push_fetch`](Self::push_fetch), but the reply is held until
    /// `gate` is notified
    pub fn push_gated_fetch(&self, reply: FakeReply<ProfileFields>, gate: Arc<Notify>) {
        self.fetch_script.lock().unwrap().push_back(FetchStep {
            reply,
            gate: Some(gate),
        });
    }

    pub fn fail_upserts(&self, error: BackendError) {
        *self.upsert_error.lock().unwrap() = Some(error);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> Vec<ProfileUpsert> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn sign_outs(&self) -> Vec<Session> {
        self.sign_outs.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountBackend for FakeAccountBackend {
    async fn fetch_own_profile(
        &self,
        _session: &Session,
    ) -> Result<BackendResponse<ProfileFields>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let step = self.fetch_script.lock().unwrap().pop_front();

        match step {
            Some(FetchStep { reply, gate }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                reply.into_result()
            }
            None => Ok(no_rows()),
        }
    }

    async fn upsert_own_profile(
        &self,
        _session: &Session,
        record: &ProfileUpsert,
    ) -> Result<BackendResponse<()>> {
        self.upserts.lock().unwrap().push(record.clone());
        Ok(match self.upsert_error.lock().unwrap().clone() {
            Some(error) => BackendResponse::failed(403, error),
            None => BackendResponse::ok(201, None),
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<BackendResponse<()>> {
        self.sign_outs.lock().unwrap().push(session.clone());
        Ok(BackendResponse::ok(204, None))
    }
}

// =============================================================================
// AVATAR UPLOADS & ALERTS
// =============================================================================

pub struct FakeAvatarUploader {
    path: Option<String>,
    uploads: Mutex<Vec<String>>,
}

impl FakeAvatarUploader {
    /// Stores every file under `path`
    pub fn storing_as(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            path: None,
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// File names received so far
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvatarUploader for FakeAvatarUploader {
    async fn upload(&self, _session: &Session, file: AvatarFile) -> Result<String> {
        self.uploads.lock().unwrap().push(file.file_name);
        self.path.clone().ok_or_else(|| {
            AppError::ExternalServiceError("The resource already exists".to_string())
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
