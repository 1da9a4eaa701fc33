//! Client for the hosted Supabase project.
//!
//! Wraps the three backend surfaces this service talks to:
//!
//! | Surface | Path | Used for |
//! |---------|------|----------|
//! | PostgREST | `/rest/v1/profiles` | profile select, insert, update, upsert |
//! | GoTrue | `/auth/v1` | sign-up, sign-out |
//! | Storage | `/storage/v1/object` | avatar uploads |
//!
//! Other features depend on the traits in [`backend`] rather than on
//! [`SupabaseClient`] directly.

pub mod auth;
pub mod backend;
pub mod client;
pub mod models;
pub mod profiles;
pub mod storage;

pub use backend::{AccountBackend, AuthBackend, AvatarUploader, ProfileStore};
pub use client::SupabaseClient;
pub use models::{AuthResponse, AuthUser, Session, SessionUser, UserSignUp};
pub use storage::{AvatarFile, SupabaseAvatarStorage};
