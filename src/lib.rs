//! Profile management service backed by a hosted Supabase project.
//!
//! Two entry points share the same backend client:
//!
//! - the `/api/user` HTTP handler ([`features::users`]), which proxies
//!   sign-up and `profiles` CRUD to the backend;
//! - the headless account editor ([`features::account`]), which drives the
//!   current session's profile form.

pub mod core;
pub mod features;
pub mod shared;
