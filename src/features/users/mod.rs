//! User API.
//!
//! One route dispatching on method, the `id` query parameter and the body.
//! Responses carry the backend's `{data, error, status}` triple with the
//! backend's status code.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Body | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/user?id={id}` | - | Get one profile |
//! | GET | `/api/user` | - | List all profiles |
//! | POST | `/api/user` | `email`, `password`, `username`, optional `website`, `avatar_url` | Sign up and create the profile |
//! | PUT | `/api/user?id={id}` | any of `username`, `website`, `avatar_url` | Partial profile update |
//!
//! Any other request is answered with 400 and a plain-text message.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod request;
pub mod routes;
pub mod services;

pub use services::UserService;
