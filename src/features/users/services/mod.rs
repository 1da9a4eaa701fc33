mod user_service;

pub use user_service::{UserService, SIGN_UP_FAILED_STATUS};
