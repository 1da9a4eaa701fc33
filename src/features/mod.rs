pub mod account;
pub mod supabase;
pub mod users;
