pub mod auth;
pub mod code;
pub mod user;
