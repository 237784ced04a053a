//! Store adapters.
//!
//! Each repository owns its connection handle and implements one of the
//! capability traits in [`crate::store`].

pub mod code_repo;
pub mod session_repo;
pub mod user_repo;

pub use code_repo::CodeRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
