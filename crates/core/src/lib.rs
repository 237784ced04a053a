//! Domain building blocks shared by the storage adapters and the API crate.
//!
//! Nothing in here performs I/O.

pub mod clock;
pub mod error;
pub mod types;
pub mod validation;
