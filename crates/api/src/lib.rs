//! HTTP service for accounts, sessions and email verification.
//!
//! The binary in `main.rs` wires the PostgreSQL and Redis adapters from
//! `passage_db` into [`services`] and serves them through [`router`].

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
