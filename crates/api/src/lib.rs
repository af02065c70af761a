//! HTTP surface of the libris digital library.
//!
//! Translates the core's operations into `/api/v1` routes, maps the error
//! taxonomy onto HTTP statuses, and wires auth, storage, and database
//! access into a shared [`state::AppState`].

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
