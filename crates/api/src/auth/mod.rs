//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! The OAuth exchange itself happens in the excluded web layer; it hands a
//! verified identity profile to `POST /auth/session`, which provisions the
//! user row and issues the token consumed by the extractors in
//! [`crate::middleware`].

pub mod jwt;
