//! Domain logic for the libris digital library.
//!
//! Pure, I/O-free building blocks shared by the db, storage, and api
//! crates: the error taxonomy, the asset reference codec, the book
//! status state machine with its access-control rules, collect-all
//! field validation, and the PDF page-count heuristic.

pub mod asset_ref;
pub mod error;
pub mod lifecycle;
pub mod pdf;
pub mod roles;
pub mod types;
pub mod validation;
