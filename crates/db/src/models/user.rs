//! User models.
//!
//! Users are provisioned by the external identity provider; the core only
//! consumes id and role, but the rows exist for foreign-key integrity and
//! for the admin user listing.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use libris_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for provisioning a user from the identity provider's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUser {
    pub external_id: String,
    pub email: String,
    pub display_name: String,
}
