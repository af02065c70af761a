//! Repository for the `users` table.

use sqlx::PgPool;

use libris_core::roles::ROLE_STUDENT;
use libris_core::types::DbId;

use crate::models::user::{UpsertUser, User};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, external_id, email, display_name, role, created_at";

/// Provides operations for identity-provider-provisioned users.
pub struct UserRepo;

impl UserRepo {
    /// Upsert a user from the identity provider's profile, keyed on the
    /// provider subject. Profile fields refresh on every login; the role
    /// is only set on first provisioning.
    pub async fn upsert_from_identity(
        pool: &PgPool,
        input: &UpsertUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_id, email, display_name, role) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (external_id) \
             DO UPDATE SET email = EXCLUDED.email, display_name = EXCLUDED.display_name \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.external_id)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(ROLE_STUDENT)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Change a user's role. Returns the updated row if it exists.
    pub async fn set_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }
}
