//! Book status state machine and access-control rules.
//!
//! A non-admin upload enters review as `pending`; an admin either approves
//! or rejects it. Admin uploads skip review and start `approved`. Only
//! approved books are visible to regular users.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Review status of a book. Stored as lowercase text in `books.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookStatus {
    /// The database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Pending => "pending",
            BookStatus::Approved => "approved",
            BookStatus::Rejected => "rejected",
        }
    }

    /// Parse the database string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(BookStatus::Pending),
            "approved" => Ok(BookStatus::Approved),
            "rejected" => Ok(BookStatus::Rejected),
            other => Err(CoreError::Internal(format!(
                "Unknown book status in database: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated (or anonymous) principal a request acts as.
///
/// Constructed by the auth layer and passed explicitly into every check;
/// the core never reaches into ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub is_admin: bool,
}

/// Status a freshly ingested book starts in.
///
/// Admin uploads skip the review queue.
pub fn initial_status(actor: Actor) -> BookStatus {
    if actor.is_admin {
        BookStatus::Approved
    } else {
        BookStatus::Pending
    }
}

/// Whether `viewer` may see (and download) a book in `status`.
///
/// Approved books are public, including to anonymous viewers. Everything
/// else is admin-only; owners go through [`can_mutate`]-guarded endpoints
/// to see their own pending uploads.
pub fn can_view(status: BookStatus, viewer: Option<Actor>) -> bool {
    status == BookStatus::Approved || viewer.is_some_and(|v| v.is_admin)
}

/// Whether `actor` may modify or delete a book owned by `owner_id`.
pub fn can_mutate(owner_id: DbId, actor: Actor) -> bool {
    actor.is_admin || actor.id == owner_id
}

/// Validate a status transition requested by `actor`.
///
/// Only admins may change status at all. Admins may force any transition
/// (e.g. re-approve a rejected book); the pending to approved/rejected arrows
/// are just the common case.
pub fn validate_transition(
    from: BookStatus,
    to: BookStatus,
    actor: Actor,
) -> Result<(), CoreError> {
    if !actor.is_admin {
        return Err(CoreError::Forbidden(
            "Only administrators may change a book's status".to_string(),
        ));
    }
    if from == to {
        return Err(CoreError::Conflict(format!(
            "Book is already {from}"
        )));
    }
    Ok(())
}

/// Resolve a status carried in a metadata patch.
///
/// A PUT payload round-trips the whole resource, so the patch usually
/// echoes the current status back; that is a no-op (`Ok(None)`), not a
/// conflict. An actual change goes through [`validate_transition`].
pub fn patch_transition(
    from: BookStatus,
    to: BookStatus,
    actor: Actor,
) -> Result<Option<BookStatus>, CoreError> {
    if from == to {
        return Ok(None);
    }
    validate_transition(from, to, actor)?;
    Ok(Some(to))
}
