//! Role name constants shared by the auth extractors and handlers.

/// Full administrative access: approves content, manages categories and
/// other users' books.
pub const ROLE_ADMIN: &str = "admin";

/// Regular authenticated user: uploads books (subject to review),
/// downloads and favorites approved ones.
pub const ROLE_STUDENT: &str = "student";
