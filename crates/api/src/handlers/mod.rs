//! Request handlers, grouped by resource.

pub mod books;
pub mod categories;
pub mod downloads;
pub mod favorites;
pub mod session;
pub mod users;
