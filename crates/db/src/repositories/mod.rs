//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod book_repo;
pub mod category_repo;
pub mod download_repo;
pub mod favorite_repo;
pub mod user_repo;

pub use book_repo::BookRepo;
pub use category_repo::CategoryRepo;
pub use download_repo::DownloadRepo;
pub use favorite_repo::FavoriteRepo;
pub use user_repo::UserRepo;
