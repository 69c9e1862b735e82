/// Database access layer
///
/// Repository functions over `sqlx::PgPool`:
/// - `user_repo`: local shadow users
/// - `post_repo`: post rows, slug probes, weekly counters
pub mod post_repo;
pub mod user_repo;
