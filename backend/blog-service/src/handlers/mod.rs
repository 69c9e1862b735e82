/// HTTP handlers for blog endpoints
///
/// This module contains handlers for:
/// - Auth: external-provider login and token issuance
/// - Posts: CRUD, listing, and the caller's own posts
/// - Uploads: featured-image proxy to the media host
pub mod auth;
pub mod posts;
pub mod uploads;

// Explicit re-exports to keep the route table terse
pub use auth::login;
pub use posts::{create_post, delete_post, get_post, list_posts, my_posts, update_post};
pub use uploads::upload_image;
