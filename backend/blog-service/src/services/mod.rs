/// Business logic layer for blog-service
///
/// - `identity`: HTTP client for the external identity provider
/// - `media`: HTTP client for the external media host + upload validation
/// - `posts`: post lifecycle (quotas, slugs, CRUD)
pub mod identity;
pub mod media;
pub mod posts;

pub use identity::{ExternalUser, IdentityClient};
pub use media::MediaHostClient;
pub use posts::PostService;
