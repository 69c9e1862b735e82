/// Blog Service Library
///
/// Backend for the membership-gated blogging platform. Authenticates
/// writers against the external identity provider, issues session tokens,
/// and serves post CRUD plus the featured-image upload proxy.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for posts and local users
/// - `services`: Business logic and external HTTP collaborators
/// - `db`: Database access layer and repositories
/// - `membership`: Tier quota rules and word counting
/// - `middleware`: Bearer-token authentication middleware
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod membership;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;
pub mod slug;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{AppError, Result};
