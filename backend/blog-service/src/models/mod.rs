/// Data models for blog-service
///
/// This module defines structures for:
/// - Post: blog post rows and their request/response DTOs
/// - BlogUser: local shadow of an externally-authoritative identity
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ========================================
// Entities
// ========================================

/// Blog post database entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub category: Option<String>,
    pub content_blocks: Value,
    pub featured_image: Option<String>,
    pub featured_image_public_id: Option<String>,
    pub company_id: Option<i64>,
    pub word_count: i32,
    pub week_number: i32,
    pub user_id: Uuid,
    pub user_name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Local user shadowing an identity-provider account
///
/// Created lazily on first successful external login; email and role are
/// refreshed on later logins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogUser {
    pub id: Uuid,
    pub external_id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl BlogUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

// ========================================
// Auth DTOs
// ========================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User payload returned alongside a fresh session token
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub membership_level: String,
    pub is_admin: bool,
    pub is_buyer: bool,
    pub is_seller: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

// ========================================
// Post DTOs
// ========================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Object)]
    pub content_blocks: Option<Value>,
    pub company_id: Option<i64>,
    pub featured_image: Option<String>,
    pub featured_image_public_id: Option<String>,
}

/// Distinguish an absent field from an explicit `null` in partial updates
///
/// Absent deserializes to `None` via `#[serde(default)]`; a present field
/// (null or not) lands in `Some(..)`.
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

/// Partial update; absent fields keep their stored values, while an
/// explicit `null` clears the nullable ones
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub keywords: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[schema(value_type = Object)]
    pub content_blocks: Option<Value>,
    pub featured_image: Option<String>,
}

/// Full post response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Object)]
    pub content_blocks: Value,
    pub featured_image: Option<String>,
    pub company_id: Option<i64>,
    pub word_count: i32,
    pub user_id: Uuid,
    pub user_name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            keywords: post.keywords,
            category: post.category,
            content_blocks: post.content_blocks,
            featured_image: post.featured_image,
            company_id: post.company_id,
            word_count: post.word_count,
            user_id: post.user_id,
            user_name: post.user_name,
            slug: post.slug,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Listing row; omits the content blocks to keep list pages light
#[derive(Debug, Serialize, ToSchema)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Option<String>,
    pub featured_image: Option<String>,
    pub user_name: String,
    pub word_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            description: post.description,
            category: post.category,
            featured_image: post.featured_image,
            user_name: post.user_name,
            word_count: post.word_count,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostSummaryPage {
    pub posts: Vec<PostSummary>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub per_page: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostPage {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub per_page: i64,
}

/// Pagination query parameters for the public listing
#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub company_id: Option<i64>,
}

/// Pagination query parameters for the caller's own posts
#[derive(Debug, Deserialize)]
pub struct MyPostsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ========================================
// Upload DTOs
// ========================================

/// Public location of a hosted featured image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    pub public_id: String,
}
