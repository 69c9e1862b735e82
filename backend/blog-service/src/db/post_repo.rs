use crate::error::Result;
use crate::models::Post;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const POST_COLUMNS: &str = "id, title, description, keywords, category, content_blocks, \
     featured_image, featured_image_public_id, company_id, word_count, week_number, \
     user_id, user_name, slug, created_at, updated_at";

/// Field set for a new post row
pub struct NewPost<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub keywords: Option<&'a str>,
    pub category: Option<&'a str>,
    pub content_blocks: &'a Value,
    pub featured_image: Option<&'a str>,
    pub featured_image_public_id: Option<&'a str>,
    pub company_id: Option<i64>,
    pub word_count: i32,
    pub week_number: i32,
    pub user_id: Uuid,
    pub user_name: &'a str,
    pub slug: &'a str,
}

/// Insert a new post
pub async fn create_post(pool: &PgPool, new_post: NewPost<'_>) -> Result<Post> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (id, title, description, keywords, category, content_blocks,
                           featured_image, featured_image_public_id, company_id, word_count,
                           week_number, user_id, user_name, slug, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(new_post.title)
    .bind(new_post.description)
    .bind(new_post.keywords)
    .bind(new_post.category)
    .bind(new_post.content_blocks)
    .bind(new_post.featured_image)
    .bind(new_post.featured_image_public_id)
    .bind(new_post.company_id)
    .bind(new_post.word_count)
    .bind(new_post.week_number)
    .bind(new_post.user_id)
    .bind(new_post.user_name)
    .bind(new_post.slug)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Whether a slug is already taken
pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1) AS taken")
        .bind(slug)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<bool, _>("taken"))
}

/// Count a user's posts created in the given ISO week
pub async fn count_posts_in_week(pool: &PgPool, user_id: Uuid, week_number: i32) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM posts WHERE user_id = $1 AND week_number = $2",
    )
    .bind(user_id)
    .bind(week_number)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}

/// List posts newest first, optionally filtered by company
pub async fn list_posts(
    pool: &PgPool,
    company_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE ($1::bigint IS NULL OR company_id = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(company_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts, optionally filtered by company
pub async fn count_posts(pool: &PgPool, company_id: Option<i64>) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM posts WHERE ($1::bigint IS NULL OR company_id = $1)",
    )
    .bind(company_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}

/// List a user's posts newest first
pub async fn list_posts_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count a user's posts
pub async fn count_posts_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Persist edited fields of an existing post
pub async fn update_post(pool: &PgPool, post: &Post) -> Result<Post> {
    let updated = sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET title = $2, description = $3, keywords = $4, category = $5, content_blocks = $6,
            featured_image = $7, word_count = $8, slug = $9, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post.id)
    .bind(&post.title)
    .bind(&post.description)
    .bind(&post.keywords)
    .bind(&post.category)
    .bind(&post.content_blocks)
    .bind(&post.featured_image)
    .bind(post.word_count)
    .bind(&post.slug)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

/// Delete a post row; returns false when it was already gone
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
