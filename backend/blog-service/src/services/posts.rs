/// Post service - handles post creation, retrieval, and management
///
/// All quota enforcement and slug generation happens here; handlers stay
/// thin. Admins bypass quota checks but not validation.
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::post_repo::{self, NewPost};
use crate::error::{AppError, Result};
use crate::membership::{self, MembershipTier};
use crate::middleware::AuthenticatedUser;
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};
use crate::services::MediaHostClient;
use crate::slug;

/// A page of posts plus pagination bookkeeping
pub struct PostListing {
    pub posts: Vec<Post>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub per_page: i64,
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post for the authenticated author
    pub async fn create_post(
        &self,
        author: &AuthenticatedUser,
        req: CreatePostRequest,
    ) -> Result<Post> {
        let mut missing = Vec::new();
        if req.title.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("title");
        }
        if req.description.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("description");
        }
        let content_blocks = req.content_blocks.unwrap_or(Value::Null);
        if !matches!(&content_blocks, Value::Array(blocks) if !blocks.is_empty()) {
            missing.push("content_blocks");
        }
        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        let title = req.title.unwrap_or_default();
        let description = req.description.unwrap_or_default();

        let week_number = membership::current_week_number();
        let word_count = membership::count_words(&content_blocks);

        if !author.is_privileged() {
            let posts_this_week =
                post_repo::count_posts_in_week(&self.pool, author.id, week_number).await?;
            self.enforce_quotas(author.tier, posts_this_week, word_count)?;
        }

        let slug = self.generate_unique_slug(&title, author.id).await?;

        let post = post_repo::create_post(
            &self.pool,
            NewPost {
                title: &title,
                description: &description,
                keywords: req.keywords.as_deref(),
                category: req.category.as_deref(),
                content_blocks: &content_blocks,
                featured_image: req.featured_image.as_deref(),
                featured_image_public_id: req.featured_image_public_id.as_deref(),
                company_id: req.company_id,
                word_count: word_count as i32,
                week_number,
                user_id: author.id,
                user_name: &author.username,
                slug: &slug,
            },
        )
        .await?;

        tracing::info!(
            post_id = %post.id,
            user_id = %author.id,
            tier = author.tier.as_str(),
            word_count,
            "Post created"
        );

        Ok(post)
    }

    /// Apply a partial update; only the owner or an admin may edit
    pub async fn update_post(
        &self,
        actor: &AuthenticatedUser,
        post_id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<Post> {
        let mut post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if !actor.may_modify(post.user_id) {
            return Err(AppError::Forbidden(
                "Only the author or an admin may edit this post".to_string(),
            ));
        }

        if let Some(blocks) = req.content_blocks {
            post.content_blocks = blocks;
        }
        let word_count = membership::count_words(&post.content_blocks);
        if !actor.is_privileged() && !membership::within_word_limit(actor.tier, word_count) {
            return Err(AppError::WordLimitExceeded {
                limit: actor.tier.limits().max_words_per_post,
                used: word_count,
            });
        }
        post.word_count = word_count as i32;

        if let Some(title) = req.title {
            // Regenerate the slug only when the title actually changed
            if title != post.title {
                post.slug = self.generate_unique_slug(&title, post.user_id).await?;
                post.title = title;
            }
        }
        if let Some(description) = req.description {
            post.description = description;
        }
        // Explicit null clears these; an absent field leaves them alone
        if let Some(keywords) = req.keywords {
            post.keywords = keywords;
        }
        if let Some(category) = req.category {
            post.category = category;
        }
        if let Some(featured_image) = req.featured_image {
            post.featured_image = if featured_image.is_empty() {
                None
            } else {
                Some(featured_image)
            };
        }

        let updated = post_repo::update_post(&self.pool, &post).await?;

        tracing::info!(post_id = %updated.id, user_id = %actor.id, "Post updated");

        Ok(updated)
    }

    /// Delete a post, cascading to its hosted featured image
    ///
    /// The hosted image is destroyed first; when the media host fails the
    /// post stays in place and the failure surfaces to the caller.
    pub async fn delete_post(
        &self,
        actor: &AuthenticatedUser,
        post_id: Uuid,
        media: &MediaHostClient,
    ) -> Result<()> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if !actor.may_modify(post.user_id) {
            return Err(AppError::Forbidden(
                "Only the author or an admin may delete this post".to_string(),
            ));
        }

        if let Some(public_id) = &post.featured_image_public_id {
            media.destroy(public_id).await?;
        }

        if !post_repo::delete_post(&self.pool, post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        tracing::info!(post_id = %post_id, user_id = %actor.id, "Post deleted");

        Ok(())
    }

    /// Fetch a post by UUID or, failing that, by slug
    pub async fn get_by_identifier(&self, identifier: &str) -> Result<Post> {
        let post = match Uuid::parse_str(identifier) {
            Ok(id) => post_repo::find_by_id(&self.pool, id).await?,
            Err(_) => post_repo::find_by_slug(&self.pool, identifier).await?,
        };

        post.ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Public listing, newest first, optionally filtered by company
    pub async fn list_posts(
        &self,
        company_id: Option<i64>,
        page: i64,
        per_page: i64,
    ) -> Result<PostListing> {
        let offset = (page - 1) * per_page;
        let posts = post_repo::list_posts(&self.pool, company_id, per_page, offset).await?;
        let total = post_repo::count_posts(&self.pool, company_id).await?;

        Ok(Self::listing(posts, total, page, per_page))
    }

    /// The caller's posts; admins see everything
    pub async fn list_own_posts(
        &self,
        actor: &AuthenticatedUser,
        page: i64,
        per_page: i64,
    ) -> Result<PostListing> {
        let offset = (page - 1) * per_page;
        let (posts, total) = if actor.is_privileged() {
            (
                post_repo::list_posts(&self.pool, None, per_page, offset).await?,
                post_repo::count_posts(&self.pool, None).await?,
            )
        } else {
            (
                post_repo::list_posts_by_user(&self.pool, actor.id, per_page, offset).await?,
                post_repo::count_posts_by_user(&self.pool, actor.id).await?,
            )
        };

        Ok(Self::listing(posts, total, page, per_page))
    }

    fn listing(posts: Vec<Post>, total: i64, page: i64, per_page: i64) -> PostListing {
        let pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        PostListing {
            posts,
            total,
            page,
            pages,
            per_page,
        }
    }

    fn enforce_quotas(
        &self,
        tier: MembershipTier,
        posts_this_week: i64,
        word_count: u32,
    ) -> Result<()> {
        if !membership::can_create_post(tier, posts_this_week) {
            return Err(AppError::Forbidden(
                "Weekly post limit reached for your membership tier".to_string(),
            ));
        }
        if !membership::within_word_limit(tier, word_count) {
            return Err(AppError::WordLimitExceeded {
                limit: tier.limits().max_words_per_post,
                used: word_count,
            });
        }
        Ok(())
    }

    /// Probe slug candidates against the unique column until one is free
    ///
    /// Terminates because each attempt appends a strictly increasing
    /// counter and the taken set is finite.
    async fn generate_unique_slug(&self, title: &str, author_id: Uuid) -> Result<String> {
        let base = slug::slugify(title);
        let fragment = slug::author_fragment(author_id);

        let mut attempt = 0;
        loop {
            let candidate = slug::candidate(&base, attempt, &fragment);
            if !post_repo::slug_exists(&self.pool, &candidate).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
