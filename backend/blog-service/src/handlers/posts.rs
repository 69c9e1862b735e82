/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    CreatePostRequest, MyPostsQuery, PostListQuery, PostPage, PostResponse, PostSummary,
    PostSummaryPage, UpdatePostRequest,
};
use crate::services::{MediaHostClient, PostService};

const LIST_PAGE_CAP: i64 = 20;
const LIST_PAGE_DEFAULT: i64 = 12;
const MY_POSTS_PAGE_CAP: i64 = 50;
const MY_POSTS_PAGE_DEFAULT: i64 = 10;

fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

fn clamp_per_page(per_page: Option<i64>, default: i64, cap: i64) -> i64 {
    per_page.unwrap_or(default).clamp(1, cap)
}

/// Create a new post
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing fields or word limit exceeded"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Weekly post quota exhausted")
    )
)]
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.create_post(&user, req.into_inner()).await?;

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Update a post (owner or admin)
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    request_body = UpdatePostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 403, description = "Not the author and not an admin"),
        (status = 404, description = "No such post")
    )
)]
pub async fn update_post(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .update_post(&user, *post_id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Public listing with pagination and an optional company filter
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Posts",
    responses(
        (status = 200, description = "Page of post summaries", body = PostSummaryPage)
    )
)]
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let page = clamp_page(query.page);
    let per_page = clamp_per_page(query.per_page, LIST_PAGE_DEFAULT, LIST_PAGE_CAP);

    let service = PostService::new((**pool).clone());
    let listing = service.list_posts(query.company_id, page, per_page).await?;

    Ok(HttpResponse::Ok().json(PostSummaryPage {
        posts: listing.posts.into_iter().map(PostSummary::from).collect(),
        total: listing.total,
        page: listing.page,
        pages: listing.pages,
        per_page: listing.per_page,
    }))
}

/// Fetch one post by UUID or slug
#[utoipa::path(
    get,
    path = "/api/v1/posts/{identifier}",
    tag = "Posts",
    responses(
        (status = 200, description = "Post detail", body = PostResponse),
        (status = 404, description = "No such post")
    )
)]
pub async fn get_post(
    pool: web::Data<PgPool>,
    identifier: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.get_by_identifier(&identifier).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// The caller's own posts; admins see all posts
#[utoipa::path(
    get,
    path = "/api/v1/posts/mine",
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of the caller's posts", body = PostPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_posts(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query: web::Query<MyPostsQuery>,
) -> Result<HttpResponse> {
    let page = clamp_page(query.page);
    let per_page = clamp_per_page(query.per_page, MY_POSTS_PAGE_DEFAULT, MY_POSTS_PAGE_CAP);

    let service = PostService::new((**pool).clone());
    let listing = service.list_own_posts(&user, page, per_page).await?;

    Ok(HttpResponse::Ok().json(PostPage {
        posts: listing.posts.into_iter().map(PostResponse::from).collect(),
        total: listing.total,
        page: listing.page,
        pages: listing.pages,
        per_page: listing.per_page,
    }))
}

/// Delete a post and its hosted featured image (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post and image deleted"),
        (status = 403, description = "Not the author and not an admin"),
        (status = 404, description = "No such post"),
        (status = 502, description = "Media host refused the image deletion")
    )
)]
pub async fn delete_post(
    pool: web::Data<PgPool>,
    media: web::Data<MediaHostClient>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.delete_post(&user, *post_id, media.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post and featured image deleted"
    })))
}
