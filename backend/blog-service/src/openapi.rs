use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
/// OpenAPI documentation for the Inkwell Blog Service
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    CreatePostRequest, LoginRequest, LoginResponse, PostPage, PostResponse, PostSummary,
    PostSummaryPage, UpdatePostRequest, UploadResponse, UserProfile,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkwell Blog Service API",
        version = "1.0.0",
        description = "Blogging backend with membership-tier quotas. Handles login against the external identity provider, post creation with weekly and word-count quotas, public post listings, and featured-image uploads proxied to the media host.",
        contact(
            name = "Inkwell Team",
            email = "team@inkwell.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8086", description = "Development server"),
    ),
    tags(
        (name = "Auth", description = "External-provider login and session tokens"),
        (name = "Posts", description = "Post CRUD, listings, and quota enforcement"),
        (name = "Uploads", description = "Featured-image upload proxy"),
    ),
    paths(
        handlers::auth::login,
        handlers::posts::create_post,
        handlers::posts::update_post,
        handlers::posts::delete_post,
        handlers::posts::get_post,
        handlers::posts::list_posts,
        handlers::posts::my_posts,
        handlers::uploads::upload_image,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        UserProfile,
        CreatePostRequest,
        UpdatePostRequest,
        PostResponse,
        PostSummary,
        PostPage,
        PostSummaryPage,
        UploadResponse,
    )),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
