/// Blog Service - HTTP Server
///
/// Blogging backend with membership-tier quotas: external-provider login,
/// post CRUD with weekly and word-count limits, and a featured-image
/// upload proxy to the media host.
use actix_web::{web, App, HttpResponse, HttpServer};
use blog_service::handlers;
use blog_service::middleware;
use blog_service::services::{IdentityClient, MediaHostClient};
use blog_service::Config;
use claims_core::jwt;
use sqlx::postgres::PgPoolOptions;
use std::io;
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "blog_service=info,info".into()),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("Failed to load configuration: {e}"))
    })?;

    jwt::initialize_signing_key(&config.auth.jwt_secret).map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("Failed to initialize JWT key: {e}"))
    })?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            io::Error::new(io::ErrorKind::Other, format!("Failed to connect to database: {e}"))
        })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migrations failed: {e}")))?;

    let identity_client = IdentityClient::new(&config.identity)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let media_client = MediaHostClient::new(&config.media)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!(%bind_address, "Blog service starting");

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(identity_client.clone()))
            .app_data(web::Data::new(media_client.clone()))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .route(
                "/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route(
                blog_service::openapi::ApiDoc::openapi_json_path(),
                web::get().to(|| async {
                    use utoipa::OpenApi;
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .json(blog_service::openapi::ApiDoc::openapi())
                }),
            )
            .service(
                web::scope("/api/v1")
                    .route("/auth/login", web::post().to(handlers::login))
                    .service(
                        web::scope("/uploads")
                            .wrap(middleware::JwtAuthMiddleware)
                            .route("/image", web::post().to(handlers::upload_image)),
                    )
                    // Mixed public/protected scope: mutating routes rely on the
                    // AuthenticatedUser extractor validating the bearer header.
                    // "/mine" is registered before "/{identifier}" so it is not
                    // swallowed by the slug lookup.
                    .service(
                        web::scope("/posts")
                            .route("", web::get().to(handlers::list_posts))
                            .route("", web::post().to(handlers::create_post))
                            .route("/mine", web::get().to(handlers::my_posts))
                            .route("/{identifier}", web::get().to(handlers::get_post))
                            .route("/{id}", web::put().to(handlers::update_post))
                            .route("/{id}", web::delete().to(handlers::delete_post)),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
