/// Configuration management for blog-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub identity: IdentityConfig,
    pub media: MediaConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// External identity provider (the source of truth for accounts and tiers)
#[derive(Clone, Debug, Deserialize)]
pub struct IdentityConfig {
    pub login_url: String,
    pub timeout_secs: u64,
}

/// External media host the upload proxy forwards featured images to
#[derive(Clone, Debug, Deserialize)]
pub struct MediaConfig {
    pub upload_url: String,
    pub delete_url: String,
    pub api_key: Option<String>,
    pub folder: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BLOG_SERVICE_PORT")
                    .unwrap_or_else(|_| "8086".to_string())
                    .parse()
                    .unwrap_or(8086),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/blog".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET_KEY")?,
            },
            identity: IdentityConfig {
                login_url: std::env::var("IDENTITY_LOGIN_URL")?,
                timeout_secs: std::env::var("IDENTITY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            media: {
                let upload_url = std::env::var("MEDIA_HOST_UPLOAD_URL")?;
                MediaConfig {
                    delete_url: std::env::var("MEDIA_HOST_DELETE_URL")
                        .unwrap_or_else(|_| format!("{}/destroy", upload_url)),
                    upload_url,
                    api_key: std::env::var("MEDIA_HOST_API_KEY").ok(),
                    folder: std::env::var("MEDIA_HOST_FOLDER")
                        .unwrap_or_else(|_| "blog_featured_images".to_string()),
                    timeout_secs: std::env::var("MEDIA_HOST_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "10".to_string())
                        .parse()
                        .unwrap_or(10),
                }
            },
        })
    }
}
