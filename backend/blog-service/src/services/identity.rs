/// External identity provider client
///
/// The provider is the source of truth for accounts, membership tiers,
/// and capability flags. Login is a single-attempt HTTP exchange with a
/// request timeout; this service keeps no credentials of its own.
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::IdentityConfig;
use crate::error::{AppError, Result};

/// Account data returned by a successful provider login
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUser {
    pub user_id: i64,
    pub membership_level: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_buyer: bool,
    #[serde(default)]
    pub is_seller: bool,
}

#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    login_url: String,
}

impl IdentityClient {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            login_url: config.login_url.clone(),
        })
    }

    /// Exchange credentials for the provider's account record
    ///
    /// Any non-success status counts as bad credentials; transport
    /// failures (including the timeout) surface as upstream errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<ExternalUser> {
        let response = self
            .http
            .post(&self.login_url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Identity provider unreachable");
                AppError::Upstream(format!("Identity provider unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        response.json::<ExternalUser>().await.map_err(|e| {
            tracing::warn!(error = %e, "Identity provider returned an unexpected body");
            AppError::Upstream(format!("Invalid identity provider response: {e}"))
        })
    }
}
