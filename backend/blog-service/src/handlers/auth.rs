/// Authentication handlers
use actix_web::{web, HttpResponse};
use claims_core::jwt::{self, SessionIdentity};
use sqlx::PgPool;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::membership::normalize_tier;
use crate::models::{LoginRequest, LoginResponse, UserProfile};
use crate::services::IdentityClient;

/// Login endpoint handler
///
/// Exchanges credentials with the external identity provider, upserts the
/// local shadow user, and issues a session token embedding role, tier,
/// and capability flags.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Provider rejected the credentials"),
        (status = 502, description = "Provider unreachable")
    )
)]
pub async fn login(
    pool: web::Data<PgPool>,
    identity: web::Data<IdentityClient>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::ValidationError(
            "Email and password required".to_string(),
        ));
    }

    let external = identity.login(&payload.email, &payload.password).await?;

    let tier = normalize_tier(external.membership_level.as_deref().unwrap_or(""));
    let role = if external.is_admin { "admin" } else { "user" };
    let username = payload
        .email
        .split('@')
        .next()
        .unwrap_or(payload.email.as_str());

    let user = user_repo::upsert_external_user(
        pool.get_ref(),
        external.user_id,
        &payload.email,
        username,
        role,
    )
    .await?;

    let access_token = jwt::generate_session_token(&SessionIdentity {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
        membership_level: tier.as_str().to_string(),
        is_admin: external.is_admin,
        is_buyer: external.is_buyer,
        is_seller: external.is_seller,
    })
    .map_err(|e| AppError::Internal(format!("Failed to issue session token: {e}")))?;

    tracing::info!(
        user_id = %user.id,
        external_id = external.user_id,
        tier = tier.as_str(),
        "Login succeeded"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        user: UserProfile {
            id: user.id,
            username: user.username,
            role: user.role,
            membership_level: tier.as_str().to_string(),
            is_admin: external.is_admin,
            is_buyer: external.is_buyer,
            is_seller: external.is_seller,
        },
    }))
}
