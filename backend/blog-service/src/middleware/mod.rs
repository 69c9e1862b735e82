/// HTTP middleware utilities for blog-service
///
/// Bearer-token authentication: validates the session token and stashes
/// the decoded identity in request extensions for handler extraction.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use claims_core::jwt;
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::membership::{normalize_tier, MembershipTier};

/// Identity decoded from a validated session token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub tier: MembershipTier,
    pub is_admin: bool,
    pub is_buyer: bool,
    pub is_seller: bool,
}

impl AuthenticatedUser {
    /// Admins may mutate any post and bypass quota checks
    pub fn is_privileged(&self) -> bool {
        self.is_admin || self.role == "admin"
    }

    /// Owner-or-admin rule for post mutations
    pub fn may_modify(&self, owner_id: Uuid) -> bool {
        self.id == owner_id || self.is_privileged()
    }
}

pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let user = authenticate_headers(req.headers())?;
            req.extensions_mut().insert(user);

            service.call(req).await
        })
    }
}

/// Decode and validate the bearer token from a header map
///
/// Tier strings are re-normalized on every request so a stale token
/// cannot smuggle an unknown tier past the quota table.
fn authenticate_headers(
    headers: &actix_web::http::header::HeaderMap,
) -> Result<AuthenticatedUser, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))?;

    let token_data = jwt::validate_token(token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
    let claims = token_data.claims;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(AuthenticatedUser {
        id: user_id,
        username: claims.username,
        role: claims.role,
        tier: normalize_tier(&claims.membership_level),
        is_admin: claims.is_admin,
        is_buyer: claims.is_buyer,
        is_seller: claims.is_seller,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Prefer the identity stashed by `JwtAuthMiddleware`; routes that sit
    /// outside a wrapped scope fall back to validating the header here.
    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<AuthenticatedUser>().cloned() {
            return ready(Ok(user));
        }

        ready(authenticate_headers(req.headers()).map_err(Into::into))
    }
}
