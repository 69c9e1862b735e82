/// Shared JWT session-token module for the blogging backend
///
/// Session tokens are signed with HS256 using a single symmetric secret
/// shared by every process that validates bearer tokens. The secret is
/// loaded from the environment once at startup and never rotated at
/// runtime.
///
/// Services must call `initialize_signing_key()` during startup before any
/// token operations:
///
/// ```rust,ignore
/// use claims_core::jwt;
///
/// let secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY required");
/// jwt::initialize_signing_key(&secret).expect("Failed to initialize JWT key");
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session tokens live for one working day.
const SESSION_TOKEN_EXPIRY_HOURS: i64 = 8;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims carried by a session token.
///
/// Everything a request handler needs to authorize an operation is
/// embedded here; claims are never persisted server-side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (local user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Username
    pub username: String,
    /// Role: "user" or "admin"
    pub role: String,
    /// Normalized membership tier name
    pub membership_level: String,
    /// Capability flags mirrored from the identity provider
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_buyer: bool,
    #[serde(default)]
    pub is_seller: bool,
}

/// Identity attributes embedded into a freshly issued token.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub membership_level: String,
    pub is_admin: bool,
    pub is_buyer: bool,
    pub is_seller: bool,
}

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize the HS256 signing key from the shared secret
///
/// MUST be called during application startup before any token operations.
/// Can only be called once; subsequent calls return an error.
pub fn initialize_signing_key(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(anyhow!("JWT secret must not be empty"));
    }

    JWT_ENCODING_KEY
        .set(EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(DecodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT key not initialized. Call initialize_signing_key() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT key not initialized. Call initialize_signing_key() during startup.")
    })
}

/// Generate a session token for an authenticated identity
///
/// The token embeds role, membership tier, and capability flags so that
/// downstream authorization never needs a second identity-provider call.
pub fn generate_session_token(identity: &SessionIdentity) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(SESSION_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: identity.user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        username: identity.username.clone(),
        role: identity.role.clone(),
        membership_level: identity.membership_level.clone(),
        is_admin: identity.is_admin,
        is_buyer: identity.is_buyer,
        is_seller: identity.is_seller,
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate session token: {e}"))
}

/// Validate and decode a session token
///
/// Verifies the HS256 signature and the expiration claim. The algorithm is
/// pinned; tokens signed with anything else are rejected.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract the local user ID from a validated token
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "unit-test-secret-do-not-use-in-prod";

    fn init_test_key() {
        // Use a static flag to prevent re-initialization across tests
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            initialize_signing_key(TEST_SECRET).expect("Failed to initialize test key");
        });
    }

    fn test_identity(user_id: Uuid) -> SessionIdentity {
        SessionIdentity {
            user_id,
            username: "testuser".to_string(),
            role: "user".to_string(),
            membership_level: "gold".to_string(),
            is_admin: false,
            is_buyer: true,
            is_seller: false,
        }
    }

    #[test]
    fn test_generate_session_token() {
        init_test_key();

        let token = generate_session_token(&test_identity(Uuid::new_v4()));

        assert!(token.is_ok());
        assert_eq!(token.unwrap().matches('.').count(), 2); // JWT has 3 parts
    }

    #[test]
    fn test_validate_valid_token() {
        init_test_key();

        let user_id = Uuid::new_v4();
        let token =
            generate_session_token(&test_identity(user_id)).expect("Failed to generate token");

        let token_data = validate_token(&token).expect("Token should validate");
        assert_eq!(token_data.claims.sub, user_id.to_string());
        assert_eq!(token_data.claims.username, "testuser");
        assert_eq!(token_data.claims.membership_level, "gold");
        assert!(token_data.claims.is_buyer);
        assert!(!token_data.claims.is_admin);
    }

    #[test]
    fn test_validate_tampered_token() {
        init_test_key();

        let token =
            generate_session_token(&test_identity(Uuid::new_v4())).expect("Failed to generate");

        let tampered = token.replace('a', "b");
        assert!(validate_token(&tampered).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        init_test_key();

        // Encode claims whose expiry is well past the validation leeway
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
            username: "testuser".to_string(),
            role: "user".to_string(),
            membership_level: "silver".to_string(),
            is_admin: false,
            is_buyer: false,
            is_seller: false,
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            get_encoding_key().unwrap(),
        )
        .expect("encode should succeed");

        assert!(validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_user_id() {
        init_test_key();

        let user_id = Uuid::new_v4();
        let token =
            generate_session_token(&test_identity(user_id)).expect("Failed to generate token");

        assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        init_test_key();

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            username: "intruder".to_string(),
            role: "admin".to_string(),
            membership_level: "platinum".to_string(),
            is_admin: true,
            is_buyer: false,
            is_seller: false,
        };
        let forged = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .expect("encode should succeed");

        assert!(validate_token(&forged).is_err());
    }
}
