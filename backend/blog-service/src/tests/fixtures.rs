/// Test fixtures and helpers for blog-service tests
use serde_json::{json, Value};
use uuid::Uuid;

use crate::membership::MembershipTier;
use crate::middleware::AuthenticatedUser;

pub const TEST_USERNAME: &str = "ada";

/// A regular (non-admin) author on the given tier
pub fn author_on_tier(tier: MembershipTier) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        username: TEST_USERNAME.to_string(),
        role: "user".to_string(),
        tier,
        is_admin: false,
        is_buyer: false,
        is_seller: false,
    }
}

/// An administrator account
pub fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        username: "root".to_string(),
        role: "admin".to_string(),
        tier: MembershipTier::Bronze,
        is_admin: true,
        is_buyer: false,
        is_seller: false,
    }
}

/// Content blocks whose total word count is exactly `words`
pub fn blocks_with_words(words: usize) -> Value {
    let text = vec!["word"; words].join(" ");
    json!([{ "type": "paragraph", "text": text }])
}
