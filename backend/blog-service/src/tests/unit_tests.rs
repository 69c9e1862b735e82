/// Pure unit tests for blog-service core logic (no database required)
///
/// Covers tier normalization, the quota limits table, word counting over
/// content blocks, and the owner-or-admin authorization rule.
use serde_json::json;
use uuid::Uuid;

use crate::membership::{
    can_create_post, count_words, current_week_number, normalize_tier, within_word_limit,
    MembershipTier,
};
use crate::models::UpdatePostRequest;
use crate::tests::fixtures::*;

// ============================================================================
// Tier Normalization Tests
// ============================================================================

#[test]
fn test_normalize_known_tiers() {
    // GIVEN: Canonical tier names
    // WHEN: We normalize them
    // THEN: Each maps to its tier
    assert_eq!(normalize_tier("bronze"), MembershipTier::Bronze);
    assert_eq!(normalize_tier("silver"), MembershipTier::Silver);
    assert_eq!(normalize_tier("gold"), MembershipTier::Gold);
    assert_eq!(normalize_tier("platinum"), MembershipTier::Platinum);
}

#[test]
fn test_normalize_strips_whitespace_and_case() {
    // GIVEN: Sloppy provider values with casing and embedded whitespace
    // THEN: Normalization still recognizes the tier
    assert_eq!(normalize_tier("  Gold  "), MembershipTier::Gold);
    assert_eq!(normalize_tier("PLATINUM"), MembershipTier::Platinum);
    assert_eq!(normalize_tier("sil ver"), MembershipTier::Silver);
    assert_eq!(normalize_tier("\tBronze\n"), MembershipTier::Bronze);
}

#[test]
fn test_normalize_maps_bronce_synonym() {
    // GIVEN: The legacy misspelling the provider still emits
    assert_eq!(normalize_tier("bronce"), MembershipTier::Bronze);
    assert_eq!(normalize_tier(" Bronce "), MembershipTier::Bronze);
}

#[test]
fn test_normalize_unknown_falls_back_to_bronze() {
    // GIVEN: Values no tier matches
    // THEN: The least-permissive tier is assumed
    assert_eq!(normalize_tier(""), MembershipTier::Bronze);
    assert_eq!(normalize_tier("diamond"), MembershipTier::Bronze);
    assert_eq!(normalize_tier("null"), MembershipTier::Bronze);
}

// ============================================================================
// Limits Table Tests
// ============================================================================

#[test]
fn test_limits_table_values() {
    assert_eq!(MembershipTier::Bronze.limits().max_posts_per_week, Some(1));
    assert_eq!(MembershipTier::Bronze.limits().max_words_per_post, 600);
    assert_eq!(MembershipTier::Silver.limits().max_posts_per_week, Some(3));
    assert_eq!(MembershipTier::Silver.limits().max_words_per_post, 900);
    assert_eq!(MembershipTier::Gold.limits().max_posts_per_week, Some(5));
    assert_eq!(MembershipTier::Gold.limits().max_words_per_post, 1200);
    assert_eq!(MembershipTier::Platinum.limits().max_posts_per_week, None);
    assert_eq!(MembershipTier::Platinum.limits().max_words_per_post, 1500);
}

// ============================================================================
// Weekly Post Quota Tests
// ============================================================================

#[test]
fn test_can_create_post_below_cap() {
    // GIVEN: A bronze user with no posts this week
    // THEN: Creation is allowed
    assert!(can_create_post(MembershipTier::Bronze, 0));
}

#[test]
fn test_can_create_post_at_cap() {
    // GIVEN: Users who already used their full weekly quota
    // THEN: Creation is denied, strictly below the cap only
    assert!(!can_create_post(MembershipTier::Bronze, 1));
    assert!(!can_create_post(MembershipTier::Silver, 3));
    assert!(!can_create_post(MembershipTier::Gold, 5));
}

#[test]
fn test_can_create_post_one_under_cap() {
    assert!(can_create_post(MembershipTier::Silver, 2));
    assert!(can_create_post(MembershipTier::Gold, 4));
}

#[test]
fn test_platinum_has_no_weekly_cap() {
    // GIVEN: A platinum user with an absurd weekly count
    assert!(can_create_post(MembershipTier::Platinum, 10_000));
}

// ============================================================================
// Word Limit Tests
// ============================================================================

#[test]
fn test_word_limit_boundary_inclusive() {
    // GIVEN: A word count exactly at the tier limit
    // THEN: It is allowed; one more word is not
    assert!(within_word_limit(MembershipTier::Bronze, 600));
    assert!(!within_word_limit(MembershipTier::Bronze, 601));
    assert!(within_word_limit(MembershipTier::Gold, 1200));
    assert!(!within_word_limit(MembershipTier::Gold, 1201));
}

#[test]
fn test_platinum_word_limit_still_applies() {
    // GIVEN: Platinum has no weekly cap but keeps a per-post word cap
    assert!(within_word_limit(MembershipTier::Platinum, 1500));
    assert!(!within_word_limit(MembershipTier::Platinum, 1501));
}

// ============================================================================
// Word Counting Tests
// ============================================================================

#[test]
fn test_count_words_text_field() {
    let blocks = json!([{ "type": "paragraph", "text": "one two three" }]);
    assert_eq!(count_words(&blocks), 3);
}

#[test]
fn test_count_words_content_fallback() {
    // GIVEN: A block using the legacy `content` field instead of `text`
    let blocks = json!([{ "type": "paragraph", "content": "four words in here" }]);
    assert_eq!(count_words(&blocks), 4);
}

#[test]
fn test_count_words_text_wins_over_content() {
    // GIVEN: A block carrying both fields
    // THEN: Only `text` is counted
    let blocks = json!([{ "text": "a b", "content": "c d e" }]);
    assert_eq!(count_words(&blocks), 2);
}

#[test]
fn test_count_words_empty_text_falls_back_to_content() {
    // GIVEN: A block whose `text` is an empty string
    // THEN: The `content` words still count against the quota
    let blocks = json!([{ "text": "", "content": "three words here" }]);
    assert_eq!(count_words(&blocks), 3);
}

#[test]
fn test_count_words_bare_string_block() {
    let blocks = json!(["just a bare string block", { "text": "plus two" }]);
    assert_eq!(count_words(&blocks), 7);
}

#[test]
fn test_count_words_non_text_blocks_count_zero() {
    // GIVEN: Image and embed blocks with no text
    let blocks = json!([
        { "type": "image", "url": "https://img.example/x.png" },
        { "type": "embed", "html": 42 },
        null,
        { "text": "only these words count here" }
    ]);
    assert_eq!(count_words(&blocks), 5);
}

#[test]
fn test_count_words_non_array_is_zero() {
    assert_eq!(count_words(&json!({"text": "not an array"})), 0);
    assert_eq!(count_words(&json!(null)), 0);
    assert_eq!(count_words(&json!("bare top-level string")), 0);
}

#[test]
fn test_count_words_collapses_whitespace() {
    let blocks = json!([{ "text": "  spaced\tout \n words  " }]);
    assert_eq!(count_words(&blocks), 3);
}

#[test]
fn test_fixture_block_builder_is_exact() {
    // The word-count fixture must be exact for boundary tests to mean anything
    assert_eq!(count_words(&blocks_with_words(600)), 600);
    assert_eq!(count_words(&blocks_with_words(0)), 0);
}

// ============================================================================
// Partial Update Deserialization Tests
// ============================================================================

#[test]
fn test_update_request_explicit_null_clears_field() {
    // GIVEN: An update body that sets keywords and category to null
    let req: UpdatePostRequest =
        serde_json::from_str(r#"{"keywords": null, "category": null}"#).unwrap();

    // THEN: The fields deserialize as present-but-cleared
    assert_eq!(req.keywords, Some(None));
    assert_eq!(req.category, Some(None));
}

#[test]
fn test_update_request_absent_field_left_untouched() {
    // GIVEN: An update body that never mentions keywords or category
    let req: UpdatePostRequest = serde_json::from_str(r#"{"title": "New title"}"#).unwrap();

    // THEN: The fields deserialize as absent
    assert!(req.keywords.is_none());
    assert!(req.category.is_none());
    assert_eq!(req.title.as_deref(), Some("New title"));
}

#[test]
fn test_update_request_value_replaces_field() {
    let req: UpdatePostRequest =
        serde_json::from_str(r#"{"keywords": "rust, blogging"}"#).unwrap();

    assert_eq!(req.keywords, Some(Some("rust, blogging".to_string())));
}

// ============================================================================
// Authorization Tests
// ============================================================================

#[test]
fn test_owner_may_modify_own_post() {
    let author = author_on_tier(MembershipTier::Bronze);
    assert!(author.may_modify(author.id));
}

#[test]
fn test_stranger_may_not_modify() {
    let author = author_on_tier(MembershipTier::Gold);
    assert!(!author.may_modify(Uuid::new_v4()));
}

#[test]
fn test_admin_may_modify_any_post() {
    let admin = admin_user();
    assert!(admin.may_modify(Uuid::new_v4()));
    assert!(admin.is_privileged());
}

#[test]
fn test_admin_role_string_is_privileged() {
    // GIVEN: A token carrying role "admin" without the is_admin flag
    let mut user = author_on_tier(MembershipTier::Bronze);
    user.role = "admin".to_string();
    assert!(user.is_privileged());
}

#[test]
fn test_regular_user_is_not_privileged() {
    assert!(!author_on_tier(MembershipTier::Platinum).is_privileged());
}

// ============================================================================
// Week Bucket Tests
// ============================================================================

#[test]
fn test_current_week_number_in_iso_range() {
    let week = current_week_number();
    assert!((1..=53).contains(&week), "ISO week out of range: {week}");
}
