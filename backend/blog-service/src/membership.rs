/// Membership tier rules
///
/// Pure quota logic: a fixed per-tier limits table, tier-name
/// normalization, word counting over content blocks, and the ISO week
/// bucket used for weekly counters. No I/O happens here; handlers fetch
/// the weekly counts and hand them in.
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Membership tier governing posting quotas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Per-tier quota limits
///
/// `max_posts_per_week` is `None` for tiers without a weekly cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub max_posts_per_week: Option<u32>,
    pub max_words_per_post: u32,
}

impl MembershipTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }

    /// Fixed limits table
    pub fn limits(&self) -> TierLimits {
        match self {
            Self::Bronze => TierLimits {
                max_posts_per_week: Some(1),
                max_words_per_post: 600,
            },
            Self::Silver => TierLimits {
                max_posts_per_week: Some(3),
                max_words_per_post: 900,
            },
            Self::Gold => TierLimits {
                max_posts_per_week: Some(5),
                max_words_per_post: 1200,
            },
            Self::Platinum => TierLimits {
                max_posts_per_week: None,
                max_words_per_post: 1500,
            },
        }
    }
}

/// Normalize a raw tier name from the identity provider or a token
///
/// Strips all whitespace, lowercases, and maps known synonyms. Unknown
/// input falls back to the least-permissive tier.
pub fn normalize_tier(raw: &str) -> MembershipTier {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    match cleaned.as_str() {
        "bronce" => MembershipTier::Bronze,
        other => MembershipTier::from_str(other).unwrap_or(MembershipTier::Bronze),
    }
}

/// Whether a user on `tier` may create another post this week
///
/// `posts_this_week` is the number of posts already created in the
/// current ISO week; creation is allowed strictly below the weekly cap.
pub fn can_create_post(tier: MembershipTier, posts_this_week: i64) -> bool {
    match tier.limits().max_posts_per_week {
        Some(cap) => posts_this_week < i64::from(cap),
        None => true,
    }
}

/// Whether a post of `word_count` words fits the tier's per-post limit
pub fn within_word_limit(tier: MembershipTier, word_count: u32) -> bool {
    word_count <= tier.limits().max_words_per_post
}

/// Count whitespace-delimited words across all content blocks
///
/// A block contributes the text of its `text` field, falling back to its
/// `content` field when `text` is missing or empty; a bare JSON string
/// block is its own text. Anything else (images, embeds) counts zero. A
/// non-array value counts zero.
pub fn count_words(blocks: &Value) -> u32 {
    let Some(blocks) = blocks.as_array() else {
        return 0;
    };

    blocks
        .iter()
        .map(|block| {
            let text = match block {
                Value::String(s) => s.as_str(),
                Value::Object(map) => map
                    .get("text")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .or_else(|| map.get("content").and_then(Value::as_str))
                    .unwrap_or(""),
                _ => "",
            };
            text.split_whitespace().count() as u32
        })
        .sum()
}

/// ISO week number of the current UTC date
pub fn current_week_number() -> i32 {
    Utc::now().iso_week().week() as i32
}
