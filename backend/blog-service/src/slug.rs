/// URL-safe slug derivation for posts
///
/// Slugs are globally unique. The base slug is derived from the title;
/// collisions get a numeric suffix plus a short author fragment so that
/// identical titles from different authors stay distinct.
use uuid::Uuid;

/// Derive the base slug from a post title
///
/// ASCII alphanumerics are kept lowercased; every other run of
/// characters collapses into a single hyphen. An empty result falls back
/// to "post" so the uniqueness probe always has something to suffix.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

/// Candidate slug for the given collision attempt
///
/// Attempt 0 is the base slug itself; attempt `i` appends `-{i}-{author}`.
pub fn candidate(base: &str, attempt: u32, author_fragment: &str) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}-{}", base, attempt, author_fragment)
    }
}

/// Short, stable fragment of the author's ID used in collision suffixes
pub fn author_fragment(user_id: Uuid) -> String {
    user_id
        .to_string()
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Walk candidates until one is not in `taken`, like the service does
    /// against the slug column.
    fn unique_against(taken: &HashSet<String>, title: &str, author: Uuid) -> String {
        let base = slugify(title);
        let fragment = author_fragment(author);
        let mut attempt = 0;
        loop {
            let candidate = candidate(&base, attempt, &fragment);
            if !taken.contains(&candidate) {
                return candidate;
            }
            attempt += 1;
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Ten Tips for 2026  "), "ten-tips-for-2026");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_slugify_degenerate_titles() {
        assert_eq!(slugify("!!!"), "post");
        assert_eq!(slugify(""), "post");
    }

    #[test]
    fn test_identical_titles_different_authors_stay_distinct() {
        let mut taken = HashSet::new();
        let first = unique_against(&taken, "My Great Post", Uuid::new_v4());
        taken.insert(first.clone());

        let second = unique_against(&taken, "My Great Post", Uuid::new_v4());
        assert_ne!(first, second);
        assert!(second.starts_with("my-great-post-1-"));
    }

    #[test]
    fn test_probe_terminates_against_dense_taken_set() {
        let author = Uuid::new_v4();
        let fragment = author_fragment(author);
        let base = slugify("Title");

        let mut taken: HashSet<String> = HashSet::new();
        taken.insert(base.clone());
        for i in 1..50 {
            taken.insert(candidate(&base, i, &fragment));
        }

        let slug = unique_against(&taken, "Title", author);
        assert!(!taken.contains(&slug));
        assert_eq!(slug, candidate(&base, 50, &fragment));
    }
}
