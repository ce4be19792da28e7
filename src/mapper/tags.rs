//! Tag extraction from free-form test titles.
//!
//! Three independent lexical patterns, applied in fixed priority order:
//! bracket groups `[a,b,c]`, at-mentions `@name`, hash-mentions `#name`.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]").expect("invalid bracket pattern"));

static AT_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_-]+)").expect("invalid at-mention pattern"));

static HASH_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([A-Za-z0-9_-]+)").expect("invalid hash-mention pattern"));

/// Extract candidate tag names from a title string.
///
/// Results are ordered by pattern priority, then left-to-right within each
/// pattern. Duplicates are permitted here; the mapper deduplicates across the
/// full title chain. A string with no markers yields an empty vec.
pub fn extract_tags(title: &str) -> Vec<String> {
    let mut tags = Vec::new();

    for group in BRACKET_GROUP.captures_iter(title) {
        for piece in group[1].split(',') {
            let piece = piece.trim();
            if !piece.is_empty() {
                tags.push(piece.to_string());
            }
        }
    }

    for mention in AT_MENTION.captures_iter(title) {
        tags.push(mention[1].to_string());
    }

    for mention in HASH_MENTION.captures_iter(title) {
        tags.push(mention[1].to_string());
    }

    tags
}
