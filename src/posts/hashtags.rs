use regex::Regex;
use std::sync::LazyLock;

static HASHTAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// Lowercases and guarantees the leading `#`. Tags are compared by exact
/// string equality everywhere downstream, so this is the only place
/// normalization happens.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('#');
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(format!("#{}", trimmed.to_lowercase()))
}

/// Harvests inline `#tags` from post text, normalized, first occurrence wins.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for m in HASHTAG_PATTERN.find_iter(text) {
        if let Some(tag) = normalize_hashtag(m.as_str()) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_hash_and_lowercases() {
        assert_eq!(normalize_hashtag("Umuganda"), Some("#umuganda".to_string()));
        assert_eq!(normalize_hashtag("#Umuganda"), Some("#umuganda".to_string()));
        assert_eq!(normalize_hashtag("  #tree_planting "), Some("#tree_planting".to_string()));
    }

    #[test]
    fn test_normalize_rejects_empty_and_punctuation() {
        assert_eq!(normalize_hashtag(""), None);
        assert_eq!(normalize_hashtag("#"), None);
        assert_eq!(normalize_hashtag("#no spaces"), None);
    }

    #[test]
    fn test_extract_dedupes_preserving_order() {
        let tags = extract_hashtags("Planted trees #Umuganda #Gasabo #umuganda today");
        assert_eq!(tags, vec!["#umuganda".to_string(), "#gasabo".to_string()]);
    }

    #[test]
    fn test_extract_nothing_from_plain_text() {
        assert!(extract_hashtags("We repaired the road").is_empty());
    }
}
