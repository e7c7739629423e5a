use std::collections::HashSet;

use tracing::debug;
use url::Url;

use crate::models::{SearchResult, SourceSet};

/// Compute the deduplication key for a URL: scheme + lowercased host +
/// path with the trailing slash trimmed. Query and fragment are dropped
/// so tracking parameters don't produce duplicate citations.
pub fn normalized_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("").to_ascii_lowercase();
            let path = parsed.path().trim_end_matches('/');
            format!("{}://{}{}", parsed.scheme(), host, path)
        }
        Err(_) => raw.to_ascii_lowercase().trim_end_matches('/').to_string(),
    }
}

/// Collapse runs of whitespace (including newlines) to single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deduplicate raw search results into a `SourceSet`.
///
/// First occurrence wins; later hits with the same normalized URL are
/// dropped without merging snippets. Input order is preserved, so the
/// output order is first-seen order across all queries. Results with no
/// usable URL are discarded.
pub fn normalize_sources(raw: impl IntoIterator<Item = SearchResult>) -> SourceSet {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    let mut dropped = 0usize;

    for mut result in raw {
        let key = normalized_url(&result.url);
        if key.is_empty() {
            dropped += 1;
            continue;
        }
        if !seen.insert(key) {
            dropped += 1;
            continue;
        }
        result.title = collapse_whitespace(&result.title);
        result.snippet = collapse_whitespace(&result.snippet);
        unique.push(result);
    }

    if dropped > 0 {
        debug!(kept = unique.len(), dropped, "deduplicated sources");
    }

    SourceSet::from_unique(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> SearchResult {
        SearchResult::new(url, format!("title for {url}"), "a snippet")
    }

    #[test]
    fn test_normalized_url_strips_query_and_slash() {
        assert_eq!(
            normalized_url("https://Example.com/papers/qec/?utm_source=x#abstract"),
            "https://example.com/papers/qec"
        );
        assert_eq!(
            normalized_url("https://example.com/papers/qec"),
            "https://example.com/papers/qec"
        );
    }

    #[test]
    fn test_normalized_url_unparseable_falls_back() {
        assert_eq!(normalized_url("Not A Url/"), "not a url");
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let set = normalize_sources(Vec::new());
        assert!(set.is_empty());
    }

    #[test]
    fn test_first_occurrence_wins_and_order_preserved() {
        // Three raw results, two sharing a normalized URL
        let raw = vec![
            result("https://a.org/one"),
            result("https://A.org/one/?ref=feed"),
            result("https://b.org/two"),
        ];
        let set = normalize_sources(raw);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().url, "https://a.org/one");
        assert_eq!(set.get(1).unwrap().url, "https://b.org/two");
    }

    #[test]
    fn test_idempotent() {
        let raw = vec![
            result("https://a.org/one"),
            result("https://a.org/one"),
            result("https://b.org/two"),
        ];
        let once = normalize_sources(raw);
        let twice = normalize_sources(once.iter().cloned().collect::<Vec<_>>());
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.url, b.url);
            assert_eq!(a.snippet, b.snippet);
        }
    }

    #[test]
    fn test_whitespace_collapsed() {
        let mut messy = result("https://a.org/one");
        messy.title = "  A   Title\nwith breaks  ".into();
        messy.snippet = "line one\n\n  line two".into();
        let set = normalize_sources(vec![messy]);
        assert_eq!(set.get(0).unwrap().title, "A Title with breaks");
        assert_eq!(set.get(0).unwrap().snippet, "line one line two");
    }

    #[test]
    fn test_results_without_urls_dropped() {
        let set = normalize_sources(vec![result(""), result("https://a.org/one")]);
        assert_eq!(set.len(), 1);
    }
}
