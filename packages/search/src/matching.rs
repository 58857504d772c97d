//! Query normalization and candidate matching.

use field_map_search_models::{MatchType, SearchOptions};

/// Number of leading query characters a fuzzy match must contain.
pub const FUZZY_PREFIX_LEN: usize = 3;

/// Trims `text` and lower-cases it unless matching is case sensitive.
#[must_use]
pub fn normalize(text: &str, case_sensitive: bool) -> String {
    let trimmed = text.trim();
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Classifies how `candidate` matches an already-normalized `query`.
///
/// The candidate is normalized the same way as the query first. Returns
/// `None` for an empty query or when nothing matches.
#[must_use]
pub fn match_candidate(candidate: &str, query: &str, options: &SearchOptions) -> Option<MatchType> {
    if query.is_empty() {
        return None;
    }

    let candidate = normalize(candidate, options.case_sensitive);
    if candidate == query {
        return Some(MatchType::Exact);
    }
    if candidate.contains(query) {
        return Some(MatchType::Contains);
    }
    if options.fuzzy && candidate.contains(fuzzy_prefix(query)) {
        return Some(MatchType::Fuzzy);
    }
    None
}

/// First [`FUZZY_PREFIX_LEN`] characters of `query`, on a char boundary.
fn fuzzy_prefix(query: &str) -> &str {
    query
        .char_indices()
        .nth(FUZZY_PREFIX_LEN)
        .map_or(query, |(end, _)| &query[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SearchOptions {
        SearchOptions::default()
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Ahupuaa ", false), "ahupuaa");
        assert_eq!(normalize("  Ahupuaa ", true), "Ahupuaa");
    }

    #[test]
    fn exact_contains_fuzzy() {
        assert_eq!(match_candidate("Kalo", "kalo", &options()), Some(MatchType::Exact));
        assert_eq!(
            match_candidate("Kalo Patch 3", "patch", &options()),
            Some(MatchType::Contains)
        );
        assert_eq!(
            match_candidate("Kalua Pig", "kalo patch", &options()),
            Some(MatchType::Fuzzy)
        );
        assert_eq!(match_candidate("Taro", "kalo", &options()), None);
    }

    #[test]
    fn fuzzy_can_be_disabled() {
        let strict = options().with_fuzzy(false);
        assert_eq!(match_candidate("Kalua Pig", "kalo patch", &strict), None);
    }

    #[test]
    fn case_sensitive_matching() {
        let sensitive = options().with_case_sensitive(true);
        assert_eq!(match_candidate("Kalo", "kalo", &sensitive), None);
        assert_eq!(match_candidate("Kalo", "Kalo", &sensitive), Some(MatchType::Exact));
    }

    #[test]
    fn empty_query_and_candidate_never_match() {
        assert_eq!(match_candidate("anything", "", &options()), None);
        assert_eq!(match_candidate("", "kalo", &options()), None);
    }

    #[test]
    fn fuzzy_prefix_respects_char_boundaries() {
        assert_eq!(fuzzy_prefix("ʻāina"), "ʻāi");
        assert_eq!(fuzzy_prefix("ab"), "ab");
    }
}
