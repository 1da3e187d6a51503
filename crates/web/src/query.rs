//! Query string extraction
//!
//! Everything after the first `?` of the request target is decoded with
//! `application/x-www-form-urlencoded` rules: pairs joined by `&`, `key=value`,
//! percent escapes decoded and `+` read as a space.

use std::collections::HashMap;

use tracing::warn;

/// Parses the query component of `raw_uri` into a map.
///
/// A target without `?` gives an empty map. On duplicate keys the last occurrence wins,
/// and a key without `=` maps to an empty string.
pub fn parse_query(raw_uri: &str) -> HashMap<String, String> {
    let Some((_path, query)) = raw_uri.split_once('?') else {
        return HashMap::new();
    };

    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => pairs.into_iter().collect(),
        Err(e) => {
            warn!(cause = %e, query, "can't decode query string");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_duplicate_wins() {
        let params = parse_query("/search?q=cat&q=dog");

        assert_eq!(params.len(), 1);
        assert_eq!(params["q"], "dog");
    }

    #[test]
    fn no_query_is_empty() {
        assert!(parse_query("/search").is_empty());
        assert!(parse_query("/search?").is_empty());
    }

    #[test]
    fn decodes_percent_escapes_and_plus() {
        let params = parse_query("/find?name=J%C3%BCrgen+M&path=%2Fetc%2Fhosts");

        assert_eq!(params["name"], "Jürgen M");
        assert_eq!(params["path"], "/etc/hosts");
    }

    #[test]
    fn key_without_value() {
        let params = parse_query("/items?verbose&limit=10");

        assert_eq!(params["verbose"], "");
        assert_eq!(params["limit"], "10");
    }

    #[test]
    fn splits_on_first_question_mark_only() {
        let params = parse_query("/ask?q=why?&lang=en");

        assert_eq!(params["q"], "why?");
        assert_eq!(params["lang"], "en");
    }
}
