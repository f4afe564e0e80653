//! Query-parameter merging for request URLs.
//!
//! The Coredata API mixes filter terms, pagination offsets, and the `sync`
//! flag into the query string, and base URLs handed around internally may
//! already carry parameters. [`add_url_parameters`] merges a parameter set
//! into a URL without disturbing anything else about it.

use std::collections::HashMap;

use url::Url;

/// Merges `parameters` into the query string of `url`.
///
/// The result's query is the union of the URL's existing pairs and the
/// supplied parameters; supplied values win on key collision and the output
/// never contains duplicate keys. Scheme, host, path, and fragment are
/// preserved unchanged, and values are percent-encoded by the `url` crate.
///
/// Supplied keys are applied in sorted order, so the function is
/// deterministic and idempotent: merging the same set twice yields the same
/// URL as merging it once.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use url::Url;
/// use coredata_api::add_url_parameters;
///
/// let base = Url::parse("https://example.coredata.is/api/v2/projects/?sync=true").unwrap();
/// let params = HashMap::from([("limit".to_string(), "20".to_string())]);
/// let merged = add_url_parameters(&base, &params);
/// assert_eq!(merged.as_str(), "https://example.coredata.is/api/v2/projects/?sync=true&limit=20");
/// ```
#[must_use]
pub fn add_url_parameters(url: &Url, parameters: &HashMap<String, String>) -> Url {
    // Existing pairs keep their order; the first occurrence of a duplicated
    // key wins its position and later occurrences are dropped.
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if !pairs.iter().any(|(k, _)| *k == key) {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }

    let mut keys: Vec<&String> = parameters.keys().collect();
    keys.sort();
    for key in keys {
        let value = &parameters[key];
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.clone(),
            None => pairs.push((key.clone(), value.clone())),
        }
    }

    let mut merged = url.clone();
    if pairs.is_empty() {
        merged.set_query(None);
    } else {
        merged
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_adds_parameters_to_bare_url() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/").unwrap();
        let merged = add_url_parameters(&url, &params(&[("sync", "true")]));
        assert_eq!(
            merged.as_str(),
            "https://example.coredata.is/api/v2/projects/?sync=true"
        );
    }

    #[test]
    fn test_preserves_existing_parameters() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/?sync=true").unwrap();
        let merged = add_url_parameters(&url, &params(&[("offset", "20")]));
        assert_eq!(
            merged.as_str(),
            "https://example.coredata.is/api/v2/projects/?sync=true&offset=20"
        );
    }

    #[test]
    fn test_supplied_value_wins_on_collision() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/?offset=0").unwrap();
        let merged = add_url_parameters(&url, &params(&[("offset", "20")]));
        assert_eq!(
            merged.as_str(),
            "https://example.coredata.is/api/v2/projects/?offset=20"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/?sync=true").unwrap();
        let set = params(&[("limit", "20"), ("offset", "0"), ("sync", "false")]);
        let once = add_url_parameters(&url, &set);
        let twice = add_url_parameters(&once, &set);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_duplicate_keys_in_output() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/?a=1&a=2").unwrap();
        let merged = add_url_parameters(&url, &params(&[("a", "3")]));
        let count = merged.query_pairs().filter(|(k, _)| k == "a").count();
        assert_eq!(count, 1);
        assert_eq!(merged.query(), Some("a=3"));
    }

    #[test]
    fn test_preserves_path_and_fragment() {
        let url = Url::parse("https://example.coredata.is/api/v2/files/abc/#frag").unwrap();
        let merged = add_url_parameters(&url, &params(&[("sync", "true")]));
        assert_eq!(merged.path(), "/api/v2/files/abc/");
        assert_eq!(merged.fragment(), Some("frag"));
        assert_eq!(merged.host_str(), Some("example.coredata.is"));
        assert_eq!(merged.scheme(), "https");
    }

    #[test]
    fn test_percent_encodes_values() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/").unwrap();
        let merged = add_url_parameters(&url, &params(&[("title__startswith", "a b&c")]));
        assert_eq!(
            merged.query(),
            Some("title__startswith=a+b%26c")
        );
    }

    #[test]
    fn test_empty_parameter_set_leaves_url_unchanged() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/?sync=true").unwrap();
        let merged = add_url_parameters(&url, &HashMap::new());
        assert_eq!(merged, url);
    }

    #[test]
    fn test_supplied_keys_applied_in_sorted_order() {
        let url = Url::parse("https://example.coredata.is/api/v2/projects/").unwrap();
        let merged = add_url_parameters(&url, &params(&[("offset", "0"), ("limit", "20")]));
        assert_eq!(merged.query(), Some("limit=20&offset=0"));
    }
}
