// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};
use url::form_urlencoded;

/// Normalized identifier of a logical API endpoint.
///
/// Two responses that are pages of the same accumulation map to the same key
/// because every per-call query parameter (cursors, offsets, cache busters) is
/// stripped. Parameters that genuinely select a different data set can be
/// declared as identity parameters and are kept, in a canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey(String);

impl EndpointKey {
    /// Wrap an already-normalized key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key for a request URL.
    ///
    /// The fragment is always dropped. Query parameters are dropped unless
    /// their name appears in `identity_params`; kept parameters are sorted by
    /// name (stable for repeated names) so their order on the wire does not
    /// matter.
    ///
    /// # Example
    /// ```
    /// use the_stitcher::model::EndpointKey;
    ///
    /// let a = EndpointKey::from_url("https://api.example/list_other?cursor=40&lang=en", &["lang".to_string()]);
    /// let b = EndpointKey::from_url("https://api.example/list_other?lang=en&cursor=80", &["lang".to_string()]);
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "https://api.example/list_other?lang=en");
    /// ```
    pub fn from_url(url: &str, identity_params: &[String]) -> Self {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let (base, query) = match without_fragment.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (without_fragment, None),
        };

        let mut kept: Vec<(String, String)> = match query {
            Some(query) if !identity_params.is_empty() => form_urlencoded::parse(query.as_bytes())
                .filter(|(name, _)| identity_params.iter().any(|p| p == name))
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect(),
            _ => Vec::new(),
        };

        if kept.is_empty() {
            return Self(base.to_string());
        }

        kept.sort_by(|a, b| a.0.cmp(&b.0));
        let canonical = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();

        Self(format!("{}?{}", base, canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EndpointKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_table_driven() {
        struct TestCase {
            name: &'static str,
            url: &'static str,
            identity_params: Vec<&'static str>,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "no query",
                url: "https://api.example/dff/list_buddy",
                identity_params: vec![],
                expected: "https://api.example/dff/list_buddy",
            },
            TestCase {
                name: "cursor stripped",
                url: "https://api.example/dff/list_other?page=3&_=1699999",
                identity_params: vec![],
                expected: "https://api.example/dff/list_other",
            },
            TestCase {
                name: "fragment stripped",
                url: "/list_other?page=1#top",
                identity_params: vec![],
                expected: "/list_other",
            },
            TestCase {
                name: "identity param kept, others dropped",
                url: "/list_other?page=2&category=weapons",
                identity_params: vec!["category"],
                expected: "/list_other?category=weapons",
            },
            TestCase {
                name: "identity params sorted",
                url: "/search?z=1&offset=20&a=2",
                identity_params: vec!["a", "z"],
                expected: "/search?a=2&z=1",
            },
            TestCase {
                name: "identity param absent",
                url: "/list_other?page=2",
                identity_params: vec!["category"],
                expected: "/list_other",
            },
            TestCase {
                name: "encoded values round trip",
                url: "/lookup?name=caf%C3%A9+bar&page=9",
                identity_params: vec!["name"],
                expected: "/lookup?name=caf%C3%A9+bar",
            },
        ];

        for tc in test_cases {
            let params: Vec<String> = tc.identity_params.iter().map(|s| s.to_string()).collect();
            let key = EndpointKey::from_url(tc.url, &params);
            assert_eq!(key.as_str(), tc.expected, "test case: {}", tc.name);
        }
    }

    #[test]
    fn unrelated_endpoints_get_distinct_keys() {
        let buddy = EndpointKey::from_url("/dff/list_buddy?page=1", &[]);
        let other = EndpointKey::from_url("/dff/list_other?page=1", &[]);
        assert_ne!(buddy, other);
    }
}
