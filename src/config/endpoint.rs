// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::EndpointOptions;
use crate::model::EndpointKey;

/// Decides which responses the engine looks at and what endpoint they belong to.
#[derive(Debug, Clone, Default)]
pub struct EndpointMatcher {
    patterns: Vec<String>,
    identity_params: Vec<String>,
}

impl EndpointMatcher {
    pub fn new(patterns: Vec<String>, identity_params: Vec<String>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| p.to_lowercase()).collect(),
            identity_params,
        }
    }

    pub fn from_options(options: &EndpointOptions) -> Self {
        Self::new(options.patterns.clone(), options.identity_query_params.clone())
    }

    /// Accepts every URL and strips every query parameter.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Endpoint key for `url`, or `None` when the URL matches no pattern.
    pub fn resolve(&self, url: &str) -> Option<EndpointKey> {
        if !self.patterns.is_empty() {
            let lowered = url.to_lowercase();
            if !self.patterns.iter().any(|p| lowered.contains(p.as_str())) {
                return None;
            }
        }
        Some(EndpointKey::from_url(url, &self.identity_params))
    }
}
