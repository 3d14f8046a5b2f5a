// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::RecordKindFactory;
use crate::config::Config;
use crate::traits::RecordKind;

/// Position of a record kind in its registry.
///
/// A plain value type so accumulation state can be keyed by
/// `(EndpointKey, RecordKindId)` without string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKindId(usize);

impl RecordKindId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Immutable, ordered collection of record kinds.
///
/// Built once and injected into the router. Order matters: extraction and
/// finalization visit kinds in registration order, which is also the order
/// in which their dispatches reach the sinks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use the_stitcher::backends::JsonArrayKind;
/// use the_stitcher::config::RecordKindRegistry;
/// use the_stitcher::traits::RecordKind;
///
/// let records: Arc<dyn RecordKind> = Arc::new(JsonArrayKind::new(
///     "records", "records", true, "id", vec!["id".to_string(), "name".to_string()],
/// ));
/// let registry = RecordKindRegistry::new(vec![records]);
///
/// let id = registry.find("records").unwrap();
/// assert!(registry.get(id).unwrap().is_paginated());
/// ```
#[derive(Clone)]
pub struct RecordKindRegistry(Vec<Arc<dyn RecordKind>>);

impl RecordKindRegistry {
    pub fn new(kinds: Vec<Arc<dyn RecordKind>>) -> Self {
        Self(kinds)
    }

    /// Create the registry from configuration, resolving every record kind
    pub fn from_config(cfg: &Config) -> Result<Self, String> {
        let kinds = cfg
            .record_kinds
            .iter()
            .map(|kind| {
                RecordKindFactory::create(kind)
                    .map_err(|e| format!("Failed to create record kind '{}': {}", kind.name, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(kinds))
    }

    /// Iterate kinds in registration order
    pub fn iter(&self) -> impl Iterator<Item = (RecordKindId, &Arc<dyn RecordKind>)> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, kind)| (RecordKindId(index), kind))
    }

    pub fn get(&self, id: RecordKindId) -> Option<&Arc<dyn RecordKind>> {
        self.0.get(id.0)
    }

    /// Look up a kind by name
    pub fn find(&self, name: &str) -> Option<RecordKindId> {
        self.0
            .iter()
            .position(|kind| kind.name() == name)
            .map(RecordKindId)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for RecordKindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordKindRegistry")
            .field("kind_count", &self.0.len())
            .field(
                "kinds",
                &self.0.iter().map(|k| k.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_from_config_preserves_order() {
        let cfg = parse_config(
            r#"
record_kinds:
  - name: motes
    source_key: sphere_materials
    fields: [id]
  - name: soul_breaks
    source_key: soul_strikes
    paginated: true
    fields: [id]
  - name: dress_records
    source_key: dress_records
    fields: [id]
"#,
        )
        .unwrap();

        let registry = RecordKindRegistry::from_config(&cfg).unwrap();

        let names: Vec<&str> = registry.iter().map(|(_, k)| k.name()).collect();
        assert_eq!(names, vec!["motes", "soul_breaks", "dress_records"]);
        assert_eq!(registry.find("soul_breaks").map(|id| id.index()), Some(1));
        assert_eq!(registry.find("missing"), None);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_debug_lists_kind_names() {
        let registry = RecordKindRegistry::new(vec![]);
        assert!(registry.is_empty());
        assert_eq!(
            format!("{:?}", registry),
            "RecordKindRegistry { kind_count: 0, kinds: [] }"
        );
    }
}
