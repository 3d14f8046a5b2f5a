// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory store of not-yet-finalized pages.
//!
//! Items are keyed by the composite `(EndpointKey, RecordKindId)` so there is
//! never more than one item sequence per endpoint and kind. Page count and
//! last-update time are tracked per endpoint across all of its kinds. An
//! endpoint with an entry in `progress` is "accumulating"; one without is
//! "idle".
//!
//! Nothing here performs I/O or knows about quiet periods; deciding when to
//! finalize is [`crate::engine::IdleTimeoutFinalizer`]'s job.

use std::collections::BTreeMap;

use crate::config::RecordKindId;
use crate::model::{Batch, EndpointKey, Item, Timestamp};

/// Composite key of one accumulated item sequence.
pub type AccumulationKey = (EndpointKey, RecordKindId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EndpointProgress {
    page_count: u32,
    last_update: Timestamp,
}

/// Everything accumulated for one endpoint, removed from the store in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulationState {
    pub endpoint: EndpointKey,
    pub page_count: u32,
    pub last_update: Timestamp,
    /// Item sequences in record kind registration order.
    pub sequences: Vec<(RecordKindId, Vec<Item>)>,
}

#[derive(Debug, Default)]
pub struct Accumulator {
    items: BTreeMap<AccumulationKey, Vec<Item>>,
    progress: BTreeMap<EndpointKey, EndpointProgress>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `batch` to the sequence for `(endpoint, kind)` and return the
    /// endpoint's page count after the append.
    ///
    /// Creates the endpoint's state on its first batch. No deduplication
    /// happens here.
    pub fn append(
        &mut self,
        endpoint: &EndpointKey,
        kind: RecordKindId,
        batch: Batch,
        now: Timestamp,
    ) -> u32 {
        self.items
            .entry((endpoint.clone(), kind))
            .or_default()
            .extend(batch);

        let progress = self
            .progress
            .entry(endpoint.clone())
            .or_insert(EndpointProgress {
                page_count: 0,
                last_update: now,
            });
        progress.page_count += 1;
        progress.last_update = now;
        progress.page_count
    }

    /// Items accumulated so far for `(endpoint, kind)`, in arrival order.
    pub fn snapshot(&self, endpoint: &EndpointKey, kind: RecordKindId) -> &[Item] {
        self.items
            .get(&(endpoint.clone(), kind))
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    /// Number of appends received for `endpoint` across every kind; 0 when idle.
    pub fn page_count(&self, endpoint: &EndpointKey) -> u32 {
        self.progress
            .get(endpoint)
            .map(|p| p.page_count)
            .unwrap_or(0)
    }

    pub fn last_update(&self, endpoint: &EndpointKey) -> Option<Timestamp> {
        self.progress.get(endpoint).map(|p| p.last_update)
    }

    pub fn is_accumulating(&self, endpoint: &EndpointKey) -> bool {
        self.progress.contains_key(endpoint)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointKey> {
        self.progress.keys()
    }

    /// Drop all state for `endpoint`. A no-op for idle endpoints.
    pub fn clear(&mut self, endpoint: &EndpointKey) {
        let _ = self.take(endpoint);
    }

    /// Remove and return all state for `endpoint`, or `None` when idle.
    pub fn take(&mut self, endpoint: &EndpointKey) -> Option<AccumulationState> {
        let progress = self.progress.remove(endpoint)?;

        let keys: Vec<AccumulationKey> = self
            .items
            .keys()
            .filter(|(key_endpoint, _)| key_endpoint == endpoint)
            .cloned()
            .collect();

        let sequences = keys
            .into_iter()
            .filter_map(|key| {
                let kind = key.1;
                self.items.remove(&key).map(|items| (kind, items))
            })
            .collect();

        Some(AccumulationState {
            endpoint: endpoint.clone(),
            page_count: progress.page_count,
            last_update: progress.last_update,
            sequences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::JsonArrayKind;
    use crate::config::RecordKindRegistry;
    use crate::traits::RecordKind;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn kind_ids() -> (RecordKindId, RecordKindId) {
        let kinds: Vec<Arc<dyn RecordKind>> = vec![
            Arc::new(JsonArrayKind::new("records", "records", true, "id", vec![])),
            Arc::new(JsonArrayKind::new("rewards", "rewards", true, "id", vec![])),
        ];
        let registry = RecordKindRegistry::new(kinds);
        (
            registry.find("records").unwrap(),
            registry.find("rewards").unwrap(),
        )
    }

    fn batch(ids: &[i64]) -> Batch {
        ids.iter()
            .map(|id| match json!({ "id": id }) {
                Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_append_preserves_order_and_counts_pages() {
        let (records, rewards) = kind_ids();
        let endpoint = EndpointKey::new("/list_other");
        let mut acc = Accumulator::new();

        assert_eq!(acc.append(&endpoint, records, batch(&[1, 2]), Timestamp::from_secs(0)), 1);
        assert_eq!(acc.append(&endpoint, records, batch(&[2, 3]), Timestamp::from_secs(1)), 2);
        assert_eq!(acc.append(&endpoint, rewards, batch(&[9]), Timestamp::from_secs(2)), 3);

        assert_eq!(ids(acc.snapshot(&endpoint, records)), vec![1, 2, 2, 3]);
        assert_eq!(ids(acc.snapshot(&endpoint, rewards)), vec![9]);
        assert_eq!(acc.page_count(&endpoint), 3);
        assert_eq!(acc.last_update(&endpoint), Some(Timestamp::from_secs(2)));
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let (records, _) = kind_ids();
        let endpoint = EndpointKey::new("/list_other");
        let mut acc = Accumulator::new();
        acc.append(&endpoint, records, batch(&[1]), Timestamp::from_secs(0));

        let first = acc.snapshot(&endpoint, records).to_vec();
        let second = acc.snapshot(&endpoint, records).to_vec();
        assert_eq!(first, second);
        assert_eq!(acc.page_count(&endpoint), 1);
    }

    #[test]
    fn test_clear_unknown_endpoint_is_a_no_op() {
        let mut acc = Accumulator::new();
        acc.clear(&EndpointKey::new("/never_seen"));
        assert_eq!(acc.page_count(&EndpointKey::new("/never_seen")), 0);
        assert!(acc.take(&EndpointKey::new("/never_seen")).is_none());
    }

    #[test]
    fn test_take_removes_only_that_endpoint() {
        let (records, rewards) = kind_ids();
        let a = EndpointKey::new("/list_buddy");
        let b = EndpointKey::new("/list_other");
        let mut acc = Accumulator::new();

        acc.append(&a, rewards, batch(&[5]), Timestamp::from_secs(0));
        acc.append(&a, records, batch(&[1]), Timestamp::from_secs(1));
        acc.append(&b, records, batch(&[7]), Timestamp::from_secs(1));

        let state = acc.take(&a).unwrap();
        assert_eq!(state.page_count, 2);
        assert_eq!(state.last_update, Timestamp::from_secs(1));
        let kinds: Vec<RecordKindId> = state.sequences.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, vec![records, rewards]);

        assert!(!acc.is_accumulating(&a));
        assert!(acc.snapshot(&a, records).is_empty());
        assert_eq!(ids(acc.snapshot(&b, records)), vec![7]);
        assert_eq!(acc.endpoints().collect::<Vec<_>>(), vec![&b]);
    }
}
