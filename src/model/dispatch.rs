// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{EndpointKey, Item};

/// Why a dispatch happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOrigin {
    /// A non-paginated record kind, emitted straight from the response.
    Atomic,
    /// A deduplicated accumulation, emitted at finalization.
    Finalized { pages: u32, raw_items: usize },
    /// A single raw page, emitted as a safety copy before finalization.
    PageBackup { page: u32 },
}

/// The deduplicated item list of one record kind at finalization time.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedSet {
    pub record_kind: String,
    pub items: Vec<Item>,
    pub field_schema: Vec<String>,
    /// Item count before deduplication.
    pub raw_items: usize,
}

impl FinalizedSet {
    pub fn into_dispatch(self, endpoint: EndpointKey, pages: u32) -> Dispatch {
        Dispatch {
            endpoint: Some(endpoint),
            record_kind: self.record_kind,
            items: self.items,
            field_schema: self.field_schema,
            origin: DispatchOrigin::Finalized {
                pages,
                raw_items: self.raw_items,
            },
        }
    }
}

/// Everything a sink needs to persist one item set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub endpoint: Option<EndpointKey>,
    pub record_kind: String,
    pub items: Vec<Item>,
    pub field_schema: Vec<String>,
    pub origin: DispatchOrigin,
}

impl Dispatch {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
