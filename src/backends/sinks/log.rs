// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::DispatchError;
use crate::model::{Dispatch, DispatchOrigin};
use crate::traits::Dispatcher;

/// Sink that only writes a one-line summary of each dispatch to the log.
///
/// Used when no other sink is configured so a replay still shows what would
/// have been persisted.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Dispatcher for LogSink {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError> {
        if dispatch.is_empty() {
            return Ok(());
        }

        let origin = match dispatch.origin {
            DispatchOrigin::Atomic => "atomic".to_string(),
            DispatchOrigin::Finalized { pages, raw_items } => {
                format!("finalized from {} items over {} pages", raw_items, pages)
            }
            DispatchOrigin::PageBackup { page } => format!("backup of page {}", page),
        };
        let endpoint = dispatch
            .endpoint
            .as_ref()
            .map(|e| e.as_str())
            .unwrap_or("-");

        tracing::info!(
            record_kind = %dispatch.record_kind,
            endpoint = endpoint,
            items = dispatch.items.len(),
            "{}: {} items ({})",
            dispatch.record_kind,
            dispatch.items.len(),
            origin
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
