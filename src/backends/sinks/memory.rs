// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::DispatchError;
use crate::model::{Dispatch, DispatchOrigin, EndpointKey, Payload};
use crate::traits::Dispatcher;

/// Sink that keeps every non-empty dispatch in memory.
///
/// Useful for embedding the engine in another program and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    dispatches: Mutex<Vec<Dispatch>>,
    archived: Mutex<Vec<(EndpointKey, Payload)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every dispatch received so far, in arrival order.
    pub fn dispatches(&self) -> Vec<Dispatch> {
        lock(&self.dispatches).clone()
    }

    /// Dispatches produced by finalization, excluding atomic sets and backups.
    pub fn finalized(&self) -> Vec<Dispatch> {
        lock(&self.dispatches)
            .iter()
            .filter(|d| matches!(d.origin, DispatchOrigin::Finalized { .. }))
            .cloned()
            .collect()
    }

    pub fn archived_payloads(&self) -> Vec<(EndpointKey, Payload)> {
        lock(&self.archived).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.dispatches).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Dispatcher for MemorySink {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError> {
        if !dispatch.is_empty() {
            lock(&self.dispatches).push(dispatch.clone());
        }
        Ok(())
    }

    async fn archive_payload(
        &self,
        endpoint: &EndpointKey,
        payload: &Payload,
    ) -> Result<(), DispatchError> {
        lock(&self.archived).push((endpoint.clone(), payload.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
