// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

use crate::backends::MemorySink;
use crate::errors::{DispatchError, ExtractionError};
use crate::model::{Batch, Dispatch, Payload};
use crate::traits::{Dispatcher, RecordKind};

/// A dispatcher that rejects dispatches, for testing failure scenarios.
///
/// With `only_kind` set, dispatches of other record kinds succeed.
pub struct FailingDispatcher {
    reason: String,
    only_kind: Option<String>,
    attempts: AtomicUsize,
}

impl FailingDispatcher {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
            only_kind: None,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn for_kind(record_kind: &str, reason: &str) -> Self {
        Self {
            only_kind: Some(record_kind.to_string()),
            ..Self::new(reason)
        }
    }

    /// Number of `emit` calls seen, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Dispatcher for FailingDispatcher {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match &self.only_kind {
            Some(kind) if kind != &dispatch.record_kind => Ok(()),
            _ => Err(DispatchError::Rejected(self.reason.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// A dispatcher whose first `emit` parks until [`BlockingDispatcher::release`]
/// is called. Every dispatch is recorded once it goes through.
pub struct BlockingDispatcher {
    entered: Notify,
    released: Notify,
    has_blocked: AtomicBool,
    inner: MemorySink,
}

impl BlockingDispatcher {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            released: Notify::new(),
            has_blocked: AtomicBool::new(false),
            inner: MemorySink::new(),
        }
    }

    /// Resolves once the first `emit` is parked.
    pub async fn wait_until_blocked(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    pub fn finalized(&self) -> Vec<Dispatch> {
        self.inner.finalized()
    }
}

#[async_trait]
impl Dispatcher for BlockingDispatcher {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError> {
        if !self.has_blocked.swap(true, Ordering::SeqCst) {
            self.entered.notify_one();
            self.released.notified().await;
        }
        self.inner.emit(dispatch).await
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}

/// A record kind whose extraction always fails
pub struct FailingKind {
    name: String,
    paginated: bool,
    fields: Vec<String>,
}

impl FailingKind {
    pub fn new(name: &str, paginated: bool) -> Self {
        Self {
            name: name.to_string(),
            paginated,
            fields: vec!["id".to_string()],
        }
    }
}

impl RecordKind for FailingKind {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_paginated(&self) -> bool {
        self.paginated
    }

    fn identity_field(&self) -> &str {
        "id"
    }

    fn field_schema(&self) -> &[String] {
        &self.fields
    }

    fn extract(&self, _payload: &Payload) -> Result<Batch, ExtractionError> {
        Err(ExtractionError::Rejected(format!(
            "{} cannot be extracted",
            self.name
        )))
    }
}
