// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-response entry point of the aggregation engine.
//!
//! The [`DispatchRouter`] owns the accumulation state and the idle-timeout
//! finalizer and drives both from two directions: inbound response events
//! ([`DispatchRouter::handle_event`]) and the clock ([`DispatchRouter::check`],
//! [`DispatchRouter::shutdown`]).
//!
//! # Event flow
//!
//! ```text
//! ResponseEvent
//!   → EndpointMatcher::resolve      (unrelated traffic is ignored)
//!   → decode body                    (malformed → whole event dropped)
//!   → RecordKind::extract, per kind  (a failing kind is skipped, the rest run)
//!       atomic    → Dispatcher::emit immediately
//!       paginated → Accumulator::append + finalizer watch (+ page backup)
//!   → check(received_at)
//! ```
//!
//! # Locking
//!
//! All accumulation state sits behind one mutex. It is held only for the
//! in-memory steps (append, due-scan, take) and never across an `.await`.
//! Finalization *takes* an endpoint's state out under the lock, which is an
//! atomic snapshot-and-clear, then deduplicates and dispatches without it. An
//! append racing a finalization therefore either landed before the take and
//! is part of the finalized set, or starts a fresh accumulation cycle.
//!
//! # Failure handling
//!
//! Nothing here is fatal. A dispatch failure is logged and reported in the
//! returned [`FinalizationReport`]; the endpoint's state is cleared anyway
//! because the source pages are gone and cannot be replayed from memory.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::consts::DEFAULT_QUIET_PERIOD_MS;
use crate::config::{EndpointMatcher, RecordKindId, RecordKindRegistry};
use crate::engine::{dedupe, AccumulationState, Accumulator, IdleTimeoutFinalizer};
use crate::errors::EngineError;
use crate::model::{
    Batch, Dispatch, DispatchOrigin, EndpointKey, FinalizedSet, Item, ResponseEvent, Timestamp,
};
use crate::observability::messages::finalizer::{
    DispatchFailed, FinalizationCompleted, FinalizationStarted, KindFinalized, ShutdownSummary,
};
use crate::observability::messages::router::{
    AtomicSetDispatched, ExtractionFailed, PageAccumulated, PayloadMalformed, ResponseIgnored,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Dispatcher, RecordKind};

/// Router tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    pub quiet_period: Duration,
    /// Emit every raw page as a [`DispatchOrigin::PageBackup`] before it is
    /// accumulated.
    pub page_backup_enabled: bool,
    /// Hand every decoded payload to [`Dispatcher::archive_payload`].
    pub raw_backup_enabled: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(DEFAULT_QUIET_PERIOD_MS),
            page_backup_enabled: false,
            raw_backup_enabled: false,
        }
    }
}

/// What happened to one inbound event.
#[derive(Debug)]
pub enum EventOutcome {
    /// The URL matched no endpoint pattern; nothing was touched.
    Ignored,
    Processed(EventSummary),
}

impl EventOutcome {
    pub fn summary(&self) -> Option<&EventSummary> {
        match self {
            EventOutcome::Ignored => None,
            EventOutcome::Processed(summary) => Some(summary),
        }
    }
}

/// Per-event report of extraction, accumulation and dispatch.
#[derive(Debug)]
pub struct EventSummary {
    pub endpoint: EndpointKey,
    /// `(record kind, items appended)` for each paginated kind with a batch.
    pub accumulated: Vec<(String, usize)>,
    /// Atomic sets dispatched successfully.
    pub dispatched: Vec<Dispatch>,
    /// Extraction and dispatch failures for this event, in occurrence order.
    pub failures: Vec<EngineError>,
    /// Finalizations triggered by the check that follows every event.
    pub finalizations: Vec<FinalizationReport>,
}

impl EventSummary {
    fn new(endpoint: EndpointKey) -> Self {
        Self {
            endpoint,
            accumulated: Vec::new(),
            dispatched: Vec::new(),
            failures: Vec::new(),
            finalizations: Vec::new(),
        }
    }
}

/// Result of finalizing one endpoint.
#[derive(Debug)]
pub struct FinalizationReport {
    pub endpoint: EndpointKey,
    pub pages: u32,
    /// True when finalization bypassed the quiet period (shutdown).
    pub forced: bool,
    /// Finalized sets the dispatcher accepted, in registration order.
    pub dispatched: Vec<Dispatch>,
    /// Dispatch failures. The state was cleared regardless.
    pub failures: Vec<EngineError>,
}

struct EngineState {
    accumulator: Accumulator,
    finalizer: IdleTimeoutFinalizer,
}

impl EngineState {
    /// Remove an endpoint from both the accumulator and the pending set.
    fn take(&mut self, endpoint: &EndpointKey) -> Option<AccumulationState> {
        self.finalizer.unwatch(endpoint);
        self.accumulator.take(endpoint)
    }
}

struct Extracted<'a> {
    id: RecordKindId,
    kind: &'a Arc<dyn RecordKind>,
    batch: Batch,
}

/// Routes response events into accumulation or immediate dispatch and
/// finalizes endpoints once they go quiet.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use the_stitcher::backends::{JsonArrayKind, MemorySink};
/// use the_stitcher::config::{EndpointMatcher, RecordKindRegistry};
/// use the_stitcher::engine::{DispatchRouter, RouterOptions};
/// use the_stitcher::model::{ResponseEvent, Timestamp};
/// use the_stitcher::traits::RecordKind;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let records: Arc<dyn RecordKind> =
///     Arc::new(JsonArrayKind::new("records", "records", true, "id", vec!["id".to_string()]));
/// let sink = Arc::new(MemorySink::new());
/// let router = DispatchRouter::new(
///     RecordKindRegistry::new(vec![records]),
///     EndpointMatcher::accept_all(),
///     sink.clone(),
///     RouterOptions::default(),
/// );
///
/// let page = json!({"records": [{"id": 1}, {"id": 2}]});
/// router
///     .handle_event(&ResponseEvent::from_json("/list_other?page=1", &page, Timestamp::from_secs(0)))
///     .await?;
///
/// let reports = router.check(Timestamp::from_secs(5)).await;
/// assert_eq!(reports.len(), 1);
/// assert_eq!(sink.finalized()[0].items.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct DispatchRouter {
    registry: RecordKindRegistry,
    matcher: EndpointMatcher,
    dispatcher: Arc<dyn Dispatcher>,
    options: RouterOptions,
    state: Mutex<EngineState>,
    dispatch_counts: Mutex<BTreeMap<String, usize>>,
}

impl DispatchRouter {
    pub fn new(
        registry: RecordKindRegistry,
        matcher: EndpointMatcher,
        dispatcher: Arc<dyn Dispatcher>,
        options: RouterOptions,
    ) -> Self {
        let finalizer = IdleTimeoutFinalizer::new(options.quiet_period);
        Self {
            registry,
            matcher,
            dispatcher,
            options,
            state: Mutex::new(EngineState {
                accumulator: Accumulator::new(),
                finalizer,
            }),
            dispatch_counts: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn registry(&self) -> &RecordKindRegistry {
        &self.registry
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Handle one response event, then run [`Self::check`] at its receipt time.
    ///
    /// Returns `Err(EngineError::MalformedPayload)` when the body is not a
    /// JSON object; in that case no state was touched. Extraction and
    /// dispatch failures are reported inside the returned summary.
    pub async fn handle_event(&self, event: &ResponseEvent) -> Result<EventOutcome, EngineError> {
        let Some(endpoint) = self.matcher.resolve(&event.url) else {
            ResponseIgnored { url: &event.url }.log();
            return Ok(EventOutcome::Ignored);
        };

        let payload = event.decode().map_err(|reason| {
            PayloadMalformed {
                endpoint: endpoint.as_str(),
                reason: &reason,
            }
            .log();
            EngineError::MalformedPayload {
                endpoint: endpoint.to_string(),
                reason,
            }
        })?;

        let mut summary = EventSummary::new(endpoint.clone());

        if self.options.raw_backup_enabled {
            if let Err(error) = self.dispatcher.archive_payload(&endpoint, &payload).await {
                DispatchFailed {
                    endpoint: endpoint.as_str(),
                    record_kind: "raw_data",
                    origin: "raw payload",
                    error: &error,
                }
                .log();
                summary.failures.push(EngineError::DispatchFailure {
                    record_kind: "raw_data".to_string(),
                    source: error,
                });
            }
        }

        let mut extracted = Vec::new();
        for (id, kind) in self.registry.iter() {
            match kind.extract(&payload) {
                Ok(batch) if batch.is_empty() => {}
                Ok(batch) => extracted.push(Extracted { id, kind, batch }),
                Err(source) => {
                    ExtractionFailed {
                        endpoint: endpoint.as_str(),
                        record_kind: kind.name(),
                        error: &source,
                    }
                    .log();
                    summary.failures.push(EngineError::ExtractionFailure {
                        record_kind: kind.name().to_string(),
                        source,
                    });
                }
            }
        }

        let mut outgoing = Vec::new();
        {
            let mut state = self.lock_state();
            for Extracted { id, kind, batch } in extracted {
                if !kind.is_paginated() {
                    outgoing.push(Dispatch {
                        endpoint: Some(endpoint.clone()),
                        record_kind: kind.name().to_string(),
                        items: batch,
                        field_schema: kind.field_schema().to_vec(),
                        origin: DispatchOrigin::Atomic,
                    });
                    continue;
                }

                let page_items = batch.len();
                let backup = self.options.page_backup_enabled.then(|| batch.clone());
                let pages = state
                    .accumulator
                    .append(&endpoint, id, batch, event.received_at);
                state.finalizer.watch(endpoint.clone());

                PageAccumulated {
                    endpoint: endpoint.as_str(),
                    record_kind: kind.name(),
                    page_items,
                    total_items: state.accumulator.snapshot(&endpoint, id).len(),
                    pages,
                    quiet_period: self.options.quiet_period,
                }
                .log();
                summary
                    .accumulated
                    .push((kind.name().to_string(), page_items));

                if let Some(items) = backup {
                    outgoing.push(Dispatch {
                        endpoint: Some(endpoint.clone()),
                        record_kind: kind.name().to_string(),
                        items,
                        field_schema: kind.field_schema().to_vec(),
                        origin: DispatchOrigin::PageBackup { page: pages },
                    });
                }
            }
        }

        for dispatch in outgoing {
            match self.emit(&dispatch).await {
                Ok(()) => {
                    if dispatch.origin == DispatchOrigin::Atomic {
                        AtomicSetDispatched {
                            endpoint: endpoint.as_str(),
                            record_kind: &dispatch.record_kind,
                            item_count: dispatch.items.len(),
                        }
                        .log();
                        summary.dispatched.push(dispatch);
                    }
                }
                Err(error) => summary.failures.push(error),
            }
        }

        summary.finalizations = self.check(event.received_at).await;
        Ok(EventOutcome::Processed(summary))
    }

    /// Finalize every pending endpoint whose quiet period has elapsed at `now`.
    ///
    /// Endpoints are finalized one at a time; each takes the lock only long
    /// enough to remove its own state.
    pub async fn check(&self, now: Timestamp) -> Vec<FinalizationReport> {
        let due = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            state.finalizer.prune(&state.accumulator);
            state.finalizer.due(&state.accumulator, now)
        };

        let mut reports = Vec::new();
        for endpoint in due {
            if let Some(report) = self.finalize(&endpoint, now, false).await {
                reports.push(report);
            }
        }
        reports
    }

    /// Force-finalize every accumulating endpoint regardless of its quiet
    /// period, then log the per-kind dispatch summary.
    pub async fn shutdown(&self, now: Timestamp) -> Vec<FinalizationReport> {
        let pending = {
            let mut state = self.lock_state();
            let mut pending = state.finalizer.drain();
            for endpoint in state.accumulator.endpoints() {
                if !pending.contains(endpoint) {
                    pending.push(endpoint.clone());
                }
            }
            pending
        };

        let mut reports = Vec::new();
        for endpoint in pending {
            if let Some(report) = self.finalize(&endpoint, now, true).await {
                reports.push(report);
            }
        }

        ShutdownSummary {
            finalized_endpoints: reports.len(),
            dispatch_counts: &self.stats(),
        }
        .log();
        reports
    }

    /// Finalize one endpoint now, regardless of its quiet period.
    ///
    /// Returns `None` when the endpoint has nothing accumulated.
    pub async fn finalize_now(&self, endpoint: &EndpointKey, now: Timestamp) -> Option<FinalizationReport> {
        self.finalize(endpoint, now, true).await
    }

    async fn finalize(
        &self,
        endpoint: &EndpointKey,
        now: Timestamp,
        forced: bool,
    ) -> Option<FinalizationReport> {
        let taken = {
            let mut state = self.lock_state();
            if !forced {
                // An append may have landed between the due-scan and here.
                if let Some(last_update) = state.accumulator.last_update(endpoint) {
                    if !state.finalizer.should_finalize(last_update, now) {
                        return None;
                    }
                }
            }
            state.take(endpoint)
        }?;

        let started = Instant::now();
        FinalizationStarted {
            endpoint: endpoint.as_str(),
            pages: taken.page_count,
            forced,
        }
        .log();

        let mut report = FinalizationReport {
            endpoint: endpoint.clone(),
            pages: taken.page_count,
            forced,
            dispatched: Vec::new(),
            failures: Vec::new(),
        };

        for (id, items) in taken.sequences {
            let Some(kind) = self.registry.get(id) else {
                continue;
            };
            if !kind.is_paginated() || items.is_empty() {
                continue;
            }

            let set = finalize_kind(kind.as_ref(), items);
            KindFinalized {
                endpoint: endpoint.as_str(),
                record_kind: &set.record_kind,
                unique_items: set.items.len(),
                raw_items: set.raw_items,
                pages: taken.page_count,
            }
            .log();

            let dispatch = set.into_dispatch(endpoint.clone(), taken.page_count);
            match self.emit(&dispatch).await {
                Ok(()) => report.dispatched.push(dispatch),
                Err(error) => report.failures.push(error),
            }
        }

        FinalizationCompleted {
            endpoint: endpoint.as_str(),
            dispatched: report.dispatched.len(),
            failed: report.failures.len(),
            duration: started.elapsed(),
        }
        .log();

        Some(report)
    }

    async fn emit(&self, dispatch: &Dispatch) -> Result<(), EngineError> {
        match self.dispatcher.emit(dispatch).await {
            Ok(()) => {
                if !matches!(dispatch.origin, DispatchOrigin::PageBackup { .. }) {
                    *lock(&self.dispatch_counts)
                        .entry(dispatch.record_kind.clone())
                        .or_insert(0) += 1;
                }
                Ok(())
            }
            Err(source) => {
                DispatchFailed {
                    endpoint: dispatch.endpoint.as_ref().map_or("-", |e| e.as_str()),
                    record_kind: &dispatch.record_kind,
                    origin: origin_label(dispatch.origin),
                    error: &source,
                }
                .log();
                Err(EngineError::DispatchFailure {
                    record_kind: dispatch.record_kind.clone(),
                    source,
                })
            }
        }
    }

    /// Successful atomic and finalized dispatches per record kind.
    pub fn stats(&self) -> BTreeMap<String, usize> {
        lock(&self.dispatch_counts).clone()
    }

    pub fn page_count(&self, endpoint: &EndpointKey) -> u32 {
        self.lock_state().accumulator.page_count(endpoint)
    }

    /// Copy of the items accumulated so far for `endpoint` and the named kind.
    pub fn snapshot(&self, endpoint: &EndpointKey, record_kind: &str) -> Vec<Item> {
        match self.registry.find(record_kind) {
            Some(id) => self.lock_state().accumulator.snapshot(endpoint, id).to_vec(),
            None => Vec::new(),
        }
    }

    pub fn pending_endpoints(&self) -> usize {
        self.lock_state().finalizer.pending_count()
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        lock(&self.state)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn finalize_kind(kind: &dyn RecordKind, items: Vec<Item>) -> FinalizedSet {
    let raw_items = items.len();
    FinalizedSet {
        record_kind: kind.name().to_string(),
        items: dedupe(items, kind.identity_field()),
        field_schema: kind.field_schema().to_vec(),
        raw_items,
    }
}

fn origin_label(origin: DispatchOrigin) -> &'static str {
    match origin {
        DispatchOrigin::Atomic => "atomic set",
        DispatchOrigin::Finalized { .. } => "finalized set",
        DispatchOrigin::PageBackup { .. } => "page backup",
    }
}
