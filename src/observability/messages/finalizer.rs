// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for finalization and dispatch.
//!
//! This module contains message types for logging events related to:
//! * Finalization lifecycle (idle-triggered and forced)
//! * Per-record-kind results of a finalization
//! * Sink failures
//! * The shutdown summary

use crate::observability::messages::StructuredLog;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An endpoint's accumulation is being finalized.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_stitcher::observability::messages::finalizer::FinalizationStarted;
///
/// let msg = FinalizationStarted {
///     endpoint: "/list_buddy",
///     pages: 4,
///     forced: true,
/// };
///
/// assert_eq!(msg.to_string(), "Finalizing '/list_buddy' after 4 pages (forced)");
/// ```
pub struct FinalizationStarted<'a> {
    pub endpoint: &'a str,
    pub pages: u32,
    pub forced: bool,
}

impl Display for FinalizationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let trigger = if self.forced { "forced" } else { "idle timeout" };
        write!(
            f,
            "Finalizing '{}' after {} pages ({})",
            self.endpoint, self.pages, trigger
        )
    }
}

impl StructuredLog for FinalizationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            endpoint = self.endpoint,
            pages = self.pages,
            forced = self.forced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "finalization",
            span_name = name,
            endpoint = self.endpoint,
            pages = self.pages,
            forced = self.forced,
        )
    }
}

/// One record kind of an endpoint was deduplicated and dispatched.
///
/// # Log Level
/// `info!` - Data left the engine
pub struct KindFinalized<'a> {
    pub endpoint: &'a str,
    pub record_kind: &'a str,
    pub unique_items: usize,
    pub raw_items: usize,
    pub pages: u32,
}

impl Display for KindFinalized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {} unique items ({} raw) from {} pages of '{}'",
            self.record_kind, self.unique_items, self.raw_items, self.pages, self.endpoint
        )
    }
}

impl StructuredLog for KindFinalized<'_> {
    fn log(&self) {
        tracing::info!(
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            unique_items = self.unique_items,
            raw_items = self.raw_items,
            pages = self.pages,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "kind_finalized",
            span_name = name,
            endpoint = self.endpoint,
            record_kind = self.record_kind,
        )
    }
}

/// A sink failed to persist a set. Nothing is retried.
///
/// # Log Level
/// `warn!` - Data for this set may be lost
///
/// # Example
/// ```
/// use the_stitcher::observability::messages::finalizer::DispatchFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let msg = DispatchFailed {
///     endpoint: "/list_other",
///     record_kind: "records",
///     origin: "finalized",
///     error: &error,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Dispatch of finalized 'records' from '/list_other' failed, set not retained: disk full"
/// );
/// ```
pub struct DispatchFailed<'a> {
    pub endpoint: &'a str,
    pub record_kind: &'a str,
    pub origin: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DispatchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatch of {} '{}' from '{}' failed, set not retained: {}",
            self.origin, self.record_kind, self.endpoint, self.error
        )
    }
}

impl StructuredLog for DispatchFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            origin = self.origin,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "dispatch_failed",
            span_name = name,
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            origin = self.origin,
        )
    }
}

/// Finalization of an endpoint finished and its state was cleared.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FinalizationCompleted<'a> {
    pub endpoint: &'a str,
    pub dispatched: usize,
    pub failed: usize,
    pub duration: std::time::Duration,
}

impl Display for FinalizationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finalized '{}': {} sets dispatched, {} failed, in {:?}",
            self.endpoint, self.dispatched, self.failed, self.duration
        )
    }
}

impl StructuredLog for FinalizationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            endpoint = self.endpoint,
            dispatched = self.dispatched,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "finalization_completed",
            span_name = name,
            endpoint = self.endpoint,
            duration = ?self.duration,
        )
    }
}

/// Totals logged once all pending endpoints were force-finalized.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ShutdownSummary<'a> {
    pub finalized_endpoints: usize,
    pub dispatch_counts: &'a BTreeMap<String, usize>,
}

impl Display for ShutdownSummary<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Shutdown: force-finalized {} endpoints",
            self.finalized_endpoints
        )?;
        if self.dispatch_counts.is_empty() {
            return write!(f, "; nothing was dispatched");
        }
        write!(f, "; dispatches per record kind: ")?;
        for (i, (kind, count)) in self.dispatch_counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", kind, count)?;
        }
        Ok(())
    }
}

impl StructuredLog for ShutdownSummary<'_> {
    fn log(&self) {
        let total: usize = self.dispatch_counts.values().sum();
        tracing::info!(
            finalized_endpoints = self.finalized_endpoints,
            total_dispatches = total,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "shutdown",
            span_name = name,
            finalized_endpoints = self.finalized_endpoints,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_summary_lists_counts_in_name_order() {
        let mut counts = BTreeMap::new();
        counts.insert("soul_breaks".to_string(), 2);
        counts.insert("dress_records".to_string(), 1);

        let msg = ShutdownSummary {
            finalized_endpoints: 1,
            dispatch_counts: &counts,
        };

        assert_eq!(
            msg.to_string(),
            "Shutdown: force-finalized 1 endpoints; dispatches per record kind: dress_records=1, soul_breaks=2"
        );
    }

    #[test]
    fn shutdown_summary_without_dispatches() {
        let counts = BTreeMap::new();
        let msg = ShutdownSummary {
            finalized_endpoints: 0,
            dispatch_counts: &counts,
        };
        assert_eq!(
            msg.to_string(),
            "Shutdown: force-finalized 0 endpoints; nothing was dispatched"
        );
    }
}
