// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-response handling.
//!
//! This module contains message types for logging events related to:
//! * Traffic that does not match any configured endpoint pattern
//! * Bodies that cannot be decoded
//! * Record kind extraction failures
//! * Accumulation progress for paginated kinds
//! * Immediate dispatch of atomic kinds

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Response did not match any endpoint pattern and was ignored.
///
/// # Log Level
/// `debug!` - Routine, high-volume
pub struct ResponseIgnored<'a> {
    pub url: &'a str,
}

impl Display for ResponseIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Ignoring response from '{}': no endpoint pattern matched", self.url)
    }
}

impl StructuredLog for ResponseIgnored<'_> {
    fn log(&self) {
        tracing::debug!(url = self.url, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("response_ignored", span_name = name, url = self.url)
    }
}

/// Response body could not be decoded into a mapping; the event is dropped.
///
/// # Log Level
/// `warn!` - Data was discarded
///
/// # Example
/// ```
/// use the_stitcher::observability::messages::router::PayloadMalformed;
///
/// let msg = PayloadMalformed {
///     endpoint: "/list_other",
///     reason: "expected value at line 1 column 1",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Dropping response from '/list_other': body is not a decodable mapping (expected value at line 1 column 1)"
/// );
/// ```
pub struct PayloadMalformed<'a> {
    pub endpoint: &'a str,
    pub reason: &'a str,
}

impl Display for PayloadMalformed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropping response from '{}': body is not a decodable mapping ({})",
            self.endpoint, self.reason
        )
    }
}

impl StructuredLog for PayloadMalformed<'_> {
    fn log(&self) {
        tracing::warn!(endpoint = self.endpoint, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "payload_malformed",
            span_name = name,
            endpoint = self.endpoint,
            reason = self.reason,
        )
    }
}

/// One record kind's extraction failed for a response.
///
/// # Log Level
/// `error!` - That kind's data from this response is lost
pub struct ExtractionFailed<'a> {
    pub endpoint: &'a str,
    pub record_kind: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExtractionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Record kind '{}' failed to extract from '{}': {}",
            self.record_kind, self.endpoint, self.error
        )
    }
}

impl StructuredLog for ExtractionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "extraction_failed",
            span_name = name,
            endpoint = self.endpoint,
            record_kind = self.record_kind,
        )
    }
}

/// A page of a paginated record kind was appended to its accumulation.
///
/// # Log Level
/// `info!` - Operator-facing progress
///
/// # Example
/// ```
/// use the_stitcher::observability::messages::router::PageAccumulated;
/// use std::time::Duration;
///
/// let msg = PageAccumulated {
///     endpoint: "/list_other",
///     record_kind: "records",
///     page_items: 2,
///     total_items: 4,
///     pages: 2,
///     quiet_period: Duration::from_secs(5),
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "records: +2 items (total 4 across 2 pages) from '/list_other'; finalizing after 5s of inactivity"
/// );
/// ```
pub struct PageAccumulated<'a> {
    pub endpoint: &'a str,
    pub record_kind: &'a str,
    pub page_items: usize,
    pub total_items: usize,
    pub pages: u32,
    pub quiet_period: Duration,
}

impl Display for PageAccumulated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: +{} items (total {} across {} pages) from '{}'; finalizing after {:?} of inactivity",
            self.record_kind,
            self.page_items,
            self.total_items,
            self.pages,
            self.endpoint,
            self.quiet_period
        )
    }
}

impl StructuredLog for PageAccumulated<'_> {
    fn log(&self) {
        tracing::info!(
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            page_items = self.page_items,
            total_items = self.total_items,
            pages = self.pages,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "page_accumulated",
            span_name = name,
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            pages = self.pages,
        )
    }
}

/// An atomic record kind was dispatched straight from a response.
///
/// # Log Level
/// `info!` - Data left the engine
pub struct AtomicSetDispatched<'a> {
    pub endpoint: &'a str,
    pub record_kind: &'a str,
    pub item_count: usize,
}

impl Display for AtomicSetDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {} items from '{}' dispatched",
            self.record_kind, self.item_count, self.endpoint
        )
    }
}

impl StructuredLog for AtomicSetDispatched<'_> {
    fn log(&self) {
        tracing::info!(
            endpoint = self.endpoint,
            record_kind = self.record_kind,
            item_count = self.item_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "atomic_dispatch",
            span_name = name,
            endpoint = self.endpoint,
            record_kind = self.record_kind,
        )
    }
}
