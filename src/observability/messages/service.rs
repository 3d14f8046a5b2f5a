// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the event/timer service loop.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Service loop started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServiceStarted {
    pub record_kinds: usize,
    pub quiet_period: Duration,
    pub sweep_interval: Duration,
}

impl Display for ServiceStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Aggregation service started: {} record kinds, quiet_period={:?}, sweep_interval={:?}",
            self.record_kinds, self.quiet_period, self.sweep_interval
        )
    }
}

impl StructuredLog for ServiceStarted {
    fn log(&self) {
        tracing::info!(
            record_kinds = self.record_kinds,
            quiet_period_ms = self.quiet_period.as_millis() as u64,
            sweep_interval_ms = self.sweep_interval.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "aggregation_service",
            span_name = name,
            record_kinds = self.record_kinds,
        )
    }
}

/// Service loop is stopping and will force-finalize pending endpoints.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServiceStopping<'a> {
    pub reason: &'a str,
    pub pending_endpoints: usize,
}

impl Display for ServiceStopping<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Aggregation service stopping ({}): {} endpoints still accumulating",
            self.reason, self.pending_endpoints
        )
    }
}

impl StructuredLog for ServiceStopping<'_> {
    fn log(&self) {
        tracing::info!(
            reason = self.reason,
            pending_endpoints = self.pending_endpoints,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("service_stopping", span_name = name, reason = self.reason)
    }
}
