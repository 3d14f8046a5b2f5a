// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-worker event loop around a [`DispatchRouter`].
//!
//! Events arrive over a bounded `mpsc` channel and are handled strictly one
//! at a time in arrival order. Between events a `tokio::time::interval`
//! sweep runs the idle-timeout check, so an endpoint still finalizes when no
//! further traffic arrives. Cancellation or a closed channel ends the loop,
//! after which every still-accumulating endpoint is force-finalized.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::consts::DEFAULT_SWEEP_INTERVAL_MS;
use crate::engine::{DispatchRouter, EventOutcome};
use crate::model::{Clock, ResponseEvent, SystemClock};
use crate::observability::messages::service::{ServiceStarted, ServiceStopping};
use crate::observability::messages::StructuredLog;

/// Counters collected over one [`AggregationService::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceReport {
    pub events_processed: usize,
    pub events_ignored: usize,
    pub malformed_events: usize,
    /// Extraction and dispatch failures across all events and finalizations.
    pub failures: usize,
    /// Endpoint finalizations, idle-timeout and forced.
    pub finalizations: usize,
    pub dispatch_counts: BTreeMap<String, usize>,
}

pub struct AggregationService {
    router: Arc<DispatchRouter>,
    clock: Arc<dyn Clock>,
    sweep_interval: Duration,
}

impl AggregationService {
    /// A zero `sweep_interval` falls back to the default, since the timer
    /// cannot tick at a zero period.
    pub fn new(router: Arc<DispatchRouter>, sweep_interval: Duration) -> Self {
        let sweep_interval = if sweep_interval.is_zero() {
            Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS)
        } else {
            sweep_interval
        };

        Self {
            router,
            clock: Arc::new(SystemClock),
            sweep_interval,
        }
    }

    /// Replace the clock used to stamp timer-driven checks and shutdown.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn router(&self) -> &Arc<DispatchRouter> {
        &self.router
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Run until `cancel` fires or every sender of `events` is dropped.
    pub async fn run(
        &self,
        events: mpsc::Receiver<ResponseEvent>,
        cancel: CancellationToken,
    ) -> ServiceReport {
        let started = ServiceStarted {
            record_kinds: self.router.registry().len(),
            quiet_period: self.router.options().quiet_period,
            sweep_interval: self.sweep_interval,
        };
        started.log();

        let span = started.span("run");
        self.run_loop(events, cancel).instrument(span).await
    }

    async fn run_loop(
        &self,
        mut events: mpsc::Receiver<ResponseEvent>,
        cancel: CancellationToken,
    ) -> ServiceReport {
        let mut report = ServiceReport::default();

        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        sweep.tick().await;

        let reason = loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break "cancelled",

                event = events.recv() => match event {
                    Some(event) => self.process(&event, &mut report).await,
                    None => break "input closed",
                },

                _ = sweep.tick() => {
                    let reports = self.router.check(self.clock.now()).await;
                    report.finalizations += reports.len();
                    report.failures += reports.iter().map(|r| r.failures.len()).sum::<usize>();
                }
            }
        };

        ServiceStopping {
            reason,
            pending_endpoints: self.router.pending_endpoints(),
        }
        .log();

        let reports = self.router.shutdown(self.clock.now()).await;
        report.finalizations += reports.len();
        report.failures += reports.iter().map(|r| r.failures.len()).sum::<usize>();
        report.dispatch_counts = self.router.stats();
        report
    }

    async fn process(&self, event: &ResponseEvent, report: &mut ServiceReport) {
        match self.router.handle_event(event).await {
            Ok(EventOutcome::Ignored) => report.events_ignored += 1,
            Ok(EventOutcome::Processed(summary)) => {
                report.events_processed += 1;
                report.failures += summary.failures.len();
                report.finalizations += summary.finalizations.len();
                report.failures += summary
                    .finalizations
                    .iter()
                    .map(|r| r.failures.len())
                    .sum::<usize>();
            }
            // Already logged by the router.
            Err(_) => report.malformed_events += 1,
        }
    }
}
