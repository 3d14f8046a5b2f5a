// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Idle-timeout policy: when silence means an endpoint is done.
//!
//! The upstream service never marks its last page, so completion is inferred
//! from inactivity. `quiet_period` trades latency against the risk of
//! finalizing an endpoint whose traffic merely paused; it is a tunable, not
//! a bug to work around.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::engine::Accumulator;
use crate::model::{EndpointKey, Timestamp};

/// Tracks endpoints awaiting finalization and decides which are due.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use the_stitcher::engine::IdleTimeoutFinalizer;
/// use the_stitcher::model::Timestamp;
///
/// let finalizer = IdleTimeoutFinalizer::new(Duration::from_secs(5));
/// let last_update = Timestamp::from_secs(10);
///
/// assert!(!finalizer.should_finalize(last_update, Timestamp::from_millis(14_900)));
/// assert!(finalizer.should_finalize(last_update, Timestamp::from_secs(15)));
/// ```
#[derive(Debug, Clone)]
pub struct IdleTimeoutFinalizer {
    quiet_period: Duration,
    pending: BTreeSet<EndpointKey>,
}

impl IdleTimeoutFinalizer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: BTreeSet::new(),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// True once `now - last_update >= quiet_period`.
    pub fn should_finalize(&self, last_update: Timestamp, now: Timestamp) -> bool {
        now.elapsed_since(last_update) >= self.quiet_period
    }

    pub fn watch(&mut self, endpoint: EndpointKey) {
        self.pending.insert(endpoint);
    }

    pub fn unwatch(&mut self, endpoint: &EndpointKey) -> bool {
        self.pending.remove(endpoint)
    }

    pub fn is_pending(&self, endpoint: &EndpointKey) -> bool {
        self.pending.contains(endpoint)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pending endpoints whose quiet period has elapsed at `now`.
    ///
    /// Only endpoints with accumulation state can be due.
    pub fn due(&self, accumulator: &Accumulator, now: Timestamp) -> Vec<EndpointKey> {
        self.pending
            .iter()
            .filter(|endpoint| {
                accumulator
                    .last_update(endpoint)
                    .is_some_and(|last| self.should_finalize(last, now))
            })
            .cloned()
            .collect()
    }

    /// Drop watches on endpoints that have nothing accumulated. Returns how
    /// many were dropped.
    pub fn prune(&mut self, accumulator: &Accumulator) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|endpoint| accumulator.is_accumulating(endpoint));
        before - self.pending.len()
    }

    /// Remove and return every pending endpoint, due or not. Used at shutdown.
    pub fn drain(&mut self) -> Vec<EndpointKey> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}
