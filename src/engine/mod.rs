// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The aggregation engine.
//!
//! * [`Accumulator`] - per `(endpoint, record kind)` page store
//! * [`IdleTimeoutFinalizer`] - decides when an endpoint has gone quiet
//! * [`dedupe`] - first-occurrence-wins deduplication by identity field
//! * [`DispatchRouter`] - per-response entry point tying the above together
//! * [`AggregationService`] - event/timer loop driving a router

pub mod accumulator;
pub mod dedup;
pub mod finalizer;
pub mod router;
pub mod service;

pub use accumulator::{AccumulationKey, AccumulationState, Accumulator};
pub use dedup::{dedupe, identity_of};
pub use finalizer::IdleTimeoutFinalizer;
pub use router::{DispatchRouter, EventOutcome, EventSummary, FinalizationReport, RouterOptions};
pub use service::{AggregationService, ServiceReport};
