// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pluggable implementations of the engine's two seams.
//!
//! # Available Backends
//!
//! ## Local Backend
//! Record kinds built from configuration:
//! - **JsonArrayKind**: items are the objects of one top-level payload array
//! - **RecordKindFactory**: creates kinds from `record_kinds` entries
//!
//! ## Sinks
//! Consumers of dispatched item sets:
//! - **CsvFileSink**: one CSV file per dispatch, plus raw payload archives
//! - **LogSink**: one log line per dispatch
//! - **MemorySink**: keeps dispatches in memory for embedding and tests
//! - **FanoutDispatcher**: delivers to several sinks
//!
//! ## Stub Backend (Test-Only)
//! - **FailingDispatcher**: rejects dispatches, optionally for one kind only
//! - **FailingKind**: a record kind whose extraction always fails
//!
//! # Architecture
//!
//! ```text
//! Configuration → Factory → RecordKind / Dispatcher → DispatchRouter
//! ```
//!
//! # Examples
//!
//! ```rust
//! use the_stitcher::backends::RecordKindFactory;
//! use the_stitcher::config::RecordKindConfig;
//! use the_stitcher::traits::RecordKind;
//!
//! let config = RecordKindConfig {
//!     name: "soul_breaks".to_string(),
//!     source_key: "soul_strikes".to_string(),
//!     paginated: true,
//!     identity_field: "id".to_string(),
//!     fields: vec!["id".to_string(), "name".to_string()],
//! };
//!
//! let kind = RecordKindFactory::create(&config)?;
//! assert!(kind.is_paginated());
//! # Ok::<(), String>(())
//! ```

pub mod local;
pub mod sinks;
#[cfg(test)]
pub mod stub;

pub use local::{JsonArrayKind, RecordKindFactory};
pub use sinks::{CsvFileSink, FanoutDispatcher, LogSink, MemorySink, SinkFactory};
