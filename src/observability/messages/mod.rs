// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `config` - configuration loading
//! * `router` - per-response handling: ignored traffic, decode and extraction
//!   failures, accumulation progress, atomic dispatches
//! * `finalizer` - finalization lifecycle, dispatch failures, shutdown summary
//! * `service` - the event/timer loop

use tracing::Span;

pub mod config;
pub mod finalizer;
pub mod router;
pub mod service;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its documented level.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
