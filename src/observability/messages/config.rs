// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration file loaded and validated.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub record_kinds: usize,
    pub sinks: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded '{}': {} record kinds, {} sinks",
            self.path, self.record_kinds, self.sinks
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            record_kinds = self.record_kinds,
            sinks = self.sinks,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("config", span_name = name, path = self.path)
    }
}

/// No sinks were configured, so dispatches only go to the log.
///
/// # Log Level
/// `warn!` - Nothing will be persisted
pub struct NoSinksConfigured;

impl Display for NoSinksConfigured {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No sinks configured; finalized sets will only be logged")
    }
}

impl StructuredLog for NoSinksConfigured {
    fn log(&self) {
        tracing::warn!("{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("no_sinks", span_name = name)
    }
}
