// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for the aggregation engine and its two seams.
//!
//! None of these are fatal to the process. The worst outcome any of them
//! describes is the loss of one endpoint's data for one finalization cycle,
//! and every occurrence is logged by the router before it moves on.

use thiserror::Error;

/// Failure classes the router can hit while handling an event or a finalization.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The response body could not be decoded into a mapping. The whole event
    /// is dropped and no state is touched.
    #[error("Malformed payload from '{endpoint}': {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    /// One record kind's extraction failed; the other kinds still ran.
    #[error("Extraction failed for record kind '{record_kind}': {source}")]
    ExtractionFailure {
        record_kind: String,
        #[source]
        source: ExtractionError,
    },

    /// A sink failed to persist a set. Accumulated state was cleared anyway.
    #[error("Dispatch of record kind '{record_kind}' failed: {source}")]
    DispatchFailure {
        record_kind: String,
        #[source]
        source: DispatchError,
    },
}

/// Returned by [`crate::traits::RecordKind::extract`].
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The payload has the expected key but the value has the wrong shape.
    #[error("Expected {expected} at '{key}', found {found}")]
    UnexpectedShape {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Extractor-specific failure.
    #[error("{0}")]
    Rejected(String),
}

/// Returned by [`crate::traits::Dispatcher::emit`].
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sink refused the set.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// One or more sinks behind a fan-out failed.
    #[error("{} of {attempted} sinks failed: {}", .failures.len(), .failures.join("; "))]
    Fanout {
        attempted: usize,
        failures: Vec<String>,
    },
}
