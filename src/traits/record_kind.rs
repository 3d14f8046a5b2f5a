// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ExtractionError;
use crate::model::{Batch, Payload};

/// A registered category of extractable item.
///
/// Implementations are pure: `extract` looks at a decoded payload and returns
/// the items of this kind it carries, or an empty batch when the payload is
/// not about this kind at all. Adding a kind never requires touching the
/// accumulator, the finalizer or the deduplicator.
pub trait RecordKind: Send + Sync {
    fn name(&self) -> &str;

    /// Paginated kinds are accumulated until the endpoint goes quiet; atomic
    /// kinds are complete in a single response and dispatched immediately.
    fn is_paginated(&self) -> bool;

    /// Field whose value identifies an item for deduplication.
    fn identity_field(&self) -> &str;

    /// Ordered output field names handed to sinks with every dispatch.
    fn field_schema(&self) -> &[String];

    fn extract(&self, payload: &Payload) -> Result<Batch, ExtractionError>;
}
