// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::DispatchError;
use crate::model::{Dispatch, EndpointKey, Payload};

/// Consumer of finalized, atomic and backup item sets.
///
/// The engine never calls `emit` with an empty item list, but implementations
/// must treat one as a successful no-op. A sink may be called any number of
/// times over the process lifetime, including zero.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError>;

    /// Keep a copy of a decoded response body. Only called when raw backups
    /// are enabled; sinks that do not archive payloads can ignore it.
    async fn archive_payload(
        &self,
        _endpoint: &EndpointKey,
        _payload: &Payload,
    ) -> Result<(), DispatchError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}
