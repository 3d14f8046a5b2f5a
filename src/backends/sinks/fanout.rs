// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::DispatchError;
use crate::model::{Dispatch, EndpointKey, Payload};
use crate::traits::Dispatcher;

/// Delivers every dispatch to each inner sink in order.
///
/// A failing sink does not stop delivery to the ones after it. If any sink
/// failed, the combined failure is returned once all have been tried.
pub struct FanoutDispatcher {
    sinks: Vec<Arc<dyn Dispatcher>>,
}

impl FanoutDispatcher {
    pub fn new(sinks: Vec<Arc<dyn Dispatcher>>) -> Self {
        Self { sinks }
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    fn combine(&self, failures: Vec<String>) -> Result<(), DispatchError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Fanout {
                attempted: self.sinks.len(),
                failures,
            })
        }
    }
}

#[async_trait]
impl Dispatcher for FanoutDispatcher {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.emit(dispatch).await {
                failures.push(format!("{}: {}", sink.name(), e));
            }
        }
        self.combine(failures)
    }

    async fn archive_payload(
        &self,
        endpoint: &EndpointKey,
        payload: &Payload,
    ) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.archive_payload(endpoint, payload).await {
                failures.push(format!("{}: {}", sink.name(), e));
            }
        }
        self.combine(failures)
    }

    fn name(&self) -> &'static str {
        "fanout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::sinks::MemorySink;
    use crate::backends::stub::FailingDispatcher;
    use crate::model::DispatchOrigin;
    use serde_json::json;

    fn dispatch() -> Dispatch {
        let item = match json!({"id": 1}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Dispatch {
            endpoint: Some(EndpointKey::new("/list_buddy")),
            record_kind: "inventory".to_string(),
            items: vec![item],
            field_schema: vec!["id".to_string()],
            origin: DispatchOrigin::Atomic,
        }
    }

    #[tokio::test]
    async fn test_all_sinks_receive_the_dispatch() {
        let first = Arc::new(MemorySink::new());
        let second = Arc::new(MemorySink::new());
        let fanout = FanoutDispatcher::new(vec![first.clone(), second.clone()]);

        fanout.emit(&dispatch()).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(fanout.sink_names(), vec!["memory", "memory"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_sinks() {
        let memory = Arc::new(MemorySink::new());
        let fanout = FanoutDispatcher::new(vec![
            Arc::new(FailingDispatcher::new("disk full")),
            memory.clone(),
        ]);

        let err = fanout.emit(&dispatch()).await.unwrap_err();

        assert_eq!(memory.len(), 1);
        assert_eq!(err.to_string(), "1 of 2 sinks failed: failing: Rejected: disk full");
    }
}
