// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::DispatchError;
use crate::model::{Dispatch, DispatchOrigin, EndpointKey, Item, Payload, Timestamp};
use crate::traits::Dispatcher;

/// Writes every dispatch to its own CSV file under `output_dir`.
///
/// File names are `<kind>_<unix_millis>_<seq>.csv`, or
/// `<kind>_page<N>_<unix_millis>_<seq>.csv` for page backups. The sequence
/// number keeps names unique when several sets land in the same millisecond.
/// Archived payloads go to `raw_data_<unix_millis>_<seq>.json`.
pub struct CsvFileSink {
    output_dir: PathBuf,
    sequence: AtomicU64,
}

impl CsvFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn next_path(&self, stem: &str, extension: &str) -> PathBuf {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let millis = Timestamp::now().as_millis();
        self.output_dir
            .join(format!("{}_{}_{}.{}", stem, millis, seq, extension))
    }

    async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<(), DispatchError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl Dispatcher for CsvFileSink {
    async fn emit(&self, dispatch: &Dispatch) -> Result<(), DispatchError> {
        if dispatch.is_empty() {
            return Ok(());
        }

        let kind = file_safe(&dispatch.record_kind);
        let stem = match dispatch.origin {
            DispatchOrigin::PageBackup { page } => format!("{}_page{}", kind, page),
            DispatchOrigin::Atomic | DispatchOrigin::Finalized { .. } => kind,
        };

        let bytes = render_csv(&dispatch.items, &dispatch.field_schema)?;
        let path = self.next_path(&stem, "csv");
        self.write(&path, bytes).await
    }

    async fn archive_payload(
        &self,
        _endpoint: &EndpointKey,
        payload: &Payload,
    ) -> Result<(), DispatchError> {
        let bytes = serde_json::to_vec_pretty(payload)?;
        let path = self.next_path("raw_data", "json");
        self.write(&path, bytes).await
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Render items as CSV with `fields` as the header row.
///
/// Fields an item lacks are written empty and fields outside the schema are
/// ignored. Strings are written as-is; other values in their JSON form.
pub fn render_csv(items: &[Item], fields: &[String]) -> Result<Vec<u8>, DispatchError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(fields)?;

    for item in items {
        writer.write_record(fields.iter().map(|field| render_cell(item.get(field))))?;
    }

    writer
        .into_inner()
        .map_err(|e| DispatchError::Io(e.into_error()))
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
