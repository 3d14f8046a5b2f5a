// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dispatch sinks: where finalized, atomic and backup item sets end up.

pub mod csv_file;
pub mod fanout;
pub mod log;
pub mod memory;

use std::sync::Arc;

pub use csv_file::CsvFileSink;
pub use fanout::FanoutDispatcher;
pub use log::LogSink;
pub use memory::MemorySink;

use crate::config::SinkConfig;
use crate::observability::messages::config::NoSinksConfigured;
use crate::observability::messages::StructuredLog;
use crate::traits::Dispatcher;

/// Factory for building the dispatcher described by the `sinks` section
pub struct SinkFactory;

impl SinkFactory {
    /// A single configured sink is returned as-is; several are wrapped in a
    /// [`FanoutDispatcher`]. With nothing configured, dispatches go to a
    /// [`LogSink`].
    pub fn from_configs(configs: &[SinkConfig]) -> Arc<dyn Dispatcher> {
        let mut sinks: Vec<Arc<dyn Dispatcher>> = configs.iter().map(Self::create).collect();

        match sinks.len() {
            0 => {
                NoSinksConfigured.log();
                Arc::new(LogSink::new())
            }
            1 => sinks.remove(0),
            _ => Arc::new(FanoutDispatcher::new(sinks)),
        }
    }

    pub fn create(config: &SinkConfig) -> Arc<dyn Dispatcher> {
        match config {
            SinkConfig::Csv { output_dir } => Arc::new(CsvFileSink::new(output_dir.clone())),
            SinkConfig::Log => Arc::new(LogSink::new()),
        }
    }
}
