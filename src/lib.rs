// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // record kinds + sinks
pub mod config;     // config + registry
pub mod engine;     // accumulation, finalization, routing
pub mod errors;     // error handling
pub mod model;      // shared value types
pub mod observability;
pub mod traits;     // RecordKind + Dispatcher seams
