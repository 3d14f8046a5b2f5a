// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod endpoint;
mod loader;
mod registry;
mod runtime;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use endpoint::EndpointMatcher;
pub use loader::{
    load_and_validate_config, load_config, parse_config, Config, EndpointOptions,
    RecordKindConfig, SinkConfig,
};
pub use registry::{RecordKindId, RecordKindRegistry};
pub use runtime::RuntimeBuilder;
pub use validation::validate_config;
