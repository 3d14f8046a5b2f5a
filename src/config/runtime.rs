// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::SinkFactory;
use crate::config::{validate_config, Config, EndpointMatcher, RecordKindRegistry};
use crate::engine::{AggregationService, DispatchRouter, RouterOptions};
use crate::errors::ConfigError;
use crate::traits::Dispatcher;

/// Aggregation runtime builder - wires registry, endpoint matcher, sinks and
/// router together from configuration.
///
/// # Examples
///
/// ```
/// use the_stitcher::config::{parse_config, RuntimeBuilder};
///
/// let config = parse_config(
///     r#"
/// quiet_period_ms: 3000
/// record_kinds:
///   - name: records
///     source_key: records
///     paginated: true
///     fields: [id]
/// "#,
/// )
/// .unwrap();
///
/// let service = RuntimeBuilder::from_config(&config).unwrap();
///
/// assert_eq!(service.router().registry().len(), 1);
/// assert_eq!(service.router().options().quiet_period.as_millis(), 3000);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the service with the sinks named in the configuration.
    pub fn from_config(cfg: &Config) -> Result<AggregationService, String> {
        Self::with_dispatcher(cfg, SinkFactory::from_configs(&cfg.sinks))
    }

    /// Build the service around an externally supplied dispatcher, ignoring
    /// the configured sinks.
    pub fn with_dispatcher(
        cfg: &Config,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<AggregationService, String> {
        let router = Self::build_router(cfg, dispatcher)?;
        Ok(AggregationService::new(Arc::new(router), cfg.sweep_interval()))
    }

    /// Fails with every validation problem when `cfg` is not usable.
    pub fn build_router(
        cfg: &Config,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<DispatchRouter, String> {
        validate_config(cfg).map_err(|errors| ConfigError::Invalid(errors).to_string())?;

        let registry = RecordKindRegistry::from_config(cfg)?;
        let matcher = EndpointMatcher::from_options(&cfg.endpoints);
        let options = RouterOptions {
            quiet_period: cfg.quiet_period(),
            page_backup_enabled: cfg.page_backup_enabled,
            raw_backup_enabled: cfg.raw_backup_enabled,
        };

        Ok(DispatchRouter::new(registry, matcher, dispatcher, options))
    }
}
