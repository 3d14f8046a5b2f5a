//! Semantic validation of a parsed configuration.
//!
//! Parsing only guarantees the YAML has the right shape. This module checks
//! the things serde cannot: record kind names are unique, every kind can
//! actually deduplicate and be written out, and the timing options are usable.
//!
//! All checks run and every problem is returned, so an operator can fix a
//! config file in one pass.
//!
//! # Example
//! ```rust
//! use the_stitcher::config::{parse_config, validate_config};
//! use the_stitcher::errors::ValidationError;
//!
//! let cfg = parse_config(r#"
//! quiet_period_ms: 0
//! record_kinds:
//!   - name: records
//!     source_key: records
//!     fields: [id]
//!   - name: records
//!     source_key: other_records
//!     fields: [id]
//! "#).unwrap();
//!
//! let errors = validate_config(&cfg).unwrap_err();
//! assert!(errors.contains(&ValidationError::DuplicateRecordKind { name: "records".to_string() }));
//! assert!(errors.contains(&ValidationError::ZeroValue { option: "quiet_period_ms" }));
//! ```

use crate::config::Config;
use crate::errors::ValidationError;
use std::collections::HashSet;

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    errors.extend(validate_unique_record_kinds(config));
    errors.extend(validate_record_kind_definitions(config));
    errors.extend(validate_tunables(config));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_record_kinds(config: &Config) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut errors = Vec::new();

    for kind in &config.record_kinds {
        if !seen.insert(kind.name.as_str()) && reported.insert(kind.name.as_str()) {
            errors.push(ValidationError::DuplicateRecordKind {
                name: kind.name.clone(),
            });
        }
    }

    errors
}

fn validate_record_kind_definitions(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for kind in &config.record_kinds {
        if kind.source_key.is_empty() {
            errors.push(ValidationError::EmptySourceKey {
                record_kind: kind.name.clone(),
            });
        }

        if kind.fields.is_empty() {
            errors.push(ValidationError::EmptyFieldSchema {
                record_kind: kind.name.clone(),
            });
        }

        if kind.identity_field.is_empty() {
            errors.push(ValidationError::EmptyIdentityField {
                record_kind: kind.name.clone(),
            });
        } else if !kind.fields.is_empty() && !kind.fields.contains(&kind.identity_field) {
            errors.push(ValidationError::IdentityFieldNotInSchema {
                record_kind: kind.name.clone(),
                identity_field: kind.identity_field.clone(),
            });
        }
    }

    errors
}

fn validate_tunables(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.quiet_period_ms == Some(0) {
        errors.push(ValidationError::ZeroValue {
            option: "quiet_period_ms",
        });
    }
    if config.sweep_interval_ms == Some(0) {
        errors.push(ValidationError::ZeroValue {
            option: "sweep_interval_ms",
        });
    }
    if config.channel_capacity == Some(0) {
        errors.push(ValidationError::ZeroValue {
            option: "channel_capacity",
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointOptions, RecordKindConfig};

    fn create_test_kind(name: &str, identity_field: &str, fields: Vec<&str>) -> RecordKindConfig {
        RecordKindConfig {
            name: name.to_string(),
            source_key: name.to_string(),
            paginated: true,
            identity_field: identity_field.to_string(),
            fields: fields.into_iter().map(String::from).collect(),
        }
    }

    fn create_test_config(record_kinds: Vec<RecordKindConfig>) -> Config {
        Config {
            quiet_period_ms: None,
            sweep_interval_ms: None,
            channel_capacity: None,
            page_backup_enabled: false,
            raw_backup_enabled: false,
            endpoints: EndpointOptions::default(),
            record_kinds,
            sinks: vec![],
        }
    }

    #[test]
    fn test_valid_empty_config() {
        assert!(validate_config(&create_test_config(vec![])).is_ok());
    }

    #[test]
    fn test_valid_record_kinds() {
        let config = create_test_config(vec![
            create_test_kind("records", "id", vec!["id", "name"]),
            create_test_kind("rewards", "reward_id", vec!["name", "reward_id"]),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_reported_once() {
        let config = create_test_config(vec![
            create_test_kind("records", "id", vec!["id"]),
            create_test_kind("records", "id", vec!["id"]),
            create_test_kind("records", "id", vec!["id"]),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateRecordKind {
                name: "records".to_string()
            }]
        );
    }

    #[test]
    fn test_identity_field_must_be_in_schema() {
        let config = create_test_config(vec![create_test_kind("records", "uid", vec!["id", "name"])]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::IdentityFieldNotInSchema {
                record_kind: "records".to_string(),
                identity_field: "uid".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_definitions() {
        let mut kind = create_test_kind("records", "", vec![]);
        kind.source_key = String::new();
        let config = create_test_config(vec![kind]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptySourceKey {
            record_kind: "records".to_string()
        }));
        assert!(errors.contains(&ValidationError::EmptyFieldSchema {
            record_kind: "records".to_string()
        }));
        assert!(errors.contains(&ValidationError::EmptyIdentityField {
            record_kind: "records".to_string()
        }));
    }

    #[test]
    fn test_zero_tunables() {
        let mut config = create_test_config(vec![]);
        config.quiet_period_ms = Some(0);
        config.sweep_interval_ms = Some(0);
        config.channel_capacity = Some(0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroValue {
                    option: "quiet_period_ms"
                },
                ValidationError::ZeroValue {
                    option: "sweep_interval_ms"
                },
                ValidationError::ZeroValue {
                    option: "channel_capacity"
                },
            ]
        );
    }
}
