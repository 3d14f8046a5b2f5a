// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// A semantic problem found while validating a loaded configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two record kinds share a name
    DuplicateRecordKind {
        /// The duplicated name
        name: String,
    },
    /// A record kind declares no output fields
    EmptyFieldSchema {
        /// The offending record kind
        record_kind: String,
    },
    /// A record kind declares an empty identity field
    EmptyIdentityField {
        /// The offending record kind
        record_kind: String,
    },
    /// The identity field is not one of the record kind's output fields
    IdentityFieldNotInSchema {
        /// The offending record kind
        record_kind: String,
        /// The identity field that is missing from the schema
        identity_field: String,
    },
    /// A record kind does not say where its items live in the payload
    EmptySourceKey {
        /// The offending record kind
        record_kind: String,
    },
    /// A duration or size option that must be positive is zero
    ZeroValue {
        /// The option name as written in the config file
        option: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateRecordKind { name } => {
                write!(f, "Duplicate record kind name: '{}'", name)
            }
            ValidationError::EmptyFieldSchema { record_kind } => {
                write!(f, "Record kind '{}' declares no fields", record_kind)
            }
            ValidationError::EmptyIdentityField { record_kind } => {
                write!(f, "Record kind '{}' has an empty identity field", record_kind)
            }
            ValidationError::IdentityFieldNotInSchema {
                record_kind,
                identity_field,
            } => {
                write!(
                    f,
                    "Record kind '{}' uses identity field '{}' which is not in its field list",
                    record_kind, identity_field
                )
            }
            ValidationError::EmptySourceKey { record_kind } => {
                write!(f, "Record kind '{}' has an empty source_key", record_kind)
            }
            ValidationError::ZeroValue { option } => {
                write!(f, "Option '{}' must be greater than zero", option)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors returned while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_lists_every_problem() {
        let err = ConfigError::Invalid(vec![
            ValidationError::DuplicateRecordKind {
                name: "records".to_string(),
            },
            ValidationError::ZeroValue {
                option: "quiet_period_ms",
            },
        ]);

        assert_eq!(
            err.to_string(),
            "Configuration validation failed:\n\
             Duplicate record kind name: 'records'\n\
             Option 'quiet_period_ms' must be greater than zero"
        );
    }
}
