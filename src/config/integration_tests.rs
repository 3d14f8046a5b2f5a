#[cfg(test)]
mod integration_tests {
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::backends::MemorySink;
    use crate::config::{load_and_validate_config, RuntimeBuilder, SinkConfig};
    use crate::errors::{ConfigError, ValidationError};
    use crate::model::{DispatchOrigin, ResponseEvent, Timestamp};

    /// Test that the shipped capture configuration loads and validates
    #[test]
    fn test_ffrk_capture_yaml_loading() {
        let config = load_and_validate_config("configs/ffrk-capture.yaml").unwrap();

        assert_eq!(config.quiet_period(), Duration::from_secs(5));
        assert!(config.page_backup_enabled);
        assert_eq!(config.endpoints.patterns, vec!["list_buddy", "list_other"]);

        let names: Vec<&str> = config.record_kinds.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["motes_inventory", "soul_breaks", "dress_records"]);
        assert!(config.record_kinds[1].paginated);
        assert_eq!(config.record_kinds[1].source_key, "soul_strikes");
        assert!(!config.record_kinds[2].paginated);

        assert_eq!(config.sinks.len(), 2);
        assert_eq!(config.sinks[1], SinkConfig::Log);
    }

    #[test]
    fn test_minimal_yaml_defaults_to_log_sink() {
        let config = load_and_validate_config("configs/minimal.yaml").unwrap();
        assert!(config.sinks.is_empty());

        let service = RuntimeBuilder::from_config(&config).unwrap();
        assert_eq!(service.router().registry().len(), 1);
        assert!(service.router().options().quiet_period == Duration::from_secs(5));
    }

    /// Every problem in the file is reported together
    #[test]
    fn test_invalid_yaml_reports_all_errors() {
        let err = load_and_validate_config("configs/invalid.yaml").unwrap_err();

        let errors = match err {
            ConfigError::Invalid(errors) => errors,
            other => panic!("expected a validation failure, got {}", other),
        };

        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateRecordKind {
                    name: "records".to_string()
                },
                ValidationError::IdentityFieldNotInSchema {
                    record_kind: "records".to_string(),
                    identity_field: "uid".to_string(),
                },
                ValidationError::EmptySourceKey {
                    record_kind: "records".to_string()
                },
                ValidationError::EmptyFieldSchema {
                    record_kind: "records".to_string()
                },
                ValidationError::ZeroValue {
                    option: "quiet_period_ms"
                },
            ]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_and_validate_config("configs/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    /// Drive a router built from the capture config with list_buddy traffic
    #[tokio::test]
    async fn test_runtime_from_yaml_routes_capture_traffic() {
        let config = load_and_validate_config("configs/ffrk-capture.yaml").unwrap();
        let sink = Arc::new(MemorySink::new());
        let router = RuntimeBuilder::build_router(&config, sink.clone()).unwrap();

        let pages = [
            json!({"soul_strikes": [{"id": 10, "name": "Ultra Cross"}, {"id": 11, "name": "Blade"}]}),
            json!({"soul_strikes": [{"id": 11, "name": "Blade"}, {"id": 12, "name": "Arrow"}]}),
        ];
        for (secs, body) in pages.iter().enumerate() {
            let url = format!("https://ffrk.example/dff/list_buddy?page={}", secs + 1);
            router
                .handle_event(&ResponseEvent::from_json(url, body, Timestamp::from_secs(secs as u64)))
                .await
                .unwrap();
        }

        router
            .handle_event(&ResponseEvent::from_json(
                "https://ffrk.example/dff/list_other",
                &json!({"dress_records": [{"id": 1, "name": "Cloud"}]}),
                Timestamp::from_secs(2),
            ))
            .await
            .unwrap();

        router.check(Timestamp::from_secs(6)).await;

        let origins: Vec<(String, DispatchOrigin)> = sink
            .dispatches()
            .into_iter()
            .map(|d| (d.record_kind, d.origin))
            .collect();
        assert_eq!(
            origins,
            vec![
                ("soul_breaks".to_string(), DispatchOrigin::PageBackup { page: 1 }),
                ("soul_breaks".to_string(), DispatchOrigin::PageBackup { page: 2 }),
                ("dress_records".to_string(), DispatchOrigin::Atomic),
                (
                    "soul_breaks".to_string(),
                    DispatchOrigin::Finalized {
                        pages: 2,
                        raw_items: 4
                    }
                ),
            ]
        );

        let finalized = sink.finalized();
        assert_eq!(finalized[0].items.len(), 3);
        assert_eq!(finalized[0].field_schema[0], "id");
    }
}
