use std::sync::Arc;

use super::JsonArrayKind;
use crate::config::RecordKindConfig;
use crate::traits::RecordKind;

/// Factory for creating record kinds from configuration
pub struct RecordKindFactory;

impl RecordKindFactory {
    /// Create a record kind from its configuration.
    ///
    /// Every configured kind is a [`JsonArrayKind`]; kinds with bespoke
    /// extraction logic implement [`RecordKind`] directly and are passed to
    /// [`crate::config::RecordKindRegistry::new`].
    pub fn create(config: &RecordKindConfig) -> Result<Arc<dyn RecordKind>, String> {
        if config.name.trim().is_empty() {
            return Err("record kind name must not be empty".to_string());
        }

        Ok(Arc::new(JsonArrayKind::new(
            config.name.clone(),
            config.source_key.clone(),
            config.paginated,
            config.identity_field.clone(),
            config.fields.clone(),
        )))
    }
}
