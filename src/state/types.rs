use crate::filter::{PositionFilter, YearFilter};
use crate::scoring::{validate_scoring, ScoringConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Everything the user can change that survives a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub scoring_config: ScoringConfig,
    pub position_filter: PositionFilter,
    pub year_filter: YearFilter,
}

impl UserState {
    /// Build state from a decoded JSON document, falling back per field.
    ///
    /// A field that is missing or fails to decode takes its default; a
    /// scoring config that decodes but fails validation is replaced by the
    /// default scoring.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("State file is not a JSON object, using defaults");
            return Self::default();
        };

        let mut state = Self {
            scoring_config: field_or_default(object, "scoringConfig"),
            position_filter: field_or_default(object, "positionFilter"),
            year_filter: field_or_default(object, "yearFilter"),
        };

        if let Err(errors) = validate_scoring(&state.scoring_config) {
            for e in &errors {
                warn!("Saved {}; using default scoring", e);
            }
            state.scoring_config = ScoringConfig::default();
        }

        state
    }
}

fn field_or_default<T: DeserializeOwned + Default>(object: &Map<String, Value>, key: &str) -> T {
    match object.get(key) {
        None => T::default(),
        Some(raw) => T::deserialize(raw).unwrap_or_else(|e| {
            warn!("Ignoring saved {}: {}", key, e);
            T::default()
        }),
    }
}
