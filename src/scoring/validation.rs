use super::config::{ScoringConfig, ScoringField};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("scoring.{field}: yards per point must not be zero")]
    ZeroYardsPerPoint { field: ScoringField },

    #[error("scoring.{field}: must be a finite number, got {value}")]
    NonFinite { field: ScoringField, value: f64 },
}

/// Validate a scoring configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<ScoringError>> {
    let mut errors = Vec::new();

    for field in ScoringField::ALL {
        let value = config.get(field);
        if !value.is_finite() {
            errors.push(ScoringError::NonFinite { field, value });
        } else if field.is_divisor() && value == 0.0 {
            errors.push(ScoringError::ZeroYardsPerPoint { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
