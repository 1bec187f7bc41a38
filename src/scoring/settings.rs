use super::config::{PartialScoringConfig, ScoringConfig};
use super::validation::{validate_scoring, ScoringError};

/// Owner of the active scoring rules.
///
/// Updates are all-or-nothing: a rejected `set` leaves the current rules in
/// place, so scoring never sees a zero divisor.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    current: ScoringConfig,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringSettings {
    pub fn new() -> Self {
        Self {
            current: ScoringConfig::default(),
        }
    }

    /// Start from an existing config. Invalid configs are refused.
    pub fn from_config(config: ScoringConfig) -> Result<Self, Vec<ScoringError>> {
        validate_scoring(&config)?;
        Ok(Self { current: config })
    }

    pub fn get(&self) -> &ScoringConfig {
        &self.current
    }

    /// Merge `partial` over the current rules.
    pub fn set(
        &mut self,
        partial: &PartialScoringConfig,
    ) -> Result<&ScoringConfig, Vec<ScoringError>> {
        let merged = partial.merge_onto(&self.current);
        validate_scoring(&merged)?;
        self.current = merged;
        Ok(&self.current)
    }

    /// Replace the rules wholesale.
    pub fn replace(&mut self, config: ScoringConfig) -> Result<&ScoringConfig, Vec<ScoringError>> {
        validate_scoring(&config)?;
        self.current = config;
        Ok(&self.current)
    }

    pub fn reset(&mut self) -> &ScoringConfig {
        self.current = ScoringConfig::default();
        &self.current
    }

    pub fn is_default(&self) -> bool {
        self.current == ScoringConfig::default()
    }
}
