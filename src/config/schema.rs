use crate::pipeline::DEFAULT_MAX_RESULTS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dataset path or URL. Defaults to the bundled data location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub max_results: usize,
    pub theme: ThemeChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: None,
            max_results: DEFAULT_MAX_RESULTS,
            theme: ThemeChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}
