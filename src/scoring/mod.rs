pub mod config;
pub mod engine;
pub mod settings;
pub mod validation;

pub use config::*;
pub use engine::{round_to_tenth, score, score_breakdown, ScoreBreakdown, TermContribution};
pub use settings::ScoringSettings;
pub use validation::{validate_scoring, ScoringError};
