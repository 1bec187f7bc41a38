pub mod predicate;
pub mod types;

pub use predicate::{filter_seasons, matches, matches_position, matches_year};
pub use types::{year_filter_options, PositionFilter, YearFilter, FIRST_SEASON, LATEST_SEASON};
