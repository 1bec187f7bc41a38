use super::types::{PositionFilter, YearFilter};
use crate::stats::PlayerSeason;

pub fn matches_position(season: &PlayerSeason, filter: PositionFilter) -> bool {
    match filter {
        PositionFilter::All => true,
        PositionFilter::Only(position) => season.position == position,
    }
}

/// Year predicate anchored at `reference_year` (the newest season loaded).
pub fn matches_year(season: &PlayerSeason, filter: YearFilter, reference_year: u16) -> bool {
    let year = season.year;
    match filter {
        YearFilter::Year(wanted) => year == wanted,
        YearFilter::Decade(start) => {
            let end = start.saturating_add(9);
            // The current decade only runs up to the newest season
            let end = if (start..=end).contains(&reference_year) {
                reference_year
            } else {
                end
            };
            year >= start && year <= end
        }
        YearFilter::Last(n) => i32::from(year) > i32::from(reference_year) - i32::from(n),
        YearFilter::All => true,
    }
}

pub fn matches(
    season: &PlayerSeason,
    position: PositionFilter,
    year: YearFilter,
    reference_year: u16,
) -> bool {
    matches_position(season, position) && matches_year(season, year, reference_year)
}

/// Keep only the seasons passing both filters, in input order.
pub fn filter_seasons<'a>(
    seasons: &'a [PlayerSeason],
    position: PositionFilter,
    year: YearFilter,
    reference_year: u16,
) -> impl Iterator<Item = &'a PlayerSeason> {
    seasons
        .iter()
        .filter(move |s| matches(s, position, year, reference_year))
}
