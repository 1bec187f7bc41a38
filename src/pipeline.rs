use crate::filter::{filter_seasons, PositionFilter, YearFilter};
use crate::scoring::{score, ScoringConfig};
use crate::stats::{Dataset, PlayerSeason, ScoredPlayerSeason};
use thiserror::Error;

/// Rows kept after sorting unless configured otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 500;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("{player} ({year}) scored a non-finite value; check yards-per-point settings")]
    NonFinitePoints { player: String, year: u16 },
}

/// Everything a ranking depends on besides the dataset itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeriveRequest<'a> {
    pub position: PositionFilter,
    pub year: YearFilter,
    pub scoring: &'a ScoringConfig,
    pub max_results: usize,
}

impl<'a> DeriveRequest<'a> {
    pub fn new(position: PositionFilter, year: YearFilter, scoring: &'a ScoringConfig) -> Self {
        Self {
            position,
            year,
            scoring,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Filter, score, sort, truncate and rank.
///
/// Sorting is by points descending. Exact ties keep dataset order (the sort
/// is stable), so the same inputs always produce the same ranking.
pub fn derive(
    dataset: &Dataset,
    request: &DeriveRequest<'_>,
) -> Result<Vec<ScoredPlayerSeason>, PipelineError> {
    let mut scored: Vec<(&PlayerSeason, f64)> = filter_seasons(
        dataset.records(),
        request.position,
        request.year,
        dataset.reference_year(),
    )
    .map(|season| (season, score(season, request.scoring)))
    .collect();

    if let Some((season, _)) = scored.iter().find(|(_, points)| !points.is_finite()) {
        return Err(PipelineError::NonFinitePoints {
            player: season.player.clone(),
            year: season.year,
        });
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(request.max_results);

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(idx, (season, points))| ScoredPlayerSeason {
            season: season.clone(),
            fantasy_points: points,
            rank: idx + 1,
        })
        .collect())
}
