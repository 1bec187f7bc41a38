use super::config::ScoringConfig;
use crate::stats::PlayerSeason;

#[derive(Debug, Clone, PartialEq)]
pub struct TermContribution {
    pub label: &'static str, // e.g. "Pass Yds", "Rec TD"
    pub stat: f64,           // Raw stat value from the season
    pub points: f64,         // Unrounded points from this term
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub points: f64,
    pub terms: Vec<TermContribution>,
}

/// Fantasy points for one season, rounded to one decimal.
///
/// Terms are summed unrounded and the total is rounded once. A zero
/// yards-per-point divisor yields a non-finite result; `ScoringSettings`
/// refuses such configs before they get here.
pub fn score(player: &PlayerSeason, config: &ScoringConfig) -> f64 {
    let mut points = 0.0;

    // Passing
    points += player.pass_yds / config.passing_yards_per_point;
    points += player.pass_td * config.passing_td;
    points += player.pass_int * config.interception;

    // Rushing
    points += player.rush_yds / config.rushing_yards_per_point;
    points += player.rush_td * config.rushing_td;
    points += player.rush_att * config.rushing_carry;

    // Receiving
    points += player.rec_yds / config.receiving_yards_per_point;
    points += player.rec_td * config.receiving_td;
    points += player.rec * config.reception;

    // Fumbles
    points += player.fmb_lost * config.fumble_lost;

    round_to_tenth(points)
}

/// Round half away from zero at one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Collapse -0.0 so it never renders as "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Same total as [`score`], with each term's contribution listed.
/// Terms that contribute nothing are left out.
pub fn score_breakdown(player: &PlayerSeason, config: &ScoringConfig) -> ScoreBreakdown {
    let candidates = [
        ("Pass Yds", player.pass_yds, player.pass_yds / config.passing_yards_per_point),
        ("Pass TD", player.pass_td, player.pass_td * config.passing_td),
        ("Int", player.pass_int, player.pass_int * config.interception),
        ("Rush Yds", player.rush_yds, player.rush_yds / config.rushing_yards_per_point),
        ("Rush TD", player.rush_td, player.rush_td * config.rushing_td),
        ("Rush Att", player.rush_att, player.rush_att * config.rushing_carry),
        ("Rec Yds", player.rec_yds, player.rec_yds / config.receiving_yards_per_point),
        ("Rec TD", player.rec_td, player.rec_td * config.receiving_td),
        ("Rec", player.rec, player.rec * config.reception),
        ("Fum Lost", player.fmb_lost, player.fmb_lost * config.fumble_lost),
    ];

    let terms = candidates
        .into_iter()
        .filter(|(_, _, points)| *points != 0.0)
        .map(|(label, stat, points)| TermContribution { label, stat, points })
        .collect();

    ScoreBreakdown {
        points: score(player, config),
        terms,
    }
}
