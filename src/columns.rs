use crate::filter::PositionFilter;
use crate::stats::{Position, ScoredPlayerSeason};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnGroup {
    Base,
    Passing,
    Rushing,
    Receiving,
    Fumbles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Rank,
    Year,
    Player,
    Team,
    FantasyPoints,
    Games,
    PassCmp,
    PassAtt,
    PassYds,
    PassTd,
    PassInt,
    RushAtt,
    RushYds,
    RushTd,
    RecTgt,
    Rec,
    RecYds,
    RecTd,
    FmbLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// One displayed column. Width is in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub header: &'static str,
    pub width: u16,
    pub align: Alignment,
    pub group: ColumnGroup,
}

const fn col(key: ColumnKey, header: &'static str, width: u16, group: ColumnGroup) -> Column {
    let align = match key {
        ColumnKey::Player | ColumnKey::Team => Alignment::Left,
        _ => Alignment::Right,
    };
    Column {
        key,
        header,
        width,
        align,
        group,
    }
}

const BASE_COLUMNS: [Column; 6] = [
    col(ColumnKey::Rank, "#", 4, ColumnGroup::Base),
    col(ColumnKey::Year, "Year", 4, ColumnGroup::Base),
    col(ColumnKey::Player, "Player", 24, ColumnGroup::Base),
    col(ColumnKey::Team, "Team", 4, ColumnGroup::Base),
    col(ColumnKey::FantasyPoints, "Fantasy Pts", 11, ColumnGroup::Base),
    col(ColumnKey::Games, "G", 3, ColumnGroup::Base),
];

const PASSING_COLUMNS: [Column; 5] = [
    col(ColumnKey::PassCmp, "Cmp", 4, ColumnGroup::Passing),
    col(ColumnKey::PassAtt, "Att", 4, ColumnGroup::Passing),
    col(ColumnKey::PassYds, "Pass Yds", 8, ColumnGroup::Passing),
    col(ColumnKey::PassTd, "Pass TD", 7, ColumnGroup::Passing),
    col(ColumnKey::PassInt, "Int", 3, ColumnGroup::Passing),
];

const RUSHING_COLUMNS: [Column; 3] = [
    col(ColumnKey::RushAtt, "Rush Att", 8, ColumnGroup::Rushing),
    col(ColumnKey::RushYds, "Rush Yds", 8, ColumnGroup::Rushing),
    col(ColumnKey::RushTd, "Rush TD", 7, ColumnGroup::Rushing),
];

const RECEIVING_COLUMNS: [Column; 4] = [
    col(ColumnKey::RecTgt, "Tgt", 4, ColumnGroup::Receiving),
    col(ColumnKey::Rec, "Rec", 4, ColumnGroup::Receiving),
    col(ColumnKey::RecYds, "Rec Yds", 7, ColumnGroup::Receiving),
    col(ColumnKey::RecTd, "Rec TD", 6, ColumnGroup::Receiving),
];

const FUMBLE_COLUMNS: [Column; 1] = [col(ColumnKey::FmbLost, "Fum Lost", 8, ColumnGroup::Fumbles)];

/// Stat groups between the base prefix and the fumble suffix, per filter.
pub fn column_groups_for(filter: PositionFilter) -> [ColumnGroup; 3] {
    use ColumnGroup::*;
    match filter {
        PositionFilter::All | PositionFilter::Only(Position::QB) => [Passing, Rushing, Receiving],
        PositionFilter::Only(Position::RB) => [Rushing, Receiving, Passing],
        PositionFilter::Only(Position::WR) | PositionFilter::Only(Position::TE) => {
            [Receiving, Rushing, Passing]
        }
    }
}

fn group_columns(group: ColumnGroup) -> &'static [Column] {
    match group {
        ColumnGroup::Base => &BASE_COLUMNS,
        ColumnGroup::Passing => &PASSING_COLUMNS,
        ColumnGroup::Rushing => &RUSHING_COLUMNS,
        ColumnGroup::Receiving => &RECEIVING_COLUMNS,
        ColumnGroup::Fumbles => &FUMBLE_COLUMNS,
    }
}

/// Ordered columns for a position filter: base prefix, the position's stat
/// groups, then fumbles.
pub fn columns_for_position(filter: PositionFilter) -> Vec<Column> {
    std::iter::once(ColumnGroup::Base)
        .chain(column_groups_for(filter))
        .chain(std::iter::once(ColumnGroup::Fumbles))
        .flat_map(|group| group_columns(group).iter().copied())
        .collect()
}

/// Format fantasy points with exactly one decimal
pub fn format_points(points: f64) -> String {
    format!("{:.1}", points)
}

/// Format a counting stat: whole numbers without a decimal, otherwise one
pub fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 19] = [
        ColumnKey::Rank,
        ColumnKey::Year,
        ColumnKey::Player,
        ColumnKey::Team,
        ColumnKey::FantasyPoints,
        ColumnKey::Games,
        ColumnKey::PassCmp,
        ColumnKey::PassAtt,
        ColumnKey::PassYds,
        ColumnKey::PassTd,
        ColumnKey::PassInt,
        ColumnKey::RushAtt,
        ColumnKey::RushYds,
        ColumnKey::RushTd,
        ColumnKey::RecTgt,
        ColumnKey::Rec,
        ColumnKey::RecYds,
        ColumnKey::RecTd,
        ColumnKey::FmbLost,
    ];

    /// Text columns read naturally A-Z, numbers biggest first
    pub fn default_descending(&self) -> bool {
        !matches!(self, ColumnKey::Rank | ColumnKey::Player | ColumnKey::Team)
    }

    /// Dataset field name (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKey::Rank => "rank",
            ColumnKey::Year => "year",
            ColumnKey::Player => "player",
            ColumnKey::Team => "team",
            ColumnKey::FantasyPoints => "fantasyPoints",
            ColumnKey::Games => "games",
            ColumnKey::PassCmp => "passCmp",
            ColumnKey::PassAtt => "passAtt",
            ColumnKey::PassYds => "passYds",
            ColumnKey::PassTd => "passTD",
            ColumnKey::PassInt => "passInt",
            ColumnKey::RushAtt => "rushAtt",
            ColumnKey::RushYds => "rushYds",
            ColumnKey::RushTd => "rushTD",
            ColumnKey::RecTgt => "recTgt",
            ColumnKey::Rec => "rec",
            ColumnKey::RecYds => "recYds",
            ColumnKey::RecTd => "recTD",
            ColumnKey::FmbLost => "fmbLost",
        }
    }

    fn is_text(&self) -> bool {
        matches!(self, ColumnKey::Player | ColumnKey::Team)
    }

    fn text<'a>(&self, row: &'a ScoredPlayerSeason) -> &'a str {
        match self {
            ColumnKey::Player => &row.season.player,
            ColumnKey::Team => &row.season.team,
            _ => "",
        }
    }

    fn number(&self, row: &ScoredPlayerSeason) -> f64 {
        let s = &row.season;
        match self {
            ColumnKey::Rank => row.rank as f64,
            ColumnKey::Year => f64::from(s.year),
            ColumnKey::FantasyPoints => row.fantasy_points,
            ColumnKey::Games => s.games,
            ColumnKey::PassCmp => s.pass_cmp,
            ColumnKey::PassAtt => s.pass_att,
            ColumnKey::PassYds => s.pass_yds,
            ColumnKey::PassTd => s.pass_td,
            ColumnKey::PassInt => s.pass_int,
            ColumnKey::RushAtt => s.rush_att,
            ColumnKey::RushYds => s.rush_yds,
            ColumnKey::RushTd => s.rush_td,
            ColumnKey::RecTgt => s.rec_tgt,
            ColumnKey::Rec => s.rec,
            ColumnKey::RecYds => s.rec_yds,
            ColumnKey::RecTd => s.rec_td,
            ColumnKey::FmbLost => s.fmb_lost,
            ColumnKey::Player | ColumnKey::Team => 0.0,
        }
    }

    fn compare(&self, a: &ScoredPlayerSeason, b: &ScoredPlayerSeason) -> Ordering {
        if self.is_text() {
            self.text(a).cmp(self.text(b))
        } else {
            self.number(a).total_cmp(&self.number(b))
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ColumnKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown column '{}'", wanted))
    }
}

impl Column {
    /// Render this column's cell for a row
    pub fn value(&self, row: &ScoredPlayerSeason) -> String {
        match self.key {
            ColumnKey::Rank => row.rank.to_string(),
            ColumnKey::Year => row.season.year.to_string(),
            ColumnKey::FantasyPoints => format_points(row.fantasy_points),
            ColumnKey::Player | ColumnKey::Team => self.key.text(row).to_string(),
            key => format_stat(key.number(row)),
        }
    }
}

/// Re-order rows for display only. Ranks are left as derived; equal keys
/// keep their current order.
pub fn sort_rows(rows: &mut [ScoredPlayerSeason], key: ColumnKey, descending: bool) {
    rows.sort_by(|a, b| {
        let ord = key.compare(a, b);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}
