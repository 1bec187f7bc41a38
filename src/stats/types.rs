use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Skill positions carried by the dataset. Everything else is dropped at
/// conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::QB, Position::RB, Position::WR, Position::TE];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            other => Err(format!("unknown position '{}'", other)),
        }
    }
}

/// One player's counting stats for one season.
///
/// Field names match the JSON dataset (lowerCamelCase). Counting stats are
/// kept as `f64`: the converter pre-rounds fractional values to one decimal
/// and rushing yards can be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSeason {
    pub player: String,
    pub team: String,
    pub position: Position,
    pub age: f64,
    pub games: f64,
    pub games_started: f64,
    pub year: u16,

    // Passing
    pub pass_cmp: f64,
    pub pass_att: f64,
    pub pass_yds: f64,
    #[serde(rename = "passTD")]
    pub pass_td: f64,
    pub pass_int: f64,

    // Rushing
    pub rush_att: f64,
    pub rush_yds: f64,
    #[serde(rename = "rushTD")]
    pub rush_td: f64,

    // Receiving
    pub rec_tgt: f64,
    pub rec: f64,
    pub rec_yds: f64,
    #[serde(rename = "recTD")]
    pub rec_td: f64,

    // Fumbles
    pub fmb: f64,
    pub fmb_lost: f64,
}

impl PlayerSeason {
    /// An all-zero season, used as a base for tests and fixtures.
    pub fn empty(player: &str, position: Position, year: u16) -> Self {
        Self {
            player: player.to_string(),
            team: String::new(),
            position,
            age: 0.0,
            games: 0.0,
            games_started: 0.0,
            year,
            pass_cmp: 0.0,
            pass_att: 0.0,
            pass_yds: 0.0,
            pass_td: 0.0,
            pass_int: 0.0,
            rush_att: 0.0,
            rush_yds: 0.0,
            rush_td: 0.0,
            rec_tgt: 0.0,
            rec: 0.0,
            rec_yds: 0.0,
            rec_td: 0.0,
            fmb: 0.0,
            fmb_lost: 0.0,
        }
    }
}

/// A season with its fantasy points and rank in the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPlayerSeason {
    #[serde(flatten)]
    pub season: PlayerSeason,
    pub fantasy_points: f64,
    pub rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse_case_insensitive() {
        assert_eq!("qb".parse::<Position>().unwrap(), Position::QB);
        assert_eq!(" TE ".parse::<Position>().unwrap(), Position::TE);
        assert!("K".parse::<Position>().is_err());
    }

    #[test]
    fn test_player_season_json_field_names() {
        let json = r#"{
            "player": "Barry Sanders", "team": "DET", "position": "RB",
            "age": 29, "games": 16, "gamesStarted": 16, "year": 1997,
            "passCmp": 0, "passAtt": 0, "passYds": 0, "passTD": 0, "passInt": 0,
            "rushAtt": 335, "rushYds": 2053, "rushTD": 11,
            "recTgt": 0, "rec": 33, "recYds": 305, "recTD": 3,
            "fmb": 3, "fmbLost": 1
        }"#;
        let season: PlayerSeason = serde_json::from_str(json).unwrap();
        assert_eq!(season.position, Position::RB);
        assert_eq!(season.games_started, 16.0);
        assert_eq!(season.rush_yds, 2053.0);
        assert_eq!(season.rec_td, 3.0);
        assert_eq!(season.fmb_lost, 1.0);
    }

    #[test]
    fn test_player_season_accepts_fractional_counts() {
        let season = PlayerSeason::empty("Half", Position::WR, 2001);
        let mut value = serde_json::to_value(season).unwrap();
        value["age"] = serde_json::json!(24.5);
        value["games"] = serde_json::json!(15.5);
        let season: PlayerSeason = serde_json::from_value(value).unwrap();
        assert_eq!(season.age, 24.5);
        assert_eq!(season.games, 15.5);
    }

    #[test]
    fn test_player_season_rejects_unknown_position() {
        let mut value = serde_json::to_value(PlayerSeason::empty("K", Position::QB, 2000)).unwrap();
        value["position"] = serde_json::json!("K");
        assert!(serde_json::from_value::<PlayerSeason>(value).is_err());
    }

    #[test]
    fn test_scored_season_serializes_flat() {
        let scored = ScoredPlayerSeason {
            season: PlayerSeason::empty("Test", Position::WR, 2020),
            fantasy_points: 12.5,
            rank: 1,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["player"], "Test");
        assert_eq!(value["fantasyPoints"], 12.5);
        assert_eq!(value["rank"], 1);
        assert_eq!(value["recTD"], 0.0);
    }
}
