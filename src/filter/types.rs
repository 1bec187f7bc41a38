use crate::stats::Position;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// First season in the shipped dataset.
pub const FIRST_SEASON: u16 = 1970;

/// Latest season in the shipped dataset; used as the reference year when the
/// loaded dataset is empty.
pub const LATEST_SEASON: u16 = 2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Only(Position),
}

impl PositionFilter {
    /// Tab order in the UI.
    pub const CYCLE: [PositionFilter; 5] = [
        PositionFilter::All,
        PositionFilter::Only(Position::QB),
        PositionFilter::Only(Position::RB),
        PositionFilter::Only(Position::WR),
        PositionFilter::Only(Position::TE),
    ];

    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        Self::CYCLE[(i + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for PositionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionFilter::All => f.write_str("All"),
            PositionFilter::Only(position) => write!(f, "{}", position),
        }
    }
}

impl FromStr for PositionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PositionFilter::All)
        } else {
            s.parse::<Position>()
                .map(PositionFilter::Only)
                .map_err(|e| format!("{} (expected All, QB, RB, WR or TE)", e))
        }
    }
}

impl Serialize for PositionFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PositionFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Which seasons to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    /// A single season.
    Year(u16),
    /// Ten seasons starting at the given year (1990 = the 1990s).
    Decade(u16),
    /// Seasons strictly newer than `reference_year - n`.
    Last(u16),
    All,
}

impl Default for YearFilter {
    fn default() -> Self {
        YearFilter::Last(35)
    }
}

impl YearFilter {
    /// Short human label for UI tabs and headings.
    pub fn label(&self) -> String {
        match self {
            YearFilter::Year(year) => year.to_string(),
            YearFilter::Decade(start) => format!("{}'s", start),
            YearFilter::Last(n) => format!("Last {} Years", n),
            YearFilter::All => "All Years".to_string(),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::Year(year) => write!(f, "{}", year),
            YearFilter::Decade(start) => write!(f, "{}s", start),
            YearFilter::Last(n) => write!(f, "Last{}", n),
            YearFilter::All => f.write_str("All"),
        }
    }
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        // "Last55" spans the whole 1970-2024 dataset
        if lower == "all" || lower == "last55" {
            return Ok(YearFilter::All);
        }
        if let Some(n) = lower.strip_prefix("last") {
            return match n.trim().parse::<u16>() {
                Ok(n) if n > 0 => Ok(YearFilter::Last(n)),
                _ => Err(format!("invalid year filter '{}'", trimmed)),
            };
        }
        if let Some(decade) = lower.strip_suffix('s') {
            return match decade.parse::<u16>() {
                Ok(start) if start % 10 == 0 => Ok(YearFilter::Decade(start)),
                _ => Err(format!("invalid decade '{}' (e.g. 1990s)", trimmed)),
            };
        }
        lower
            .parse::<u16>()
            .map(YearFilter::Year)
            .map_err(|_| {
                format!(
                    "invalid year filter '{}' (expected a year, a decade like 1990s, Last35 or All)",
                    trimmed
                )
            })
    }
}

impl Serialize for YearFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearFilter::Year(year) => serializer.serialize_u16(*year),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for YearFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Year(u16),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Year(year) => Ok(YearFilter::Year(year)),
            Repr::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// The year filters offered to the user, in menu order: the 35-year window,
/// each decade newest first, everything, then every single season newest
/// first.
pub fn year_filter_options(reference_year: u16) -> Vec<YearFilter> {
    let mut options = vec![YearFilter::Last(35)];

    let mut decade = reference_year - reference_year % 10;
    while decade >= FIRST_SEASON - FIRST_SEASON % 10 {
        options.push(YearFilter::Decade(decade));
        decade -= 10;
    }

    options.push(YearFilter::All);
    options.extend((FIRST_SEASON..=reference_year).rev().map(YearFilter::Year));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_filter_parse_and_display() {
        assert_eq!("all".parse::<PositionFilter>().unwrap(), PositionFilter::All);
        assert_eq!(
            "wr".parse::<PositionFilter>().unwrap(),
            PositionFilter::Only(Position::WR)
        );
        assert!("K".parse::<PositionFilter>().is_err());
        assert_eq!(PositionFilter::Only(Position::TE).to_string(), "TE");
    }

    #[test]
    fn test_position_filter_cycle() {
        let mut filter = PositionFilter::All;
        for _ in 0..PositionFilter::CYCLE.len() {
            filter = filter.next();
        }
        assert_eq!(filter, PositionFilter::All);
        assert_eq!(PositionFilter::All.previous(), PositionFilter::Only(Position::TE));
    }

    #[test]
    fn test_year_filter_parse() {
        assert_eq!("2003".parse::<YearFilter>().unwrap(), YearFilter::Year(2003));
        assert_eq!("1990s".parse::<YearFilter>().unwrap(), YearFilter::Decade(1990));
        assert_eq!("Last35".parse::<YearFilter>().unwrap(), YearFilter::Last(35));
        assert_eq!("Last55".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!("all".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert!("1995s".parse::<YearFilter>().is_err());
        assert!("last0".parse::<YearFilter>().is_err());
        assert!("recent".parse::<YearFilter>().is_err());
    }

    #[test]
    fn test_year_filter_display_parses_back() {
        for filter in [
            YearFilter::Year(1984),
            YearFilter::Decade(2010),
            YearFilter::Last(35),
            YearFilter::All,
        ] {
            assert_eq!(filter.to_string().parse::<YearFilter>().unwrap(), filter);
        }
    }

    #[test]
    fn test_year_filter_json_shapes() {
        assert_eq!(serde_json::to_string(&YearFilter::Year(2003)).unwrap(), "2003");
        assert_eq!(serde_json::to_string(&YearFilter::Decade(1990)).unwrap(), "\"1990s\"");
        assert_eq!(serde_json::to_string(&YearFilter::Last(35)).unwrap(), "\"Last35\"");

        let parsed: YearFilter = serde_json::from_str("1999").unwrap();
        assert_eq!(parsed, YearFilter::Year(1999));
        let parsed: YearFilter = serde_json::from_str("\"2020s\"").unwrap();
        assert_eq!(parsed, YearFilter::Decade(2020));
        assert!(serde_json::from_str::<YearFilter>("\"soon\"").is_err());
    }

    #[test]
    fn test_year_filter_options() {
        let options = year_filter_options(2024);
        assert_eq!(options[0], YearFilter::Last(35));
        assert_eq!(options[1], YearFilter::Decade(2020));
        assert_eq!(options[6], YearFilter::Decade(1970));
        assert_eq!(options[7], YearFilter::All);
        assert_eq!(options[8], YearFilter::Year(2024));
        assert_eq!(*options.last().unwrap(), YearFilter::Year(1970));
        assert_eq!(options.len(), 8 + 55);
    }
}
