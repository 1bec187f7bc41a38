use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fantasy scoring rules.
///
/// Yardage is scored as `yards / <field>YardsPerPoint`; every other field is
/// points per unit. Negative values are penalties, fractional values are
/// allowed (half-PPR is `reception: 0.5`).
///
/// Example JSON (as persisted in the user state file):
/// ```json
/// {
///   "passingYardsPerPoint": 25, "passingTD": 4, "interception": -2,
///   "rushingYardsPerPoint": 10, "rushingTD": 6, "rushingCarry": 0,
///   "receivingYardsPerPoint": 10, "receivingTD": 6, "reception": 0,
///   "fumbleLost": -2
/// }
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    pub passing_yards_per_point: f64,
    #[serde(rename = "passingTD")]
    pub passing_td: f64,
    pub interception: f64,

    pub rushing_yards_per_point: f64,
    #[serde(rename = "rushingTD")]
    pub rushing_td: f64,
    pub rushing_carry: f64,

    pub receiving_yards_per_point: f64,
    #[serde(rename = "receivingTD")]
    pub receiving_td: f64,
    pub reception: f64,

    pub fumble_lost: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            passing_yards_per_point: 25.0,
            passing_td: 4.0,
            interception: -2.0,
            rushing_yards_per_point: 10.0,
            rushing_td: 6.0,
            rushing_carry: 0.0,
            receiving_yards_per_point: 10.0,
            receiving_td: 6.0,
            reception: 0.0, // standard; 0.5 = half-PPR, 1 = PPR
            fumble_lost: -2.0,
        }
    }
}

impl ScoringConfig {
    pub fn get(&self, field: ScoringField) -> f64 {
        match field {
            ScoringField::PassingYardsPerPoint => self.passing_yards_per_point,
            ScoringField::PassingTd => self.passing_td,
            ScoringField::Interception => self.interception,
            ScoringField::RushingYardsPerPoint => self.rushing_yards_per_point,
            ScoringField::RushingTd => self.rushing_td,
            ScoringField::RushingCarry => self.rushing_carry,
            ScoringField::ReceivingYardsPerPoint => self.receiving_yards_per_point,
            ScoringField::ReceivingTd => self.receiving_td,
            ScoringField::Reception => self.reception,
            ScoringField::FumbleLost => self.fumble_lost,
        }
    }

    pub fn set(&mut self, field: ScoringField, value: f64) {
        let slot = match field {
            ScoringField::PassingYardsPerPoint => &mut self.passing_yards_per_point,
            ScoringField::PassingTd => &mut self.passing_td,
            ScoringField::Interception => &mut self.interception,
            ScoringField::RushingYardsPerPoint => &mut self.rushing_yards_per_point,
            ScoringField::RushingTd => &mut self.rushing_td,
            ScoringField::RushingCarry => &mut self.rushing_carry,
            ScoringField::ReceivingYardsPerPoint => &mut self.receiving_yards_per_point,
            ScoringField::ReceivingTd => &mut self.receiving_td,
            ScoringField::Reception => &mut self.reception,
            ScoringField::FumbleLost => &mut self.fumble_lost,
        };
        *slot = value;
    }
}

/// Display grouping for scoring fields (mirrors the stat groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Passing,
    Rushing,
    Receiving,
    Fumbles,
}

impl FieldGroup {
    pub fn title(&self) -> &'static str {
        match self {
            FieldGroup::Passing => "Passing",
            FieldGroup::Rushing => "Rushing",
            FieldGroup::Receiving => "Receiving",
            FieldGroup::Fumbles => "Fumbles",
        }
    }
}

/// Names one coefficient of [`ScoringConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringField {
    PassingYardsPerPoint,
    PassingTd,
    Interception,
    RushingYardsPerPoint,
    RushingTd,
    RushingCarry,
    ReceivingYardsPerPoint,
    ReceivingTd,
    Reception,
    FumbleLost,
}

impl ScoringField {
    /// All fields in settings-form order.
    pub const ALL: [ScoringField; 10] = [
        ScoringField::PassingYardsPerPoint,
        ScoringField::PassingTd,
        ScoringField::Interception,
        ScoringField::RushingYardsPerPoint,
        ScoringField::RushingTd,
        ScoringField::RushingCarry,
        ScoringField::ReceivingYardsPerPoint,
        ScoringField::ReceivingTd,
        ScoringField::Reception,
        ScoringField::FumbleLost,
    ];

    /// Key used in the persisted JSON.
    pub fn key(&self) -> &'static str {
        match self {
            ScoringField::PassingYardsPerPoint => "passingYardsPerPoint",
            ScoringField::PassingTd => "passingTD",
            ScoringField::Interception => "interception",
            ScoringField::RushingYardsPerPoint => "rushingYardsPerPoint",
            ScoringField::RushingTd => "rushingTD",
            ScoringField::RushingCarry => "rushingCarry",
            ScoringField::ReceivingYardsPerPoint => "receivingYardsPerPoint",
            ScoringField::ReceivingTd => "receivingTD",
            ScoringField::Reception => "reception",
            ScoringField::FumbleLost => "fumbleLost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringField::PassingYardsPerPoint
            | ScoringField::RushingYardsPerPoint
            | ScoringField::ReceivingYardsPerPoint => "Yards per Point",
            ScoringField::PassingTd | ScoringField::RushingTd | ScoringField::ReceivingTd => {
                "Touchdown Points"
            }
            ScoringField::Interception => "Interception Points",
            ScoringField::RushingCarry => "Points per Carry",
            ScoringField::Reception => "Points per Reception",
            ScoringField::FumbleLost => "Fumble Lost Points",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            ScoringField::PassingYardsPerPoint
            | ScoringField::RushingYardsPerPoint
            | ScoringField::ReceivingYardsPerPoint => "yds = 1 pt",
            ScoringField::RushingCarry => "pts (PPC)",
            ScoringField::Reception => "pts (PPR)",
            _ => "pts",
        }
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            ScoringField::PassingYardsPerPoint
            | ScoringField::PassingTd
            | ScoringField::Interception => FieldGroup::Passing,
            ScoringField::RushingYardsPerPoint
            | ScoringField::RushingTd
            | ScoringField::RushingCarry => FieldGroup::Rushing,
            ScoringField::ReceivingYardsPerPoint
            | ScoringField::ReceivingTd
            | ScoringField::Reception => FieldGroup::Receiving,
            ScoringField::FumbleLost => FieldGroup::Fumbles,
        }
    }

    /// Increment used when nudging the value up or down in the TUI.
    pub fn step(&self) -> f64 {
        match self {
            ScoringField::RushingCarry => 0.1,
            ScoringField::Reception => 0.5,
            _ => 1.0,
        }
    }

    /// Yards-per-point fields divide the stat and must never be zero.
    pub fn is_divisor(&self) -> bool {
        matches!(
            self,
            ScoringField::PassingYardsPerPoint
                | ScoringField::RushingYardsPerPoint
                | ScoringField::ReceivingYardsPerPoint
        )
    }
}

impl fmt::Display for ScoringField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ScoringField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScoringField::ALL
            .iter()
            .copied()
            .find(|field| field.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown scoring field '{}'", s))
    }
}

/// A partial update to [`ScoringConfig`]. Fields left as `None` keep their
/// current value when merged.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialScoringConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_yards_per_point: Option<f64>,
    #[serde(rename = "passingTD", skip_serializing_if = "Option::is_none")]
    pub passing_td: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interception: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rushing_yards_per_point: Option<f64>,
    #[serde(rename = "rushingTD", skip_serializing_if = "Option::is_none")]
    pub rushing_td: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rushing_carry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiving_yards_per_point: Option<f64>,
    #[serde(rename = "receivingTD", skip_serializing_if = "Option::is_none")]
    pub receiving_td: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reception: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fumble_lost: Option<f64>,
}

impl PartialScoringConfig {
    pub fn get(&self, field: ScoringField) -> Option<f64> {
        match field {
            ScoringField::PassingYardsPerPoint => self.passing_yards_per_point,
            ScoringField::PassingTd => self.passing_td,
            ScoringField::Interception => self.interception,
            ScoringField::RushingYardsPerPoint => self.rushing_yards_per_point,
            ScoringField::RushingTd => self.rushing_td,
            ScoringField::RushingCarry => self.rushing_carry,
            ScoringField::ReceivingYardsPerPoint => self.receiving_yards_per_point,
            ScoringField::ReceivingTd => self.receiving_td,
            ScoringField::Reception => self.reception,
            ScoringField::FumbleLost => self.fumble_lost,
        }
    }

    /// Builder-style setter, handy for presets and CLI flags.
    pub fn with(mut self, field: ScoringField, value: f64) -> Self {
        let slot = match field {
            ScoringField::PassingYardsPerPoint => &mut self.passing_yards_per_point,
            ScoringField::PassingTd => &mut self.passing_td,
            ScoringField::Interception => &mut self.interception,
            ScoringField::RushingYardsPerPoint => &mut self.rushing_yards_per_point,
            ScoringField::RushingTd => &mut self.rushing_td,
            ScoringField::RushingCarry => &mut self.rushing_carry,
            ScoringField::ReceivingYardsPerPoint => &mut self.receiving_yards_per_point,
            ScoringField::ReceivingTd => &mut self.receiving_td,
            ScoringField::Reception => &mut self.reception,
            ScoringField::FumbleLost => &mut self.fumble_lost,
        };
        *slot = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        ScoringField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Shallow merge over `base`.
    pub fn merge_onto(&self, base: &ScoringConfig) -> ScoringConfig {
        let mut merged = *base;
        for field in ScoringField::ALL {
            if let Some(value) = self.get(field) {
                merged.set(field, value);
            }
        }
        merged
    }
}

impl From<ScoringConfig> for PartialScoringConfig {
    fn from(config: ScoringConfig) -> Self {
        ScoringField::ALL
            .iter()
            .fold(PartialScoringConfig::default(), |partial, field| {
                partial.with(*field, config.get(*field))
            })
    }
}

/// Common league scoring formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Standard,
    HalfPpr,
    Ppr,
}

impl Preset {
    /// Presets only touch the reception coefficient.
    pub fn partial(&self) -> PartialScoringConfig {
        let reception = match self {
            Preset::Standard => 0.0,
            Preset::HalfPpr => 0.5,
            Preset::Ppr => 1.0,
        };
        PartialScoringConfig::default().with(ScoringField::Reception, reception)
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "std" => Ok(Preset::Standard),
            "half-ppr" | "half" | "halfppr" => Ok(Preset::HalfPpr),
            "ppr" | "full-ppr" => Ok(Preset::Ppr),
            other => Err(format!("unknown preset '{}' (standard, half-ppr, ppr)", other)),
        }
    }
}
