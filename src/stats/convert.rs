//! Convert a season-stats CSV export into the JSON dataset.

use super::types::{PlayerSeason, Position};
use crate::scoring::round_to_tenth;
use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Counts reported after a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub rows_read: usize,
    pub records_kept: usize,
    pub earliest_year: Option<u16>,
    pub latest_year: Option<u16>,
}

/// CSV header -> dataset field. Columns missing from a file read as zero
/// (or empty for text fields).
struct ColumnIndex {
    player: usize,
    position: usize,
    year: usize,
    team: Option<usize>,
    age: Option<usize>,
    games: Option<usize>,
    games_started: Option<usize>,
    pass_cmp: Option<usize>,
    pass_att: Option<usize>,
    pass_yds: Option<usize>,
    pass_td: Option<usize>,
    pass_int: Option<usize>,
    rush_att: Option<usize>,
    rush_yds: Option<usize>,
    rush_td: Option<usize>,
    rec_tgt: Option<usize>,
    rec: Option<usize>,
    rec_yds: Option<usize>,
    rec_td: Option<usize>,
    fmb: Option<usize>,
    fmb_lost: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| match find(name) {
            Some(idx) => Ok(idx),
            None => bail!("CSV is missing required column '{}'", name),
        };

        Ok(Self {
            player: require("Player")?,
            position: require("Pos")?,
            year: require("Year")?,
            team: find("Tm"),
            age: find("Age"),
            games: find("G"),
            games_started: find("GS"),
            pass_cmp: find("Pass_Cmp"),
            pass_att: find("Pass_Att"),
            pass_yds: find("Pass_Yds"),
            pass_td: find("Pass_TD"),
            pass_int: find("Pass_Int"),
            rush_att: find("Rush_Att"),
            rush_yds: find("Rush_Yds"),
            rush_td: find("Rush_TD"),
            rec_tgt: find("Rec_Tgt"),
            rec: find("Rec_Rec"),
            rec_yds: find("Rec_Yds"),
            rec_td: find("Rec_TD"),
            fmb: find("Fmb"),
            fmb_lost: find("FmbLost"),
        })
    }
}

/// Parse a numeric cell. Blank or unparseable cells are zero; fractional
/// values keep one decimal.
fn parse_stat(value: Option<&str>) -> f64 {
    let parsed = value
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    if parsed.fract() == 0.0 {
        parsed
    } else {
        round_to_tenth(parsed)
    }
}

fn parse_year(value: Option<&str>) -> u16 {
    parse_stat(value).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

fn cell<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i))
}

/// Rough standard-scoring estimate used only to order the output file.
fn estimated_points(season: &PlayerSeason) -> f64 {
    season.pass_yds / 25.0
        + season.pass_td * 4.0
        + season.rush_yds / 10.0
        + season.rush_td * 6.0
        + season.rec_yds / 10.0
        + season.rec_td * 6.0
}

/// Read CSV rows, keep the skill positions, and order newest season first.
pub fn parse_csv<R: Read>(reader: R) -> Result<(Vec<PlayerSeason>, ConvertSummary)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut rows_read = 0;
    let mut seasons = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", line + 2))?;
        rows_read += 1;

        // Exact match: other positions and combined entries like "RB/WR" are dropped
        let position = match record.get(columns.position).map(str::trim) {
            Some("QB") => Position::QB,
            Some("RB") => Position::RB,
            Some("WR") => Position::WR,
            Some("TE") => Position::TE,
            _ => continue,
        };

        let stat = |idx| parse_stat(cell(&record, idx));
        seasons.push(PlayerSeason {
            player: record.get(columns.player).unwrap_or_default().trim().to_string(),
            team: cell(&record, columns.team).unwrap_or_default().trim().to_string(),
            position,
            age: parse_stat(cell(&record, columns.age)),
            games: parse_stat(cell(&record, columns.games)),
            games_started: parse_stat(cell(&record, columns.games_started)),
            year: parse_year(record.get(columns.year)),
            pass_cmp: stat(columns.pass_cmp),
            pass_att: stat(columns.pass_att),
            pass_yds: stat(columns.pass_yds),
            pass_td: stat(columns.pass_td),
            pass_int: stat(columns.pass_int),
            rush_att: stat(columns.rush_att),
            rush_yds: stat(columns.rush_yds),
            rush_td: stat(columns.rush_td),
            rec_tgt: stat(columns.rec_tgt),
            rec: stat(columns.rec),
            rec_yds: stat(columns.rec_yds),
            rec_td: stat(columns.rec_td),
            fmb: stat(columns.fmb),
            fmb_lost: stat(columns.fmb_lost),
        });
    }

    seasons.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| estimated_points(b).total_cmp(&estimated_points(a)))
    });

    let summary = ConvertSummary {
        rows_read,
        records_kept: seasons.len(),
        earliest_year: seasons.iter().map(|s| s.year).min(),
        latest_year: seasons.iter().map(|s| s.year).max(),
    };
    Ok((seasons, summary))
}

/// Convert `input` (CSV) to `output` (compact JSON), replacing any existing
/// file atomically.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConvertSummary> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let (seasons, summary) = parse_csv(file)?;

    info!("Parsed {} rows from {}", summary.rows_read, input.display());
    info!("Kept {} QB/RB/WR/TE seasons", summary.records_kept);
    if let (Some(first), Some(last)) = (summary.earliest_year, summary.latest_year) {
        info!("Year range: {}-{}", first, last);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_vec(&seasons).context("Failed to serialize dataset")?;
    let mut file = AtomicWriteFile::open(output)
        .with_context(|| format!("Failed to open {} for writing", output.display()))?;
    file.write_all(&json).context("Failed to write dataset")?;
    file.commit().context("Failed to commit dataset file")?;
    debug!("Wrote {} bytes to {}", json.len(), output.display());

    Ok(summary)
}
