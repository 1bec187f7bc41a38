use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::columns::{
    columns_for_position, format_points, format_stat, Alignment, Column, ColumnKey,
};
use crate::filter::PositionFilter;
use crate::scoring::{FieldGroup, ScoreBreakdown, ScoringConfig, ScoringField};
use crate::stats::ScoredPlayerSeason;

/// Blank cells between adjacent table columns
pub(crate) const COLUMN_GAP: u16 = 2;

/// Shown in place of a table when the filters match nothing
pub const EMPTY_MESSAGE: &str = "No data found for the selected filters.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad(text: &str, column: &Column) -> String {
    let width = column.width as usize;
    let text = truncate_text(text, width);
    match column.align {
        Alignment::Left => format!("{:<width$}", text, width = width),
        Alignment::Right => format!("{:>width$}", text, width = width),
    }
}

/// Columns that fit in `max_width`. The base prefix is always kept; stat
/// columns are dropped from the right.
pub(crate) fn fit_columns(columns: Vec<Column>, max_width: Option<usize>) -> Vec<Column> {
    let Some(max_width) = max_width else {
        return columns;
    };

    let mut used = 0;
    columns
        .into_iter()
        .enumerate()
        .take_while(|(idx, column)| {
            let gap = if *idx == 0 { 0 } else { COLUMN_GAP };
            let needed = usize::from(column.width + gap);
            used += needed;
            *idx < 6 || used <= max_width
        })
        .map(|(_, column)| column)
        .collect()
}

/// Format a ranked view as an aligned table with a header row.
///
/// Columns follow the position filter's ordering; trailing stat columns are
/// dropped when the terminal is too narrow.
pub fn format_table(
    rows: &[ScoredPlayerSeason],
    filter: PositionFilter,
    use_colors: bool,
) -> String {
    if rows.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let columns = fit_columns(columns_for_position(filter), get_terminal_width());
    render_table(rows, &columns, use_colors)
}

fn render_table(rows: &[ScoredPlayerSeason], columns: &[Column], use_colors: bool) -> String {
    let separator = " ".repeat(COLUMN_GAP as usize);

    let header = columns
        .iter()
        .map(|c| pad(c.header, c))
        .collect::<Vec<_>>()
        .join(separator.as_str());
    let header = if use_colors {
        header.bold().underline().to_string()
    } else {
        header
    };

    let body = rows.iter().map(|row| {
        columns
            .iter()
            .map(|column| {
                let cell = pad(&column.value(row), column);
                if !use_colors {
                    return cell;
                }
                match column.key {
                    ColumnKey::Rank => cell.dimmed().to_string(),
                    ColumnKey::FantasyPoints if row.fantasy_points < 0.0 => {
                        cell.red().bold().to_string()
                    }
                    ColumnKey::FantasyPoints => cell.green().bold().to_string(),
                    ColumnKey::Player => cell.bold().to_string(),
                    ColumnKey::Team => cell.cyan().to_string(),
                    _ => cell,
                }
            })
            .collect::<Vec<_>>()
            .join(separator.as_str())
    });

    std::iter::once(header)
        .chain(body)
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a ranked view as tab-separated values for scripting
/// Header row uses dataset field names, no colors
pub fn format_tsv(rows: &[ScoredPlayerSeason], filter: PositionFilter) -> String {
    let columns = columns_for_position(filter);

    let header = columns
        .iter()
        .map(|c| c.key.as_str())
        .collect::<Vec<_>>()
        .join("\t");

    std::iter::once(header)
        .chain(rows.iter().map(|row| {
            columns
                .iter()
                .map(|c| c.value(row))
                .collect::<Vec<_>>()
                .join("\t")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a ranked view as a JSON array (dataset fields plus
/// `fantasyPoints` and `rank`)
pub fn format_json(rows: &[ScoredPlayerSeason]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Format one row's per-term scoring (for verbose mode)
pub fn format_breakdown(
    row: &ScoredPlayerSeason,
    breakdown: &ScoreBreakdown,
    use_colors: bool,
) -> String {
    let title = format!(
        "#{} {} ({}, {} {})",
        row.rank, row.season.player, row.season.year, row.season.team, row.season.position
    );
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    for term in &breakdown.terms {
        lines.push(format!(
            "  {:<9} {:>8}  {:>+8.2}",
            term.label,
            format_stat(term.stat),
            term.points
        ));
    }
    lines.push(format!("  {:<9} {:>8}  {:>8}", "Total", "", format_points(breakdown.points)));
    lines.join("\n")
}

/// Format the current scoring settings grouped like the settings form
pub fn format_scoring(config: &ScoringConfig, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let mut current_group: Option<FieldGroup> = None;

    for field in ScoringField::ALL {
        if current_group != Some(field.group()) {
            current_group = Some(field.group());
            if !lines.is_empty() {
                lines.push(String::new());
            }
            let title = field.group().title();
            lines.push(if use_colors {
                title.bold().to_string()
            } else {
                title.to_string()
            });
        }

        let value = format_stat(config.get(field));
        let value = if use_colors {
            value.cyan().to_string()
        } else {
            value
        };
        lines.push(format!(
            "  {:<22} {} {}  ({})",
            field.label(),
            value,
            field.suffix(),
            field.key()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_breakdown;
    use crate::stats::{PlayerSeason, Position};

    fn sample_row(rank: usize, player: &str, points: f64) -> ScoredPlayerSeason {
        ScoredPlayerSeason {
            season: PlayerSeason {
                team: "KAN".to_string(),
                games: 17.0,
                pass_yds: 5250.0,
                pass_td: 41.0,
                ..PlayerSeason::empty(player, Position::QB, 2018)
            },
            fantasy_points: points,
            rank,
        }
    }

    #[test]
    fn test_format_table_empty() {
        assert_eq!(format_table(&[], PositionFilter::All, false), EMPTY_MESSAGE);
    }

    #[test]
    fn test_render_table_has_header_and_rows() {
        let rows = vec![sample_row(1, "Patrick Mahomes", 417.0), sample_row(2, "Backup", -1.5)];
        let columns = columns_for_position(PositionFilter::Only(Position::QB));
        let result = render_table(&rows, &columns, false);
        let lines: Vec<_> = result.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Fantasy Pts"));
        assert!(lines[0].contains("Pass Yds"));
        assert!(lines[1].contains("Patrick Mahomes"));
        assert!(lines[1].contains("417.0"));
        assert!(lines[1].contains("5250"));
        assert!(lines[2].contains("-1.5"));
    }

    #[test]
    fn test_fit_columns_keeps_base_prefix() {
        let columns = columns_for_position(PositionFilter::All);
        let fitted = fit_columns(columns.clone(), Some(20));
        assert_eq!(fitted.len(), 6);
        assert_eq!(fit_columns(columns.clone(), None).len(), columns.len());
        assert_eq!(fit_columns(columns.clone(), Some(1000)).len(), columns.len());
    }

    #[test]
    fn test_truncate_long_player_name() {
        assert_eq!(truncate_text("Short", 10), "Short");
        assert_eq!(truncate_text("A Very Long Player Name Here", 10), "A Very ...");
    }

    #[test]
    fn test_format_tsv() {
        let rows = vec![sample_row(1, "Patrick Mahomes", 417.0)];
        let result = format_tsv(&rows, PositionFilter::All);
        let lines: Vec<_> = result.lines().collect();
        assert!(lines[0].starts_with("rank\tyear\tplayer\tteam\tfantasyPoints\tgames"));
        assert!(lines[1].starts_with("1\t2018\tPatrick Mahomes\tKAN\t417.0\t17"));
        assert_eq!(lines[0].split('\t').count(), lines[1].split('\t').count());
    }

    #[test]
    fn test_format_json() {
        let rows = vec![sample_row(1, "Patrick Mahomes", 417.0)];
        let value: serde_json::Value = serde_json::from_str(&format_json(&rows).unwrap()).unwrap();
        assert_eq!(value[0]["player"], "Patrick Mahomes");
        assert_eq!(value[0]["fantasyPoints"], 417.0);
        assert_eq!(value[0]["passTD"], 41.0);
    }

    #[test]
    fn test_format_breakdown() {
        let row = sample_row(1, "Patrick Mahomes", 374.0);
        let breakdown = score_breakdown(&row.season, &ScoringConfig::default());
        let result = format_breakdown(&row, &breakdown, false);
        assert!(result.contains("#1 Patrick Mahomes (2018, KAN QB)"));
        assert!(result.contains("Pass Yds"));
        assert!(result.contains("Pass TD"));
        assert!(result.contains("Total"));
        assert!(result.contains("374.0"));
    }

    #[test]
    fn test_format_scoring_groups() {
        let result = format_scoring(&ScoringConfig::default(), false);
        for title in ["Passing", "Rushing", "Receiving", "Fumbles"] {
            assert!(result.contains(title));
        }
        assert!(result.contains("Yards per Point"));
        assert!(result.contains("25 yds = 1 pt"));
        assert!(result.contains("(reception)"));
    }
}
