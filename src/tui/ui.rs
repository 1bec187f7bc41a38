use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use crate::columns::{format_points, format_stat, Alignment as ColumnAlignment, ColumnKey};
use crate::filter::{PositionFilter, FIRST_SEASON};
use crate::output::formatter::{fit_columns, COLUMN_GAP};
use crate::output::EMPTY_MESSAGE;
use crate::scoring::ScoringField;
use crate::tui::app::{App, InputMode, LoadState};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Position tabs(1) + Year filter(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Length(1),  // Position tabs
        Constraint::Length(1),  // Year filter
        Constraint::Fill(1),    // Stats table
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_position_tabs(frame, chunks[1], app);
    render_year_filter(frame, chunks[2], app);
    let failure = match &app.load_state {
        LoadState::Failed(message) => Some(message.clone()),
        _ => None,
    };
    match failure {
        Some(message) => render_error_panel(frame, chunks[3], app, &message),
        None => render_table(frame, chunks[3], app),
    }
    render_status_bar(frame, chunks[4], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::ScoringModal => render_scoring_modal(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }

    // Loading overlay appears on top of everything
    if app.is_loading() {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = "Fantasy MVP";
    let subtitle = format!(
        "NFL Statistics {}-{}",
        FIRST_SEASON,
        app.dataset.reference_year()
    );
    let padding_len = (area.width as usize).saturating_sub(title.len() + subtitle.len());

    let line = Line::from(vec![
        Span::styled(title, Style::default().fg(app.colors.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(subtitle, Style::default().fg(app.colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_position_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = PositionFilter::CYCLE.iter().map(|p| p.to_string()).collect();
    let selected = PositionFilter::CYCLE
        .iter()
        .position(|p| *p == app.position_filter)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.colors.filter_inactive_style)
        .highlight_style(app.colors.filter_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_year_filter(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(" Year: ", Style::default().fg(app.colors.muted)),
        Span::styled(app.year_filter.label(), app.colors.filter_active_style),
        Span::styled(
            "   y/Y: cycle  [ ]: step year",
            Style::default().fg(app.colors.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.is_loading() {
        return;
    }

    if app.rows.is_empty() {
        let empty_msg = Paragraph::new(EMPTY_MESSAGE)
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    // Same fitting as the CLI table: base columns stay, stats drop from the right
    let columns = fit_columns(app.columns(), Some(area.width as usize));
    let colors = &app.colors;

    let max_points = app
        .rows
        .iter()
        .map(|r| r.fantasy_points)
        .fold(0.0_f64, f64::max);

    let rows: Vec<Row> = app
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let cells = columns.iter().map(|column| {
                let line = Line::from(column.value(row));
                let line = match column.align {
                    ColumnAlignment::Left => line,
                    ColumnAlignment::Right => line.alignment(Alignment::Right),
                };
                let style = match column.key {
                    ColumnKey::Rank => Style::default().fg(colors.rank_color),
                    ColumnKey::FantasyPoints => Style::default()
                        .fg(colors.points_color(row.fantasy_points, max_points))
                        .bold(),
                    ColumnKey::Player => Style::default().bold(),
                    _ => Style::default(),
                };
                Cell::from(line).style(style)
            });

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };
            Row::new(cells).style(row_style)
        })
        .collect();

    let header_cells = columns.iter().map(|column| {
        let (text, style) = if column.key == app.sort_key && column.key != ColumnKey::Rank {
            let arrow = if app.sort_descending { "▼" } else { "▲" };
            (format!("{}{}", column.header, arrow), colors.sorted_header_style)
        } else {
            (column.header.to_string(), colors.header_style)
        };
        let line = match column.align {
            ColumnAlignment::Left => Line::from(text),
            ColumnAlignment::Right => Line::from(text).alignment(Alignment::Right),
        };
        Cell::from(line).style(style)
    });

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|c| Constraint::Length(c.width))
        .collect();

    let table = Table::new(rows, widths)
        .column_spacing(COLUMN_GAP)
        .header(Row::new(header_cells).bottom_margin(1))
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_error_panel(frame: &mut Frame, area: Rect, app: &App, message: &str) {
    let block = Block::bordered()
        .title(" Error loading data ")
        .border_style(Style::default().fg(app.colors.flash_error));

    let text = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(app.colors.error_text))),
        Line::from(""),
        Line::from(Span::styled(
            format!("Data source: {}", app.data_label),
            Style::default().fg(app.colors.muted),
        )),
    ];

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            app.colors.flash_error
        } else {
            app.colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = match app.load_state {
            LoadState::Ready => format!("Showing {} results", app.rows.len()),
            LoadState::Loading => "Loading data...".to_string(),
            LoadState::Failed(_) => "No data".to_string(),
        };

        let mut spans = vec![
            Span::styled(count, Style::default().fg(app.colors.muted)),
            Span::raw("  "),
        ];

        // Build hints with colored shortcut keys
        let hints = [
            ("j/k", ":nav "),
            ("Tab", ":position "),
            ("s", ":scoring "),
            ("</>", ":sort "),
            ("b", ":breakdown "),
            ("?", ":help "),
            ("q", ":quit"),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(app.colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.colors.status_bar_bg)),
        area
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn popup_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::bordered()
        .title(title)
        .title_style(app.colors.popup_title)
        .border_style(Style::default().fg(app.colors.popup_border))
        .style(Style::default().bg(app.colors.popup_bg))
}

/// Render the scoring settings form, grouped Passing / Rushing / Receiving / Fumbles
fn render_scoring_modal(frame: &mut Frame, app: &App) {
    let form = &app.form;
    let mut lines = Vec::new();
    let mut current_group = None;

    for (idx, field) in ScoringField::ALL.iter().enumerate() {
        if current_group != Some(field.group()) {
            current_group = Some(field.group());
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                field.group().title(),
                app.colors.header_style,
            )));
        }

        let selected = idx == form.selected;
        let value = format!(" {:>6} ", form.display_value(*field));
        let value_style = if selected {
            app.colors.input_active
        } else {
            Style::default().bold()
        };
        let marker = if selected { "> " } else { "  " };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(app.colors.status_key_color)),
            Span::raw(format!("{:<22}", field.label())),
            Span::styled(value, value_style),
            Span::styled(format!(" {}", field.suffix()), Style::default().fg(app.colors.muted)),
        ]));
    }

    lines.push(Line::from(""));
    for error in &form.errors {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(app.colors.error_text),
        )));
    }
    lines.push(Line::from(Span::styled(
        "j/k: field  Left/Right: adjust  type: edit",
        Style::default().fg(app.colors.muted),
    )));
    lines.push(Line::from(Span::styled(
        "Enter: save  r: reset to default  Esc: cancel",
        Style::default().fg(app.colors.muted),
    )));

    let height = lines.len() as u16 + 2;
    let popup_area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(app, " Scoring Settings ");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

/// Render the per-term points for the selected row
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some((row, breakdown)) = app.selected_breakdown() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} ({} {})", row.season.player, row.season.year, row.season.team),
            Style::default().bold(),
        )),
        Line::from(""),
    ];

    if breakdown.terms.is_empty() {
        lines.push(Line::from(Span::styled(
            "No scoring stats",
            Style::default().fg(app.colors.muted),
        )));
    }
    for term in &breakdown.terms {
        let points_color = if term.points < 0.0 {
            app.colors.points_negative
        } else {
            app.colors.points_high
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:<10}", term.label)),
            Span::styled(
                format!("{:>8}", format_stat(term.stat)),
                Style::default().fg(app.colors.muted),
            ),
            Span::styled(format!("{:>+10.2}", term.points), Style::default().fg(points_color)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<18}", "Total"), Style::default().bold()),
        Span::styled(format!("{:>10}", format_points(breakdown.points)), Style::default().bold()),
    ]));
    lines.push(Line::from(Span::styled(
        "Esc/b: close  j/k: next row",
        Style::default().fg(app.colors.muted),
    )));

    let height = lines.len() as u16 + 2;
    let popup_area = centered_rect_fixed(40, height, frame.area());
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(app, " Score Breakdown ")),
        popup_area,
    );
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("PgDn / PgUp   ", "Page down / up"),
        ("g / G         ", "First / last row"),
        ("Tab / S-Tab   ", "Next / previous position"),
        ("y / Y         ", "Next / previous year filter"),
        ("[ / ]         ", "Previous / next single season"),
        ("< / >         ", "Sort by previous / next column"),
        ("o             ", "Reverse sort order"),
        ("s             ", "Scoring settings"),
        ("b             ", "Score breakdown"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.colors.muted),
    )));

    let popup_area = centered_rect_fixed(50, help_lines.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(help_lines).block(popup_block(app, " Keyboard Shortcuts ")),
        popup_area,
    );
}

/// Render the loading spinner overlay
fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let loading_text = Paragraph::new(format!("{} Loading data...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.colors.title_color));

    frame.render_widget(loading_text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UserState;
    use crate::stats::{Dataset, PlayerSeason, Position};
    use crate::tui::theme::ThemeColors;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new_loading(
            UserState::default(),
            dir.path().join("state.json"),
            500,
            ThemeColors::dark(),
            "fantasy_data.json".to_string(),
        );
        (app, dir)
    }

    fn render(app: &mut App) -> String {
        render_at(app, 140)
    }

    fn render_at(app: &mut App, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_loading_state() {
        let (mut app, _dir) = app();
        assert!(render(&mut app).contains("Loading data..."));
    }

    #[test]
    fn test_error_state() {
        let (mut app, _dir) = app();
        app.finish_loading(Err(anyhow::anyhow!("connection refused")));
        let screen = render(&mut app);
        assert!(screen.contains("Error loading data"));
        assert!(screen.contains("connection refused"));
    }

    #[test]
    fn test_table_and_empty_state() {
        let (mut app, _dir) = app();
        app.finish_loading(Ok(Dataset::new(vec![PlayerSeason {
            rush_yds: 1000.0,
            ..PlayerSeason::empty("Runner", Position::RB, 2024)
        }])));
        let screen = render(&mut app);
        assert!(screen.contains("Fantasy Pts"));
        assert!(screen.contains("Runner"));
        assert!(screen.contains("100.0"));
        assert!(screen.contains("Showing 1 results"));

        app.set_position_filter(PositionFilter::Only(Position::TE));
        assert!(render(&mut app).contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_narrow_terminal_keeps_base_columns_whole() {
        let (mut app, _dir) = app();
        app.finish_loading(Ok(Dataset::new(vec![PlayerSeason {
            pass_yds: 4000.0,
            ..PlayerSeason::empty("Christian McCaffrey", Position::RB, 2023)
        }])));
        let screen = render_at(&mut app, 100);
        assert!(screen.contains("Christian McCaffrey"));
        assert!(screen.contains("Fantasy Pts"));
        assert!(screen.contains("160.0"));
        // Receiving columns for an All view don't fit at this width
        assert!(!screen.contains("Rec TD"));
    }

    #[test]
    fn test_scoring_modal_renders_groups() {
        let (mut app, _dir) = app();
        app.finish_loading(Ok(Dataset::new(vec![])));
        app.open_scoring_modal();
        let screen = render(&mut app);
        let titles = [
            "Scoring Settings",
            "Passing",
            "Rushing",
            "Receiving",
            "Fumbles",
            "Points per Reception",
        ];
        for title in titles {
            assert!(screen.contains(title), "missing {}", title);
        }
    }
}
