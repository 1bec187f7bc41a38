pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crate::stats::{load_dataset, CacheConfig, DataSource};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(
    mut app: App,
    source: DataSource,
    cache_config: CacheConfig,
) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(100);

    // Load the dataset in the background so the spinner keeps turning
    let mut pending_load: Option<tokio::task::JoinHandle<_>> = Some(tokio::spawn(async move {
        load_dataset(&source, &cache_config).await
    }));

    // Main loop
    let result = loop {
        // Draw UI
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        // Handle events
        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        // Check if background load has completed
        if let Some(handle) = pending_load.take_if(|handle| handle.is_finished()) {
            match handle.await {
                Ok(loaded) => app.finish_loading(loaded),
                Err(e) => app.finish_loading(Err(anyhow::anyhow!("Load task failed: {}", e))),
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl-c always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Char('g') | KeyCode::Home => app.select_first(),
                KeyCode::Char('G') | KeyCode::End => app.select_last(),

                // Filters
                KeyCode::Tab => app.next_position(),
                KeyCode::BackTab => app.previous_position(),
                KeyCode::Char('y') => app.cycle_year_filter(true),
                KeyCode::Char('Y') => app.cycle_year_filter(false),
                KeyCode::Char('[') => app.step_year(-1),
                KeyCode::Char(']') => app.step_year(1),

                // View sort
                KeyCode::Char('>') => app.cycle_sort_column(true),
                KeyCode::Char('<') => app.cycle_sort_column(false),
                KeyCode::Char('o') => app.toggle_sort_direction(),

                // Scoring settings
                KeyCode::Char('s') => app.open_scoring_modal(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                // Score breakdown
                KeyCode::Char('b') | KeyCode::Enter => app.show_score_breakdown(),

                _ => {}
            }
        }
        app::InputMode::ScoringModal => match key.code {
            KeyCode::Enter => app.save_scoring_form(),
            KeyCode::Esc => app.cancel_scoring_modal(),
            KeyCode::Char('r') => app.reset_scoring(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.form_next_field(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.form_previous_field(),
            KeyCode::Char('+') | KeyCode::Right => app.form_nudge(1.0),
            KeyCode::Left => app.form_nudge(-1.0),
            KeyCode::Backspace => app.form_backspace(),
            KeyCode::Char(c) => app.form_input_char(c),

            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => app.dismiss_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UserState;
    use crate::stats::{Dataset, PlayerSeason, Position};
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new_loading(
            UserState::default(),
            dir.path().join("state.json"),
            500,
            ThemeColors::dark(),
            "test".to_string(),
        );
        app.finish_loading(Ok(Dataset::new(vec![
            PlayerSeason {
                rush_yds: 900.0,
                ..PlayerSeason::empty("A", Position::RB, 2024)
            },
            PlayerSeason {
                rec_yds: 800.0,
                ..PlayerSeason::empty("B", Position::WR, 2024)
            },
        ])));
        (app, dir)
    }

    #[test]
    fn test_tab_cycles_position() {
        let (mut app, _dir) = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.position_filter, crate::filter::PositionFilter::Only(Position::QB));
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.position_filter, crate::filter::PositionFilter::All);
    }

    #[test]
    fn test_modal_keys_do_not_leak() {
        let (mut app, _dir) = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.input_mode, app::InputMode::ScoringModal);

        // 'q' is text input inside the modal, not quit
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, app::InputMode::Normal);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_modal_nudge_minus_key() {
        let (mut app, _dir) = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        handle_key_event(&mut app, key(KeyCode::Left));
        assert_eq!(app.form.draft.passing_yards_per_point, 24.0);
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.scoring.get().passing_yards_per_point, 24.0);
    }

    #[test]
    fn test_ctrl_c_quits_from_modal() {
        let (mut app, _dir) = loaded_app();
        app.open_scoring_modal();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
