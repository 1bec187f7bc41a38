use crate::columns::{columns_for_position, sort_rows, Column, ColumnKey};
use crate::filter::{year_filter_options, PositionFilter, YearFilter, FIRST_SEASON};
use crate::pipeline::{derive, DeriveRequest, PipelineError};
use crate::scoring::{
    score_breakdown, PartialScoringConfig, ScoreBreakdown, ScoringConfig, ScoringField,
    ScoringSettings,
};
use crate::state::{save_user_state, UserState};
use crate::stats::{Dataset, ScoredPlayerSeason};
use crate::tui::theme::ThemeColors;
use std::path::PathBuf;
use std::time::Instant;

const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    ScoringModal,
    Help,
    ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Scoring settings being edited in the modal. Nothing is applied until
/// the form is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringForm {
    pub selected: usize,
    pub draft: ScoringConfig,
    /// Text typed into the selected field, not yet parsed
    pub buffer: Option<String>,
    pub errors: Vec<String>,
}

impl ScoringForm {
    fn new(config: ScoringConfig) -> Self {
        Self {
            selected: 0,
            draft: config,
            buffer: None,
            errors: Vec::new(),
        }
    }

    pub fn selected_field(&self) -> ScoringField {
        ScoringField::ALL[self.selected % ScoringField::ALL.len()]
    }

    /// Display text for a field: the edit buffer when it is being typed into.
    /// Draft values are shown at full precision so editing starts from the
    /// stored number.
    pub fn display_value(&self, field: ScoringField) -> String {
        match &self.buffer {
            Some(text) if field == self.selected_field() => text.clone(),
            _ => self.draft.get(field).to_string(),
        }
    }

    /// Parse the edit buffer into the draft. Returns false if it is not a number.
    fn commit_buffer(&mut self) -> bool {
        let Some(text) = self.buffer.take() else {
            return true;
        };
        let field = self.selected_field();
        match text.trim().parse::<f64>() {
            Ok(value) => {
                self.draft.set(field, value);
                true
            }
            Err(_) => {
                self.errors = vec![format!("{}: '{}' is not a number", field.key(), text)];
                false
            }
        }
    }
}

pub struct App {
    pub dataset: Dataset,
    pub load_state: LoadState,
    pub rows: Vec<ScoredPlayerSeason>,
    pub table_state: ratatui::widgets::TableState,
    pub scoring: ScoringSettings,
    pub position_filter: PositionFilter,
    pub year_filter: YearFilter,
    pub year_options: Vec<YearFilter>,
    pub sort_key: ColumnKey,
    pub sort_descending: bool,
    pub max_results: usize,
    pub input_mode: InputMode,
    pub form: ScoringForm,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub state_path: PathBuf,
    pub persist: bool,
    pub colors: ThemeColors,
    pub data_label: String,
}

impl App {
    /// Create an App in loading state from the persisted user state
    pub fn new_loading(
        state: UserState,
        state_path: PathBuf,
        max_results: usize,
        colors: ThemeColors,
        data_label: String,
    ) -> Self {
        // Persisted scoring is validated on load; fall back regardless
        let scoring = ScoringSettings::from_config(state.scoring_config).unwrap_or_default();
        let dataset = Dataset::default();
        let year_options = year_filter_options(dataset.reference_year());

        Self {
            form: ScoringForm::new(*scoring.get()),
            dataset,
            load_state: LoadState::Loading,
            rows: Vec::new(),
            table_state: ratatui::widgets::TableState::default(),
            scoring,
            position_filter: state.position_filter,
            year_filter: state.year_filter,
            year_options,
            sort_key: ColumnKey::Rank,
            sort_descending: false,
            max_results,
            input_mode: InputMode::Normal,
            flash_message: None,
            should_quit: false,
            spinner_frame: 0,
            state_path,
            persist: true,
            colors,
            data_label,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Install the loaded dataset (or the load error) and derive the view
    pub fn finish_loading(&mut self, result: anyhow::Result<Dataset>) {
        match result {
            Ok(dataset) => {
                self.year_options = year_filter_options(dataset.reference_year());
                self.dataset = dataset;
                self.load_state = LoadState::Ready;
                self.recompute();
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                self.load_state = LoadState::Failed(format!("{:#}", e));
                self.rows.clear();
                self.table_state.select(None);
            }
        }
    }

    pub fn user_state(&self) -> UserState {
        UserState {
            scoring_config: *self.scoring.get(),
            position_filter: self.position_filter,
            year_filter: self.year_filter,
        }
    }

    /// Re-run the pipeline for the current filters and scoring. A pipeline
    /// fault empties the view and is shown as a flash message.
    pub fn recompute(&mut self) {
        if let Err(e) = self.try_recompute() {
            self.show_flash(format!("Error: {}", e));
        }
    }

    fn try_recompute(&mut self) -> Result<(), PipelineError> {
        if self.load_state != LoadState::Ready {
            return Ok(());
        }

        let request = DeriveRequest::new(self.position_filter, self.year_filter, self.scoring.get())
            .with_max_results(self.max_results);
        let result = derive(&self.dataset, &request);
        let fault = result.as_ref().err().cloned();
        self.rows = result.unwrap_or_default();
        self.apply_sort();

        if self.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }

        match fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn apply_sort(&mut self) {
        // Rank ascending is the derived order already
        if self.sort_key != ColumnKey::Rank || self.sort_descending {
            sort_rows(&mut self.rows, self.sort_key, self.sort_descending);
        }
    }

    fn save_state(&mut self) {
        if !self.persist {
            return;
        }
        if let Err(e) = save_user_state(&self.state_path, &self.user_state()) {
            self.show_flash(format!("Failed to save settings: {}", e));
        }
    }

    /// Columns for the current position filter
    pub fn columns(&self) -> Vec<Column> {
        columns_for_position(self.position_filter)
    }

    // Filters

    pub fn set_position_filter(&mut self, filter: PositionFilter) {
        if self.position_filter == filter {
            return;
        }
        self.position_filter = filter;
        self.recompute();
        self.save_state();
    }

    pub fn next_position(&mut self) {
        self.set_position_filter(self.position_filter.next());
    }

    pub fn previous_position(&mut self) {
        self.set_position_filter(self.position_filter.previous());
    }

    pub fn set_year_filter(&mut self, filter: YearFilter) {
        if self.year_filter == filter {
            return;
        }
        self.year_filter = filter;
        self.recompute();
        self.save_state();
    }

    /// Move through the selectable year filters (Last35, decades, All, years)
    pub fn cycle_year_filter(&mut self, forward: bool) {
        if self.year_options.is_empty() {
            return;
        }
        let len = self.year_options.len();
        let next = match self.year_options.iter().position(|y| *y == self.year_filter) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.set_year_filter(self.year_options[next]);
    }

    /// Step a single season back or forward; jumps to the newest season
    /// from a non-year filter
    pub fn step_year(&mut self, delta: i32) {
        let latest = self.dataset.reference_year();
        let target = match self.year_filter {
            YearFilter::Year(year) => {
                let stepped = i32::from(year) + delta;
                stepped.clamp(i32::from(FIRST_SEASON), i32::from(latest)) as u16
            }
            _ => latest,
        };
        self.set_year_filter(YearFilter::Year(target));
    }

    // Sorting (view only)

    pub fn cycle_sort_column(&mut self, forward: bool) {
        let keys: Vec<ColumnKey> = self.columns().iter().map(|c| c.key).collect();
        let len = keys.len();
        let current = keys.iter().position(|k| *k == self.sort_key).unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.sort_key = keys[next];
        self.sort_descending = self.sort_key.default_descending();
        self.recompute();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_descending = !self.sort_descending;
        self.recompute();
    }

    // Navigation

    pub fn next_row(&mut self) {
        self.move_selection(1);
    }

    pub fn previous_row(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self) {
        self.move_selection(PAGE_SIZE as isize);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-(PAGE_SIZE as isize));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.table_state.select(Some(self.rows.len() - 1));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let i = match self.table_state.selected() {
            // Single steps wrap, pages clamp
            Some(i) if delta == 1 && i >= last => 0,
            Some(0) if delta == -1 => last,
            Some(i) => (i as isize + delta).clamp(0, last as isize) as usize,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_row(&self) -> Option<&ScoredPlayerSeason> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn selected_breakdown(&self) -> Option<(&ScoredPlayerSeason, ScoreBreakdown)> {
        self.selected_row()
            .map(|row| (row, score_breakdown(&row.season, self.scoring.get())))
    }

    // Scoring modal

    pub fn open_scoring_modal(&mut self) {
        self.form = ScoringForm::new(*self.scoring.get());
        self.input_mode = InputMode::ScoringModal;
    }

    pub fn cancel_scoring_modal(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn form_next_field(&mut self) {
        if self.form.commit_buffer() {
            self.form.selected = (self.form.selected + 1) % ScoringField::ALL.len();
        }
    }

    pub fn form_previous_field(&mut self) {
        if self.form.commit_buffer() {
            let len = ScoringField::ALL.len();
            self.form.selected = (self.form.selected + len - 1) % len;
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.form.errors.clear();
            self.form.buffer.get_or_insert_with(String::new).push(c);
        }
    }

    pub fn form_backspace(&mut self) {
        let current = self.form.display_value(self.form.selected_field());
        let buffer = self.form.buffer.get_or_insert(current);
        buffer.pop();
    }

    /// Nudge the selected field by its step
    pub fn form_nudge(&mut self, direction: f64) {
        if !self.form.commit_buffer() {
            return;
        }
        let field = self.form.selected_field();
        // Round away float noise from repeated 0.1 steps
        let value = round_to_hundredth(self.form.draft.get(field) + field.step() * direction);
        self.form.draft.set(field, value);
        self.form.errors.clear();
    }

    /// Apply the form through `ScoringSettings::set`; stays open on rejection.
    /// A config that can't score the dataset is rolled back before anything
    /// is persisted.
    pub fn save_scoring_form(&mut self) {
        if !self.form.commit_buffer() {
            return;
        }
        let previous = *self.scoring.get();
        let partial = PartialScoringConfig::from(self.form.draft);
        if let Err(errors) = self.scoring.set(&partial).map(|_| ()) {
            self.form.errors = errors.iter().map(|e| e.to_string()).collect();
            return;
        }

        if let Err(fault) = self.try_recompute() {
            if self.scoring.replace(previous).is_err() {
                self.scoring.reset();
            }
            self.recompute();
            self.form.errors = vec![fault.to_string()];
            return;
        }

        self.input_mode = InputMode::Normal;
        self.save_state();
        self.show_flash("Scoring updated".to_string());
    }

    /// Restore default scoring immediately and close the modal
    pub fn reset_scoring(&mut self) {
        self.scoring.reset();
        self.input_mode = InputMode::Normal;
        self.recompute();
        self.save_state();
        self.show_flash("Scoring reset to defaults".to_string());
    }

    // Overlays

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_score_breakdown(&mut self) {
        if self.selected_row().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

fn round_to_hundredth(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::load_user_state;
    use crate::stats::{PlayerSeason, Position};

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            PlayerSeason {
                rush_yds: 1500.0,
                ..PlayerSeason::empty("Runner", Position::RB, 2020)
            },
            PlayerSeason {
                rec: 110.0,
                rec_yds: 1200.0,
                ..PlayerSeason::empty("Catcher", Position::WR, 2021)
            },
            PlayerSeason {
                pass_yds: 4500.0,
                ..PlayerSeason::empty("Passer", Position::QB, 1985)
            },
            PlayerSeason {
                rush_yds: 200.0,
                ..PlayerSeason::empty("Backup", Position::RB, 2024)
            },
        ])
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
        app.finish_loading(Ok(sample_dataset()));
        (app, dir)
    }

    fn names(app: &App) -> Vec<&str> {
        app.rows.iter().map(|r| r.season.player.as_str()).collect()
    }

    #[test]
    fn test_loading_then_ready() {
        let (app, _dir) = loaded_app();
        assert_eq!(app.load_state, LoadState::Ready);
        // Last35 from 2024 drops the 1985 season
        assert_eq!(names(&app), vec!["Runner", "Catcher", "Backup"]);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_load_failure_shows_error_and_empty_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new_loading(
            UserState::default(),
            dir.path().join("state.json"),
            500,
            ThemeColors::dark(),
            "test".to_string(),
        );
        assert!(app.is_loading());
        app.finish_loading(Err(anyhow::anyhow!("404 Not Found")));
        assert!(matches!(app.load_state, LoadState::Failed(ref msg) if msg.contains("404")));
        assert!(app.rows.is_empty());
        // Filter changes don't panic without data
        app.next_position();
        assert!(app.rows.is_empty());
    }

    #[test]
    fn test_position_change_recomputes_and_persists() {
        let (mut app, _dir) = loaded_app();
        app.set_position_filter(PositionFilter::Only(Position::RB));
        assert_eq!(names(&app), vec!["Runner", "Backup"]);

        let saved = load_user_state(&app.state_path);
        assert_eq!(saved.position_filter, PositionFilter::Only(Position::RB));
    }

    #[test]
    fn test_year_cycle_and_step() {
        let (mut app, _dir) = loaded_app();
        app.cycle_year_filter(true);
        assert_eq!(app.year_filter, YearFilter::Decade(2020));
        app.cycle_year_filter(false);
        assert_eq!(app.year_filter, YearFilter::Last(35));

        app.step_year(-1);
        assert_eq!(app.year_filter, YearFilter::Year(2024));
        app.step_year(-4);
        assert_eq!(app.year_filter, YearFilter::Year(2020));
        assert_eq!(names(&app), vec!["Runner"]);
        app.step_year(100);
        assert_eq!(app.year_filter, YearFilter::Year(2024));
    }

    #[test]
    fn test_scoring_form_save() {
        let (mut app, _dir) = loaded_app();
        app.open_scoring_modal();
        // Move to reception
        for _ in 0..8 {
            app.form_next_field();
        }
        assert_eq!(app.form.selected_field(), ScoringField::Reception);
        app.form_nudge(1.0);
        app.form_nudge(1.0);
        assert_eq!(app.form.draft.reception, 1.0);

        app.save_scoring_form();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.scoring.get().reception, 1.0);
        // PPR puts the receiver on top
        assert_eq!(names(&app)[0], "Catcher");
        assert_eq!(load_user_state(&app.state_path).scoring_config.reception, 1.0);
    }

    #[test]
    fn test_scoring_form_rejects_zero_divisor() {
        let (mut app, _dir) = loaded_app();
        let before = *app.scoring.get();
        app.open_scoring_modal();
        app.form_backspace();
        app.form_backspace();
        app.form_input_char('0');
        app.save_scoring_form();

        assert_eq!(app.input_mode, InputMode::ScoringModal);
        assert_eq!(app.form.errors.len(), 1);
        assert!(app.form.errors[0].contains("passingYardsPerPoint"));
        assert_eq!(*app.scoring.get(), before);

        app.cancel_scoring_modal();
        assert_eq!(*app.scoring.get(), before);
    }

    #[test]
    fn test_overflowing_scoring_is_rolled_back() {
        let (mut app, _dir) = loaded_app();
        let before = *app.scoring.get();
        app.open_scoring_modal();
        app.form.draft.reception = 1e308;
        app.save_scoring_form();

        // Catcher's 110 receptions overflow to infinity
        assert_eq!(app.input_mode, InputMode::ScoringModal);
        assert_eq!(app.form.errors.len(), 1);
        assert!(app.form.errors[0].contains("Catcher"));
        assert_eq!(*app.scoring.get(), before);
        assert_eq!(names(&app), vec!["Runner", "Catcher", "Backup"]);
        assert!(app.flash_message.is_none());
        assert!(!app.state_path.exists());
    }

    #[test]
    fn test_typed_value_and_bad_input() {
        let (mut app, _dir) = loaded_app();
        app.open_scoring_modal();
        app.form_next_field(); // passingTD
        app.form_input_char('6');
        assert_eq!(app.form.display_value(ScoringField::PassingTd), "6");
        app.form_next_field();
        assert_eq!(app.form.draft.passing_td, 6.0);

        app.form_input_char('-');
        app.form_input_char('.');
        app.form_input_char('-');
        app.save_scoring_form();
        assert_eq!(app.input_mode, InputMode::ScoringModal);
        assert!(app.form.errors[0].contains("not a number"));
    }

    #[test]
    fn test_typed_value_keeps_full_precision() {
        let (mut app, _dir) = loaded_app();
        app.open_scoring_modal();
        for _ in 0..8 {
            app.form_next_field();
        }
        for c in "0.25".chars() {
            app.form_input_char(c);
        }
        app.form_previous_field();
        assert_eq!(app.form.display_value(ScoringField::Reception), "0.25");

        app.form_next_field();
        app.form_backspace();
        assert_eq!(app.form.display_value(ScoringField::Reception), "0.2");
    }

    #[test]
    fn test_reset_scoring() {
        let (mut app, _dir) = loaded_app();
        app.scoring
            .set(&PartialScoringConfig::default().with(ScoringField::Reception, 1.0))
            .unwrap();
        app.open_scoring_modal();
        app.reset_scoring();
        assert!(app.scoring.is_default());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_sort_is_view_only() {
        let (mut app, _dir) = loaded_app();
        app.cycle_sort_column(true); // Year, descending
        assert_eq!(app.sort_key, ColumnKey::Year);
        assert_eq!(names(&app), vec!["Backup", "Catcher", "Runner"]);
        assert_eq!(app.rows[0].rank, 3);

        app.toggle_sort_direction();
        assert_eq!(names(&app), vec!["Runner", "Catcher", "Backup"]);

        app.cycle_sort_column(false); // back to Rank
        assert_eq!(app.rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_selection_wraps_and_pages_clamp() {
        let (mut app, _dir) = loaded_app();
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.page_down();
        assert_eq!(app.table_state.selected(), Some(2));
        app.page_up();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_breakdown_for_selection() {
        let (mut app, _dir) = loaded_app();
        app.show_score_breakdown();
        assert_eq!(app.input_mode, InputMode::ScoreBreakdown);
        let (row, breakdown) = app.selected_breakdown().unwrap();
        assert_eq!(row.season.player, "Runner");
        assert_eq!(breakdown.points, 150.0);
    }
}
