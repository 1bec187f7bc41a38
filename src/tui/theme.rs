//! Centralized theme module for TUI color constants and styles

use crate::config::ThemeChoice;
use ratatui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Resolve the configured theme, probing the terminal background for `auto`
pub fn resolve_theme(choice: ThemeChoice) -> Theme {
    match choice {
        ThemeChoice::Dark => Theme::Dark,
        ThemeChoice::Light => Theme::Light,
        ThemeChoice::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Theme::Light,
            _ => Theme::Dark,
        },
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Points colors (top of view / middle / bottom)
    pub points_high: Color,
    pub points_mid: Color,
    pub points_low: Color,
    pub points_negative: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub rank_color: Color,
    pub header_style: Style,
    pub sorted_header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Filter bar
    pub filter_active_style: Style,
    pub filter_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
    pub input_active: Style,
    pub error_text: Color,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            points_high: Color::Green,
            points_mid: Color::Yellow,
            points_low: Color::Gray,
            points_negative: Color::Red,
            row_alt_bg: Color::Indexed(235),
            rank_color: Color::DarkGray,
            header_style: Style::new().bold(),
            sorted_header_style: Style::new().fg(Color::Cyan).bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            filter_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            filter_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            input_active: Style::new().fg(Color::Black).bg(Color::Cyan),
            error_text: Color::LightRed,
        }
    }

    pub fn light() -> Self {
        Self {
            points_high: Color::Indexed(28),
            points_mid: Color::Indexed(130),
            points_low: Color::Indexed(242),
            points_negative: Color::Indexed(160),
            row_alt_bg: Color::Indexed(254),
            rank_color: Color::Indexed(245),
            header_style: Style::new().bold(),
            sorted_header_style: Style::new().fg(Color::Blue).bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(243),
            title_color: Color::Blue,
            filter_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            filter_inactive_style: Style::new().fg(Color::Indexed(245)),
            status_bar_bg: Color::Indexed(252),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Indexed(160),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            input_active: Style::new().fg(Color::White).bg(Color::Blue),
            error_text: Color::Indexed(160),
        }
    }

    /// Color for a points value relative to the best row in view
    pub fn points_color(&self, points: f64, max_points: f64) -> Color {
        if points < 0.0 {
            return self.points_negative;
        }
        let percentage = if max_points > 0.0 {
            (points / max_points) * 100.0
        } else {
            0.0
        };

        if percentage >= 70.0 {
            self.points_high
        } else if percentage >= 40.0 {
            self.points_mid
        } else {
            self.points_low
        }
    }
}
