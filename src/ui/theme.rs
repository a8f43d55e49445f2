use ratatui::style::{Color, Style};

use crate::board::Priority;

/// Color theme for Kanri.
///
/// All text and UI chrome uses the terminal's default foreground color (Color::Reset).
/// Only functional signals (priority, overdue, assignees) and labels get color.
pub struct Theme;

impl Theme {
    // Base — everything defaults to the terminal's own foreground
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Column
    pub const COLUMN_HEADER: Color = Color::Reset;
    pub const COLUMN_BORDER: Color = Color::Reset;
    pub const COLUMN_FOCUSED_BORDER: Color = Color::Reset;

    // Task card
    pub const CARD_BORDER: Color = Color::Reset;
    pub const CARD_TITLE: Color = Color::Reset;

    // Functional colors (the only colored elements besides labels)
    pub const PRIORITY_LOW: Color = Color::Green;
    pub const PRIORITY_MEDIUM: Color = Color::Yellow;
    pub const PRIORITY_HIGH: Color = Color::Red;
    pub const OVERDUE: Color = Color::Red;
    pub const ASSIGNEE: Color = Color::Cyan;

    // Status bar
    pub const STATUS_ERROR: Color = Color::Red;

    // Hint popup
    pub const HINT_KEY: Color = Color::Reset;
    pub const HINT_DESC: Color = Color::Reset;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }

    /// Color for a priority level.
    pub fn priority_color(priority: Priority) -> Color {
        match priority {
            Priority::Low => Self::PRIORITY_LOW,
            Priority::Medium => Self::PRIORITY_MEDIUM,
            Priority::High => Self::PRIORITY_HIGH,
        }
    }

    /// Assign a consistent color to a label based on its text.
    pub fn label_color(label: &str) -> Color {
        let hash = label
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        const PALETTE: [Color; 12] = [
            Color::Cyan,
            Color::Green,
            Color::Magenta,
            Color::Blue,
            Color::Yellow,
            Color::Red,
            Color::LightCyan,
            Color::LightGreen,
            Color::LightMagenta,
            Color::LightBlue,
            Color::LightYellow,
            Color::LightRed,
        ];
        PALETTE[(hash % PALETTE.len() as u32) as usize]
    }
}
