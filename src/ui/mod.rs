pub mod board_view;
pub mod help;
pub mod input_modal;
pub mod status_bar;
pub mod task_detail;
pub mod theme;

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, Mode, PickerTarget};
use crate::board::Board;

/// Create a centered rect within `area` using percentage-based sizing with minimums.
pub fn centered_rect(area: Rect, w_pct: u16, h_pct: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (area.width * w_pct / 100).max(min_w).min(area.width);
    let height = (area.height * h_pct / 100).max(min_h).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(
    f: &mut Frame,
    board: &Board,
    state: &AppState,
    filter: Option<&str>,
    today: NaiveDate,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    // Main board area
    board_view::render_board(f, chunks[0], board, state, today);

    // Status bar
    status_bar::render_status_bar(f, chunks[1], state, board, filter);

    // Overlays
    match &state.mode {
        Mode::Goto | Mode::Space => {
            input_modal::render_hint_popup(f, chunks[0], &state.mode);
        }
        Mode::Picker { title, items, checked, selected, target } => {
            let multi = matches!(target, PickerTarget::AssigneeSelect { .. });
            input_modal::render_picker(f, chunks[0], title, items, checked, *selected, multi);
        }
        Mode::TaskDetail { tab, scroll } => {
            if let Some(task) = state.selected_task_ref(board) {
                task_detail::render_task_detail(f, f.area(), task, state, *tab, *scroll, today);
            }
        }
        Mode::Help => {
            help::render_help(f, f.area());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(area, 50, 50, 10, 5);
        assert_eq!(r.width, 50);
        assert_eq!(r.height, 20);
        assert_eq!(r.x, 25);
        assert_eq!(r.y, 10);
    }

    #[test]
    fn centered_rect_respects_minimums() {
        let area = Rect::new(0, 0, 30, 10);
        let r = centered_rect(area, 10, 10, 20, 8);
        assert_eq!(r.width, 20);
        assert_eq!(r.height, 8);
    }

    #[test]
    fn centered_rect_never_exceeds_area() {
        let area = Rect::new(0, 0, 10, 4);
        let r = centered_rect(area, 90, 90, 40, 20);
        assert!(r.width <= area.width);
        assert!(r.height <= area.height);
    }
}
