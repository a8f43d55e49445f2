use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState,
};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::AppState;
use crate::board::{Board, Column, Task};

/// Truncate `text` to at most `max_width` display columns, appending `…` when
/// anything was cut. Grapheme-safe: never splits a cluster.
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let avail = max_width.saturating_sub(1); // room for '…'
    let truncated: String = text
        .graphemes(true)
        .scan(0, |w, g| {
            let gw = g.width();
            (*w + gw <= avail).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    format!("{truncated}…")
}

/// Due-date label and whether it should render in the overdue color.
pub(crate) fn due_label(due: NaiveDate, today: NaiveDate) -> (String, bool) {
    let overdue = due < today;
    let text = if overdue {
        format!("{} !", due.format("%m-%d"))
    } else {
        due.format("%m-%d").to_string()
    };
    (text, overdue)
}

pub fn render_board(f: &mut Frame, area: Rect, board: &Board, state: &AppState, today: NaiveDate) {
    if board.columns.is_empty() {
        let msg = Paragraph::new("Empty board. Press space then N to create a column.");
        f.render_widget(msg, area);
        return;
    }

    // Split area evenly among columns
    let constraints: Vec<Constraint> = board
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, board.columns.len() as u32))
        .collect();
    let col_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (col_idx, col) in board.columns.iter().enumerate() {
        let is_focused = state.focused_column == col_idx;
        render_column(f, col_areas[col_idx], col, is_focused, state, today);
    }
}

fn render_column(
    f: &mut Frame,
    area: Rect,
    col: &Column,
    is_focused: bool,
    state: &AppState,
    today: NaiveDate,
) {
    let focused_mod = if is_focused { Modifier::BOLD } else { Modifier::empty() };

    let header_line = Line::from(vec![
        Span::styled(
            format!(" {} ", col.title),
            Style::default()
                .fg(Theme::COLUMN_HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({})", col.tasks.len()), Theme::dim_style()),
    ]);

    let border_color = if is_focused {
        Theme::COLUMN_FOCUSED_BORDER
    } else {
        Theme::COLUMN_BORDER
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).add_modifier(focused_mod))
        .border_type(BorderType::Rounded)
        .title(header_line)
        .padding(Padding::new(1, 1, 0, 0));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Render task cards
    let card_height: u16 = 5; // 3 inner lines + 2 border lines
    let max_visible = (inner.height / card_height) as usize;

    let selected_in_col = if is_focused { state.selected_task } else { 0 };
    let scroll_offset = if col.tasks.len() > max_visible && selected_in_col >= max_visible {
        selected_in_col - max_visible + 1
    } else {
        0
    };

    for (task_idx, task) in col.tasks.iter().enumerate().skip(scroll_offset) {
        if task_idx - scroll_offset >= max_visible {
            break;
        }

        let y = inner.y + ((task_idx - scroll_offset) as u16 * card_height);
        let card_area = Rect::new(inner.x, y, inner.width, card_height);

        let is_selected = is_focused && state.selected_task == task_idx;
        render_task_card(f, card_area, task, is_selected, is_focused, today);
    }

    // Scroll indicator
    if col.tasks.len() > max_visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut scrollbar_state = ScrollbarState::new(col.tasks.len()).position(scroll_offset);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn render_task_card(
    f: &mut Frame,
    area: Rect,
    task: &Task,
    is_selected: bool,
    is_col_focused: bool,
    today: NaiveDate,
) {
    debug_assert!(
        !is_selected || is_col_focused,
        "a task cannot be selected in an unfocused column"
    );
    if area.width < 4 || area.height < 3 {
        return;
    }

    let border_color: Color = if is_col_focused { Theme::CARD_BORDER } else { Theme::DIM };
    let selected_mod = if is_selected { Modifier::BOLD } else { Modifier::empty() };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).add_modifier(selected_mod))
        .border_type(if is_selected { BorderType::Thick } else { BorderType::Rounded });

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width < 2 {
        return;
    }

    // Line 1: [marker] priority ... due date on the right
    let marker = "▸ ";
    let placeholder = " ".repeat(marker.width());
    let marker_display: &str = if is_selected { marker } else { &placeholder };

    let priority_span = match task.priority {
        Some(p) => Span::styled(
            p.as_str(),
            Style::default()
                .fg(Theme::priority_color(p))
                .add_modifier(selected_mod),
        ),
        None => Span::raw(""),
    };

    let (due_text, overdue) = match task.due_date {
        Some(due) => due_label(due, today),
        None => (String::new(), false),
    };
    let due_style = if overdue {
        Style::default().fg(Theme::OVERDUE).add_modifier(selected_mod)
    } else {
        Theme::dim_style()
    };

    let left_width = marker.width() + priority_span.content.width();
    let padding_needed = (inner.width as usize).saturating_sub(left_width + due_text.width());

    let line1 = Line::from(vec![
        Span::styled(marker_display, Style::default().fg(Theme::FG).add_modifier(selected_mod)),
        priority_span,
        Span::raw(" ".repeat(padding_needed)),
        Span::styled(due_text, due_style),
    ]);

    // Line 2: title (unicode-safe truncation)
    let title = format!("  {}", truncate_to_width(&task.title, (inner.width as usize).saturating_sub(2)));
    let title_line = Line::from(Span::styled(
        title,
        Style::default().fg(Theme::CARD_TITLE).add_modifier(selected_mod),
    ));

    if inner.height >= 1 {
        f.render_widget(
            Paragraph::new(line1),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );
    }
    if inner.height >= 2 {
        f.render_widget(
            Paragraph::new(title_line),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }

    // Line 3: assignee initials + labels
    let labels = task.label_list();
    let has_metadata = !task.assignees.is_empty() || !labels.is_empty();
    if inner.height >= 3 && has_metadata {
        let mut spans = vec![Span::raw("  ")];
        let mut need_sep = false;
        for assignee in &task.assignees {
            if need_sep {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("@{}", assignee.initials()),
                Style::default().fg(Theme::ASSIGNEE).add_modifier(selected_mod),
            ));
            need_sep = true;
        }
        for label in labels {
            if need_sep {
                spans.push(Span::styled(" · ", Theme::dim_style()));
            }
            spans.push(Span::styled(
                label.to_string(),
                Style::default()
                    .fg(Theme::label_color(label))
                    .add_modifier(selected_mod),
            ));
            need_sep = true;
        }
        f.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(inner.x, inner.y + 2, inner.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── truncate_to_width ───────────────────────────────────────────────────

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
    }

    #[test]
    fn truncate_exact_fit_unchanged() {
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn truncate_long_text_gets_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        // Each CJK char is 2 columns; 5 columns fit two chars + ellipsis.
        let t = truncate_to_width("日本語テキスト", 5);
        assert_eq!(t, "日本…");
    }

    #[test]
    fn truncate_keeps_combined_graphemes_whole() {
        // "é" as e + combining accent is one grapheme.
        let text = "cafe\u{0301} latte";
        let t = truncate_to_width(text, 5);
        assert_eq!(t, "cafe\u{0301}…");
    }

    #[test]
    fn truncate_width_zero_is_just_ellipsis() {
        assert_eq!(truncate_to_width("abc", 0), "…");
    }

    // ── due_label ───────────────────────────────────────────────────────────

    #[test]
    fn due_label_future_is_plain() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let (text, overdue) = due_label(due, today);
        assert_eq!(text, "09-01");
        assert!(!overdue);
    }

    #[test]
    fn due_label_today_is_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let (_, overdue) = due_label(today, today);
        assert!(!overdue);
    }

    #[test]
    fn due_label_past_is_marked_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let (text, overdue) = due_label(due, today);
        assert_eq!(text, "08-20 !");
        assert!(overdue);
    }
}
