use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::app::Mode;
use crate::input::keymap;

/// Render the minor-mode hint popup (shown for g and space modes).
pub fn render_hint_popup(f: &mut Frame, area: Rect, mode: &Mode) {
    let bindings = keymap::mode_bindings(mode);
    if bindings.is_empty() {
        return;
    }

    // Calculate popup dimensions
    let max_key_len = bindings.iter().map(|b| b.key.len()).max().unwrap_or(0);
    let max_desc_len = bindings.iter().map(|b| b.description.len()).max().unwrap_or(0);
    let popup_width = (max_key_len + max_desc_len + 7).min(area.width as usize) as u16;
    let popup_height = (bindings.len() as u16 + 2).min(area.height);

    let x = area.x + area.width.saturating_sub(popup_width);
    let y = area.y + area.height.saturating_sub(popup_height);
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let mode_name = match mode {
        Mode::Goto => "goto",
        Mode::Space => "commands",
        _ => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            format!(" {mode_name} "),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    for (i, binding) in bindings.iter().enumerate() {
        if i >= inner.height as usize {
            break;
        }
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{:>width$}", binding.key, width = max_key_len),
                Style::default()
                    .fg(Theme::HINT_KEY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(binding.description, Style::default().fg(Theme::HINT_DESC)),
        ]);
        f.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

/// Render a generic picker popup. `multi` pickers show a checkbox column
/// (even when nothing is checked yet); single-select pickers get a plain
/// list.
pub fn render_picker(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    checked: &[bool],
    selected: usize,
    multi: bool,
) {
    let marker_width = if multi { 4 } else { 2 };
    let max_label_len = items.iter().map(|l| l.len()).max().unwrap_or(0);
    let popup_width = ((max_label_len + marker_width + 4) as u16)
        .max(20)
        .min(area.width.saturating_sub(4));
    let popup_height = (items.len() as u16 + 2).min(area.height.saturating_sub(4)).max(3);
    let x = area.x + area.width.saturating_sub(popup_width);
    let y = area.y + area.height.saturating_sub(popup_height);
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    for (i, label) in items.iter().enumerate() {
        if i >= inner.height as usize {
            break;
        }
        let is_selected = i == selected;
        let is_checked = checked.get(i).copied().unwrap_or(false);
        let sel_mod = if is_selected {
            Modifier::BOLD | Modifier::REVERSED
        } else {
            Modifier::empty()
        };

        let mut spans = Vec::new();

        if multi {
            let marker = if is_checked { "[x] " } else { "[ ] " };
            spans.push(Span::styled(
                marker,
                Style::default().fg(if is_checked { Theme::FG } else { Theme::DIM }),
            ));
        } else {
            spans.push(Span::raw("  "));
        }

        spans.push(Span::styled(
            label.clone(),
            Style::default().fg(Theme::FG).add_modifier(sel_mod),
        ));

        let line = Line::from(spans);
        f.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw_picker(items: &[&str], checked: &[bool], multi: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| {
                let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                render_picker(f, f.area(), "pick", &items, checked, 0, multi);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.cell((x, y)).unwrap().symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn multi_select_shows_checkboxes_even_when_nothing_is_checked() {
        let text = draw_picker(&["alice", "bob"], &[false, false], true);
        assert!(text.contains("[ ] alice"));
        assert!(text.contains("[ ] bob"));
    }

    #[test]
    fn multi_select_marks_checked_entries() {
        let text = draw_picker(&["alice", "bob"], &[false, true], true);
        assert!(text.contains("[ ] alice"));
        assert!(text.contains("[x] bob"));
    }

    #[test]
    fn single_select_has_no_checkbox_column() {
        let text = draw_picker(&["Todo", "Done"], &[false, false], false);
        assert!(text.contains("Todo"));
        assert!(!text.contains('['));
    }
}
