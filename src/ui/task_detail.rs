use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;
use crate::app::{AppState, DetailTab};
use crate::board::{HistoryEntry, Task};

/// Render the tabbed task detail overlay (overview / comments / history).
pub fn render_task_detail(
    f: &mut Frame,
    area: Rect,
    task: &Task,
    state: &AppState,
    tab: DetailTab,
    scroll: u16,
    today: NaiveDate,
) {
    let panel_area = super::centered_rect(area, 70, 80, 40, 12);

    f.render_widget(Clear, panel_area);

    // Tab strip in the block title
    let mut title_spans = vec![Span::raw(" ")];
    for (i, t) in DetailTab::ALL.iter().enumerate() {
        if i > 0 {
            title_spans.push(Span::styled(" | ", Theme::dim_style()));
        }
        let style = if *t == tab {
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Theme::dim_style()
        };
        title_spans.push(Span::styled(format!(" {} ", t.title()), style));
    }
    title_spans.push(Span::raw(" "));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(Theme::CARD_BORDER))
        .title(Line::from(title_spans))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let lines = match tab {
        DetailTab::Overview => overview_lines(task, today, inner.width as usize),
        DetailTab::Comments => comment_lines(state),
        DetailTab::History => history_lines(&state.detail_history),
    };

    let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
    let scroll = scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, inner);
}

fn overview_lines(task: &Task, today: NaiveDate, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        task.title.clone(),
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let priority_spans = {
        let mut spans = vec![Span::styled("Priority: ", Theme::dim_style())];
        match task.priority {
            Some(p) => spans.push(Span::styled(
                p.as_str(),
                Style::default().fg(Theme::priority_color(p)),
            )),
            None => spans.push(Span::styled("none", Theme::dim_style())),
        }
        spans
    };
    lines.push(Line::from(priority_spans));

    if let Some(due) = task.due_date {
        let due_str = due.format("%Y-%m-%d").to_string();
        let (label, style) = if task.is_overdue(today) {
            (format!("{due_str} (overdue)"), Style::default().fg(Theme::OVERDUE))
        } else {
            (due_str, Style::default())
        };
        lines.push(Line::from(vec![
            Span::styled("Due:      ", Theme::dim_style()),
            Span::styled(label, style),
        ]));
    }

    if !task.assignees.is_empty() {
        let mut spans = vec![Span::styled("Assigned: ", Theme::dim_style())];
        for (i, assignee) in task.assignees.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(", "));
            }
            spans.push(Span::styled(
                assignee.label().to_string(),
                Style::default().fg(Theme::ASSIGNEE),
            ));
        }
        lines.push(Line::from(spans));
    }

    let labels = task.label_list();
    if !labels.is_empty() {
        let mut spans = vec![Span::styled("Labels:   ", Theme::dim_style())];
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" · "));
            }
            spans.push(Span::styled(
                label.to_string(),
                Style::default().fg(Theme::label_color(label)),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(ref description) = task.description {
        if !description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "─".repeat(width),
                Theme::dim_style(),
            )));
            lines.push(Line::from(""));
            for body_line in description.lines() {
                lines.push(Line::from(body_line.to_string()));
            }
        }
    }

    lines
}

fn comment_lines(state: &AppState) -> Vec<Line<'static>> {
    if state.detail_comments.is_empty() {
        return vec![Line::from(Span::styled(
            "No comments yet. Press c to add one.",
            Theme::dim_style(),
        ))];
    }

    let mut lines = Vec::new();
    for comment in &state.detail_comments {
        let author = comment
            .author
            .as_ref()
            .map(|u| u.label().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        lines.push(Line::from(vec![
            Span::styled(author, Style::default().fg(Theme::ASSIGNEE)),
            Span::styled(
                format!("  {}", comment.created_at.format("%Y-%m-%d %H:%M")),
                Theme::dim_style(),
            ),
        ]));
        for content_line in comment.content.lines() {
            lines.push(Line::from(content_line.to_string()));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn history_lines(entries: &[HistoryEntry]) -> Vec<Line<'static>> {
    if entries.is_empty() {
        return vec![Line::from(Span::styled("No history.", Theme::dim_style()))];
    }

    let mut lines = Vec::new();
    for entry in entries {
        let actor = entry
            .actor
            .as_ref()
            .map(|u| u.label().to_string())
            .unwrap_or_else(|| "system".to_string());
        let mut spans = vec![
            Span::styled(
                entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
                Theme::dim_style(),
            ),
            Span::raw("  "),
            Span::styled(
                entry.action.as_str(),
                Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(ref field) = entry.field {
            spans.push(Span::styled(format!(" {field}"), Style::default().fg(Theme::FG)));
        }
        match (&entry.old_value, &entry.new_value) {
            (Some(old), Some(new)) => {
                spans.push(Span::styled(format!(": {old} → {new}"), Theme::dim_style()));
            }
            (None, Some(new)) => {
                spans.push(Span::styled(format!(": {new}"), Theme::dim_style()));
            }
            (Some(old), None) => {
                spans.push(Span::styled(format!(": was {old}"), Theme::dim_style()));
            }
            (None, None) => {}
        }
        spans.push(Span::styled(format!("  by {actor}"), Theme::dim_style()));
        lines.push(Line::from(spans));
    }
    lines
}
