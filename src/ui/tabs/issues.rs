use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::format_date;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_issue_list(frame, app, chunks[0]);
    render_issue_detail(frame, app, chunks[1]);
}

fn render_issue_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("#"),
        Cell::from("Title"),
        Cell::from("State"),
        Cell::from("Author"),
        Cell::from("Comments"),
    ])
    .style(styles::title_style())
    .height(1);

    let issues = app.filtered_issues();

    let rows: Vec<Row> = issues
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let style = if i == app.issue_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(issue.number.to_string()),
                Cell::from(issue.title.clone()),
                Cell::from(issue.state.clone()),
                Cell::from(issue.author().to_string()),
                Cell::from(issue.comments.to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(9),
    ];

    let context = app.active_repo.as_deref().unwrap_or("no repo activated");
    let title = format!(
        " Issues: {} [{}] ({}) - [n]ew [s]tate filter ",
        context,
        app.issue_state.as_query(),
        issues.len()
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    let mut state = TableState::default();
    state.select(Some(app.issue_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_issue_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let issues = app.filtered_issues();
    let selected = issues.get(app.issue_selection).copied();

    let content = match selected {
        Some(issue) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("#{} {}", issue.number, issue.title),
                    styles::title_style(),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("State:   ", styles::muted_style()),
                    Span::raw(issue.state.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Author:  ", styles::muted_style()),
                    Span::raw(issue.author().to_string()),
                ]),
            ];

            if let Some(created) = issue.created_at {
                lines.push(Line::from(vec![
                    Span::styled("Opened:  ", styles::muted_style()),
                    Span::raw(format_date(&created.to_rfc3339())),
                ]));
            }

            lines.push(Line::from(""));

            if let Some(body) = issue.body.as_deref() {
                let trimmed = body.trim();
                if !trimmed.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "Description",
                        styles::highlight_style(),
                    )));
                    for line in wrap_text(trimmed, (area.width as usize).saturating_sub(4)) {
                        lines.push(Line::from(line));
                    }
                    lines.push(Line::from(""));
                }
            }

            lines.push(Line::from(vec![
                Span::styled("URL: ", styles::muted_style()),
                Span::styled(issue.html_url.clone(), styles::link_style()),
            ]));

            lines
        }
        None => {
            if app.active_repo.is_none() {
                vec![Line::from(Span::styled(
                    "Activate a repository on the Repos tab (Enter) to list its issues",
                    styles::muted_style(),
                ))]
            } else {
                vec![Line::from(Span::styled(
                    "No issues match the current filter",
                    styles::muted_style(),
                ))]
            }
        }
    };

    let block = Block::default()
        .title(" Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Word-wrap text to a maximum width, preserving paragraph breaks.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.len() + 1 + word.len() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_respects_width() {
        let wrapped = wrap_text("one two three four five six seven", 12);
        assert!(wrapped.iter().all(|l| l.len() <= 12));
        assert_eq!(wrapped.join(" "), "one two three four five six seven");
    }

    #[test]
    fn test_wrap_text_keeps_paragraph_breaks() {
        let wrapped = wrap_text("first\n\nsecond", 40);
        assert_eq!(wrapped, vec!["first", "", "second"]);
    }
}
