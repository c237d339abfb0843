use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::{format_date, format_size, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_gist_list(frame, app, chunks[0]);
    render_gist_detail(frame, app, chunks[1]);
}

fn render_gist_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Description"),
        Cell::from("Visibility"),
        Cell::from("Files"),
        Cell::from("Created"),
    ])
    .style(styles::title_style())
    .height(1);

    let gists = app.filtered_gists();

    let rows: Vec<Row> = gists
        .iter()
        .enumerate()
        .map(|(i, gist)| {
            let style = if i == app.gist_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let created = gist
                .created_at
                .map(|ts| format_date(&ts.to_rfc3339()))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(truncate_string(gist.display_title(), 48)),
                Cell::from(gist.visibility_label()),
                Cell::from(gist.files.len().to_string()),
                Cell::from(created),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(14),
    ];

    let title = format!(" Gists ({}) - [n]ew ", gists.len());

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    let mut state = TableState::default();
    state.select(Some(app.gist_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_gist_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let gists = app.filtered_gists();
    let selected = gists.get(app.gist_selection).copied();

    let content = match selected {
        Some(gist) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    truncate_string(gist.display_title(), 60),
                    styles::title_style(),
                )),
                Line::from(""),
                Line::from(Span::styled("Files", styles::highlight_style())),
            ];

            for (name, file) in &gist.files {
                let language = file.language.as_deref().unwrap_or("text");
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}  ", name)),
                    Span::styled(
                        format!("{} - {}", language, format_size(file.size)),
                        styles::muted_style(),
                    ),
                ]));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("URL: ", styles::muted_style()),
                Span::styled(gist.html_url.clone(), styles::link_style()),
            ]));

            lines
        }
        None => vec![Line::from(Span::styled(
            "No gists - press [n] to create one from a local file",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(content).block(block), area);
}
