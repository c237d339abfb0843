use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_repo_list(frame, app, chunks[0]);
    render_repo_detail(frame, app, chunks[1]);
}

fn render_repo_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Visibility"),
        Cell::from("Language"),
        Cell::from("Updated"),
    ])
    .style(styles::title_style())
    .height(1);

    let repos = app.filtered_repos();

    let rows: Vec<Row> = repos
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let style = if i == app.repo_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let active_marker = if app.active_repo.as_deref() == Some(repo.name.as_str()) {
                "* "
            } else {
                "  "
            };

            Row::new(vec![
                Cell::from(format!("{}{}", active_marker, repo.name)),
                Cell::from(repo.visibility_label()),
                Cell::from(repo.language.as_deref().unwrap_or("-")),
                Cell::from(repo.formatted_updated()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(14),
    ];

    let title = format!(
        " Repositories ({}) - [n]ew [x]delete [u]pload [f]etch file ",
        repos.len()
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    let mut state = TableState::default();
    state.select(Some(app.repo_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_repo_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let repos = app.filtered_repos();
    let selected = repos.get(app.repo_selection).copied();

    let content = match selected {
        Some(repo) => {
            let mut lines = vec![
                Line::from(Span::styled(repo.full_name.clone(), styles::title_style())),
                Line::from(""),
            ];

            if let Some(desc) = repo.description.as_deref() {
                if !desc.is_empty() {
                    lines.push(Line::from(truncate_string(desc, 200)));
                    lines.push(Line::from(""));
                }
            }

            lines.push(Line::from(vec![
                Span::styled("Visibility: ", styles::muted_style()),
                Span::raw(repo.visibility_label()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Branch:     ", styles::muted_style()),
                Span::raw(repo.default_branch.as_deref().unwrap_or("-").to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Stars:      ", styles::muted_style()),
                Span::raw(repo.stargazers_count.to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Forks:      ", styles::muted_style()),
                Span::raw(repo.forks_count.to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Issues:     ", styles::muted_style()),
                Span::raw(repo.open_issues_count.to_string()),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("URL: ", styles::muted_style()),
                Span::styled(repo.html_url.clone(), styles::link_style()),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Enter activates this repo for the Issues and Workflows tabs",
                styles::muted_style(),
            )));

            lines
        }
        None => vec![Line::from(Span::styled(
            "No repositories - press [r] to refresh or [n] to create one",
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
