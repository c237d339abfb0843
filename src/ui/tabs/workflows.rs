use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_workflow_list(frame, app, chunks[0]);
    render_workflow_detail(frame, app, chunks[1]);
}

fn render_workflow_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([Cell::from("Workflow"), Cell::from("State"), Cell::from("Path")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .workflows
        .iter()
        .enumerate()
        .map(|(i, workflow)| {
            let style = if i == app.workflow_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(workflow.name.clone()),
                Cell::from(workflow.state.clone()),
                Cell::from(workflow.path.clone()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(20),
        Constraint::Length(36),
    ];

    let context = app.active_repo.as_deref().unwrap_or("no repo activated");
    let title = format!(
        " Workflows: {} ({}) - [t]rigger run ",
        context,
        app.workflows.len()
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    let mut state = TableState::default();
    state.select(Some(app.workflow_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_workflow_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app.workflows.get(app.workflow_selection);

    let content = match selected {
        Some(workflow) => {
            let state_style = if workflow.is_active() {
                styles::success_style()
            } else {
                styles::error_style()
            };

            vec![
                Line::from(Span::styled(workflow.name.clone(), styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("State: ", styles::muted_style()),
                    Span::styled(workflow.state.clone(), state_style),
                ]),
                Line::from(vec![
                    Span::styled("Path:  ", styles::muted_style()),
                    Span::raw(workflow.path.clone()),
                ]),
                Line::from(vec![
                    Span::styled("ID:    ", styles::muted_style()),
                    Span::raw(workflow.id.to_string()),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    "Press [t] to queue a run on a branch or tag",
                    styles::muted_style(),
                )),
            ]
        }
        None => {
            if app.active_repo.is_none() {
                vec![Line::from(Span::styled(
                    "Activate a repository on the Repos tab (Enter) to list its workflows",
                    styles::muted_style(),
                ))]
            } else {
                vec![Line::from(Span::styled(
                    "This repository has no workflows",
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
