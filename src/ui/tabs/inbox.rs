use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Reason"),
        Cell::from("Repository"),
        Cell::from("Subject"),
        Cell::from("Type"),
        Cell::from("Updated"),
    ])
    .style(styles::title_style())
    .height(1);

    let notifications = app.filtered_notifications();

    let rows: Vec<Row> = notifications
        .iter()
        .enumerate()
        .map(|(i, thread)| {
            let style = if i == app.inbox_selection {
                styles::selected_style()
            } else if thread.unread {
                styles::list_item_style()
            } else {
                styles::muted_style()
            };

            let updated = thread
                .updated_at
                .map(|ts| format_date(&ts.to_rfc3339()))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(thread.reason.clone()),
                Cell::from(thread.repo_name().to_string()),
                Cell::from(truncate_string(&thread.subject.title, 60)),
                Cell::from(thread.subject.kind.clone()),
                Cell::from(updated),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(28),
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Length(14),
    ];

    let unread = app.notifications.iter().filter(|n| n.unread).count();
    let title = format!(
        " Inbox ({} unread / {}) - [m]ark all read ",
        unread,
        app.notifications.len()
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    let mut state = TableState::default();
    state.select(Some(app.inbox_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
