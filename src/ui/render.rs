use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, Tab};

use super::styles;
use super::tabs::{account, gists, inbox, issues, repos, workflows};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::Prompting) {
        render_form_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  octoterm";
    let signed_in = app
        .account
        .as_ref()
        .map(|p| format!("@{}", p.login))
        .unwrap_or_else(|| "signed out".to_string());
    let help_hint = "[?] Help";

    let padding = (area.width as usize)
        .saturating_sub(title.len() + signed_in.len() + help_hint.len() + 7);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(signed_in, styles::muted_style()),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        Tab::Repos,
        Tab::Gists,
        Tab::Issues,
        Tab::Workflows,
        Tab::Inbox,
        Tab::Account,
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    // Search indicator on the right
    if matches!(app.state, AppState::Searching) || !app.search_query.is_empty() {
        let search_text = format!("/{}", app.search_query);
        let used: usize = spans.iter().map(|s| s.content.len()).sum();
        let padding = (area.width as usize).saturating_sub(used + search_text.len() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(search_text, styles::search_style()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Repos => repos::render(frame, app, area),
        Tab::Gists => gists::render(frame, app, area),
        Tab::Issues => issues::render(frame, app, area),
        Tab::Workflows => workflows::render(frame, app, area),
        Tab::Inbox => inbox::render(frame, app, area),
        Tab::Account => account::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[r]efresh | [/]search | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.refreshing {
        " Refreshing... ".to_string()
    } else {
        String::from(" Ready ")
    };

    let center_text = app
        .active_repo
        .as_deref()
        .map(|r| format!("repo: {}", r))
        .unwrap_or_default();

    let right_text = format!(" {} ", shortcuts);
    let width = area.width as usize;

    let status_line = if center_text.is_empty() {
        let padding = width
            .saturating_sub(left_text.len())
            .saturating_sub(right_text.len());
        Line::from(vec![
            Span::styled(left_text, styles::muted_style()),
            Span::raw(" ".repeat(padding)),
            Span::styled(right_text, styles::muted_style()),
        ])
    } else {
        let center_start = width.saturating_sub(center_text.len()) / 2;
        let left_pad = center_start.saturating_sub(left_text.len());
        let right_pad = width
            .saturating_sub(center_start + center_text.len())
            .saturating_sub(right_text.len());
        Line::from(vec![
            Span::styled(left_text, styles::muted_style()),
            Span::raw(" ".repeat(left_pad)),
            Span::styled(center_text, styles::highlight_style()),
            Span::raw(" ".repeat(right_pad)),
            Span::styled(right_text, styles::muted_style()),
        ])
    };

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(54, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = styles::help_key_style;
    let desc = styles::help_desc_style;

    let help_text = vec![
        Line::from(Span::styled("  octoterm", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-6       ", key()),
            Span::styled("Switch tabs", desc()),
        ]),
        Line::from(vec![
            Span::styled("  </>/Tab   ", key()),
            Span::styled("Prev/next tab, switch focus", desc()),
        ]),
        Line::from(vec![
            Span::styled("  j/k \u{2191}/\u{2193}   ", key()),
            Span::styled("Navigate list", desc()),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", key()),
            Span::styled("Activate repo for Issues/Workflows", desc()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  n         ", key()),
            Span::styled("New repo / gist / issue", desc()),
        ]),
        Line::from(vec![
            Span::styled("  x         ", key()),
            Span::styled("Delete repository (with confirmation)", desc()),
        ]),
        Line::from(vec![
            Span::styled("  u / f     ", key()),
            Span::styled("Upload / fetch a file", desc()),
        ]),
        Line::from(vec![
            Span::styled("  t         ", key()),
            Span::styled("Trigger a workflow run", desc()),
        ]),
        Line::from(vec![
            Span::styled("  m         ", key()),
            Span::styled("Mark inbox read", desc()),
        ]),
        Line::from(vec![
            Span::styled("  s         ", key()),
            Span::styled("Cycle issue state filter", desc()),
        ]),
        Line::from(vec![
            Span::styled("  / r q     ", key()),
            Span::styled("Search, refresh, quit", desc()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", key()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", key()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(52, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("   octoterm", styles::title_style())),
        Line::from(Span::styled(
            "   sign in with a personal access token",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    let field_style = |focused: bool| {
        if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        }
    };

    let username_focused = app.login_focus == LoginFocus::Username;
    let cursor = if username_focused { "\u{258c}" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(
            format!("{:<28}", format!("{}{}", app.login_username, cursor)),
            field_style(username_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // The token is rendered masked; the raw value never reaches the
    // frame buffer.
    let token_focused = app.login_focus == LoginFocus::Token;
    let masked: String = "*".repeat(app.login_token.len().min(28));
    let cursor = if token_focused { "\u{258c}" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Token:    [", styles::muted_style()),
        Span::styled(
            format!("{:<28}", format!("{}{}", masked, cursor)),
            field_style(token_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_label = if button_focused {
        " \u{25b6} Sign in \u{25c0} "
    } else {
        "   Sign in   "
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button_label, field_style(button_focused)),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };

    let height = (form.fields.len() as u16) * 2 + 6 + if form.error.is_some() { 2 } else { 0 };
    let area = centered_rect_fixed(58, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", form.title),
            styles::title_style(),
        )),
        Line::from(""),
    ];

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused && !field.boolean { "\u{258c}" } else { "" };
        let shown = if field.boolean {
            format!("< {} >", field.value)
        } else {
            format!("{}{}", field.value, cursor)
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{}: ", field.label), styles::muted_style()),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<48}", shown), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Enter", styles::help_key_style()),
        Span::styled(" submit on last field  ", styles::muted_style()),
        Span::styled("Tab", styles::help_key_style()),
        Span::styled(" next field  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("   octoterm", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "   Quit? Credentials are discarded on exit.",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
