use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let content = match &app.account {
        Some(profile) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    profile.login.clone(),
                    styles::title_style(),
                )),
                Line::from(""),
            ];

            lines.push(Line::from(vec![
                Span::styled("Name:      ", styles::muted_style()),
                Span::raw(profile.name.as_deref().unwrap_or("-").to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Email:     ", styles::muted_style()),
                Span::raw(profile.email.as_deref().unwrap_or("-").to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Bio:       ", styles::muted_style()),
                Span::raw(profile.bio.as_deref().unwrap_or("-").to_string()),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Repos:     ", styles::muted_style()),
                Span::raw(format!(
                    "{} public, {} private",
                    profile.public_repos, profile.total_private_repos
                )),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Followers: ", styles::muted_style()),
                Span::raw(profile.followers.to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Following: ", styles::muted_style()),
                Span::raw(profile.following.to_string()),
            ]));

            if let Some(url) = profile.html_url.as_deref() {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("URL: ", styles::muted_style()),
                    Span::styled(url.to_string(), styles::link_style()),
                ]));
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "Not signed in",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Account ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(content).block(block), area);
}
