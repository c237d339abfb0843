//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Focus, LoginFocus, Tab};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle input form overlay
    if matches!(app.state, AppState::Prompting) {
        handle_form_input(app, key);
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
            return Ok(false);
        }
        KeyCode::Char('r') => {
            app.refresh_all_background();
            return Ok(false);
        }
        KeyCode::Char('1') => switch_tab(app, Tab::Repos),
        KeyCode::Char('2') => switch_tab(app, Tab::Gists),
        KeyCode::Char('3') => switch_tab(app, Tab::Issues),
        KeyCode::Char('4') => switch_tab(app, Tab::Workflows),
        KeyCode::Char('5') => switch_tab(app, Tab::Inbox),
        KeyCode::Char('6') => switch_tab(app, Tab::Account),
        KeyCode::Left => switch_tab(app, app.current_tab.prev()),
        KeyCode::Right => switch_tab(app, app.current_tab.next()),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, 1),
        KeyCode::Esc => {
            app.search_query.clear();
        }
        _ => handle_tab_action(app, key),
    }

    Ok(false)
}

fn switch_tab(app: &mut App, tab: Tab) {
    app.current_tab = tab;
    app.focus = Focus::List;

    // Entering Issues/Workflows with a selection but no activated repo
    // adopts the selected one.
    if matches!(tab, Tab::Issues | Tab::Workflows) && app.active_repo.is_none() {
        app.activate_selected_repo();
    }
}

fn move_selection(app: &mut App, delta: isize) {
    let len = match app.current_tab {
        Tab::Repos => app.filtered_repos().len(),
        Tab::Gists => app.filtered_gists().len(),
        Tab::Issues => app.filtered_issues().len(),
        Tab::Workflows => app.workflows.len(),
        Tab::Inbox => app.filtered_notifications().len(),
        Tab::Account => return,
    };

    let selection = match app.current_tab {
        Tab::Repos => &mut app.repo_selection,
        Tab::Gists => &mut app.gist_selection,
        Tab::Issues => &mut app.issue_selection,
        Tab::Workflows => &mut app.workflow_selection,
        Tab::Inbox => &mut app.inbox_selection,
        Tab::Account => return,
    };

    if len == 0 {
        *selection = 0;
        return;
    }

    let next = (*selection as isize + delta).clamp(0, len as isize - 1);
    *selection = next as usize;
}

/// Keys that only make sense on a particular tab.
fn handle_tab_action(app: &mut App, key: KeyEvent) {
    match (app.current_tab, key.code) {
        (Tab::Repos, KeyCode::Enter) => app.activate_selected_repo(),
        (Tab::Repos, KeyCode::Char('n')) => app.open_create_repo_form(),
        (Tab::Repos, KeyCode::Char('x')) => app.open_delete_repo_form(),
        (Tab::Repos, KeyCode::Char('u')) => app.open_upload_form(),
        (Tab::Repos, KeyCode::Char('f')) => app.open_download_form(),

        (Tab::Gists, KeyCode::Char('n')) => app.open_create_gist_form(),

        (Tab::Issues, KeyCode::Char('n')) => app.open_create_issue_form(),
        (Tab::Issues, KeyCode::Char('s')) => app.cycle_issue_state(),

        (Tab::Workflows, KeyCode::Char('t')) | (Tab::Workflows, KeyCode::Enter) => {
            app.open_dispatch_form()
        }

        (Tab::Inbox, KeyCode::Char('m')) => app.mark_inbox_read(),

        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Without a session there is nothing behind the overlay.
            if app.is_authenticated() {
                app.state = AppState::Normal;
            } else {
                app.state = AppState::ConfirmingQuit;
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Token,
                LoginFocus::Token => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Token => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Token,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Token,
            LoginFocus::Token | LoginFocus::Button => {
                // Error is reported through the form; stay on the overlay.
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => app.login_pop_char(),
        KeyCode::Char(c) => app.login_push_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let Some(form) = &mut app.form else {
        app.state = AppState::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Enter => {
            if form.focus + 1 < form.fields.len() {
                form.next_field();
            } else {
                app.submit_form();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            let field = form.focused_field_mut();
            if field.boolean {
                field.toggle();
            }
        }
        KeyCode::Backspace => {
            let field = form.focused_field_mut();
            if !field.boolean {
                field.value.pop();
            }
        }
        KeyCode::Char(c) => {
            let field = form.focused_field_mut();
            if field.boolean {
                match c {
                    'y' | 'Y' if !field.is_yes() => field.toggle(),
                    'n' | 'N' if field.is_yes() => field.toggle(),
                    ' ' => field.toggle(),
                    _ => {}
                }
            } else {
                field.value.push(c);
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
        }
        _ => {}
    }
}
