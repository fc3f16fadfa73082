//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod auth;
mod driver;
mod security;
mod supervisor;

use gatepass_app::{App, Route};
use gatepass_core::SessionState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const HEADER_HEIGHT: u16 = 1;
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [header_area, main_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_header(frame, app, *header_area);
    render_main(frame, app, *main_area);
    render_status(frame, app, *status_area);
}

/// Render the screen the route points at.
fn render_main(frame: &mut Frame, app: &App, area: Rect) {
    // A loading session blanks whatever screen the route names; nothing
    // role-gated may render from a half-signed-in state.
    if matches!(app.session().state(), SessionState::Loading) {
        auth::render_loading(frame, app, area);
        return;
    }

    match app.route() {
        Route::Login => auth::render_login(frame, app, area),
        Route::Register => auth::render_register(frame, app, area),
        Route::DriverHome => driver::render_home(frame, app, area),
        Route::DriverBadge => driver::render_badge(frame, app, area),
        Route::SupervisorHome => supervisor::render_roster(frame, app, area),
        Route::DriverDetails => supervisor::render_details(frame, app, area),
        Route::SecurityHome => security::render_home(frame, app, area),
        Route::Scan => security::render_scan(frame, app, area),
    }
}

/// Render the title bar with the signed-in account.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let who = app
        .profile()
        .map_or_else(String::new, |p| format!(" | {} ({})", p.display_name, p.role));

    let line = Line::from(vec![
        Span::styled(" Gatepass", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" - warehouse exit clearance"),
        Span::styled(who, Style::default().fg(Color::Cyan)),
    ]);

    let paragraph =
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(paragraph, area);
}

/// Render the status bar: key hints for the route plus any status message.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hints = if matches!(app.session().state(), SessionState::Loading) {
        "r retry | l sign out | q quit"
    } else {
        match app.route() {
            Route::Login => "Tab field | Enter sign in | Ctrl+r register | Esc quit",
            Route::Register => "Tab field | Left/Right role | Enter create | Esc back",
            Route::DriverHome => "b badge | r refresh | l sign out | q quit",
            Route::DriverBadge => "r re-issue | Esc back",
            Route::SupervisorHome => {
                if app.roster().searching {
                    "type to filter | Enter done | Esc done"
                } else {
                    "/ search | Up/Down select | Enter open | r reload | l sign out | q quit"
                }
            },
            Route::DriverDetails => "c clear | r revoke | Esc back",
            Route::SecurityHome => "s scan | l sign out | q quit",
            Route::Scan => security::scan_hints(app),
        }
    };

    let mut spans = vec![Span::raw(" "), Span::raw(hints)];
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(
            format!(" | {message}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(paragraph, area);
}

/// A rect of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect { x, y, width, height }
}
