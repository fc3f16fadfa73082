//! Login, registration, and session-loading screens.

use gatepass_app::{App, LoginField, RegisterField};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::centered;

const FORM_WIDTH: u16 = 48;

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(marker, style),
        Span::styled(format!("{label:<10}"), style),
        Span::raw(value.to_owned()),
    ])
}

fn notice_line(notice: Option<&str>) -> Line<'static> {
    match notice {
        Some(text) => Line::from(Span::styled(
            text.to_owned(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(""),
    }
}

/// Render the login form.
#[allow(clippy::cast_possible_truncation)]
pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.login();
    let masked = "*".repeat(form.password.chars().count());

    let mut lines = vec![
        Line::from(""),
        field_line("Email", &form.email, form.focus == LoginField::Email),
        field_line("Password", &masked, form.focus == LoginField::Password),
        Line::from(""),
    ];
    if form.busy {
        lines.push(Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(notice_line(form.notice.as_deref()));
    }

    let height = lines.len() as u16 + 2;
    let block = Block::default().borders(Borders::ALL).title(" Sign In ");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, centered(area, FORM_WIDTH, height));
}

/// Render the registration form.
#[allow(clippy::cast_possible_truncation)]
pub fn render_register(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.register();
    let masked = "*".repeat(form.password.chars().count());
    let masked_confirm = "*".repeat(form.confirm.chars().count());
    let role = format!("< {} >", form.role);

    let mut lines = vec![
        Line::from(""),
        field_line("Name", &form.name, form.focus == RegisterField::Name),
        field_line("Email", &form.email, form.focus == RegisterField::Email),
        field_line("Password", &masked, form.focus == RegisterField::Password),
        field_line("Confirm", &masked_confirm, form.focus == RegisterField::Confirm),
        field_line("Role", &role, form.focus == RegisterField::Role),
        Line::from(""),
    ];
    if form.busy {
        lines.push(Line::from(Span::styled(
            "Creating account...",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(notice_line(form.notice.as_deref()));
    }

    let height = lines.len() as u16 + 2;
    let block = Block::default().borders(Borders::ALL).title(" Create Account ");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, centered(area, FORM_WIDTH, height));
}

/// Render the screen shown while the profile behind a session is loading.
#[allow(clippy::cast_possible_truncation)]
pub fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Loading profile...", Style::default().fg(Color::Cyan))),
        Line::from(""),
    ];
    if let Some(error) = app.session().last_error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from("Press r to retry."));
    }

    let height = lines.len() as u16 + 2;
    let block = Block::default().borders(Borders::ALL).title(" Gatepass ");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, centered(area, FORM_WIDTH, height));
}
