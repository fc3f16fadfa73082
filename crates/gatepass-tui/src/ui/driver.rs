//! Driver screens: live status and the encoded badge.

use gatepass_app::App;
use gatepass_proto::ClearanceStatus;
use gatepass_proto::render::{placeholder, unicode_badge};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::centered;

const CARD_WIDTH: u16 = 52;

fn status_span(status: ClearanceStatus) -> Span<'static> {
    let style = match status {
        ClearanceStatus::Cleared => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ClearanceStatus::NotCleared => {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        },
    };
    Span::styled(status.label(), style)
}

/// Render the driver's landing screen with the live clearance status.
#[allow(clippy::cast_possible_truncation)]
pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let Some(profile) = app.profile() else {
        return;
    };

    let updated = profile.last_updated.map_or_else(
        || "never".to_owned(),
        |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            profile.display_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(profile.email.clone()),
        Line::from(""),
        Line::from(vec![Span::raw("Status: "), status_span(profile.clearance_or_default())]),
        Line::from(format!("Last updated: {updated}")),
        Line::from(""),
        Line::from("Press b to show your badge."),
    ];

    let height = lines.len() as u16 + 2;
    let block = Block::default().borders(Borders::ALL).title(" Driver ");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, centered(area, CARD_WIDTH, height));
}

/// Render the badge screen: the pass as a scannable QR code.
#[allow(clippy::cast_possible_truncation)]
pub fn render_badge(frame: &mut Frame, app: &App, area: Rect) {
    let art = match app.badge() {
        Some(pass) => {
            unicode_badge(pass.encoded()).unwrap_or_else(|_| placeholder("pass too large"))
        },
        None => placeholder("encoding..."),
    };

    let mut lines: Vec<Line> = art.lines().map(|row| Line::from(row.to_owned())).collect();
    let art_width = art.lines().map(|row| row.chars().count()).max().unwrap_or(0) as u16;

    if let Some(pass) = app.badge() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw(format!("{} - ", pass.payload().name)),
            status_span(pass.payload().status),
        ]));
        lines.push(Line::from(format!(
            "Encoded {}",
            pass.payload().encoded_at.format("%Y-%m-%d %H:%M:%S UTC")
        )));
    }

    let height = lines.len() as u16 + 2;
    let width = art_width.max(CARD_WIDTH) + 2;
    let block = Block::default().borders(Borders::ALL).title(" Badge ");
    let paragraph = Paragraph::new(lines).centered().block(block);
    frame.render_widget(paragraph, centered(area, width, height));
}
