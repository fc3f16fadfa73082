//! Security screens: scanner input and verification verdicts.

use gatepass_app::{App, ScanPhase, ScanResult};
use gatepass_core::VerifyError;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::centered;

const CARD_WIDTH: u16 = 64;
const INPUT_HEIGHT: u16 = 3;
const PROMPT_WIDTH: u16 = 3; // "> "
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the security landing screen.
pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let Some(profile) = app.profile() else {
        return;
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("On duty: {}", profile.display_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press s to scan a clearance pass."),
        Line::from("Every scan is checked against the live record;"),
        Line::from("what the badge claims is never trusted on its own."),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Security ");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, centered(area, CARD_WIDTH, 9));
}

/// Key hints for the scanner, varying with the phase.
pub fn scan_hints(app: &App) -> &'static str {
    match app.scan() {
        ScanPhase::Armed => "scan or paste, Enter verify | Esc back",
        ScanPhase::Verifying { .. } => "verifying... | Esc back",
        ScanPhase::Done { .. } => "n next scan | Esc back",
    }
}

/// Render the scanner screen.
pub fn render_scan(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(3)])
        .split(area);

    let [input_area, verdict_area] = chunks.as_ref() else {
        return;
    };

    render_input(frame, app, *input_area);
    render_verdict(frame, app, *verdict_area);
}

/// Render the capture line with cursor.
#[allow(clippy::cast_possible_truncation)]
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let armed = matches!(app.scan(), ScanPhase::Armed);
    let style = if armed {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default().borders(Borders::ALL).title(" Scanner ");
    let text = format!("> {}", app.scan_input());
    frame.render_widget(Paragraph::new(text).style(style).block(block), area);

    if armed {
        let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
        let cursor_offset = (app.scan_input().chars().count() as u16).min(available_width);
        let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Render the verdict panel for the current phase.
#[allow(clippy::cast_possible_truncation)]
fn render_verdict(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.scan() {
        ScanPhase::Armed => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for a pass",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        ScanPhase::Verifying { payload } => vec![
            Line::from(""),
            Line::from(Span::styled("Checking live record...", Style::default().fg(Color::Cyan))),
            Line::from(""),
            Line::from(format!("Pass presented by {}", payload.name)),
        ],
        ScanPhase::Done { result } => verdict_lines(result),
    };

    let height = lines.len() as u16 + 2;
    let block = Block::default().borders(Borders::ALL).title(" Verdict ");
    let paragraph = Paragraph::new(lines).centered().block(block);
    frame.render_widget(paragraph, centered(area, CARD_WIDTH, height));
}

fn verdict_lines(result: &ScanResult) -> Vec<Line<'static>> {
    match result {
        ScanResult::Verified(verification) => {
            let (banner, style) = if verification.exit_permitted() {
                (
                    "CLEARED FOR EXIT",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )
            } else {
                (
                    "NOT CLEARED - HOLD AT GATE",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            };

            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(banner, style)),
                Line::from(""),
                Line::from(verification.display_name.clone()),
                Line::from(format!(
                    "Pass encoded {}",
                    verification.encoded_at.format("%Y-%m-%d %H:%M UTC")
                )),
            ];
            if !verification.is_consistent() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Pass is stale: status changed since it was encoded",
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        },
        ScanResult::Invalid { reason } => vec![
            Line::from(""),
            Line::from(Span::styled(
                "INVALID PASS",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(reason.clone()),
        ],
        ScanResult::Failed { error } => {
            let banner = match error {
                VerifyError::Unavailable { .. } => "VERIFICATION UNAVAILABLE",
                VerifyError::SubjectNotFound { .. } | VerifyError::SubjectNotDriver { .. } => {
                    "PASS REJECTED"
                },
            };
            let hint = match error {
                VerifyError::Unavailable { .. } => {
                    "Could not reach the profile store. Hold the driver and retry."
                },
                VerifyError::SubjectNotFound { .. } | VerifyError::SubjectNotDriver { .. } => {
                    "The live record does not back this pass."
                },
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    banner,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(error.to_string()),
                Line::from(hint),
            ]
        },
    }
}
