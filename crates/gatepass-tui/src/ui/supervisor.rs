//! Supervisor screens: driver roster and per-driver clearance controls.

use gatepass_app::App;
use gatepass_core::Profile;
use gatepass_proto::ClearanceStatus;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::centered;

const SEARCH_HEIGHT: u16 = 3;
const NOTICE_HEIGHT: u16 = 1;
const DETAILS_WIDTH: u16 = 56;

fn status_cell(profile: &Profile) -> Span<'static> {
    match profile.clearance_or_default() {
        ClearanceStatus::Cleared => Span::styled("cleared", Style::default().fg(Color::Green)),
        ClearanceStatus::NotCleared => {
            Span::styled("not cleared", Style::default().fg(Color::Red))
        },
    }
}

/// Render the driver roster with search and selection.
pub fn render_roster(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(NOTICE_HEIGHT),
        ])
        .split(area);

    let [search_area, list_area, notice_area] = chunks.as_ref() else {
        return;
    };

    render_search(frame, app, *search_area);
    render_list(frame, app, *list_area);

    if let Some(notice) = &app.roster().notice {
        let line = Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(Paragraph::new(line), *notice_area);
    }
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let roster = app.roster();
    let style = if roster.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default().borders(Borders::ALL).title(" Search ").border_style(style);
    let text = format!("/ {}", roster.query);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let roster = app.roster();
    let visible = roster.visible();

    let title = if roster.busy {
        " Drivers (loading...) ".to_owned()
    } else {
        format!(" Drivers ({}) ", visible.len())
    };

    let items: Vec<ListItem> = if visible.is_empty() {
        let message = if roster.loaded { "No drivers match" } else { "Loading..." };
        vec![ListItem::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(index, profile)| {
                let selected = index == roster.selected;
                let marker = if selected { "> " } else { "  " };
                let name_style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<24}", profile.display_name), name_style),
                    Span::raw(format!("{:<28}", profile.email)),
                    status_cell(profile),
                ]))
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(List::new(items).block(block), area);
}

/// Render one driver with clearance controls.
#[allow(clippy::cast_possible_truncation)]
pub fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let Some(details) = app.details() else {
        return;
    };
    let driver = &details.driver;

    let updated = driver.last_updated.map_or_else(
        || "never".to_owned(),
        |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            driver.display_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(driver.email.clone()),
        Line::from(""),
        Line::from(vec![Span::raw("Status: "), status_cell(driver)]),
        Line::from(format!("Last updated: {updated}")),
        Line::from(""),
    ];
    if details.busy {
        lines.push(Line::from(Span::styled("Saving...", Style::default().fg(Color::Cyan))));
    } else if let Some(notice) = &details.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from("c marks cleared, r revokes."));
    }

    let height = lines.len() as u16 + 2;
    let block = Block::default().borders(Borders::ALL).title(" Driver Details ");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, centered(area, DETAILS_WIDTH, height));
}
