//! QR output for badge display.
//!
//! The badge screen hands the canonical JSON to one of these renderers. SVG
//! suits export and printing; the unicode form packs two vertical modules
//! into each terminal cell, which keeps a whole pass readable inside a
//! normal terminal window. When there is no profile to encode, the screen
//! shows [`placeholder`] instead of a code.

use qrcode::QrCode;
use qrcode::render::{svg, unicode};
use thiserror::Error;

/// QR construction failure.
#[derive(Debug, Error)]
pub enum QrRenderError {
    /// The value does not fit any QR version. Canonical payloads never
    /// reach this; it exists because the renderer accepts arbitrary text.
    #[error("value does not fit a QR code: {0}")]
    Unencodable(#[from] qrcode::types::QrError),
}

/// Renders `value` as an SVG document at least `min_size` pixels square.
pub fn svg_badge(value: &str, min_size: u32) -> Result<String, QrRenderError> {
    let code = QrCode::new(value)?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(min_size, min_size)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Renders `value` as half-block unicode art for terminal display.
///
/// Colors are inverted so the code scans correctly from a dark terminal:
/// QR modules that should be dark render as background, light as blocks.
pub fn unicode_badge(value: &str) -> Result<String, QrRenderError> {
    let code = QrCode::new(value)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

/// Width of the [`placeholder`] frame in terminal cells.
pub const PLACEHOLDER_WIDTH: usize = 33;

/// Height of the [`placeholder`] frame in terminal lines.
pub const PLACEHOLDER_HEIGHT: usize = 11;

/// The empty frame shown in place of a code when no pass could be issued,
/// with `message` centered inside it.
#[must_use]
pub fn placeholder(message: &str) -> String {
    let inner = PLACEHOLDER_WIDTH - 2;
    let text: String = message.chars().take(inner).collect();
    let pad = inner - text.chars().count();
    let left = pad / 2;
    let right = pad - left;

    let mut lines = Vec::with_capacity(PLACEHOLDER_HEIGHT);
    lines.push(format!("┌{}┐", "─".repeat(inner)));
    for row in 1..PLACEHOLDER_HEIGHT - 1 {
        if row == PLACEHOLDER_HEIGHT / 2 {
            lines.push(format!("│{}{}{}│", " ".repeat(left), text, " ".repeat(right)));
        } else {
            lines.push(format!("│{}│", " ".repeat(inner)));
        }
    }
    lines.push(format!("└{}┘", "─".repeat(inner)));
    lines.join("\n")
}
