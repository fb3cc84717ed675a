//! Parser for `wlr-randr` text output.
//!
//! The tool prints one block per output device: a zero-indent header
//! line (`NAME "Description"`) followed by indented detail lines.
//! Detail lines the parser does not recognize are silently ignored, so
//! additional tool output does not break it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::transport::protocol::Display;

static POSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Position:\s*(\d+),(\d+)").expect("valid regex"));
static SCALE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Scale:\s*([\d.]+)").expect("valid regex"));
static MODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)x(\d+)\s*px").expect("valid regex"));

/// Parse enumeration output into enabled outputs, in input order.
///
/// Empty input yields an empty list. Disabled outputs are parsed but
/// filtered out before being returned.
#[must_use]
pub fn parse_outputs(text: &str) -> Vec<Display> {
    parse_blocks(text)
        .into_iter()
        .filter(|d| d.enabled)
        .collect()
}

/// Parse every block, including disabled outputs.
fn parse_blocks(text: &str) -> Vec<Display> {
    let mut displays = Vec::new();
    let mut current: Option<Display> = None;

    for line in text.lines() {
        // A new output block starts on a line with no leading whitespace
        if !line.is_empty() && !line.starts_with(' ') {
            if let Some(done) = current.take() {
                displays.push(done);
            }

            let mut parts = line.splitn(2, ' ');
            let name = parts.next().unwrap_or_default();
            let description = parts.next().unwrap_or_default().replace('"', "");
            current = Some(Display::new(name, description));
        } else if line.starts_with(' ') {
            if let Some(display) = current.as_mut() {
                apply_detail_line(display, line.trim());
            }
        }
    }

    if let Some(done) = current.take() {
        displays.push(done);
    }

    displays
}

/// Fold one trimmed detail line into the current record.
///
/// Each field is independently optional and order-insensitive; a line
/// whose pattern does not match leaves the field at its default.
fn apply_detail_line(display: &mut Display, line: &str) {
    if let Some(rest) = line.strip_prefix("Enabled:") {
        display.enabled = rest.contains("yes");
    } else if line.starts_with("Position:") {
        if let Some(caps) = POSITION_RE.captures(line) {
            if let (Ok(x), Ok(y)) = (caps[1].parse(), caps[2].parse()) {
                display.x = x;
                display.y = y;
            }
        }
    } else if line.starts_with("Scale:") {
        if let Some(caps) = SCALE_RE.captures(line) {
            if let Ok(scale) = caps[1].parse() {
                display.scale = scale;
            }
        }
    } else if line.contains("current") && line.contains("px") {
        if let Some(caps) = MODE_RE.captures(line) {
            if let (Ok(width), Ok(height)) = (caps[1].parse(), caps[2].parse()) {
                display.width = width;
                display.height = height;
            }
        }
    }
}
