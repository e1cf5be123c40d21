//! # Text Layout
//!
//! Greedy line breaking and text block measurement.
//!
//! Break opportunities come from UAX#14 (`unicode-linebreak`); widths come
//! from the standard font metrics. A word wider than the available width
//! is split between characters so no line ever exceeds `max_width` unless
//! a single character does.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::{FontRegistry, FontSpec, StandardFontMetrics};

/// Line pitch as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Distance from the top of a line box to its baseline, as a multiple of the font size.
pub const ASCENT_FACTOR: f64 = 0.8;

/// Distance between consecutive baselines.
pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Height of a block of `line_count` lines: every line pitch except the
/// leading below the last line.
pub fn text_block_height(line_count: usize, font_size: f64) -> f64 {
    if line_count == 0 {
        return 0.0;
    }
    line_count as f64 * line_height(font_size) - font_size * (LINE_HEIGHT_FACTOR - 1.0)
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Break `text` into lines no wider than `max_width`.
///
/// Trailing whitespace is stripped from every line. Explicit newlines
/// always start a new line.
pub fn split_text_to_size(
    fonts: &FontRegistry,
    text: &str,
    font: &FontSpec,
    font_size: f64,
    max_width: f64,
) -> Vec<String> {
    let metrics = fonts.resolve(font).metrics();
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;
    let mut start = 0;

    for (end, opportunity) in linebreaks(text) {
        let segment = text[start..end].trim_end_matches(is_newline);
        start = end;

        let segment_width = metrics.measure_string(segment.trim_end(), font_size);
        if !line.is_empty() && line_width + segment_width > max_width {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0.0;
        }

        if line.is_empty() && segment_width > max_width {
            line_width = hard_break(metrics, segment, font_size, max_width, &mut lines, &mut line);
        } else {
            line.push_str(segment);
            line_width += metrics.measure_string(segment, font_size);
        }

        if opportunity == BreakOpportunity::Mandatory {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0.0;
        }
    }

    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Split an over-long segment between characters. Full pieces go to
/// `lines`; the last piece stays in `line`. Returns the width of `line`.
fn hard_break(
    metrics: &StandardFontMetrics,
    segment: &str,
    font_size: f64,
    max_width: f64,
    lines: &mut Vec<String>,
    line: &mut String,
) -> f64 {
    let mut width = 0.0;
    for ch in segment.chars() {
        let w = metrics.char_width(ch, font_size);
        if !line.is_empty() && !ch.is_whitespace() && width + w > max_width {
            lines.push(std::mem::take(line));
            width = 0.0;
        }
        line.push(ch);
        width += w;
    }
    width
}
