//! # Auto Table
//!
//! Column sizing, cell wrapping and row pagination for generated tables.
//!
//! Columns start at their natural (unwrapped) width. If the table has room
//! to spare, the slack is shared in proportion to those widths; if it is
//! too narrow, every column keeps at least its widest word and the rest of
//! the space goes to the columns that can wrap. A row never splits across
//! pages: a row that would cross `bottom_limit` moves to a freshly inserted
//! page, under a repeated header.

use crate::font::{FontRegistry, FontSpec};
use crate::model::{FontStyle, TableTheme};
use crate::text::{split_text_to_size, text_block_height};

use super::pdf::{Color, DrawOp, PdfSurface};
use super::{AutoTable, Surface, TableStyle};

const HEADER_FILL: Color = Color::from_rgb8(66, 139, 202);
const STRIPE_FILL: Color = Color::from_rgb8(245, 245, 245);
const GRID_LINE: Color = Color::from_rgb8(200, 200, 200);
const GRID_LINE_WIDTH: f64 = 0.5;

/// A row after wrapping: lines per cell and the row's total height.
#[derive(Debug, Clone)]
pub struct RowLayout {
    pub cells: Vec<Vec<String>>,
    pub height: f64,
}

fn header_font(style: &TableStyle) -> FontSpec {
    FontSpec::new(style.font.family.clone(), FontStyle::Bold)
}

/// Resolve one width per column so the columns sum to `width`.
pub fn column_widths(
    fonts: &FontRegistry,
    style: &TableStyle,
    headers: &[String],
    body: &[Vec<String>],
    width: f64,
) -> Vec<f64> {
    let pad = 2.0 * style.cell_padding;
    let bold = header_font(style);
    let mut natural: Vec<f64> = Vec::with_capacity(headers.len());
    let mut minimum: Vec<f64> = Vec::with_capacity(headers.len());

    for (col, header) in headers.iter().enumerate() {
        let mut line_w = fonts.measure_string(header, &bold, style.font_size);
        let mut word_w = widest_word(fonts, header, &bold, style.font_size);
        for cell in body.iter().filter_map(|row| row.get(col)) {
            line_w = line_w.max(fonts.measure_string(cell, &style.font, style.font_size));
            word_w = word_w.max(widest_word(fonts, cell, &style.font, style.font_size));
        }
        natural.push(line_w + pad);
        minimum.push(word_w + pad);
    }

    let natural_total: f64 = natural.iter().sum();
    if natural_total <= 0.0 {
        return vec![width / headers.len().max(1) as f64; headers.len()];
    }
    if natural_total <= width {
        return natural.iter().map(|w| w / natural_total * width).collect();
    }

    let minimum_total: f64 = minimum.iter().sum();
    if minimum_total >= width {
        return minimum.iter().map(|w| w / minimum_total * width).collect();
    }

    let flexible: f64 = natural.iter().zip(&minimum).map(|(n, m)| n - m).sum();
    let spare = width - minimum_total;
    natural
        .iter()
        .zip(&minimum)
        .map(|(n, m)| m + (n - m) / flexible * spare)
        .collect()
}

fn widest_word(fonts: &FontRegistry, text: &str, font: &FontSpec, font_size: f64) -> f64 {
    text.split_whitespace()
        .map(|word| fonts.measure_string(word, font, font_size))
        .fold(0.0, f64::max)
}

/// Wrap each cell into its column and measure the row.
pub fn layout_row(
    fonts: &FontRegistry,
    font: &FontSpec,
    style: &TableStyle,
    cells: &[String],
    widths: &[f64],
) -> RowLayout {
    let inner = |w: f64| (w - 2.0 * style.cell_padding).max(0.0);
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(col, w)| {
            let text = cells.get(col).map(String::as_str).unwrap_or("");
            split_text_to_size(fonts, text, font, style.font_size, inner(*w))
        })
        .collect();
    let tallest = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
    RowLayout {
        height: text_block_height(tallest, style.font_size) + 2.0 * style.cell_padding,
        cells: wrapped,
    }
}

/// Draw `table` onto `surface`. Returns the Y below the last row.
pub fn draw_table(surface: &mut PdfSurface, table: &AutoTable) -> f64 {
    let (page_width, _) = surface.page_size();
    let width = table.width.min(page_width - table.left - table.right).max(0.0);
    let style = &table.style;

    let widths = column_widths(surface.fonts(), style, &table.headers, &table.body, width);
    let header = layout_row(surface.fonts(), &header_font(style), style, &table.headers, &widths);
    let rows: Vec<RowLayout> = table
        .body
        .iter()
        .map(|cells| layout_row(surface.fonts(), &style.font, style, cells, &widths))
        .collect();

    let mut y = table.start_y;
    let first_row = rows.first().map_or(0.0, |r| r.height);
    if y + header.height + first_row > table.bottom_limit && y > table.top_margin {
        next_page(surface);
        y = table.top_margin;
    }

    paint_row(surface, table, &widths, &header, y, RowKind::Header);
    y += header.height;

    for (index, row) in rows.iter().enumerate() {
        if y + row.height > table.bottom_limit {
            log::debug!("table row {index} continues on a new page");
            next_page(surface);
            y = table.top_margin;
            paint_row(surface, table, &widths, &header, y, RowKind::Header);
            y += header.height;
        }
        paint_row(surface, table, &widths, row, y, RowKind::Body(index));
        y += row.height;
    }

    y
}

fn next_page(surface: &mut PdfSurface) {
    let after = surface.active_page() + 1;
    surface.insert_page_at(after);
}

#[derive(Clone, Copy)]
enum RowKind {
    Header,
    Body(usize),
}

fn paint_row(
    surface: &mut PdfSurface,
    table: &AutoTable,
    widths: &[f64],
    row: &RowLayout,
    y: f64,
    kind: RowKind,
) {
    let style = &table.style;
    let total_width: f64 = widths.iter().sum();

    let fill = match (style.theme, kind) {
        (TableTheme::Striped | TableTheme::Grid, RowKind::Header) => Some(HEADER_FILL),
        (TableTheme::Striped, RowKind::Body(i)) if i % 2 == 1 => Some(STRIPE_FILL),
        _ => None,
    };
    if let Some(color) = fill {
        surface.push(DrawOp::Rect {
            x: table.left,
            y,
            width: total_width,
            height: row.height,
            fill: Some(color),
            stroke: None,
        });
    }

    let (font, color) = match (style.theme, kind) {
        (TableTheme::Plain, RowKind::Header) => (header_font(style), Color::BLACK),
        (_, RowKind::Header) => (header_font(style), Color::WHITE),
        (_, RowKind::Body(_)) => (style.font.clone(), Color::from_rgb8(80, 80, 80)),
    };
    let resolved = surface.fonts().resolve(&font);

    let mut x = table.left;
    for (col, w) in widths.iter().enumerate() {
        if style.theme == TableTheme::Grid {
            surface.push(DrawOp::Rect {
                x,
                y,
                width: *w,
                height: row.height,
                fill: None,
                stroke: Some((GRID_LINE, GRID_LINE_WIDTH)),
            });
        }
        if let Some(lines) = row.cells.get(col).filter(|lines| !lines.is_empty()) {
            surface.push(DrawOp::Text {
                lines: lines.clone(),
                x: x + style.cell_padding,
                y: y + style.cell_padding,
                font: resolved,
                font_size: style.font_size,
                color,
            });
        }
        x += w;
    }
}
