//! # Drawing Surface
//!
//! The layout engine never touches page buffers. It talks to a [`Surface`]:
//! something that can measure and draw text, place images, lay out tables,
//! manage pages and finally produce bytes. [`PdfSurface`] is the real
//! implementation; tests inject recording doubles.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and Y growing downward. The PDF writer flips them.

pub mod pdf;
pub mod table;

use std::path::Path;

pub use pdf::{Color, DrawOp, Page, PdfSurface};

use crate::error::{FolioError, Result};
use crate::font::FontSpec;
use crate::model::{ImageFormat, TableTheme};
use crate::text;

/// A table handed to [`Surface::draw_auto_table`].
#[derive(Debug, Clone)]
pub struct AutoTable {
    pub headers: Vec<String>,
    pub body: Vec<Vec<String>>,
    /// Top of the header row on the active page.
    pub start_y: f64,
    pub left: f64,
    /// Distance kept free between the table and the right page edge.
    pub right: f64,
    /// Requested table width; never exceeds the space between the margins.
    pub width: f64,
    /// Where rows continue after a page break.
    pub top_margin: f64,
    /// Rows may not extend below this Y.
    pub bottom_limit: f64,
    pub style: TableStyle,
}

/// Typography and theme of a table.
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub font: FontSpec,
    pub font_size: f64,
    pub cell_padding: f64,
    pub theme: TableTheme,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            font_size: 10.0,
            cell_padding: 3.0,
            theme: TableTheme::Striped,
        }
    }
}

/// Everything the layout engine needs from a page-producing backend.
///
/// Page indices are 0-based. Drawing calls go to the active page.
pub trait Surface {
    /// Page (width, height) in points.
    fn page_size(&self) -> (f64, f64);

    fn font(&self) -> FontSpec;

    /// Select the font for subsequent measurement and drawing.
    fn set_font(&mut self, font: &FontSpec);

    fn font_size(&self) -> f64;

    fn set_font_size(&mut self, size: f64);

    /// Baseline-to-baseline distance at the current font size.
    fn line_height(&self) -> f64 {
        text::line_height(self.font_size())
    }

    /// Wrap `text` to `max_width` using the current font and size.
    fn split_text_to_size(&self, text: &str, max_width: f64) -> Vec<String>;

    /// Height of `lines` when drawn with the current font size.
    fn text_block_height(&self, lines: &[String]) -> f64 {
        text::text_block_height(lines.len(), self.font_size())
    }

    /// Draw `lines` with the block's top edge at `y`.
    fn draw_text(&mut self, lines: &[String], x: f64, y: f64);

    /// Decode and place an image. Fails on bytes that are not a `format` image.
    fn draw_image(
        &mut self,
        data: &[u8],
        format: ImageFormat,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()>;

    /// Lay out and draw a table, paginating as needed. Returns the Y just
    /// below the last row, on the page that is active afterwards.
    fn draw_auto_table(&mut self, table: &AutoTable) -> f64;

    /// Append a blank page and make it active.
    fn add_page(&mut self);

    /// Insert a blank page at `index` and make it active.
    fn insert_page_at(&mut self, index: usize);

    fn set_active_page(&mut self, index: usize);

    fn active_page(&self) -> usize;

    fn page_count(&self) -> usize;

    /// Font family names accepted by [`Surface::set_font`].
    fn available_fonts(&self) -> Vec<String>;

    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Persist the serialized document.
    fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| FolioError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Discard every page and start over with one blank page.
    fn reset(&mut self);
}
