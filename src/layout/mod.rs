//! # Layout Engine
//!
//! Turns a sequence of placement calls into absolute positions on a
//! [`Surface`].
//!
//! The engine keeps one cursor. In flow mode content runs down the current
//! column; when a block would cross the bottom of the usable area it moves
//! whole to the next column, or to a new page once every column is used.
//! Blocks are measured before they are drawn, so nothing ever straddles a
//! page boundary.
//!
//! Between [`LayoutEngine::start_row`] and [`LayoutEngine::end_row`] the
//! engine is in grid mode. Each [`LayoutEngine::add_col`] narrows the
//! cursor to one grid column, rewinds it to the row's top, and runs the
//! caller's ordinary placement calls inside it. The row commits its height
//! to the flow cursor only when it ends.
//!
//! ```text
//!   Idle ──placement──▶ Composing ──render / get_buffer──▶ Finished
//!     ▲                                                       │
//!     └─────────────────────────── reset ─────────────────────┘
//! ```
//!
//! Page numbers and the table of contents are whole-document passes; they
//! run once, in [`finish`], when output is requested.

pub mod columns;
pub mod finish;
pub mod grid;
pub mod page_break;

use std::path::{Path, PathBuf};

use crate::error::{FolioError, Result};
use crate::font::{FontSpec, DEFAULT_FONT_FAMILY};
use crate::model::{
    CellValue, ColumnLayoutOptions, FontStyle, ImageFormat, ImageOptions, TableOptions,
    TableRow, TextOptions, TocEntry, DEFAULT_IMAGE_HEIGHT,
};
use crate::surface::{AutoTable, PdfSurface, Surface, TableStyle};

use columns::ColumnLayout;
use grid::RowGrid;
use page_break::{decide_break, next_region, BreakDecision};

/// Band kept free above the bottom margin for page numbers.
pub const FOOTER_MARGIN: f64 = 50.0;

/// Where `render` writes unless told otherwise.
pub const DEFAULT_FILE_PATH: &str = "./output.pdf";

/// Font size and style of a table's name heading.
const TABLE_NAME_SIZE: f64 = 14.0;

/// Space a table needs below the cursor before it is started.
const TABLE_MIN_HEIGHT: f64 = 100.0;

/// Space `add_new_line` needs below the cursor.
const NEW_LINE_MIN_HEIGHT: f64 = 50.0;

/// The placement cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f64,
    /// Top of the next block.
    pub y: f64,
    /// Flow column the cursor is in, 0-based.
    pub column: usize,
    /// Width available to content at the cursor.
    pub content_width: f64,
}

/// Lifecycle of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Composing,
    Finished,
}

/// Flow placement, or placement inside an open row.
#[derive(Debug, Clone, PartialEq)]
enum LayoutMode {
    Flow,
    Grid(RowGrid),
}

impl LayoutMode {
    /// Where the cursor goes after a block whose bottom edge is `bottom`.
    ///
    /// Flow mode leaves one line of space below every block. Inside a row
    /// the cursor stops right at the bottom; the row adds its own gap.
    fn next_y(&self, bottom: f64, line_height: f64) -> f64 {
        match self {
            LayoutMode::Flow => bottom + line_height,
            LayoutMode::Grid(_) => bottom,
        }
    }
}

/// Places content on a [`Surface`], one document at a time.
pub struct LayoutEngine<S: Surface = PdfSurface> {
    surface: S,
    layout: ColumnLayout,
    cursor: Cursor,
    mode: LayoutMode,
    toc: Vec<TocEntry>,
    phase: Phase,
    default_font: String,
    file_path: PathBuf,
}

impl LayoutEngine<PdfSurface> {
    /// An engine drawing on a blank A4 [`PdfSurface`].
    pub fn new() -> Self {
        Self::with_surface(PdfSurface::default())
    }
}

impl Default for LayoutEngine<PdfSurface> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> LayoutEngine<S> {
    /// An engine drawing on `surface`, which should hold one blank page.
    pub fn with_surface(mut surface: S) -> Self {
        let (page_width, _) = surface.page_size();
        let layout = ColumnLayout::single(page_width);
        surface.set_font(&FontSpec::default());
        Self {
            surface,
            layout,
            cursor: Self::home(&layout),
            mode: LayoutMode::Flow,
            toc: Vec::new(),
            phase: Phase::Idle,
            default_font: DEFAULT_FONT_FAMILY.to_string(),
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
        }
    }

    fn home(layout: &ColumnLayout) -> Cursor {
        Cursor {
            x: layout.margin,
            y: layout.margin,
            column: 0,
            content_width: layout.column_width,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn column_layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_row(&self) -> bool {
        matches!(self.mode, LayoutMode::Grid(_))
    }

    /// Entries recorded so far. After finishing, page numbers include the
    /// inserted contents page.
    pub fn toc_entries(&self) -> &[TocEntry] {
        &self.toc
    }

    pub fn page_count(&self) -> usize {
        self.surface.page_count()
    }

    /// 1-based number of the page content is going to.
    pub fn current_page(&self) -> usize {
        self.surface.active_page() + 1
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    /// Y below which no content is placed.
    pub fn available_height(&self) -> f64 {
        let (_, page_height) = self.surface.page_size();
        page_height - self.layout.margin - FOOTER_MARGIN
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Reconfigure flow columns and move the cursor to the top of column 0.
    pub fn set_layout_columns(&mut self, options: &ColumnLayoutOptions) -> Result<()> {
        self.begin()?;
        let (page_width, _) = self.surface.page_size();
        self.layout = ColumnLayout::from_options(options, page_width);
        self.cursor = Self::home(&self.layout);
        log::debug!(
            "layout: {} column(s), width {:.2}",
            self.layout.columns,
            self.layout.column_width
        );
        Ok(())
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = path.into();
    }

    /// Use `name` for text that doesn't name a font. Tables and footers
    /// stay in Helvetica. Unknown names are ignored with a warning.
    pub fn set_default_font(&mut self, name: &str) {
        let family = name.to_ascii_lowercase();
        if !self.surface.available_fonts().contains(&family) {
            log::warn!("font '{name}' is not available, keeping '{}'", self.default_font);
            return;
        }
        self.surface.set_font(&FontSpec::new(family.clone(), FontStyle::Normal));
        self.default_font = family;
    }

    pub fn available_fonts(&self) -> Vec<String> {
        self.surface.available_fonts()
    }

    // ── Flow placement ─────────────────────────────────────────────

    /// Wrap `text` to the content width and draw it at the cursor.
    /// Blank text is ignored.
    pub fn add_text(&mut self, text: &str, options: &TextOptions) -> Result<()> {
        self.begin()?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let family = options
            .font_name
            .clone()
            .unwrap_or_else(|| self.default_font.clone());
        self.surface.set_font(&FontSpec::new(family, options.font_style));
        self.surface.set_font_size(options.font_size());

        let lines = self.surface.split_text_to_size(text, self.cursor.content_width);
        let height = self.surface.text_block_height(&lines);
        self.make_room(height);

        if options.add_to_index {
            self.record_toc(text.trim());
        }
        self.surface.draw_text(&lines, self.cursor.x, self.cursor.y);
        self.advance_past(self.cursor.y + height);
        Ok(())
    }

    /// Draw an image at the cursor. The width is clamped to the content
    /// width; the height defaults to 200pt.
    pub fn add_image(&mut self, data: &[u8], options: &ImageOptions) -> Result<()> {
        self.begin()?;
        let format = options
            .format
            .or_else(|| ImageFormat::sniff(data))
            .unwrap_or(ImageFormat::Jpeg);
        let width = options
            .width
            .map_or(self.cursor.content_width, |w| w.min(self.cursor.content_width));
        let height = options.height.unwrap_or(DEFAULT_IMAGE_HEIGHT);

        self.make_room(height);
        self.surface
            .draw_image(data, format, self.cursor.x, self.cursor.y, width, height)?;
        self.advance_past(self.cursor.y + height);
        Ok(())
    }

    /// Draw `rows` as a table. Headers come from the first row's keys,
    /// minus `options.ignore_fields`. An empty slice is ignored.
    pub fn add_generic_table(&mut self, rows: &[TableRow], options: &TableOptions) -> Result<()> {
        self.begin()?;
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let headers: Vec<String> = first
            .keys()
            .filter(|key| !options.ignore_fields.contains(*key))
            .cloned()
            .collect();
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|key| row.get(key).map(CellValue::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        if let Some(name) = &options.table_name {
            let heading = TextOptions {
                font_size: Some(TABLE_NAME_SIZE),
                font_style: FontStyle::Bold,
                font_name: None,
                add_to_index: options.add_to_index,
            };
            self.add_text(name, &heading)?;
            self.add_new_line(1)?;
        }

        self.make_room(TABLE_MIN_HEIGHT);
        if options.add_to_index && options.table_name.is_none() {
            self.record_toc(&headers.join(", "));
        }

        let (page_width, _) = self.surface.page_size();
        let table = AutoTable {
            headers,
            body,
            start_y: self.cursor.y,
            left: self.cursor.x,
            right: page_width - self.cursor.x - self.cursor.content_width,
            width: self.cursor.content_width,
            top_margin: self.layout.margin,
            bottom_limit: self.available_height(),
            style: TableStyle {
                font: FontSpec::new(DEFAULT_FONT_FAMILY, FontStyle::Normal),
                theme: options.theme,
                ..TableStyle::default()
            },
        };
        let final_y = self.surface.draw_auto_table(&table);
        log::debug!(
            "table of {} row(s) ends at y={final_y:.2} on page {}",
            rows.len(),
            self.current_page()
        );
        self.advance_past(final_y);
        Ok(())
    }

    /// Move down `count` lines and back to the left edge, then make sure
    /// some room is left on the page.
    pub fn add_new_line(&mut self, count: usize) -> Result<()> {
        self.begin()?;
        self.cursor.y += self.surface.line_height() * count as f64;
        self.cursor.x = self.region_left();
        self.check_page_break(NEW_LINE_MIN_HEIGHT);
        Ok(())
    }

    /// Start a new page with the cursor at the top-left margin.
    pub fn add_new_page(&mut self) -> Result<()> {
        self.begin()?;
        self.new_page();
        Ok(())
    }

    /// Start a new page if `required_height` does not fit below the cursor.
    pub fn check_page_break(&mut self, required_height: f64) {
        if self.cursor.y + required_height > self.available_height() {
            self.new_page();
        }
    }

    /// Move to the top of the next column, or of a new page after the
    /// last column.
    pub fn advance_column_or_page(&mut self) {
        let next = next_region(self.cursor.column, self.layout.columns);
        self.move_to(next);
    }

    // ── Row grid ───────────────────────────────────────────────────

    /// Open a row at the cursor.
    pub fn start_row(&mut self) -> Result<()> {
        self.begin()?;
        if self.in_row() {
            return Err(FolioError::RowState("start_row called inside an open row"));
        }
        let (page_width, _) = self.surface.page_size();
        let grid = RowGrid::new(page_width, self.layout.margin, self.cursor.y);
        log::debug!("row opened at y={:.2}", grid.row_start_y);
        self.mode = LayoutMode::Grid(grid);
        Ok(())
    }

    /// Fill the next `span` grid units of the open row with whatever
    /// `content` places. Every column starts at the row's top.
    pub fn add_col<F>(&mut self, span: u32, content: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.begin()?;
        let LayoutMode::Grid(grid) = &mut self.mode else {
            return Err(FolioError::RowState("add_col called outside a row"));
        };
        let (x, width) = grid.open_column(span);
        let start_y = grid.row_start_y;

        let saved = self.cursor;
        self.cursor.x = x;
        self.cursor.y = start_y;
        self.cursor.content_width = width;

        let outcome = content(self);

        let LayoutMode::Grid(grid) = &mut self.mode else {
            return Err(FolioError::RowState("row ended inside one of its columns"));
        };
        grid.close_column(width, self.cursor.y - start_y);
        self.cursor.x = saved.x;
        self.cursor.y = start_y;
        self.cursor.content_width = saved.content_width;
        outcome
    }

    /// Close the row and move the cursor below its tallest column.
    pub fn end_row(&mut self) -> Result<()> {
        self.begin()?;
        self.close_row()
    }

    fn close_row(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.mode, LayoutMode::Flow) {
            LayoutMode::Grid(grid) => {
                self.cursor.y = grid.bottom();
                log::debug!(
                    "row of {} column(s) closed, cursor at y={:.2}",
                    grid.column_heights.len(),
                    self.cursor.y
                );
                Ok(())
            }
            LayoutMode::Flow => Err(FolioError::RowState("end_row called without an open row")),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Discard everything and start a fresh one-page document. The output
    /// path is kept.
    pub fn reset(&mut self) {
        self.surface.reset();
        self.surface.set_font(&FontSpec::default());
        let (page_width, _) = self.surface.page_size();
        self.layout = ColumnLayout::single(page_width);
        self.cursor = Self::home(&self.layout);
        self.mode = LayoutMode::Flow;
        self.toc.clear();
        self.phase = Phase::Idle;
        self.default_font = DEFAULT_FONT_FAMILY.to_string();
    }

    /// Finish the document and write it to the configured path.
    pub fn render(&mut self) -> Result<PathBuf> {
        self.finish()?;
        self.surface.save(&self.file_path)?;
        log::debug!("document written to {}", self.file_path.display());
        Ok(self.file_path.clone())
    }

    /// Finish the document and return its bytes.
    pub fn get_buffer(&mut self) -> Result<Vec<u8>> {
        self.finish()?;
        self.surface.to_bytes()
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Gate every placement call on the lifecycle.
    fn begin(&mut self) -> Result<()> {
        match self.phase {
            Phase::Finished => Err(FolioError::DocumentFinished),
            Phase::Idle => {
                self.phase = Phase::Composing;
                Ok(())
            }
            Phase::Composing => Ok(()),
        }
    }

    /// Move to the next column or page if `height` does not fit.
    fn make_room(&mut self, height: f64) {
        let decision = decide_break(
            self.cursor.y,
            height,
            self.available_height(),
            self.cursor.column,
            self.layout.columns,
        );
        self.move_to(decision);
    }

    fn move_to(&mut self, decision: BreakDecision) {
        match decision {
            BreakDecision::Place => return,
            BreakDecision::MoveToNextColumn => {
                self.cursor.column += 1;
                log::debug!(
                    "continuing in column {} of page {}",
                    self.cursor.column + 1,
                    self.current_page()
                );
            }
            BreakDecision::MoveToNextPage => {
                self.surface.add_page();
                self.cursor.column = 0;
                log::debug!("continuing on page {}", self.current_page());
            }
        }
        self.cursor.x = self.layout.column_x(self.cursor.column);
        self.cursor.y = self.layout.margin;
    }

    fn new_page(&mut self) {
        self.surface.add_page();
        self.cursor.column = 0;
        self.cursor.x = self.layout.margin;
        self.cursor.y = self.layout.margin;
        log::debug!("new page {}", self.current_page());
    }

    /// The single point where placement moves the cursor down.
    fn advance_past(&mut self, bottom: f64) {
        self.cursor.y = self.mode.next_y(bottom, self.surface.line_height());
    }

    /// Left edge of the region the cursor is in: the open grid column, or
    /// the current flow column.
    fn region_left(&self) -> f64 {
        match &self.mode {
            LayoutMode::Grid(RowGrid {
                active_x: Some(x), ..
            }) => *x,
            _ => self.layout.column_x(self.cursor.column),
        }
    }

    fn record_toc(&mut self, label: &str) {
        let entry = TocEntry {
            label: label.to_string(),
            page_number: self.current_page(),
        };
        log::debug!("contents entry '{}' on page {}", entry.label, entry.page_number);
        self.toc.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnLayoutOptions;

    #[test]
    fn fresh_engine_starts_at_the_margin() {
        let engine = LayoutEngine::new();
        let cursor = engine.cursor();
        assert_eq!((cursor.x, cursor.y, cursor.column), (20.0, 20.0, 0));
        assert!((cursor.content_width - 555.28).abs() < 1e-9);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!((engine.available_height() - 771.89).abs() < 1e-9);
    }

    #[test]
    fn blank_text_is_a_no_op() {
        let mut engine = LayoutEngine::new();
        engine.add_text("   \n ", &TextOptions::default()).unwrap();
        assert_eq!(engine.cursor().y, 20.0);
        assert!(engine.surface().pages()[0].ops.is_empty());
    }

    #[test]
    fn text_advances_by_height_and_a_line() {
        let mut engine = LayoutEngine::new();
        engine.add_text("Hello", &TextOptions::default()).unwrap();
        // one 12pt line is 12pt tall, plus a 13.8pt line gap
        assert!((engine.cursor().y - (20.0 + 12.0 + 13.8)).abs() < 1e-9);
    }

    #[test]
    fn row_misuse_is_rejected() {
        let mut engine = LayoutEngine::new();
        assert!(matches!(engine.end_row(), Err(FolioError::RowState(_))));
        assert!(matches!(
            engine.add_col(6, |_| Ok(())),
            Err(FolioError::RowState(_))
        ));
        engine.start_row().unwrap();
        assert!(matches!(engine.start_row(), Err(FolioError::RowState(_))));
        engine.end_row().unwrap();
        assert!(!engine.in_row());
    }

    #[test]
    fn columns_flow_before_pages() {
        let mut engine = LayoutEngine::new();
        engine
            .set_layout_columns(&ColumnLayoutOptions::new(2, 20.0, 15.0))
            .unwrap();
        engine.advance_column_or_page();
        assert_eq!(engine.cursor().column, 1);
        assert_eq!(engine.page_count(), 1);
        engine.advance_column_or_page();
        assert_eq!(engine.cursor().column, 0);
        assert_eq!(engine.page_count(), 2);
        assert_eq!(engine.cursor().x, 20.0);
    }

    #[test]
    fn unknown_default_font_is_ignored() {
        let mut engine = LayoutEngine::new();
        engine.set_default_font("Comic Sans");
        assert_eq!(engine.default_font(), "helvetica");
        engine.set_default_font("Times");
        assert_eq!(engine.default_font(), "times");
    }

    #[test]
    fn finished_document_rejects_content() {
        let mut engine = LayoutEngine::new();
        engine.add_text("done", &TextOptions::default()).unwrap();
        engine.get_buffer().unwrap();
        assert_eq!(engine.phase(), Phase::Finished);
        assert!(matches!(
            engine.add_text("more", &TextOptions::default()),
            Err(FolioError::DocumentFinished)
        ));
        assert!(matches!(engine.get_buffer(), Err(FolioError::DocumentFinished)));

        engine.reset();
        assert_eq!(engine.phase(), Phase::Idle);
        engine.add_text("again", &TextOptions::default()).unwrap();
    }
}
