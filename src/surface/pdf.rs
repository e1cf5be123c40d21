//! The PDF-backed [`Surface`]: pages are kept as lists of draw operations
//! until [`crate::pdf::PdfWriter`] serializes them.

use std::sync::Arc;

use crate::error::Result;
use crate::font::{FontRegistry, FontSpec, StandardFont};
use crate::image_loader::{load_image, LoadedImage};
use crate::model::{ImageFormat, Metadata, PageSize, DEFAULT_FONT_SIZE};
use crate::pdf::PdfWriter;
use crate::text::split_text_to_size;

use super::{table, AutoTable, Surface};

/// An RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

/// One drawing instruction, in top-left page coordinates.
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// A block of lines; `y` is the top of the first line box.
    Text {
        lines: Vec<String>,
        x: f64,
        y: f64,
        font: StandardFont,
        font_size: f64,
        color: Color,
    },
    Image {
        image: Arc<LoadedImage>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        /// Stroke color and line width.
        stroke: Option<(Color, f64)>,
    },
}

/// A page's accumulated content.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Records draw operations per page and serializes them to PDF.
pub struct PdfSurface {
    page_size: PageSize,
    fonts: FontRegistry,
    pages: Vec<Page>,
    active: usize,
    font: FontSpec,
    font_size: f64,
    metadata: Metadata,
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new(PageSize::A4)
    }
}

impl PdfSurface {
    /// A one-page document of the given size.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            fonts: FontRegistry::new(),
            pages: vec![Page::default()],
            active: 0,
            font: FontSpec::default(),
            font_size: DEFAULT_FONT_SIZE,
            metadata: Metadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        self.pages[self.active].ops.push(op);
    }
}

impl Surface for PdfSurface {
    fn page_size(&self) -> (f64, f64) {
        self.page_size.dimensions()
    }

    fn font(&self) -> FontSpec {
        self.font.clone()
    }

    fn set_font(&mut self, font: &FontSpec) {
        if !self.fonts.contains(&font.family) {
            log::warn!("unknown font family '{}', drawing with helvetica", font.family);
        }
        self.font = font.clone();
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn split_text_to_size(&self, text: &str, max_width: f64) -> Vec<String> {
        split_text_to_size(&self.fonts, text, &self.font, self.font_size, max_width)
    }

    fn draw_text(&mut self, lines: &[String], x: f64, y: f64) {
        let op = DrawOp::Text {
            lines: lines.to_vec(),
            x,
            y,
            font: self.fonts.resolve(&self.font),
            font_size: self.font_size,
            color: Color::BLACK,
        };
        self.push(op);
    }

    fn draw_image(
        &mut self,
        data: &[u8],
        format: ImageFormat,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let image = Arc::new(load_image(data, format)?);
        self.push(DrawOp::Image {
            image,
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_auto_table(&mut self, table: &AutoTable) -> f64 {
        table::draw_table(self, table)
    }

    fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.active = self.pages.len() - 1;
    }

    fn insert_page_at(&mut self, index: usize) {
        let index = index.min(self.pages.len());
        self.pages.insert(index, Page::default());
        self.active = index;
    }

    fn set_active_page(&mut self, index: usize) {
        self.active = index.min(self.pages.len() - 1);
    }

    fn active_page(&self) -> usize {
        self.active
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn available_fonts(&self) -> Vec<String> {
        self.fonts.family_names()
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(PdfWriter::new().write(&self.pages, self.page_size, &self.metadata))
    }

    fn reset(&mut self) {
        self.pages = vec![Page::default()];
        self.active = 0;
        self.font = FontSpec::default();
        self.font_size = DEFAULT_FONT_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_page() {
        let surface = PdfSurface::default();
        assert_eq!(surface.page_count(), 1);
        assert_eq!(surface.active_page(), 0);
        assert_eq!(surface.page_size(), (595.28, 841.89));
    }

    #[test]
    fn insert_makes_page_active() {
        let mut surface = PdfSurface::default();
        surface.add_page();
        surface.add_page();
        surface.insert_page_at(1);
        assert_eq!(surface.page_count(), 4);
        assert_eq!(surface.active_page(), 1);

        surface.draw_text(&["toc".to_string()], 20.0, 20.0);
        assert_eq!(surface.pages()[1].ops.len(), 1);
        assert!(surface.pages()[3].ops.is_empty());
    }

    #[test]
    fn set_active_page_is_clamped() {
        let mut surface = PdfSurface::default();
        surface.set_active_page(9);
        assert_eq!(surface.active_page(), 0);
    }

    #[test]
    fn malformed_image_is_rejected_without_drawing() {
        let mut surface = PdfSurface::default();
        let result = surface.draw_image(b"not an image", ImageFormat::Jpeg, 0.0, 0.0, 10.0, 10.0);
        assert!(result.is_err());
        assert!(surface.pages()[0].ops.is_empty());
    }

    #[test]
    fn reset_discards_pages_and_font() {
        let mut surface = PdfSurface::default();
        surface.add_page();
        surface.set_font(&FontSpec::new("times", crate::model::FontStyle::Bold));
        surface.set_font_size(20.0);
        surface.reset();
        assert_eq!(surface.page_count(), 1);
        assert_eq!(surface.font(), FontSpec::default());
        assert_eq!(surface.font_size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn text_is_recorded_with_resolved_font() {
        let mut surface = PdfSurface::default();
        surface.set_font(&FontSpec::new("courier", crate::model::FontStyle::Italic));
        surface.draw_text(&["x".to_string()], 0.0, 0.0);
        match &surface.pages()[0].ops[0] {
            DrawOp::Text { font, .. } => assert_eq!(*font, StandardFont::CourierOblique),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
