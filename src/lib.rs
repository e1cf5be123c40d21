//! # Folio
//!
//! A cursor-driven PDF layout engine.
//!
//! Content is placed by a sequence of calls: text, images, tables, line
//! and page breaks, and 12-unit grid rows. Each call measures its content
//! first and moves to the next column or page when it would not fit, so
//! blocks are never cut at a page boundary. Page numbers and a table of
//! contents are added once, when the document is finished.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON / API calls)
//!       ↓
//!   [request]  — Content blocks replayed as engine calls
//!       ↓
//!   [layout]   — Cursor, columns, row grid, pagination, finishing
//!       ↓
//!   [surface]  — Measure, wrap and draw; auto-table layout
//!       ↓
//!   [pdf]      — Serialize pages to PDF bytes
//! ```
//!
//! ```no_run
//! use folio::layout::LayoutEngine;
//! use folio::model::TextOptions;
//!
//! # fn main() -> folio::error::Result<()> {
//! let mut engine = LayoutEngine::new();
//! engine.add_text("Hello", &TextOptions::sized(18.0).indexed())?;
//! let pdf = engine.get_buffer()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod request;
pub mod surface;
pub mod text;

use error::Result;
use layout::LayoutEngine;
use request::{DocumentRequest, ReportTemplate};
use surface::PdfSurface;

/// Lay out a request on A4 pages and return the PDF bytes.
pub fn render_request(request: &DocumentRequest) -> Result<Vec<u8>> {
    let surface = PdfSurface::default().with_metadata(request.resolved_metadata());
    let mut engine = LayoutEngine::with_surface(surface);
    request.apply(&mut engine)?;
    engine.get_buffer()
}

/// Parse a [`DocumentRequest`] from JSON and render it.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    let request: DocumentRequest = serde_json::from_str(json)?;
    render_request(&request)
}

/// Parse a [`ReportTemplate`] from JSON and render it.
pub fn render_report_json(json: &str) -> Result<Vec<u8>> {
    let report: ReportTemplate = serde_json::from_str(json)?;
    let mut engine = LayoutEngine::new();
    report.apply(&mut engine)?;
    engine.get_buffer()
}
