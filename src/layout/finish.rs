//! # Finishing Passes
//!
//! Run once, when output is requested, because both need the final page
//! count. Footers are stamped first; the contents page is inserted after
//! them, so it carries no footer and is not part of the "of N" total.

use indexmap::IndexMap;

use crate::error::{FolioError, Result};
use crate::font::{FontSpec, DEFAULT_FONT_FAMILY};
use crate::model::{CellValue, FontStyle, TableOptions, TableRow};
use crate::surface::Surface;
use crate::text::ASCENT_FACTOR;

use super::{Cursor, LayoutEngine, Phase};

pub const TOC_TITLE: &str = "Table of Contents";

/// 0-based position of the contents page: right after the title page.
pub const TOC_PAGE_INDEX: usize = 1;

const PAGE_NUMBER_SIZE: f64 = 10.0;

impl<S: Surface> LayoutEngine<S> {
    pub(super) fn finish(&mut self) -> Result<()> {
        if self.phase == Phase::Finished {
            return Err(FolioError::DocumentFinished);
        }
        if self.in_row() {
            log::warn!("closing a row left open before finishing");
            self.close_row()?;
        }
        self.stamp_page_numbers();
        if !self.toc.is_empty() {
            self.insert_table_of_contents()?;
        }
        self.phase = Phase::Finished;
        log::debug!("document finished with {} page(s)", self.surface.page_count());
        Ok(())
    }

    /// Insert a page after the first one listing every recorded entry.
    fn insert_table_of_contents(&mut self) -> Result<()> {
        for entry in &mut self.toc {
            entry.page_number += 1;
        }
        let rows: Vec<TableRow> = self
            .toc
            .iter()
            .map(|entry| {
                IndexMap::from([
                    ("Index".to_string(), CellValue::from(entry.label.as_str())),
                    ("Page".to_string(), CellValue::Integer(entry.page_number as i64)),
                ])
            })
            .collect();

        self.surface.insert_page_at(TOC_PAGE_INDEX);
        let (page_width, _) = self.surface.page_size();
        self.cursor = Cursor {
            x: self.layout.margin,
            y: self.layout.margin,
            column: 0,
            content_width: page_width - 2.0 * self.layout.margin,
        };
        log::debug!(
            "contents page with {} entries at page {}",
            rows.len(),
            self.current_page()
        );

        let options = TableOptions {
            add_to_index: false,
            ..TableOptions::named(TOC_TITLE)
        };
        self.add_generic_table(&rows, &options)
    }

    /// Stamp "Page i of N" on every page, leaving font and active page as
    /// they were.
    fn stamp_page_numbers(&mut self) {
        let total = self.surface.page_count();
        let saved_font = self.surface.font();
        let saved_size = self.surface.font_size();
        let saved_page = self.surface.active_page();

        let (_, page_height) = self.surface.page_size();
        let baseline = page_height - self.layout.margin / 2.0;
        let top = baseline - PAGE_NUMBER_SIZE * ASCENT_FACTOR;

        self.surface
            .set_font(&FontSpec::new(DEFAULT_FONT_FAMILY, FontStyle::Normal));
        self.surface.set_font_size(PAGE_NUMBER_SIZE);
        for index in 0..total {
            self.surface.set_active_page(index);
            let label = format!("Page {} of {}", index + 1, total);
            self.surface.draw_text(&[label], self.layout.margin, top);
        }

        self.surface.set_active_page(saved_page);
        self.surface.set_font(&saved_font);
        self.surface.set_font_size(saved_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::model::TextOptions;
    use crate::surface::DrawOp;

    fn footer_labels(engine: &LayoutEngine) -> Vec<String> {
        engine
            .surface()
            .pages()
            .iter()
            .flat_map(|page| page.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { lines, .. } if lines[0].starts_with("Page ") => {
                    Some(lines[0].clone())
                }
                _ => None,
            })
            .collect()
    }

    fn texts_on_page(engine: &LayoutEngine, page: usize) -> Vec<String> {
        engine.surface().pages()[page]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { lines, .. } => Some(lines.join(" ")),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn every_page_gets_a_footer() {
        let mut engine = LayoutEngine::new();
        engine.add_text("one", &TextOptions::default()).unwrap();
        engine.add_new_page().unwrap();
        engine.add_text("two", &TextOptions::default()).unwrap();
        engine.get_buffer().unwrap();

        assert_eq!(footer_labels(&engine), vec!["Page 1 of 2", "Page 2 of 2"]);
    }

    #[test]
    fn contents_page_is_second_and_unnumbered() {
        let mut engine = LayoutEngine::new();
        engine.add_text("Title", &TextOptions::default()).unwrap();
        engine.add_new_page().unwrap();
        engine
            .add_text("Chapter", &TextOptions::default().indexed())
            .unwrap();
        engine.get_buffer().unwrap();

        assert_eq!(engine.page_count(), 3);
        assert_eq!(engine.toc_entries()[0].page_number, 3);
        let toc_page = &engine.surface().pages()[TOC_PAGE_INDEX];
        assert!(toc_page.ops.iter().any(
            |op| matches!(op, DrawOp::Text { lines, .. } if lines[0] == TOC_TITLE)
        ));
        assert!(!toc_page.ops.iter().any(
            |op| matches!(op, DrawOp::Text { lines, .. } if lines[0].starts_with("Page "))
        ));
        assert_eq!(footer_labels(&engine), vec!["Page 1 of 2", "Page 2 of 2"]);
        assert!(texts_on_page(&engine, 2).contains(&"Page 2 of 2".to_string()));
    }

    #[test]
    fn footers_ignore_the_default_font() {
        let mut engine = LayoutEngine::new();
        engine.set_default_font("courier");
        engine.add_text("mono", &TextOptions::default()).unwrap();
        engine.get_buffer().unwrap();

        let footer_font = engine.surface().pages()[0].ops.iter().find_map(|op| match op {
            DrawOp::Text { lines, font, .. } if lines[0].starts_with("Page ") => Some(*font),
            _ => None,
        });
        assert_eq!(footer_font, Some(StandardFont::Helvetica));
    }

    #[test]
    fn font_is_restored_after_stamping() {
        let mut engine = LayoutEngine::new();
        engine.add_text("big", &TextOptions::sized(20.0)).unwrap();
        engine.get_buffer().unwrap();
        assert_eq!(engine.surface().font_size(), 20.0);
    }

    #[test]
    fn open_row_is_closed_on_finish() {
        let mut engine = LayoutEngine::new();
        engine.start_row().unwrap();
        engine
            .add_col(12, |e| e.add_text("inside", &TextOptions::default()))
            .unwrap();
        engine.get_buffer().unwrap();
        assert!(!engine.in_row());
    }
}
