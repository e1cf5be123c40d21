//! # Row Grid
//!
//! A row divides the width between the page margins into 12 units
//! separated by fixed 10pt gaps. Every column of a row starts at the same
//! Y; the row as a whole consumes the height of its tallest column plus a
//! fixed 20pt gap.

/// Units across one row.
pub const GRID_UNITS: u32 = 12;

/// Horizontal gap between grid units.
pub const GRID_GAP: f64 = 10.0;

/// Vertical gap added below every row.
pub const ROW_GAP: f64 = 20.0;

/// State of an open row, alive between `start_row` and `end_row`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGrid {
    /// Width of one grid unit.
    pub unit_width: f64,
    /// Left edge of the next column.
    pub cursor_x: f64,
    /// Top shared by every column in the row.
    pub row_start_y: f64,
    /// Consumed height per column, in call order.
    pub column_heights: Vec<f64>,
    /// Left edge of the column currently being filled.
    pub active_x: Option<f64>,
    spans_used: u32,
}

impl RowGrid {
    pub fn new(page_width: f64, margin: f64, row_start_y: f64) -> Self {
        let gaps = (GRID_UNITS - 1) as f64 * GRID_GAP;
        Self {
            unit_width: (page_width - margin * 2.0 - gaps) / GRID_UNITS as f64,
            cursor_x: margin,
            row_start_y,
            column_heights: Vec::new(),
            active_x: None,
            spans_used: 0,
        }
    }

    /// Width of a column covering `span` units, including the gaps it spans.
    pub fn span_width(&self, span: u32) -> f64 {
        span as f64 * self.unit_width + (span as f64 - 1.0) * GRID_GAP
    }

    /// Reserve the next column. Returns its left edge and width.
    ///
    /// Spans outside 1..=12 are clamped. Rows may exceed 12 units; the
    /// overflow is logged and the columns keep going to the right.
    pub fn open_column(&mut self, span: u32) -> (f64, f64) {
        let clamped = span.clamp(1, GRID_UNITS);
        if clamped != span {
            log::warn!("column span {span} clamped to {clamped}");
        }
        let before = self.spans_used;
        self.spans_used += clamped;
        if before <= GRID_UNITS && self.spans_used > GRID_UNITS {
            log::warn!(
                "row spans {} grid units, columns past {GRID_UNITS} will overlap the margin",
                self.spans_used
            );
        }

        let x = self.cursor_x;
        self.active_x = Some(x);
        (x, self.span_width(clamped))
    }

    /// Record the height a column consumed and move to the next one.
    pub fn close_column(&mut self, width: f64, height: f64) {
        self.column_heights.push(height);
        self.cursor_x += width + GRID_GAP;
        self.active_x = None;
    }

    /// Y where flow content resumes once the row ends.
    pub fn bottom(&self) -> f64 {
        let tallest = self.column_heights.iter().copied().fold(0.0, f64::max);
        self.row_start_y + tallest + ROW_GAP
    }
}
