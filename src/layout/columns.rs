//! Column configuration for flow layout.

use crate::model::ColumnLayoutOptions;

pub const DEFAULT_COLUMNS: usize = 1;
pub const DEFAULT_MARGIN: f64 = 20.0;
pub const DEFAULT_GAP: f64 = 10.0;

/// Resolved column geometry for the current page width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub columns: usize,
    pub margin: f64,
    pub gap: f64,
    /// `(page_width - 2 * margin - gap * (columns - 1)) / columns`
    pub column_width: f64,
}

impl ColumnLayout {
    /// One column, 20pt margins, 10pt gap.
    pub fn single(page_width: f64) -> Self {
        Self::compute(DEFAULT_COLUMNS, DEFAULT_MARGIN, DEFAULT_GAP, page_width)
    }

    /// Resolve `options` against `page_width`.
    ///
    /// Missing fields take the defaults and a column count below 1 is
    /// clamped to 1. If the result leaves no positive column width the
    /// default single-column layout is used instead.
    pub fn from_options(options: &ColumnLayoutOptions, page_width: f64) -> Self {
        let requested = options.columns.unwrap_or(DEFAULT_COLUMNS as i64);
        let columns = if requested < 1 {
            log::warn!("column count {requested} is not positive, using 1");
            1
        } else {
            requested as usize
        };
        let margin = options.margin.unwrap_or(DEFAULT_MARGIN);
        let gap = options.gap.unwrap_or(DEFAULT_GAP);

        let layout = Self::compute(columns, margin, gap, page_width);
        if layout.column_width > 0.0 {
            layout
        } else {
            log::warn!(
                "{columns} columns with margin {margin} and gap {gap} leave no room on a \
                 {page_width}pt page, using the default layout"
            );
            Self::single(page_width)
        }
    }

    fn compute(columns: usize, margin: f64, gap: f64, page_width: f64) -> Self {
        let column_width =
            (page_width - margin * 2.0 - gap * (columns as f64 - 1.0)) / columns as f64;
        Self {
            columns,
            margin,
            gap,
            column_width,
        }
    }

    /// Left edge of column `index`.
    pub fn column_x(&self, index: usize) -> f64 {
        self.margin + index as f64 * (self.column_width + self.gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_columns_on_a_595_page() {
        let layout = ColumnLayout::from_options(&ColumnLayoutOptions::new(2, 20.0, 15.0), 595.0);
        assert_eq!(layout.column_width, 270.0);
        assert_eq!(layout.column_x(0), 20.0);
        assert_eq!(layout.column_x(1), 305.0);
    }

    #[test]
    fn non_positive_columns_clamp_to_one() {
        for columns in [0, -3] {
            let layout =
                ColumnLayout::from_options(&ColumnLayoutOptions::new(columns, 20.0, 10.0), 595.0);
            assert_eq!(layout.columns, 1);
            assert_eq!(layout.column_width, 555.0);
        }
    }

    #[test]
    fn missing_fields_use_defaults() {
        let options = ColumnLayoutOptions {
            columns: Some(3),
            ..Default::default()
        };
        let layout = ColumnLayout::from_options(&options, 595.0);
        assert_eq!(layout.margin, DEFAULT_MARGIN);
        assert_eq!(layout.gap, DEFAULT_GAP);
        assert!((layout.column_width - 178.333_333).abs() < 1e-3);
    }

    #[test]
    fn impossible_layout_falls_back() {
        let layout = ColumnLayout::from_options(&ColumnLayoutOptions::new(4, 300.0, 10.0), 595.0);
        assert_eq!(layout, ColumnLayout::single(595.0));
    }
}
