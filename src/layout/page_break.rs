//! # Page Break Decisions
//!
//! Content is measured before it is drawn, so the only question is where
//! it goes: here, at the top of the next column, or at the top of a new
//! page. Nothing is ever split; a block that does not fit moves whole.

/// Where the next block of content should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// It fits below the cursor.
    Place,
    /// Continue at the top of the next column on this page.
    MoveToNextColumn,
    /// Every column on this page is used; start a new page at column 0.
    MoveToNextPage,
}

/// Decide where a block of `required_height` goes when the cursor is at
/// `cursor_y` in column `column` of `columns`.
///
/// The block overflows when its bottom would pass `limit`; touching the
/// limit exactly still fits.
pub fn decide_break(
    cursor_y: f64,
    required_height: f64,
    limit: f64,
    column: usize,
    columns: usize,
) -> BreakDecision {
    if cursor_y + required_height <= limit {
        return BreakDecision::Place;
    }
    next_region(column, columns)
}

/// The region after column `column`, regardless of remaining space.
pub fn next_region(column: usize, columns: usize) -> BreakDecision {
    if column + 1 >= columns {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::MoveToNextColumn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        assert_eq!(decide_break(20.0, 700.0, 772.0, 0, 1), BreakDecision::Place);
    }

    #[test]
    fn touching_the_limit_fits() {
        assert_eq!(decide_break(20.0, 752.0, 772.0, 0, 1), BreakDecision::Place);
        assert_eq!(
            decide_break(20.0, 752.01, 772.0, 0, 1),
            BreakDecision::MoveToNextPage
        );
    }

    #[test]
    fn overflow_moves_to_next_column_first() {
        assert_eq!(
            decide_break(700.0, 100.0, 772.0, 0, 3),
            BreakDecision::MoveToNextColumn
        );
        assert_eq!(
            decide_break(700.0, 100.0, 772.0, 1, 3),
            BreakDecision::MoveToNextColumn
        );
        assert_eq!(
            decide_break(700.0, 100.0, 772.0, 2, 3),
            BreakDecision::MoveToNextPage
        );
    }

    #[test]
    fn oversized_block_still_moves() {
        // Taller than a whole page: it moves once and is drawn anyway
        assert_eq!(
            decide_break(20.0, 2000.0, 772.0, 0, 1),
            BreakDecision::MoveToNextPage
        );
    }
}
