use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::util::unicode;

/// Checkbox symbol for an item
pub(super) fn check_symbol(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// A rectangle of fixed size centered in `area`, shrunk to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_shrinks_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect_fixed(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect_fixed(60, 20, area), area);
    }

    #[test]
    fn spans_width_counts_wide_chars() {
        let spans = vec![Span::raw("ab"), Span::raw("你")];
        assert_eq!(spans_width(&spans), 4);
    }
}
