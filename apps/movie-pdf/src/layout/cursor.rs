//! Vertical cursor and pagination.
//!
//! The cursor owns the open `PageSurface` and its vertical position. Before every
//! line it checks the bottom margin; when the position has dropped below it, the
//! page is finalized into the document and a fresh surface starts at the top.
//! Invariant: no baseline is ever drawn below `geometry.margin`.

use std::mem;

use tracing::debug;

use crate::errors::AppError;
use crate::layout::font_metrics::{get_metrics, Font};
use crate::render::document::{PageSurface, PdfDocument};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Fixed page dimensions, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Left margin, right margin and bottom limit for baselines.
    pub margin: f32,
    /// Baseline of the first line on a fresh page.
    pub top: f32,
    pub line_height: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

/// US Letter, 50pt margins, first baseline at 750pt, 20pt line pitch.
pub fn default_page_geometry() -> PageGeometry {
    PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 50.0,
        top: 750.0,
        line_height: 20.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

pub struct LayoutCursor {
    page: PageSurface,
    y: f32,
    geometry: PageGeometry,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            page: PageSurface::new(),
            y: geometry.top,
            geometry,
        }
    }

    #[cfg(test)]
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// The page currently being drawn on.
    #[cfg(test)]
    pub fn page(&self) -> &PageSurface {
        &self.page
    }

    /// Draws `text` at the left margin, breaking the page first if needed.
    pub fn write_line(
        &mut self,
        doc: &mut PdfDocument,
        text: &str,
        font: Font,
        size: f32,
    ) -> Result<(), AppError> {
        self.break_if_exhausted(doc)?;
        self.page
            .show_text(self.geometry.margin, self.y, font, size, text);
        self.y -= self.geometry.line_height;
        Ok(())
    }

    /// Draws `text` centered on the page width, breaking the page first if needed.
    pub fn write_centered_line(
        &mut self,
        doc: &mut PdfDocument,
        text: &str,
        font: Font,
        size: f32,
    ) -> Result<(), AppError> {
        self.break_if_exhausted(doc)?;
        let text_width = get_metrics(font).measure_str(text, size);
        let x = (self.geometry.width - text_width) / 2.0;
        self.page.show_text(x, self.y, font, size, text);
        self.y -= self.geometry.line_height;
        Ok(())
    }

    /// Moves the cursor down by `gap` without drawing.
    pub fn advance(&mut self, gap: f32) {
        self.y -= gap;
    }

    /// Draws image `name` centered, top edge at the cursor, then moves below it by
    /// `height + gap`. Breaks the page first when the image would cross the bottom margin.
    pub fn place_image(
        &mut self,
        doc: &mut PdfDocument,
        name: &str,
        width: f32,
        height: f32,
        gap: f32,
    ) -> Result<(), AppError> {
        if self.y - height < self.geometry.margin && !self.page.is_blank() {
            self.start_new_page(doc)?;
        }
        let x = (self.geometry.width - width) / 2.0;
        self.page
            .draw_image(name, x, self.y - height, width, height);
        self.y -= height + gap;
        Ok(())
    }

    /// Finalizes the last open page.
    pub fn finish(self, doc: &mut PdfDocument) -> Result<(), AppError> {
        doc.append_page(self.page)?;
        Ok(())
    }

    fn break_if_exhausted(&mut self, doc: &mut PdfDocument) -> Result<(), AppError> {
        if self.y < self.geometry.margin {
            self.start_new_page(doc)?;
        }
        Ok(())
    }

    fn start_new_page(&mut self, doc: &mut PdfDocument) -> Result<(), AppError> {
        let full = mem::take(&mut self.page);
        doc.append_page(full)?;
        self.y = self.geometry.top;
        debug!(pages = doc.page_count(), "Page break");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (LayoutCursor, PdfDocument) {
        let geometry = default_page_geometry();
        (
            LayoutCursor::new(geometry),
            PdfDocument::new("Test", &geometry),
        )
    }

    #[test]
    fn test_write_line_draws_at_margin_and_advances() {
        let (mut cursor, mut doc) = setup();
        cursor
            .write_line(&mut doc, "Year: 2010", Font::Helvetica, 14.0)
            .unwrap();
        assert_eq!(cursor.page().text_origins(), vec![(50.0, 750.0)]);
        assert_eq!(cursor.y(), 730.0);
        assert_eq!(doc.page_count(), 0, "page is still open");
    }

    #[test]
    fn test_page_holds_36_lines_before_breaking() {
        let (mut cursor, mut doc) = setup();
        for i in 0..36 {
            cursor
                .write_line(&mut doc, &format!("line {i}"), Font::Helvetica, 14.0)
                .unwrap();
        }
        assert_eq!(doc.page_count(), 0);
        assert_eq!(cursor.page().text_origins().last(), Some(&(50.0, 50.0)));

        cursor
            .write_line(&mut doc, "line 36", Font::Helvetica, 14.0)
            .unwrap();
        assert_eq!(doc.page_count(), 1, "exactly one page break");
        assert_eq!(cursor.page().text_origins(), vec![(50.0, 750.0)]);
    }

    #[test]
    fn test_no_baseline_below_bottom_margin() {
        let (mut cursor, mut doc) = setup();
        let margin = cursor.geometry().margin;
        let top = cursor.geometry().top;
        for i in 0..200 {
            let pages_before = doc.page_count();
            let y_before = cursor.y();
            cursor
                .write_line(&mut doc, &format!("line {i}"), Font::Helvetica, 14.0)
                .unwrap();
            let (_, y) = *cursor.page().text_origins().last().unwrap();
            assert!(y >= margin, "line {i} drawn at {y}, below {margin}");

            let pages_added = doc.page_count() - pages_before;
            if y_before < margin {
                assert_eq!(pages_added, 1);
                assert_eq!(y, top);
            } else {
                assert_eq!(pages_added, 0);
            }
        }
        cursor.finish(&mut doc).unwrap();
        assert_eq!(doc.page_count(), 6, "200 lines at 36 per page");
    }

    #[test]
    fn test_font_is_reapplied_after_page_break() {
        let (mut cursor, mut doc) = setup();
        cursor.advance(750.0 - 40.0);
        cursor
            .write_line(&mut doc, "after break", Font::Helvetica, 14.0)
            .unwrap();
        assert_eq!(doc.page_count(), 1);
        let operators: Vec<&str> = cursor
            .page()
            .operations()
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(operators, vec!["BT", "Tf", "Td", "Tj", "ET"]);
    }

    #[test]
    fn test_centered_line_is_centered() {
        let (mut cursor, mut doc) = setup();
        let text = "Title: Inception";
        cursor
            .write_centered_line(&mut doc, text, Font::HelveticaBold, 24.0)
            .unwrap();
        let width = get_metrics(Font::HelveticaBold).measure_str(text, 24.0);
        let (x, y) = cursor.page().text_origins()[0];
        assert!((x - (612.0 - width) / 2.0).abs() < 1e-3);
        assert_eq!(y, 750.0);
    }

    #[test]
    fn test_centered_line_breaks_page_near_bottom() {
        let (mut cursor, mut doc) = setup();
        cursor
            .write_line(&mut doc, "filler", Font::Helvetica, 14.0)
            .unwrap();
        cursor.advance(700.0);
        cursor
            .write_centered_line(&mut doc, "Heading", Font::HelveticaBold, 24.0)
            .unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(cursor.page().text_origins()[0].1, 750.0);
    }

    #[test]
    fn test_place_image_centers_and_advances() {
        let (mut cursor, mut doc) = setup();
        cursor.advance(50.0);
        cursor
            .place_image(&mut doc, "Im1", 200.0, 300.0, 30.0)
            .unwrap();
        let cm = cursor
            .page()
            .operations()
            .iter()
            .find(|op| op.operator == "cm")
            .unwrap();
        let values: Vec<f32> = cm.operands.iter().map(|o| o.as_float().unwrap()).collect();
        assert_eq!(values, vec![200.0, 0.0, 0.0, 300.0, 206.0, 400.0]);
        assert_eq!(cursor.y(), 370.0);
    }

    #[test]
    fn test_place_image_breaks_page_when_it_would_overflow() {
        let (mut cursor, mut doc) = setup();
        cursor
            .write_line(&mut doc, "filler", Font::Helvetica, 14.0)
            .unwrap();
        cursor.advance(500.0);
        cursor
            .place_image(&mut doc, "Im1", 200.0, 300.0, 30.0)
            .unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(cursor.y(), 750.0 - 330.0);
    }
}
