//! Greedy word wrap against the static font metrics.
//!
//! Words are separated by any run of whitespace and are never split. A word wider
//! than the line still gets a line of its own; that overflow is accepted.

use crate::layout::font_metrics::{get_metrics, Font, FontMetricTable};

/// Lazily produced wrapped lines of a text.
///
/// Cloning the iterator before consuming it restarts the wrap from the same point.
#[derive(Clone)]
pub struct WrappedLines<'a> {
    words: std::str::SplitWhitespace<'a>,
    /// Word that overflowed the previous line and opens the next one.
    carry: Option<&'a str>,
    metrics: &'static FontMetricTable,
    size: f32,
    max_width: f32,
}

impl Iterator for WrappedLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let first = self.carry.take().or_else(|| self.words.next())?;
        let mut line = String::from(first);
        let mut line_units = self.metrics.units(first);
        let space_units = self.metrics.units(" ");
        let (size, max_width) = (self.size, self.max_width);

        for word in self.words.by_ref() {
            let candidate_units = line_units + space_units + self.metrics.units(word);
            if candidate_units as f32 / 1000.0 * size > max_width {
                self.carry = Some(word);
                break;
            }
            line.push(' ');
            line.push_str(word);
            line_units = candidate_units;
        }
        Some(line)
    }
}

/// Wraps `text` into lines no wider than `max_width` points at `font`/`size`.
pub fn wrap(text: &str, max_width: f32, font: Font, size: f32) -> WrappedLines<'_> {
    WrappedLines {
        words: text.split_whitespace(),
        carry: None,
        metrics: get_metrics(font),
        size,
        max_width,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
