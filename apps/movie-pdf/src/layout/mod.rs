// Layout engine: font metrics, word wrap and the paginating cursor.
// Measuring and wrapping are pure functions; all mutable state lives in
// `LayoutCursor`, which callers pass explicitly.

pub mod cursor;
pub mod font_metrics;
pub mod wrap;

pub use cursor::{default_page_geometry, LayoutCursor, PageGeometry};
pub use font_metrics::Font;
pub use wrap::wrap;
