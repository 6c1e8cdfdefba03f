pub mod assembly;
pub mod document;
pub mod embed;

pub use assembly::{render_movie, SheetReport};
