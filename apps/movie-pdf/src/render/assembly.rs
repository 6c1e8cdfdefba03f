//! Per-record assembly of a movie sheet.
//!
//! # Stages
//! `Start → TitleDrawn → ImagePlaced | ImageSkipped → FieldsWritten →
//! DescriptionWritten → Persisted`. Every transition is unconditional except the
//! image step, which depends on the record carrying a thumbnail that can be
//! fetched and decoded. A thumbnail failure is logged and the sheet continues
//! with the cursor where the image would have started.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::layout::{wrap, Font, LayoutCursor, PageGeometry};
use crate::models::movie::{display_field, MovieRecord};
use crate::render::document::PdfDocument;
use crate::render::embed::EmbeddedImage;
use crate::state::BatchState;
use crate::thumbnails::{ThumbnailError, ThumbnailFetcher};

pub const TITLE_FONT_SIZE: f32 = 24.0;
pub const BODY_FONT_SIZE: f32 = 14.0;
/// Extra space below the title, on top of the line pitch.
const TITLE_GAP: f32 = 30.0;
const IMAGE_WIDTH: f32 = 200.0;
const IMAGE_HEIGHT: f32 = 300.0;
const IMAGE_GAP: f32 = 30.0;

// ────────────────────────────────────────────────────────────────────────────
// Content blocks
// ────────────────────────────────────────────────────────────────────────────

/// One semantic unit of text handed to the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Bold, centered; wrapped when wider than the content area.
    Heading(String),
    /// `Label: value`, or just `Label:` when there is no value.
    Field {
        label: &'static str,
        value: Option<String>,
    },
    /// Plain wrapped text.
    Paragraph(String),
}

impl ContentBlock {
    fn field(label: &'static str, value: String) -> Self {
        ContentBlock::Field {
            label,
            value: Some(value),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            ContentBlock::Heading(text) | ContentBlock::Paragraph(text) => Cow::Borrowed(text),
            ContentBlock::Field {
                label,
                value: Some(value),
            } => Cow::Owned(format!("{label}: {value}")),
            ContentBlock::Field { label, value: None } => Cow::Owned(format!("{label}:")),
        }
    }
}

pub fn title_block(record: &MovieRecord) -> ContentBlock {
    ContentBlock::Heading(format!("Title: {}", record.title))
}

/// Metadata lines, the description label and the description, in page order.
pub fn detail_blocks(record: &MovieRecord) -> Vec<ContentBlock> {
    vec![
        ContentBlock::field("Year", display_field(record.year.as_ref())),
        ContentBlock::field("Genres", display_field(record.genres.as_ref())),
        ContentBlock::field("Cast", display_field(record.cast.as_ref())),
        ContentBlock::field("YouTube Link", display_field(record.link.as_ref())),
        ContentBlock::Field {
            label: "Description",
            value: None,
        },
        ContentBlock::Paragraph(record.description()),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Outcome types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    TitleDrawn,
    ImagePlaced,
    ImageSkipped,
    FieldsWritten,
    DescriptionWritten,
    Persisted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Placed,
    /// The record has a thumbnail but it is malformed or could not be fetched or decoded.
    Skipped { reason: String },
    /// The record has no thumbnail.
    Absent,
}

impl fmt::Display for ImageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOutcome::Placed => f.write_str("placed"),
            ImageOutcome::Skipped { reason } => write!(f, "skipped ({reason})"),
            ImageOutcome::Absent => f.write_str("none"),
        }
    }
}

/// What one successfully persisted sheet looks like.
#[derive(Debug, Clone)]
pub struct SheetReport {
    pub path: PathBuf,
    pub pages: usize,
    pub image: ImageOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Sheet
// ────────────────────────────────────────────────────────────────────────────

/// Renders one record and writes it to `<output_dir>/<sanitized title>.pdf`.
pub fn render_movie(record: &MovieRecord, state: &BatchState) -> Result<SheetReport, AppError> {
    let mut sheet = MovieSheet::new(record, state.geometry);
    sheet.draw_title()?;
    let image = sheet.place_image(state.fetcher.as_ref())?;
    let (fields, description): (Vec<_>, Vec<_>) = detail_blocks(record)
        .into_iter()
        .partition(|block| matches!(block, ContentBlock::Field { .. }));
    sheet.write_fields(&fields)?;
    sheet.write_description(&description)?;
    let (path, pages) = sheet.persist(&state.config.output_dir)?;
    Ok(SheetReport { path, pages, image })
}

struct MovieSheet<'a> {
    record: &'a MovieRecord,
    doc: PdfDocument,
    cursor: LayoutCursor,
    stage: Stage,
}

impl<'a> MovieSheet<'a> {
    fn new(record: &'a MovieRecord, geometry: PageGeometry) -> Self {
        Self {
            record,
            doc: PdfDocument::new(&record.title, &geometry),
            cursor: LayoutCursor::new(geometry),
            stage: Stage::Start,
        }
    }

    fn enter(&mut self, next: Stage) {
        debug!(title = %self.record.title, from = ?self.stage, to = ?next, "Sheet stage");
        self.stage = next;
    }

    fn draw_title(&mut self) -> Result<(), AppError> {
        debug_assert_eq!(self.stage, Stage::Start);
        self.lay_out(&title_block(self.record))?;
        self.cursor.advance(TITLE_GAP);
        self.enter(Stage::TitleDrawn);
        Ok(())
    }

    fn place_image(&mut self, fetcher: &dyn ThumbnailFetcher) -> Result<ImageOutcome, AppError> {
        debug_assert_eq!(self.stage, Stage::TitleDrawn);
        let record = self.record;
        let url = match record.thumbnail_url() {
            Ok(Some(url)) => url,
            Ok(None) => {
                self.enter(Stage::ImageSkipped);
                return Ok(ImageOutcome::Absent);
            }
            Err(value) => {
                let error = ThumbnailError::NotAUrl {
                    found: value.to_string(),
                };
                return Ok(self.skip_image(error));
            }
        };

        match load_thumbnail(fetcher, url) {
            Ok(image) => {
                let name = self.doc.add_image(image);
                self.cursor
                    .place_image(&mut self.doc, &name, IMAGE_WIDTH, IMAGE_HEIGHT, IMAGE_GAP)?;
                self.enter(Stage::ImagePlaced);
                Ok(ImageOutcome::Placed)
            }
            Err(e) => Ok(self.skip_image(e)),
        }
    }

    /// Logs a thumbnail failure and leaves the cursor where the image would have started.
    fn skip_image(&mut self, error: ThumbnailError) -> ImageOutcome {
        warn!(
            title = %self.record.title,
            error = %error,
            "Could not load thumbnail for movie, continuing without image"
        );
        self.enter(Stage::ImageSkipped);
        ImageOutcome::Skipped {
            reason: error.to_string(),
        }
    }

    fn write_fields(&mut self, fields: &[ContentBlock]) -> Result<(), AppError> {
        debug_assert!(matches!(
            self.stage,
            Stage::ImagePlaced | Stage::ImageSkipped
        ));
        for block in fields {
            self.lay_out(block)?;
        }
        self.enter(Stage::FieldsWritten);
        Ok(())
    }

    fn write_description(&mut self, description: &[ContentBlock]) -> Result<(), AppError> {
        debug_assert_eq!(self.stage, Stage::FieldsWritten);
        for block in description {
            self.lay_out(block)?;
        }
        self.enter(Stage::DescriptionWritten);
        Ok(())
    }

    /// Closes the last page and writes the document. Returns the path and page count.
    fn persist(self, output_dir: &Path) -> Result<(PathBuf, usize), AppError> {
        debug_assert_eq!(self.stage, Stage::DescriptionWritten);
        let MovieSheet {
            record,
            mut doc,
            cursor,
            ..
        } = self;
        cursor.finish(&mut doc)?;

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(record.file_name());
        let pages = doc.page_count();
        doc.save(&path)?;

        debug!(title = %record.title, stage = ?Stage::Persisted, path = %path.display(), "Sheet stage");
        Ok((path, pages))
    }

    fn lay_out(&mut self, block: &ContentBlock) -> Result<(), AppError> {
        let width = self.cursor.geometry().content_width();
        let text = block.text();
        match block {
            ContentBlock::Heading(_) => {
                for line in wrap(&text, width, Font::HelveticaBold, TITLE_FONT_SIZE) {
                    self.cursor.write_centered_line(
                        &mut self.doc,
                        &line,
                        Font::HelveticaBold,
                        TITLE_FONT_SIZE,
                    )?;
                }
            }
            ContentBlock::Field { .. } | ContentBlock::Paragraph(_) => {
                for line in wrap(&text, width, Font::Helvetica, BODY_FONT_SIZE) {
                    self.cursor
                        .write_line(&mut self.doc, &line, Font::Helvetica, BODY_FONT_SIZE)?;
                }
            }
        }
        Ok(())
    }
}

fn load_thumbnail(
    fetcher: &dyn ThumbnailFetcher,
    url: &str,
) -> Result<EmbeddedImage, ThumbnailError> {
    let bytes = fetcher.fetch(url)?;
    EmbeddedImage::decode(&bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
