//! The PDF object graph for one movie sheet, built with `lopdf`.
//!
//! A `PdfDocument` owns the catalog, the page tree, one shared resources
//! dictionary and the finished pages. A `PageSurface` is the single open drawing
//! surface: operations are recorded into it and it is consumed by
//! [`PdfDocument::append_page`], which encodes, compresses and links it in.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::errors::AppError;
use crate::layout::font_metrics::Font;
use crate::layout::PageGeometry;
use crate::render::embed::EmbeddedImage;

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

// ────────────────────────────────────────────────────────────────────────────
// Page surface
// ────────────────────────────────────────────────────────────────────────────

/// Drawing surface of the page currently being written.
///
/// Font state lives in the content stream, so a fresh surface starts with no
/// active font and the first text draw re-selects it.
#[derive(Debug, Default)]
pub struct PageSurface {
    operations: Vec<Operation>,
    active_font: Option<(Font, f32)>,
}

impl PageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws one line of text with its baseline origin at (`x`, `y`).
    ///
    /// Emitted as a complete `BT … ET` text object; nothing else is ever
    /// interleaved inside it.
    pub fn show_text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        self.operations.push(Operation::new("BT", vec![]));
        if self.active_font != Some((font, size)) {
            self.operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font.resource_name().as_bytes().to_vec()), size.into()],
            ));
            self.active_font = Some((font, size));
        }
        self.operations
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    /// Paints the image XObject `name` into the box with lower-left corner (`x`, `y`).
    pub fn draw_image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.0_f32.into(),
                0.0_f32.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.operations
            .push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    pub fn is_blank(&self) -> bool {
        self.operations.is_empty()
    }

    #[cfg(test)]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Baseline origins of every text line drawn so far, in drawing order.
    #[cfg(test)]
    pub fn text_origins(&self) -> Vec<(f32, f32)> {
        self.operations
            .iter()
            .filter(|op| op.operator == "Td")
            .filter_map(|op| match op.operands.as_slice() {
                [x, y] => Some((x.as_float().ok()?, y.as_float().ok()?)),
                _ => None,
            })
            .collect()
    }

    fn encode(self) -> Result<Vec<u8>, AppError> {
        let content = Content {
            operations: self.operations,
        }
        .encode()?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content)?;
        Ok(encoder.finish()?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// One output PDF. Pages are appended in creation order and never revisited.
pub struct PdfDocument {
    inner: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    fonts: Dictionary,
    xobjects: Dictionary,
    media_box: (f32, f32),
    title: String,
}

impl PdfDocument {
    pub fn new(title: &str, geometry: &PageGeometry) -> Self {
        let mut inner = Document::with_version(PDF_VERSION);
        let pages_id = inner.new_object_id();
        let resources_id = inner.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::all() {
            let font_id = inner.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        Self {
            inner,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            fonts,
            xobjects: Dictionary::new(),
            media_box: (geometry.width, geometry.height),
            title: title.to_string(),
        }
    }

    /// Registers an image XObject and returns the resource name pages use to draw it.
    pub fn add_image(&mut self, image: EmbeddedImage) -> String {
        let name = format!("Im{}", self.xobjects.len() + 1);
        let image_id = self.inner.add_object(image.into_stream());
        self.xobjects.set(name.as_str(), image_id);
        name
    }

    /// Finalizes a page surface and appends it to the page tree.
    pub fn append_page(&mut self, surface: PageSurface) -> Result<ObjectId, AppError> {
        let compressed = surface.encode()?;
        let content_id = self.inner.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            compressed,
        ));

        let (width, height) = self.media_box;
        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Links the page tree, resources, catalog and info dictionary.
    fn finish(mut self) -> Document {
        let mut resources = dictionary! { "Font" => self.fonts };
        if !self.xobjects.is_empty() {
            resources.set("XObject", self.xobjects);
        }
        self.inner
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let page_count = self.page_ids.len() as i64;
        self.inner.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = self.inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.inner.trailer.set("Root", catalog_id);

        let creation_date = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info_id = self.inner.add_object(dictionary! {
            "Title" => Object::String(to_win_ansi(&self.title), StringFormat::Literal),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(creation_date),
        });
        self.inner.trailer.set("Info", info_id);

        self.inner
    }

    /// Serializes the finished document into memory.
    #[cfg(test)]
    pub fn to_bytes(self) -> Result<Vec<u8>, AppError> {
        let mut document = self.finish();
        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Writes the finished document to `path`, consuming it.
    pub fn save(self, path: &Path) -> Result<(), AppError> {
        let mut document = self.finish();
        let mut writer = BufWriter::new(File::create(path)?);
        document.save_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Encodes text for a `WinAnsiEncoding` Type1 font. Characters the encoding
/// cannot represent become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
