//! Converts fetched thumbnail bytes into an embeddable image XObject.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{DynamicImage, GenericImageView};
use lopdf::{dictionary, Stream};

use crate::thumbnails::ThumbnailError;

/// A decoded thumbnail, flattened onto white and stored as Flate-compressed 8-bit RGB.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl EmbeddedImage {
    /// Decodes any supported format (PNG, JPEG, GIF), sniffed from the bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ThumbnailError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = decoded.dimensions();
        let rgb = flatten_onto_white(&decoded);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rgb)?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn into_stream(self) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width),
                "Height" => i64::from(self.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "FlateDecode",
            },
            self.data,
        )
    }
}

/// Packs pixels as RGB, compositing any alpha channel over a white background.
fn flatten_onto_white(image: &DynamicImage) -> Vec<u8> {
    if !image.color().has_alpha() {
        return image.to_rgb8().into_raw();
    }
    image
        .to_rgba8()
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            let blend = |c: u8| -> u8 {
                let alpha = u16::from(a);
                ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            [blend(r), blend(g), blend(b)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png_keeps_dimensions() {
        let bytes = png_bytes(RgbaImage::from_pixel(4, 6, Rgba([10, 20, 30, 255])));
        let image = EmbeddedImage::decode(&bytes).unwrap();
        assert_eq!((image.width, image.height), (4, 6));
        assert!(!image.data.is_empty());
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = EmbeddedImage::decode(b"<html>404 Not Found</html>").unwrap_err();
        assert!(matches!(err, ThumbnailError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        assert_eq!(flatten_onto_white(&image), vec![255, 255, 255]);
    }

    #[test]
    fn test_opaque_pixels_are_unchanged() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([12, 34, 56, 255])));
        assert_eq!(flatten_onto_white(&image), vec![12, 34, 56]);
    }

    #[test]
    fn test_stream_dictionary_describes_image() {
        let bytes = png_bytes(RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255])));
        let stream = EmbeddedImage::decode(&bytes).unwrap().into_stream();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 3);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 2);
    }
}
