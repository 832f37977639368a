/// Profile picture codec
///
/// Contacts store their profile picture as base64-encoded PNG text in the
/// database. This module converts between in-memory images and that textual
/// form, and validates stored payloads before they reach the UI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PictureError {
    /// The stored payload is not valid base64, or the decoded bytes do not
    /// parse as a supported image format (corrupted upload, non-image data).
    #[error("invalid image data: {0}")]
    InvalidImageData(String),

    /// PNG serialization of an in-memory image failed.
    #[error("could not encode image as PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode an in-memory image as base64 PNG text for database storage.
pub fn encode_base64_png(picture: &DynamicImage) -> Result<String, PictureError> {
    let mut png = Vec::new();
    picture.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(STANDARD.encode(&png))
}

/// Decode base64 PNG/JPEG text back into raw image bytes.
///
/// Stored strings may have lost their trailing `=` padding, so the input is
/// re-padded to a multiple of 4 before decoding. The decoded bytes are then
/// verified by running them through an actual image decode; payloads that do
/// not parse as an image are rejected.
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, PictureError> {
    let repaired = repair_padding(encoded);

    let bytes = STANDARD
        .decode(repaired.as_bytes())
        .map_err(|e| PictureError::InvalidImageData(e.to_string()))?;

    // Verify the payload is a structurally valid image before handing it
    // to the UI for display
    image::load_from_memory(&bytes)
        .map_err(|e| PictureError::InvalidImageData(e.to_string()))?;

    Ok(bytes)
}

/// Append `=` characters until the string length is a multiple of 4.
/// Compensates for padding stripped by intermediate processing.
fn repair_padding(encoded: &str) -> Cow<'_, str> {
    match encoded.len() % 4 {
        0 => Cow::Borrowed(encoded),
        missing => {
            let mut repaired = String::with_capacity(encoded.len() + (4 - missing));
            repaired.push_str(encoded);
            for _ in 0..(4 - missing) {
                repaired.push('=');
            }
            Cow::Owned(repaired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    /// A small test image with non-uniform pixels
    fn sample_picture() -> DynamicImage {
        let img = RgbaImage::from_fn(4, 3, |x, y| {
            image::Rgba([(x * 60) as u8, (y * 80) as u8, 128, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn round_trip_preserves_dimensions() {
        let picture = sample_picture();

        let encoded = encode_base64_png(&picture).unwrap();
        let bytes = decode_base64_image(&encoded).unwrap();

        let restored = image::load_from_memory(&bytes).unwrap();
        assert_eq!(restored.width(), picture.width());
        assert_eq!(restored.height(), picture.height());
    }

    #[test]
    fn stripped_padding_is_repaired() {
        let picture = sample_picture();
        let encoded = encode_base64_png(&picture).unwrap();

        // Strip any trailing padding, as some processing steps do
        let stripped = encoded.trim_end_matches('=');

        let original = decode_base64_image(&encoded).unwrap();
        let repaired = decode_base64_image(stripped).unwrap();
        assert_eq!(original, repaired);
    }

    #[test]
    fn repair_padding_restores_multiple_of_four() {
        // "hello" encodes to "aGVsbG8=" - strip the padding and re-pad
        let repaired = repair_padding("aGVsbG8");
        assert_eq!(repaired.as_ref(), "aGVsbG8=");
        assert_eq!(STANDARD.decode(repaired.as_bytes()).unwrap(), b"hello");

        // Already aligned input is returned unchanged
        assert!(matches!(repair_padding("aGVsbG8="), Cow::Borrowed(_)));
    }

    #[test]
    fn garbage_input_is_invalid_image_data() {
        let err = decode_base64_image("not-base64-image-data").unwrap_err();
        assert!(matches!(err, PictureError::InvalidImageData(_)));
    }

    #[test]
    fn non_image_payload_is_invalid_image_data() {
        // Valid base64, but the bytes are not an image
        let encoded = STANDARD.encode(b"just some plain text");
        let err = decode_base64_image(&encoded).unwrap_err();
        assert!(matches!(err, PictureError::InvalidImageData(_)));
    }
}
