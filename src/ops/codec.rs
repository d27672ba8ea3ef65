// In-memory JPEG round trip through the `image` codecs.

use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;

use crate::error::Error;
use crate::types::Frame;

/// The encoder rejects quality 0.
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Compress `frame` to a JPEG byte buffer; quality is clamped to [1, 100].
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(MIN_QUALITY, MAX_QUALITY));
        let encoded = match frame {
            Frame::Gray(img) => encoder.encode_image(img),
            Frame::Color(img) => encoder.encode_image(img),
        };
        encoded.map_err(|e| Error::Codec(format!("encode: {e}")))?;
    }
    Ok(bytes)
}

/// Decode a JPEG buffer back into pixels of the requested kind.
pub fn decode_jpeg(bytes: &[u8], color: bool) -> Result<Frame, Error> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| Error::Codec(format!("decode: {e}")))?;
    Ok(if color {
        Frame::Color(img.to_rgb8())
    } else {
        Frame::Gray(img.to_luma8())
    })
}
