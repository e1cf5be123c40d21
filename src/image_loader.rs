//! # Image Decoding
//!
//! Prepares caller-supplied image bytes for PDF embedding. JPEG images pass
//! through without re-encoding (PDF supports DCTDecode natively). PNG images
//! are decoded to RGB pixels with a separate alpha channel for SMask
//! transparency.

use std::io::Cursor;

use crate::error::{FolioError, Result};
use crate::model::ImageFormat;

/// A fully decoded/loaded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// The pixel data in a format the PDF serializer can consume directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded directly with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded RGB pixels + optional alpha channel.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes (grayscale alpha). None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Decode `data` as `format`. The declared format must match the bytes.
pub fn load_image(data: &[u8], format: ImageFormat) -> Result<LoadedImage> {
    if data.len() < 4 {
        return Err(FolioError::Image("Image data too short".to_string()));
    }
    match (format, ImageFormat::sniff(data)) {
        (ImageFormat::Jpeg, Some(ImageFormat::Jpeg)) => decode_jpeg(data),
        (ImageFormat::Png, Some(ImageFormat::Png)) => decode_png(data),
        (declared, Some(actual)) => Err(FolioError::Image(format!(
            "Declared {declared:?} but the data is {actual:?}"
        ))),
        (declared, None) => Err(FolioError::Image(format!(
            "Data is not a valid {declared:?} image"
        ))),
    }
}

/// Decode base64 image data, with or without a `data:image/...;base64,` prefix.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    let payload = match input.strip_prefix("data:") {
        Some(uri) => uri
            .split_once(',')
            .map(|(_, b64)| b64)
            .ok_or_else(|| FolioError::Image("Invalid data URI: missing comma".to_string()))?,
        None => input,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| FolioError::Image(format!("Base64 decode error: {e}")))
}

/// JPEG: read dimensions and color space without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage> {
    let reader = image::io::Reader::with_format(Cursor::new(data), image::ImageFormat::Jpeg);
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| FolioError::Image(format!("Failed to read JPEG dimensions: {e}")))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: detect_jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG markers to find the SOF (Start of Frame) segment and read
/// the number of components to determine color space.
fn detect_jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2; // skip SOI marker (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        // SOF markers: C0-C3, C5-C7, C9-CB, CD-CF
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            // length(2) + precision(1) + height(2) + width(2) + num_components(1)
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    JpegColorSpace::DeviceRGB
}

/// PNG: decode to RGBA, split into RGB + alpha.
fn decode_png(data: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .map_err(|e| FolioError::Image(format!("Failed to decode PNG: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        has_transparency |= pixel[3] != 255;
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: has_transparency.then_some(alpha),
        },
        width_px: width,
        height_px: height,
    })
}
