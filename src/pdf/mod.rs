//! # PDF Serializer
//!
//! Takes the pages recorded by [`crate::surface::PdfSurface`] and writes a
//! valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Only standard Type1 fonts are
//! referenced, so nothing needs embedding except images.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::StandardFont;
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::model::{Metadata, PageSize};
use crate::surface::{DrawOp, Page};
use crate::text::{line_height, ASCENT_FACTOR};

pub struct PdfWriter;

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
    /// Font resources in /F0, /F1, ... order with their object IDs.
    font_objects: Vec<(StandardFont, usize)>,
    /// Maps (page_index, op_index) to the image's XObject ID.
    image_objects: HashMap<(usize, usize), usize>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }

    fn font_index(&self, font: StandardFont) -> usize {
        self.font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write recorded pages to a PDF byte vector.
    pub fn write(&self, pages: &[Page], page_size: PageSize, metadata: &Metadata) -> Vec<u8> {
        let (page_width, page_height) = page_size.dimensions();

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            font_objects: Vec::new(),
            image_objects: HashMap::new(),
        };

        self.register_fonts(&mut builder, pages);
        self.register_images(&mut builder, pages);

        let font_resources = self.build_font_resource_dict(&builder.font_objects);
        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(pages.len());

        for (page_idx, page) in pages.iter().enumerate() {
            let content = self.build_content_stream(page, page_idx, page_height, &builder);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let xobject_resources = self.build_xobject_resource_dict(page_idx, &builder);
            let resources = if xobject_resources.is_empty() {
                format!("/Font << {} >>", font_resources)
            } else {
                format!("/Font << {} >> /XObject << {} >>", font_resources, xobject_resources)
            };
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page_width, page_height, content_obj_id, resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = self.write_info(&mut builder, metadata);
        self.serialize(&builder, info_obj_id)
    }

    fn write_info(&self, builder: &mut PdfBuilder, metadata: &Metadata) -> usize {
        let mut info = String::from("<< ");
        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Creator", &metadata.creator),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                let _ = write!(info, "/{} ({}) ", key, Self::escape_pdf_string(value));
            }
        }
        info.push_str("/Producer (Folio) >>");
        builder.push(info.into_bytes())
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &Page,
        page_idx: usize,
        page_height: f64,
        builder: &PdfBuilder,
    ) -> String {
        let mut stream = String::new();

        for (op_idx, op) in page.ops.iter().enumerate() {
            match op {
                DrawOp::Text {
                    lines,
                    x,
                    y,
                    font,
                    font_size,
                    color,
                } => {
                    let _ = write!(
                        stream,
                        "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n",
                        color.r,
                        color.g,
                        color.b,
                        builder.font_index(*font),
                        font_size
                    );
                    let mut baseline = y + font_size * ASCENT_FACTOR;
                    for line in lines {
                        let _ = write!(
                            stream,
                            "1 0 0 1 {:.2} {:.2} Tm\n({}) Tj\n",
                            x,
                            page_height - baseline,
                            Self::encode_text(line, *font)
                        );
                        baseline += line_height(*font_size);
                    }
                    stream.push_str("ET\n");
                }

                DrawOp::Image {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => {
                    let pdf_y = page_height - y - height;
                    if builder.image_objects.contains_key(&(page_idx, op_idx)) {
                        let _ = write!(
                            stream,
                            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{}_{} Do\nQ\n",
                            width, height, x, pdf_y, page_idx, op_idx
                        );
                    }
                }

                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    let pdf_y = page_height - y - height;
                    if let Some(c) = fill {
                        let _ = write!(
                            stream,
                            "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                            c.r, c.g, c.b, x, pdf_y, width, height
                        );
                    }
                    if let Some((c, line_width)) = stroke {
                        let _ = write!(
                            stream,
                            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
                            c.r, c.g, c.b, line_width, x, pdf_y, width, height
                        );
                    }
                }
            }
        }

        stream
    }

    /// Register every font drawn with, in a deterministic order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[Page]) {
        let mut fonts: BTreeSet<StandardFont> = pages
            .iter()
            .flat_map(|page| page.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { font, .. } => Some(*font),
                _ => None,
            })
            .collect();

        // Always have at least Helvetica
        if fonts.is_empty() {
            fonts.insert(StandardFont::Helvetica);
        }

        for font in fonts {
            let font_dict = if font.is_symbolic() {
                format!("<< /Type /Font /Subtype /Type1 /BaseFont /{} >>", font.pdf_name())
            } else {
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                     /Encoding /WinAnsiEncoding >>",
                    font.pdf_name()
                )
            };
            let obj_id = builder.push(font_dict.into_bytes());
            builder.font_objects.push((font, obj_id));
        }
    }

    /// Create XObjects for every image op, keyed by page and op position.
    fn register_images(&self, builder: &mut PdfBuilder, pages: &[Page]) {
        for (page_idx, page) in pages.iter().enumerate() {
            for (op_idx, op) in page.ops.iter().enumerate() {
                if let DrawOp::Image { image, .. } = op {
                    let xobj_id = Self::write_image_xobject(builder, image);
                    builder.image_objects.insert((page_idx, op_idx), xobj_id);
                }
            }
        }
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space_str = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };

                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace {} \
                     /BitsPerComponent 8 \
                     /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space_str,
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                builder.push(obj_data)
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_id = alpha.as_ref().map(|alpha_data| {
                    let compressed_alpha = compress_to_vec_zlib(alpha_data, 6);
                    let mut smask_data: Vec<u8> = Vec::new();
                    let _ = write!(
                        smask_data,
                        "<< /Type /XObject /Subtype /Image \
                         /Width {} /Height {} \
                         /ColorSpace /DeviceGray \
                         /BitsPerComponent 8 \
                         /Filter /FlateDecode \
                         /Length {} >>\nstream\n",
                        image.width_px,
                        image.height_px,
                        compressed_alpha.len()
                    );
                    smask_data.extend_from_slice(&compressed_alpha);
                    smask_data.extend_from_slice(b"\nendstream");
                    builder.push(smask_data)
                });

                let compressed_rgb = compress_to_vec_zlib(rgb, 6);
                let smask_ref = smask_id
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();

                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /DeviceRGB \
                     /BitsPerComponent 8 \
                     /Filter /FlateDecode \
                     /Length {}{} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed_rgb.len(),
                    smask_ref
                );
                obj_data.extend_from_slice(&compressed_rgb);
                obj_data.extend_from_slice(b"\nendstream");
                builder.push(obj_data)
            }
        }
    }

    /// Build the /XObject resource dict entries for a specific page.
    fn build_xobject_resource_dict(&self, page_idx: usize, builder: &PdfBuilder) -> String {
        let mut entries: Vec<(usize, usize)> = builder
            .image_objects
            .iter()
            .filter(|((p, _), _)| *p == page_idx)
            .map(|((_, op), id)| (*op, *id))
            .collect();
        entries.sort_unstable();
        entries
            .iter()
            .map(|(op, id)| format!("/Im{}_{} {} 0 R", page_idx, op, id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode a line as the body of a PDF literal string.
    fn encode_text(text: &str, font: StandardFont) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let b = if font.is_symbolic() {
                u8::try_from(ch).unwrap_or(b'?')
            } else {
                Self::unicode_to_winansi(ch).unwrap_or(b'?')
            };
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                // Octal escape for bytes outside the printable ASCII range
                _ => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(obj);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}
