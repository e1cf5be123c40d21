//! # Placement Options
//!
//! The caller-facing vocabulary of the engine: options for text, images and
//! tables, the column layout configuration, table cell values, and the
//! table-of-contents entries collected while composing.
//!
//! Every type here deserializes from the camelCase JSON used by
//! [`crate::request::DocumentRequest`], so the same values can come from
//! Rust code or from a request body.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default text size in points.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Default image height when the caller gives none.
pub const DEFAULT_IMAGE_HEIGHT: f64 = 200.0;

/// Font style, matching the four variants every standard font family has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    #[serde(alias = "boldItalic")]
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// Options for [`crate::layout::LayoutEngine::add_text`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextOptions {
    /// Font size in points. Defaults to 12.
    pub font_size: Option<f64>,
    pub font_style: FontStyle,
    /// Font family. Defaults to the engine's default font.
    pub font_name: Option<String>,
    /// Record this text as a table-of-contents entry.
    pub add_to_index: bool,
}

impl TextOptions {
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size: Some(font_size),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.add_to_index = true;
        self
    }

    pub fn font_size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }
}

/// Encoded image formats the surface can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    #[serde(rename = "JPEG", alias = "jpeg", alias = "JPG", alias = "jpg")]
    Jpeg,
    #[serde(rename = "PNG", alias = "png")]
    Png,
}

impl ImageFormat {
    /// Guess the format from magic bytes, if recognizable.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(ImageFormat::Png)
        } else {
            None
        }
    }
}

/// Options for [`crate::layout::LayoutEngine::add_image`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Clamped to the available content width.
    pub width: Option<f64>,
    /// Defaults to 200pt.
    pub height: Option<f64>,
    /// Sniffed from the bytes when absent; JPEG if unrecognizable.
    pub format: Option<ImageFormat>,
}

/// Visual theme of a generated table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableTheme {
    #[default]
    Striped,
    Plain,
    Grid,
}

/// Options for [`crate::layout::LayoutEngine::add_generic_table`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    /// Printed as a bold heading above the table.
    pub table_name: Option<String>,
    /// Row keys that never become columns.
    pub ignore_fields: HashSet<String>,
    pub add_to_index: bool,
    pub theme: TableTheme,
}

impl TableOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            table_name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Multi-column flow configuration. Missing fields take the engine defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayoutOptions {
    /// Values below 1 are clamped to 1.
    pub columns: Option<i64>,
    pub margin: Option<f64>,
    pub gap: Option<f64>,
}

impl ColumnLayoutOptions {
    pub fn new(columns: i64, margin: f64, gap: f64) -> Self {
        Self {
            columns: Some(columns),
            margin: Some(margin),
            gap: Some(gap),
        }
    }
}

/// A single table cell.
///
/// JSON strings always stay text. Date cells only come from typed values
/// built in Rust, and anything without a variant of its own (arrays,
/// objects, out-of-range numbers) is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    #[serde(skip_deserializing)]
    DateTime(DateTime<FixedOffset>),
    #[serde(skip_deserializing)]
    Date(NaiveDate),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::DateTime(dt) => {
                write!(f, "{}", dt.with_timezone(&Utc).date_naive().format("%Y-%m-%d"))
            }
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for CellValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// One table row: column key to cell, in insertion order.
pub type TableRow = IndexMap<String, CellValue>;

/// A table-of-contents entry recorded by an index-worthy placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub label: String,
    /// 1-based physical page the item landed on.
    pub page_number: usize,
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Document metadata embedded in the PDF info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}
