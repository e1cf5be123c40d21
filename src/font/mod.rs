//! # Font Management
//!
//! The engine draws with the 14 standard PDF fonts, which need no
//! embedding. Families are addressed by lowercase name (`helvetica`,
//! `times`, `courier`, `symbol`, `zapfdingbats`) plus a [`FontStyle`].
//! Unknown names fall back to Helvetica.

pub mod metrics;

use std::collections::BTreeMap;

pub use metrics::StandardFontMetrics;

use crate::model::FontStyle;

/// Family used when nothing else is configured.
pub const DEFAULT_FONT_FAMILY: &str = "helvetica";

/// A font selection: family name and style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            style,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, FontStyle::Normal)
    }
}

/// The 14 standard PDF fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Whether the font uses WinAnsiEncoding (the symbolic fonts do not).
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbol | Self::ZapfDingbats)
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD,
            Self::TimesRoman | Self::TimesBold | Self::TimesItalic | Self::TimesBoldItalic => {
                &metrics::TIMES
            }
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => &metrics::COURIER,
            // No width tables shipped for the symbolic fonts
            Self::Symbol | Self::ZapfDingbats => &metrics::HELVETICA,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Family {
    Helvetica,
    Times,
    Courier,
    Symbol,
    ZapfDingbats,
}

impl Family {
    fn font(self, style: FontStyle) -> StandardFont {
        match (self, style) {
            (Family::Helvetica, FontStyle::Normal) => StandardFont::Helvetica,
            (Family::Helvetica, FontStyle::Bold) => StandardFont::HelveticaBold,
            (Family::Helvetica, FontStyle::Italic) => StandardFont::HelveticaOblique,
            (Family::Helvetica, FontStyle::BoldItalic) => StandardFont::HelveticaBoldOblique,
            (Family::Times, FontStyle::Normal) => StandardFont::TimesRoman,
            (Family::Times, FontStyle::Bold) => StandardFont::TimesBold,
            (Family::Times, FontStyle::Italic) => StandardFont::TimesItalic,
            (Family::Times, FontStyle::BoldItalic) => StandardFont::TimesBoldItalic,
            (Family::Courier, FontStyle::Normal) => StandardFont::Courier,
            (Family::Courier, FontStyle::Bold) => StandardFont::CourierBold,
            (Family::Courier, FontStyle::Italic) => StandardFont::CourierOblique,
            (Family::Courier, FontStyle::BoldItalic) => StandardFont::CourierBoldOblique,
            (Family::Symbol, _) => StandardFont::Symbol,
            (Family::ZapfDingbats, _) => StandardFont::ZapfDingbats,
        }
    }
}

/// Maps family names to the standard fonts.
pub struct FontRegistry {
    families: BTreeMap<&'static str, Family>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let families = BTreeMap::from([
            ("helvetica", Family::Helvetica),
            ("times", Family::Times),
            ("courier", Family::Courier),
            ("symbol", Family::Symbol),
            ("zapfdingbats", Family::ZapfDingbats),
        ]);
        Self { families }
    }

    /// Whether `family` names a registered font (case-insensitive).
    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family.to_ascii_lowercase().as_str())
    }

    /// Look up a font, falling back to Helvetica if the family is unknown.
    pub fn resolve(&self, spec: &FontSpec) -> StandardFont {
        let family = self
            .families
            .get(spec.family.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(Family::Helvetica);
        family.font(spec.style)
    }

    /// Registered family names, sorted.
    pub fn family_names(&self) -> Vec<String> {
        self.families.keys().map(|name| name.to_string()).collect()
    }

    /// Width of `text` on a single line.
    pub fn measure_string(&self, text: &str, spec: &FontSpec, font_size: f64) -> f64 {
        self.resolve(spec).metrics().measure_string(text, font_size)
    }
}
