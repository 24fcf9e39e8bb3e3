//! Monospace font handling for transcript rendering.
//!
//! The renderer only deals in fixed-pitch typewriter faces. Two sources are
//! supported: the PDF Base-14 Courier font (no embedding, fixed 600/1000 em
//! advance) and an embedded TrueType font whose metrics are read with
//! `ttf-parser`. Embedded fonts are written into the PDF as simple
//! `/TrueType` fonts with a `/FontFile2` stream, which is sufficient for the
//! ASCII range transcripts use.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// PostScript name of the built-in fallback font.
pub const BUILTIN_FONT_NAME: &str = "Courier";

/// Glyph advance of Base-14 Courier in 1/1000 em units (all glyphs).
const COURIER_ADVANCE: f32 = 600.0;

/// ASCII range covered by the embedded widths table.
const FIRST_CHAR: u8 = 0x20;
const LAST_CHAR: u8 = 0x7E;

/// A font the renderer can measure text with and the writer can emit.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// Base-14 Courier; metrics are fixed, nothing is embedded.
    Builtin,
    /// An embedded TrueType font with parsed metrics.
    Embedded(EmbeddedFont),
}

impl FontSource {
    /// The BaseFont name to record in the PDF font dictionary.
    pub fn base_font_name(&self) -> &str {
        match self {
            FontSource::Builtin => BUILTIN_FONT_NAME,
            FontSource::Embedded(font) => &font.name,
        }
    }

    /// Advance width of one character cell in points at the given size.
    ///
    /// For a fixed-pitch face every glyph shares this advance; the value for
    /// `M` is used as the representative cell width.
    pub fn char_width(&self, font_size: f32) -> f32 {
        match self {
            FontSource::Builtin => COURIER_ADVANCE * font_size / 1000.0,
            FontSource::Embedded(font) => font.char_advance('M') as f32 * font_size / 1000.0,
        }
    }

    /// Rendered width of a string in points at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            FontSource::Builtin => text.chars().count() as f32 * self.char_width(font_size),
            FontSource::Embedded(font) => font.text_width(text, font_size),
        }
    }

    /// The embedded font, if any.
    pub fn embedded(&self) -> Option<&EmbeddedFont> {
        match self {
            FontSource::Builtin => None,
            FontSource::Embedded(font) => Some(font),
        }
    }
}

/// An embedded TrueType font: raw data plus the metrics the PDF writer needs.
///
/// All metric values are in 1/1000 em units (PDF glyph space), converted from
/// the face's units-per-em at load time.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    /// Font name (PostScript name or caller-provided)
    pub name: String,
    /// Raw TTF file data (for the FontFile2 stream)
    data: Vec<u8>,
    /// Advance widths for ASCII 0x20..=0x7E
    advances: Vec<u16>,
    /// Fallback advance for characters outside the table
    fallback_advance: u16,
    /// Font ascender
    pub ascent: i32,
    /// Font descender (negative)
    pub descent: i32,
    /// Height of capital letters
    pub cap_height: i32,
    /// Font bounding box (llx, lly, urx, ury)
    pub bbox: (i32, i32, i32, i32),
    /// PDF font descriptor flags (FixedPitch | Nonsymbolic)
    pub flags: u32,
    /// Stem vertical width estimate
    pub stem_v: i32,
}

impl EmbeddedFont {
    /// Create an embedded font from raw TTF data.
    ///
    /// # Arguments
    /// * `name` - Font name to use (if None, uses the PostScript name from the font)
    /// * `data` - Raw TTF file data
    pub fn from_data(name: Option<String>, data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("failed to parse font: {e}")))?;

        let units_per_em = face.units_per_em() as f32;
        let to_pdf = |v: f32| (v * 1000.0 / units_per_em).round() as i32;

        if !face.is_monospaced() {
            log::warn!("font does not report fixed pitch; column alignment may drift");
        }

        let mut advances = Vec::with_capacity((LAST_CHAR - FIRST_CHAR + 1) as usize);
        for code in FIRST_CHAR..=LAST_CHAR {
            let advance = face
                .glyph_index(code as char)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|a| to_pdf(a as f32) as u16)
                .unwrap_or(COURIER_ADVANCE as u16);
            advances.push(advance);
        }
        let fallback_advance = advances[(b'M' - FIRST_CHAR) as usize];

        let font_name = name
            .or_else(|| postscript_name(&face))
            .unwrap_or_else(|| "EmbeddedMono".to_string());

        let bbox = face.global_bounding_box();
        let ascent = to_pdf(face.ascender() as f32);
        let descent = to_pdf(face.descender() as f32);
        let cap_height = face
            .capital_height()
            .map(|h| to_pdf(h as f32))
            .unwrap_or(ascent);

        Ok(Self {
            name: font_name,
            data,
            advances,
            fallback_advance,
            ascent,
            descent,
            cap_height,
            bbox: (
                to_pdf(bbox.x_min as f32),
                to_pdf(bbox.y_min as f32),
                to_pdf(bbox.x_max as f32),
                to_pdf(bbox.y_max as f32),
            ),
            // FixedPitch (bit 1) | Nonsymbolic (bit 6)
            flags: 1 | 32,
            stem_v: 80,
        })
    }

    /// Load an embedded font from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_data(None, data)
    }

    /// Advance width of a character in 1/1000 em units.
    pub fn char_advance(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (FIRST_CHAR as u32..=LAST_CHAR as u32).contains(&code) {
            self.advances[(code - FIRST_CHAR as u32) as usize]
        } else {
            self.fallback_advance
        }
    }

    /// Rendered width of a string in points at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_advance(c) as f32).sum();
        units * font_size / 1000.0
    }

    /// Advance widths for the /Widths array (ASCII 0x20..=0x7E).
    pub fn widths(&self) -> &[u16] {
        &self.advances
    }

    /// First character code covered by `widths()`.
    pub fn first_char(&self) -> u8 {
        FIRST_CHAR
    }

    /// Last character code covered by `widths()`.
    pub fn last_char(&self) -> u8 {
        LAST_CHAR
    }

    /// Raw font data for the FontFile2 stream.
    pub fn font_data(&self) -> &[u8] {
        &self.data
    }
}

/// Extract the PostScript name from a parsed face.
fn postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
        .and_then(|name| name.to_string())
}

/// Probe well-known locations for a typewriter-style TTF.
///
/// The explicit hint wins when it names an existing file; an empty or missing
/// hint falls back to the candidate list; no match means the built-in Courier
/// metrics are used.
pub fn locate_font(hint: &str) -> Option<PathBuf> {
    if !hint.is_empty() {
        let hinted = expand_home(hint);
        if hinted.is_file() {
            return Some(hinted);
        }
    }

    let candidates = [
        "~/Library/Fonts/CourierPrime-Regular.ttf",
        "~/Library/Fonts/Courier Prime.ttf",
        "/Library/Fonts/CourierPrime-Regular.ttf",
        "/Library/Fonts/Courier Prime.ttf",
        "~/.local/share/fonts/CourierPrime-Regular.ttf",
        "/usr/share/fonts/truetype/courier-prime/CourierPrime-Regular.ttf",
        "~/Library/Fonts/prestige.ttf",
    ];
    candidates
        .iter()
        .map(|c| expand_home(c))
        .find(|path| path.is_file())
}

/// Resolve the font to render with.
///
/// A located TTF that fails to parse is a hard error (a bad explicit font
/// should not silently degrade); absence of any candidate is not.
pub fn load_font(hint: &str) -> Result<FontSource> {
    match locate_font(hint) {
        Some(path) => {
            log::info!("embedding font {}", path.display());
            Ok(FontSource::Embedded(EmbeddedFont::from_file(&path)?))
        }
        None => {
            log::info!("no typewriter font found, using built-in Courier metrics");
            Ok(FontSource::Builtin)
        }
    }
}

/// Expand a leading `~/` against $HOME.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
