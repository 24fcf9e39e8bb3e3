//! Configuration loading and merge utilities.
//!
//! Two TOML layers are read, a common file and a mission file, and merged
//! key-by-key with the mission layer winning. The merged result is resolved
//! against compiled defaults into the immutable records the rest of the crate
//! consumes: [`LayoutOptions`] and [`MissionStyle`]. CLI flags are applied on
//! top by the binary after resolution.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Default common configuration path.
pub const DEFAULT_COMMON_CONFIG: &str = "config/common.toml";
/// Default mission configuration path.
pub const DEFAULT_MISSION_CONFIG: &str = "config/missions/apollo11.toml";
/// Default input JSON path.
pub const DEFAULT_JSON: &str = "input/AS11_TEC_merged.json";
/// Default output PDF path.
pub const DEFAULT_OUT: &str = "output/AS11_TEC_full.pdf";

/// First source page rendered when no selection is given.
pub const DEFAULT_START_PAGE: i64 = 3;
/// Output page N maps to source page N - offset.
pub const DEFAULT_PDF_OFFSET: i64 = 2;

// Layout tuning (in characters or points where noted).
pub const DEFAULT_COLUMNS: usize = 80;
pub const TIMESTAMP_COL: usize = 0;
pub const SPEAKER_COL: usize = 18;
pub const TEXT_COL: usize = 30;
pub const META_COL: usize = 30;
pub const CONTINUATION_COL: usize = 30;
pub const DEFAULT_SPACE_LEN: usize = 1;
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.2;
pub const DEFAULT_FONT_SIZE: f32 = 10.0;
pub const DEFAULT_DPI: u32 = 1200;
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 605.0;
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 756.0;
pub const DEFAULT_TOP_MARGIN_PT: f32 = 30.0;
pub const DEFAULT_BOTTOM_MARGIN_PT: f32 = 30.0;

/// Default document title line.
pub const DEFAULT_TITLE_LINE: &str = "AIR-TO-GROUND VOICE TRANSCRIPTION";
/// Default flush-left header line.
pub const DEFAULT_HEADER_LINE: &str = "(GOSS NET 1)";
/// Default note-page heading.
pub const DEFAULT_NOTE_HEADING: &str = "NOTE";

/// Layout and geometry options, immutable per render.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Total monospace columns per line
    pub columns: usize,
    /// Spaces between wrapped words
    pub space_len: usize,
    /// Column where the timestamp starts
    pub timestamp_col: usize,
    /// Column where the speaker starts
    pub speaker_col: usize,
    /// Column where comm text and continuations start
    pub text_col: usize,
    /// Column where meta notes start
    pub meta_col: usize,
    /// Column where continuation/fallback blocks start
    pub continuation_col: usize,
    /// Font size in points
    pub font_size: f32,
    /// Line height as a multiple of the font size
    pub line_height_multiplier: f32,
    /// Explicit left margin in points; None centers the text block
    pub left_margin_pt: Option<f32>,
    /// Shrink line spacing so overlong pages fit instead of truncating
    pub fit_to_page: bool,
    /// Extra draw offset in points simulating a heavier typeface
    pub faux_bold_pt: f32,
    /// Compress PDF streams
    pub compress: bool,
    /// Reference DPI recorded in the document metadata
    pub dpi: u32,
    /// Page width in points
    pub page_width_pt: f32,
    /// Page height in points
    pub page_height_pt: f32,
    /// Top margin in points
    pub top_margin_pt: f32,
    /// Bottom margin in points
    pub bottom_margin_pt: f32,
}

impl LayoutOptions {
    /// Baseline line height before any fit-to-page rescale.
    pub fn base_line_height(&self) -> f32 {
        self.font_size * self.line_height_multiplier
    }

    /// Vertical extent available to body lines.
    pub fn usable_height(&self) -> f32 {
        self.page_height_pt - self.top_margin_pt - self.bottom_margin_pt
    }

    /// Baseline y of the first line on a page.
    pub fn top_y(&self) -> f32 {
        self.page_height_pt - self.top_margin_pt
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            space_len: DEFAULT_SPACE_LEN,
            timestamp_col: TIMESTAMP_COL,
            speaker_col: SPEAKER_COL,
            text_col: TEXT_COL,
            meta_col: META_COL,
            continuation_col: CONTINUATION_COL,
            font_size: DEFAULT_FONT_SIZE,
            line_height_multiplier: DEFAULT_LINE_HEIGHT_MULTIPLIER,
            left_margin_pt: None,
            fit_to_page: true,
            faux_bold_pt: 0.0,
            compress: true,
            dpi: DEFAULT_DPI,
            page_width_pt: DEFAULT_PAGE_WIDTH_PT,
            page_height_pt: DEFAULT_PAGE_HEIGHT_PT,
            top_margin_pt: DEFAULT_TOP_MARGIN_PT,
            bottom_margin_pt: DEFAULT_BOTTOM_MARGIN_PT,
        }
    }
}

/// Mission-specific style: header texts and special-page treatment.
#[derive(Debug, Clone)]
pub struct MissionStyle {
    /// Centered title line on title pages
    pub title_line: String,
    /// Flush-left header line text
    pub header_line: String,
    /// Extra blank lines before annotation blocks
    pub annotation_top_blank_lines: usize,
    /// Column index for END OF TAPE alignment
    pub end_of_tape_indent_col: usize,
    /// Center rest-period text block
    pub center_rest_period_text: bool,
    /// Keep the normal page header on centered rest-period pages
    pub rest_period_keep_header: bool,
    /// Apply rest-period centering only on pages with no comm blocks
    pub rest_period_only_when_no_comm: bool,
    /// Output page numbers rendered as note pages
    pub note_pages: BTreeSet<i64>,
    /// Centered heading on note pages
    pub note_heading: String,
    /// Blank lines between header and note body when not vertically centered
    pub note_top_blank_lines: usize,
    /// Vertically center the note body instead of following the header
    pub note_center_vertical: bool,
    /// Wrap width for note body text (narrower than the page)
    pub note_block_columns: usize,
    /// Pages that are rest-period-only in the original
    pub rest_period_isolated_pages: BTreeSet<i64>,
    /// Pages mixing rest-period markers with other content
    pub rest_period_mixed_pages: BTreeSet<i64>,
    /// Pages carrying footer blocks in the original
    pub footer_pages: BTreeSet<i64>,
}

impl Default for MissionStyle {
    fn default() -> Self {
        Self {
            title_line: DEFAULT_TITLE_LINE.to_string(),
            header_line: DEFAULT_HEADER_LINE.to_string(),
            annotation_top_blank_lines: 1,
            end_of_tape_indent_col: TIMESTAMP_COL,
            center_rest_period_text: true,
            rest_period_keep_header: true,
            rest_period_only_when_no_comm: true,
            note_pages: BTreeSet::new(),
            note_heading: DEFAULT_NOTE_HEADING.to_string(),
            note_top_blank_lines: 2,
            note_center_vertical: false,
            note_block_columns: DEFAULT_COLUMNS,
            rest_period_isolated_pages: BTreeSet::new(),
            rest_period_mixed_pages: BTreeSet::new(),
            footer_pages: BTreeSet::new(),
        }
    }
}

/// Input/output paths for one run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Input JSON path
    pub json: String,
    /// Output PDF path
    pub out: String,
    /// Font path hint (empty probes well-known locations)
    pub font: String,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            json: DEFAULT_JSON.to_string(),
            out: DEFAULT_OUT.to_string(),
            font: String::new(),
        }
    }
}

/// Default page selection when no explicit pages are requested.
#[derive(Debug, Clone)]
pub struct SelectionDefaults {
    /// First source page to include
    pub start_page: i64,
    /// Last source page to include (None = maximum known)
    pub end_page: Option<i64>,
    /// Offset between output and source numbering
    pub pdf_offset: i64,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        Self {
            start_page: DEFAULT_START_PAGE,
            end_page: None,
            pdf_offset: DEFAULT_PDF_OFFSET,
        }
    }
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub paths: RunPaths,
    pub selection: SelectionDefaults,
    pub layout: LayoutOptions,
    pub style: MissionStyle,
}

// ---------------------------------------------------------------------------
// Raw TOML layers
// ---------------------------------------------------------------------------

/// One TOML configuration layer; every value is optional so layers can be
/// merged before defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    paths: PathsSection,
    pagination: PaginationSection,
    font: FontSection,
    layout: LayoutSection,
    page: PageSection,
    mission: MissionSection,
    special_pages: SpecialPagesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PathsSection {
    json: Option<String>,
    out: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PaginationSection {
    start_page: Option<i64>,
    end_page: Option<i64>,
    pdf_offset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FontSection {
    path: Option<String>,
    size: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LayoutSection {
    columns: Option<usize>,
    space_len: Option<usize>,
    timestamp_col: Option<usize>,
    speaker_col: Option<usize>,
    text_col: Option<usize>,
    meta_col: Option<usize>,
    continuation_col: Option<usize>,
    line_height_multiplier: Option<f32>,
    left_margin_pt: Option<f32>,
    fit_to_page: Option<bool>,
    faux_bold_pt: Option<f32>,
    compress: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PageSection {
    dpi: Option<u32>,
    width_pt: Option<f32>,
    height_pt: Option<f32>,
    top_margin_pt: Option<f32>,
    bottom_margin_pt: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct MissionSection {
    title_line: Option<String>,
    header_line: Option<String>,
    annotation_top_blank_lines: Option<usize>,
    end_of_tape_indent_col: Option<usize>,
    center_rest_period_text: Option<bool>,
    rest_period_keep_header: Option<bool>,
    rest_period_only_when_no_comm: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SpecialPagesSection {
    note_pages: Option<Vec<i64>>,
    note_heading: Option<String>,
    note_top_blank_lines: Option<usize>,
    note_center_vertical: Option<bool>,
    note_block_columns: Option<usize>,
    rest_period_isolated_pages: Option<Vec<i64>>,
    rest_period_mixed_pages: Option<Vec<i64>>,
    footer_pages: Option<Vec<i64>>,
}

impl RawConfig {
    /// Load one TOML layer; a missing file contributes an empty layer.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).is_file() {
            log::debug!("config file {path} not found, using empty layer");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        toml::from_str(&data).map_err(|e| Error::Config {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Merge an overlay into this layer; overlay values win key-by-key.
    pub fn merged(self, overlay: Self) -> Self {
        Self {
            paths: PathsSection {
                json: overlay.paths.json.or(self.paths.json),
                out: overlay.paths.out.or(self.paths.out),
            },
            pagination: PaginationSection {
                start_page: overlay.pagination.start_page.or(self.pagination.start_page),
                end_page: overlay.pagination.end_page.or(self.pagination.end_page),
                pdf_offset: overlay.pagination.pdf_offset.or(self.pagination.pdf_offset),
            },
            font: FontSection {
                path: overlay.font.path.or(self.font.path),
                size: overlay.font.size.or(self.font.size),
            },
            layout: LayoutSection {
                columns: overlay.layout.columns.or(self.layout.columns),
                space_len: overlay.layout.space_len.or(self.layout.space_len),
                timestamp_col: overlay.layout.timestamp_col.or(self.layout.timestamp_col),
                speaker_col: overlay.layout.speaker_col.or(self.layout.speaker_col),
                text_col: overlay.layout.text_col.or(self.layout.text_col),
                meta_col: overlay.layout.meta_col.or(self.layout.meta_col),
                continuation_col: overlay
                    .layout
                    .continuation_col
                    .or(self.layout.continuation_col),
                line_height_multiplier: overlay
                    .layout
                    .line_height_multiplier
                    .or(self.layout.line_height_multiplier),
                left_margin_pt: overlay.layout.left_margin_pt.or(self.layout.left_margin_pt),
                fit_to_page: overlay.layout.fit_to_page.or(self.layout.fit_to_page),
                faux_bold_pt: overlay.layout.faux_bold_pt.or(self.layout.faux_bold_pt),
                compress: overlay.layout.compress.or(self.layout.compress),
            },
            page: PageSection {
                dpi: overlay.page.dpi.or(self.page.dpi),
                width_pt: overlay.page.width_pt.or(self.page.width_pt),
                height_pt: overlay.page.height_pt.or(self.page.height_pt),
                top_margin_pt: overlay.page.top_margin_pt.or(self.page.top_margin_pt),
                bottom_margin_pt: overlay
                    .page
                    .bottom_margin_pt
                    .or(self.page.bottom_margin_pt),
            },
            mission: MissionSection {
                title_line: overlay.mission.title_line.or(self.mission.title_line),
                header_line: overlay.mission.header_line.or(self.mission.header_line),
                annotation_top_blank_lines: overlay
                    .mission
                    .annotation_top_blank_lines
                    .or(self.mission.annotation_top_blank_lines),
                end_of_tape_indent_col: overlay
                    .mission
                    .end_of_tape_indent_col
                    .or(self.mission.end_of_tape_indent_col),
                center_rest_period_text: overlay
                    .mission
                    .center_rest_period_text
                    .or(self.mission.center_rest_period_text),
                rest_period_keep_header: overlay
                    .mission
                    .rest_period_keep_header
                    .or(self.mission.rest_period_keep_header),
                rest_period_only_when_no_comm: overlay
                    .mission
                    .rest_period_only_when_no_comm
                    .or(self.mission.rest_period_only_when_no_comm),
            },
            special_pages: SpecialPagesSection {
                note_pages: overlay.special_pages.note_pages.or(self.special_pages.note_pages),
                note_heading: overlay
                    .special_pages
                    .note_heading
                    .or(self.special_pages.note_heading),
                note_top_blank_lines: overlay
                    .special_pages
                    .note_top_blank_lines
                    .or(self.special_pages.note_top_blank_lines),
                note_center_vertical: overlay
                    .special_pages
                    .note_center_vertical
                    .or(self.special_pages.note_center_vertical),
                note_block_columns: overlay
                    .special_pages
                    .note_block_columns
                    .or(self.special_pages.note_block_columns),
                rest_period_isolated_pages: overlay
                    .special_pages
                    .rest_period_isolated_pages
                    .or(self.special_pages.rest_period_isolated_pages),
                rest_period_mixed_pages: overlay
                    .special_pages
                    .rest_period_mixed_pages
                    .or(self.special_pages.rest_period_mixed_pages),
                footer_pages: overlay
                    .special_pages
                    .footer_pages
                    .or(self.special_pages.footer_pages),
            },
        }
    }

    /// Resolve this layer against compiled defaults.
    pub fn resolve(self) -> Settings {
        let layout_defaults = LayoutOptions::default();
        let style_defaults = MissionStyle::default();

        let layout = LayoutOptions {
            columns: self.layout.columns.unwrap_or(layout_defaults.columns),
            space_len: self.layout.space_len.unwrap_or(layout_defaults.space_len),
            timestamp_col: self
                .layout
                .timestamp_col
                .unwrap_or(layout_defaults.timestamp_col),
            speaker_col: self.layout.speaker_col.unwrap_or(layout_defaults.speaker_col),
            text_col: self.layout.text_col.unwrap_or(layout_defaults.text_col),
            meta_col: self.layout.meta_col.unwrap_or(layout_defaults.meta_col),
            continuation_col: self
                .layout
                .continuation_col
                .unwrap_or(layout_defaults.continuation_col),
            font_size: self.font.size.unwrap_or(layout_defaults.font_size),
            line_height_multiplier: self
                .layout
                .line_height_multiplier
                .unwrap_or(layout_defaults.line_height_multiplier),
            left_margin_pt: self.layout.left_margin_pt,
            fit_to_page: self.layout.fit_to_page.unwrap_or(layout_defaults.fit_to_page),
            faux_bold_pt: self.layout.faux_bold_pt.unwrap_or(layout_defaults.faux_bold_pt),
            compress: self.layout.compress.unwrap_or(layout_defaults.compress),
            dpi: self.page.dpi.unwrap_or(layout_defaults.dpi),
            page_width_pt: self.page.width_pt.unwrap_or(layout_defaults.page_width_pt),
            page_height_pt: self.page.height_pt.unwrap_or(layout_defaults.page_height_pt),
            top_margin_pt: self
                .page
                .top_margin_pt
                .unwrap_or(layout_defaults.top_margin_pt),
            bottom_margin_pt: self
                .page
                .bottom_margin_pt
                .unwrap_or(layout_defaults.bottom_margin_pt),
        };

        let style = MissionStyle {
            title_line: self.mission.title_line.unwrap_or(style_defaults.title_line),
            header_line: self.mission.header_line.unwrap_or(style_defaults.header_line),
            annotation_top_blank_lines: self
                .mission
                .annotation_top_blank_lines
                .unwrap_or(style_defaults.annotation_top_blank_lines),
            end_of_tape_indent_col: self
                .mission
                .end_of_tape_indent_col
                .unwrap_or(style_defaults.end_of_tape_indent_col),
            center_rest_period_text: self
                .mission
                .center_rest_period_text
                .unwrap_or(style_defaults.center_rest_period_text),
            rest_period_keep_header: self
                .mission
                .rest_period_keep_header
                .unwrap_or(style_defaults.rest_period_keep_header),
            rest_period_only_when_no_comm: self
                .mission
                .rest_period_only_when_no_comm
                .unwrap_or(style_defaults.rest_period_only_when_no_comm),
            note_pages: page_set(self.special_pages.note_pages),
            note_heading: self
                .special_pages
                .note_heading
                .unwrap_or(style_defaults.note_heading),
            note_top_blank_lines: self
                .special_pages
                .note_top_blank_lines
                .unwrap_or(style_defaults.note_top_blank_lines),
            note_center_vertical: self
                .special_pages
                .note_center_vertical
                .unwrap_or(style_defaults.note_center_vertical),
            note_block_columns: self
                .special_pages
                .note_block_columns
                .unwrap_or(style_defaults.note_block_columns),
            rest_period_isolated_pages: page_set(self.special_pages.rest_period_isolated_pages),
            rest_period_mixed_pages: page_set(self.special_pages.rest_period_mixed_pages),
            footer_pages: page_set(self.special_pages.footer_pages),
        };

        Settings {
            paths: RunPaths {
                json: self.paths.json.unwrap_or_else(|| DEFAULT_JSON.to_string()),
                out: self.paths.out.unwrap_or_else(|| DEFAULT_OUT.to_string()),
                font: self.font.path.unwrap_or_default(),
            },
            selection: SelectionDefaults {
                start_page: self.pagination.start_page.unwrap_or(DEFAULT_START_PAGE),
                end_page: self.pagination.end_page,
                pdf_offset: self.pagination.pdf_offset.unwrap_or(DEFAULT_PDF_OFFSET),
            },
            layout,
            style,
        }
    }
}

/// Load, merge, and resolve the two configuration layers.
pub fn load_settings(common_path: &str, mission_path: &str) -> Result<Settings> {
    let common = RawConfig::load(common_path)?;
    let mission = RawConfig::load(mission_path)?;
    Ok(common.merged(mission).resolve())
}

fn page_set(pages: Option<Vec<i64>>) -> BTreeSet<i64> {
    pages.unwrap_or_default().into_iter().collect()
}
