//! Rendering pipeline: composed lines to positioned text to PDF bytes.
//!
//! For each selected page the composer's lines are turned into `(x, y, text)`
//! placements according to the page variant, then drawn through the PDF
//! writer. Blank lines advance the vertical cursor but emit no placement.
//! When a faux-bold offset is configured every placement is drawn twice, the
//! second time shifted right by the offset.

use crate::config::{LayoutOptions, MissionStyle};
use crate::error::Result;
use crate::fonts::FontSource;
use crate::layout::compose::{
    build_page_lines, header_lines, note_lines, rest_period_lines, resolve_variant,
};
use crate::layout::fit::fit_page;
use crate::layout::PageVariant;
use crate::transcript::{PageRecord, Transcript};
use crate::writer::{PdfWriter, PdfWriterConfig};
use std::path::{Path, PathBuf};

/// Directory bare output file names are placed under.
const OUTPUT_DIR: &str = "output";

/// One positioned text draw on an output page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Left edge of the text in points
    pub x: f32,
    /// Baseline y in points, from the page bottom
    pub y: f32,
    /// Text to draw
    pub text: String,
}

/// Left margin of the monospace text block.
///
/// An explicit margin wins; otherwise the block of `columns` character cells
/// is centered on the page width.
pub fn left_margin(opts: &LayoutOptions, font: &FontSource) -> f32 {
    let text_width = font.char_width(opts.font_size) * opts.columns as f32;
    match opts.left_margin_pt {
        Some(margin) => margin.max(0.0),
        None => ((opts.page_width_pt - text_width) / 2.0).max(0.0),
    }
}

/// Compute the placements for one page.
pub fn page_placements(
    page: &PageRecord,
    opts: &LayoutOptions,
    style: &MissionStyle,
    font: &FontSource,
) -> Vec<Placement> {
    let margin = left_margin(opts, font);
    let line_height = opts.base_line_height();
    let mut placements = Vec::new();

    match resolve_variant(page, style) {
        PageVariant::Note => {
            let header = header_lines(page, opts, style);
            let after_header = place_rows(&header, margin, opts.top_y(), line_height, &mut placements);

            let body = note_lines(page, opts, style);
            if !body.is_empty() {
                let y_start = if style.note_center_vertical {
                    block_center_start(body.len(), line_height, opts)
                } else {
                    after_header - style.note_top_blank_lines as f32 * line_height
                };
                place_centered_rows(&body, y_start, line_height, opts, font, &mut placements);
            }
        }
        PageVariant::RestPeriod => {
            if style.rest_period_keep_header {
                let header = header_lines(page, opts, style);
                place_rows(&header, margin, opts.top_y(), line_height, &mut placements);
            }

            let body = rest_period_lines(page, opts);
            if !body.is_empty() {
                let y_start = block_center_start(body.len(), line_height, opts);
                place_centered_rows(&body, y_start, line_height, opts, font, &mut placements);
            }
        }
        PageVariant::Normal => {
            let fitted = fit_page(build_page_lines(page, opts, style), opts);
            if fitted.truncated > 0 {
                log::warn!(
                    "page {}: dropped {} overflow line(s)",
                    page.header.page.unwrap_or_default(),
                    fitted.truncated
                );
            }
            for line in &fitted.lines {
                if line.text.is_empty() {
                    continue;
                }
                placements.push(Placement {
                    x: margin,
                    y: line.y,
                    text: line.text.clone(),
                });
            }
        }
    }

    placements
}

/// Render the selected pages into PDF bytes.
pub fn render_document(
    transcript: &Transcript,
    selection: &[i64],
    opts: &LayoutOptions,
    style: &MissionStyle,
    font: &FontSource,
) -> Result<Vec<u8>> {
    let config = PdfWriterConfig::default()
        .with_subject(format!("Rendered with reference DPI {}", opts.dpi))
        .with_compress(opts.compress);
    let mut writer = PdfWriter::with_config(font.clone(), config);

    for page_num in selection {
        let page = match transcript.get(*page_num) {
            Some(page) => page,
            None => {
                log::warn!("selected page {page_num} vanished from source data");
                continue;
            }
        };

        let placements = page_placements(page, opts, style, font);
        let mut builder = writer.add_page(opts.page_width_pt, opts.page_height_pt);
        for placement in &placements {
            builder.add_text(&placement.text, placement.x, placement.y, opts.font_size);
            if opts.faux_bold_pt > 0.0 {
                builder.add_text(
                    &placement.text,
                    placement.x + opts.faux_bold_pt,
                    placement.y,
                    opts.font_size,
                );
            }
        }
        builder.finish();
    }

    writer.finish()
}

/// Render the selected pages and write the PDF to `path`.
pub fn render_to_file(
    transcript: &Transcript,
    selection: &[i64],
    opts: &LayoutOptions,
    style: &MissionStyle,
    font: &FontSource,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes = render_document(transcript, selection, opts, style, font)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path.as_ref(), bytes)?;
    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Resolve the output PDF path, placing bare file names under `output/`.
///
/// Parent directories are created by [`render_to_file`] when writing.
pub fn resolve_output_path(output_path: &str) -> PathBuf {
    let candidate = PathBuf::from(output_path);
    let bare = candidate.is_relative()
        && candidate
            .parent()
            .map(|parent| parent.as_os_str().is_empty())
            .unwrap_or(true);
    if bare {
        Path::new(OUTPUT_DIR).join(candidate)
    } else {
        candidate
    }
}

/// Place rows top-down at a fixed x, skipping blank rows but keeping their
/// vertical slot. Returns the y below the last slot.
fn place_rows(
    rows: &[String],
    x: f32,
    y_start: f32,
    line_height: f32,
    out: &mut Vec<Placement>,
) -> f32 {
    let mut y = y_start;
    for row in rows {
        if !row.is_empty() {
            out.push(Placement {
                x,
                y,
                text: row.clone(),
            });
        }
        y -= line_height;
    }
    y
}

/// Place rows top-down, each centered horizontally by its measured width.
fn place_centered_rows(
    rows: &[String],
    y_start: f32,
    line_height: f32,
    opts: &LayoutOptions,
    font: &FontSource,
    out: &mut Vec<Placement>,
) {
    let mut y = y_start;
    for row in rows {
        if !row.is_empty() {
            let text_width = font.text_width(row, opts.font_size);
            let x = ((opts.page_width_pt - text_width) / 2.0).max(0.0);
            out.push(Placement {
                x,
                y,
                text: row.clone(),
            });
        }
        y -= line_height;
    }
}

/// Starting baseline that vertically centers a block of rows on the page.
fn block_center_start(row_count: usize, line_height: f32, opts: &LayoutOptions) -> f32 {
    let content_height = (row_count.saturating_sub(1)) as f32 * line_height;
    (opts.page_height_pt + content_height) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Block, BlockKind, PageHeader};

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    fn style() -> MissionStyle {
        MissionStyle::default()
    }

    fn comm_page(page_num: i64) -> PageRecord {
        PageRecord {
            header: PageHeader {
                tape: Some("3/1".to_string()),
                page: Some(page_num),
                ..PageHeader::default()
            },
            blocks: vec![Block {
                kind: BlockKind::Comm,
                timestamp: "00 00 04".to_string(),
                speaker: "CDR".to_string(),
                text: "ROGER CLOCK".to_string(),
                ..Block::default()
            }],
        }
    }

    #[test]
    fn test_left_margin_auto_centers_text_block() {
        let font = FontSource::Builtin;
        // 80 columns * 6pt = 480pt of text on a 605pt page
        let margin = left_margin(&opts(), &font);
        assert!((margin - (605.0 - 480.0) / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_left_margin_explicit_wins() {
        let mut options = opts();
        options.left_margin_pt = Some(12.0);
        assert!((left_margin(&options, &FontSource::Builtin) - 12.0).abs() < 1e-6);
        options.left_margin_pt = Some(-4.0);
        assert!((left_margin(&options, &FontSource::Builtin)).abs() < 1e-6);
    }

    #[test]
    fn test_normal_page_skips_blank_rows() {
        let font = FontSource::Builtin;
        let placements = page_placements(&comm_page(3), &opts(), &style(), &font);
        assert!(!placements.is_empty());
        assert!(placements.iter().all(|p| !p.text.is_empty()));
    }

    #[test]
    fn test_normal_page_rows_share_left_margin() {
        let font = FontSource::Builtin;
        let options = opts();
        let margin = left_margin(&options, &font);
        let placements = page_placements(&comm_page(3), &options, &style(), &font);
        assert!(placements.iter().all(|p| (p.x - margin).abs() < 1e-4));
    }

    #[test]
    fn test_header_rows_keep_blank_slots() {
        let font = FontSource::Builtin;
        let options = opts();
        let placements = page_placements(&comm_page(3), &options, &style(), &font);
        // Header is tape line, page line, two blanks; the comm line lands in
        // row 4 even though the blanks emitted nothing.
        let comm = placements
            .iter()
            .find(|p| p.text.contains("ROGER CLOCK"))
            .unwrap();
        let expected_y = options.top_y() - 4.0 * options.base_line_height();
        assert!((comm.y - expected_y).abs() < 1e-3);
    }

    #[test]
    fn test_rest_period_page_is_block_centered() {
        let font = FontSource::Builtin;
        let options = opts();
        let page = PageRecord {
            header: PageHeader {
                page: Some(200),
                page_type: Some("rest_period".to_string()),
                ..PageHeader::default()
            },
            blocks: vec![Block {
                kind: BlockKind::Meta,
                meta_type: "rest_period".to_string(),
                text: "CREW REST PERIOD".to_string(),
                ..Block::default()
            }],
        };
        let placements = page_placements(&page, &options, &style(), &font);
        assert_eq!(placements.len(), 1);
        // One-line block: baseline at the vertical center of the page
        assert!((placements[0].y - options.page_height_pt / 2.0).abs() < 1e-3);
        // Centered by measured width, not at the text-block margin
        let text_width = font.text_width("CREW REST PERIOD", options.font_size);
        let expected_x = (options.page_width_pt - text_width) / 2.0;
        assert!((placements[0].x - expected_x).abs() < 1e-3);
    }

    #[test]
    fn test_rest_period_header_suppressed_by_style() {
        let font = FontSource::Builtin;
        let mut style = style();
        style.rest_period_keep_header = false;
        let page = PageRecord {
            header: PageHeader {
                tape: Some("14/3".to_string()),
                page: Some(200),
                page_type: Some("rest_period".to_string()),
                ..PageHeader::default()
            },
            blocks: vec![Block {
                text: "CREW REST PERIOD".to_string(),
                ..Block::default()
            }],
        };
        let placements = page_placements(&page, &opts(), &style, &font);
        assert!(placements.iter().all(|p| !p.text.contains("Tape")));
    }

    #[test]
    fn test_note_page_body_below_header() {
        let font = FontSource::Builtin;
        let mut style = style();
        style.note_pages.insert(339);
        let options = opts();
        let page = PageRecord {
            header: PageHeader {
                page: Some(339),
                ..PageHeader::default()
            },
            blocks: vec![Block {
                text: "Times are ground elapsed time".to_string(),
                ..Block::default()
            }],
        };
        let placements = page_placements(&page, &options, &style, &font);
        // Heading first, then the body two blank rows further down; the blank
        // separator row after the heading emits nothing.
        assert!(placements[0].text.contains("NOTE"));
        let lh = options.base_line_height();
        // No header lines: body starts at top_y minus the note top blanks
        let heading_y = options.top_y() - style.note_top_blank_lines as f32 * lh;
        assert!((placements[0].y - heading_y).abs() < 1e-3);
        assert!((placements[1].y - (heading_y - 2.0 * lh)).abs() < 1e-3);
    }

    #[test]
    fn test_note_page_vertical_centering_flag() {
        let font = FontSource::Builtin;
        let mut style = style();
        style.note_pages.insert(339);
        style.note_center_vertical = true;
        let options = opts();
        let page = PageRecord {
            header: PageHeader {
                page: Some(339),
                ..PageHeader::default()
            },
            blocks: vec![Block {
                text: "NOTE BODY".to_string(),
                ..Block::default()
            }],
        };
        let placements = page_placements(&page, &options, &style, &font);
        // Three rows (heading, blank, body): start = (H + 2*lh) / 2
        let lh = options.base_line_height();
        let expected = (options.page_height_pt + 2.0 * lh) / 2.0;
        assert!((placements[0].y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_render_document_one_pdf_page_per_selection() {
        let font = FontSource::Builtin;
        let mut pages = std::collections::BTreeMap::new();
        pages.insert(3, comm_page(3));
        pages.insert(4, comm_page(4));
        let transcript = Transcript::from_pages(pages);

        let mut options = opts();
        options.compress = false;
        let bytes =
            render_document(&transcript, &[3, 4], &options, &style(), &font).unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Count 2"));
        assert!(content.contains("ROGER CLOCK) Tj"));
    }

    #[test]
    fn test_render_document_faux_bold_duplicates_draws() {
        let font = FontSource::Builtin;
        let mut pages = std::collections::BTreeMap::new();
        pages.insert(3, comm_page(3));
        let transcript = Transcript::from_pages(pages);

        let mut options = opts();
        options.compress = false;
        options.faux_bold_pt = 0.3;
        let bytes = render_document(&transcript, &[3], &options, &style(), &font).unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert_eq!(content.matches("ROGER CLOCK) Tj").count(), 2);
    }

    #[test]
    fn test_resolve_output_path_bare_name_lands_in_output_dir() {
        assert_eq!(resolve_output_path("run.pdf"), PathBuf::from("output/run.pdf"));
        assert_eq!(
            resolve_output_path("elsewhere/run.pdf"),
            PathBuf::from("elsewhere/run.pdf")
        );
        assert_eq!(
            resolve_output_path("/abs/run.pdf"),
            PathBuf::from("/abs/run.pdf")
        );
    }

    #[test]
    fn test_render_to_file_creates_parent_dirs() {
        let font = FontSource::Builtin;
        let mut pages = std::collections::BTreeMap::new();
        pages.insert(3, comm_page(3));
        let transcript = Transcript::from_pages(pages);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("run.pdf");

        render_to_file(
            &transcript,
            &[3],
            &opts(),
            &style(),
            &font,
            &target,
        )
        .unwrap();
        let bytes = std::fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF"));
    }
}
