//! Page composition: header blocks, variant resolution, and full-page line
//! assembly.
//!
//! A page renders in one of three mutually exclusive variants, resolved once
//! before any formatting: note page, centered rest-period page, or normal
//! page. Note pages and rest-period pages flatten their blocks to raw text;
//! only normal pages dispatch through the per-block-type formatters.

use super::blocks::{format_annotation, format_comm, format_footer, format_indented, format_meta};
use super::wrap::{align_center, align_right, wrap};
use crate::config::{LayoutOptions, MissionStyle};
use crate::transcript::{BlockKind, PageRecord};

/// Page type tag marking a crew rest interval.
const REST_PERIOD_TAG: &str = "rest_period";

/// How a page is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
    /// Body replaced by a centered heading-and-text block
    Note,
    /// Rest-period text centered as a block on the page
    RestPeriod,
    /// Header plus per-block-type formatting
    Normal,
}

/// Resolve the rendering variant for a page. Note pages win over centered
/// rest-period pages, which win over normal rendering.
pub fn resolve_variant(page: &PageRecord, style: &MissionStyle) -> PageVariant {
    if is_note_page(page, style) {
        PageVariant::Note
    } else if is_centered_rest_period_page(page, style) {
        PageVariant::RestPeriod
    } else {
        PageVariant::Normal
    }
}

/// Whether the page is listed as a note page.
pub fn is_note_page(page: &PageRecord, style: &MissionStyle) -> bool {
    page.header
        .page
        .map(|num| style.note_pages.contains(&num))
        .unwrap_or(false)
}

/// Whether the page qualifies for centered rest-period rendering.
///
/// Requires the rest-period page tag and centering enabled; when
/// `rest_period_only_when_no_comm` is set, any comm block disqualifies the
/// page.
pub fn is_centered_rest_period_page(page: &PageRecord, style: &MissionStyle) -> bool {
    if page.header.page_type.as_deref() != Some(REST_PERIOD_TAG) {
        return false;
    }
    if !style.center_rest_period_text {
        return false;
    }
    if !style.rest_period_only_when_no_comm {
        return true;
    }
    page.blocks.iter().all(|block| block.kind != BlockKind::Comm)
}

/// Compose the header block shared by all page variants that show one.
///
/// Title pages start with the centered title line and two blank lines. Pages
/// with a tape identifier get the header line flush left and `Tape {id}`
/// flush right when both fit on one line, the header line alone otherwise,
/// then the page number right-justified and two blank lines.
pub fn header_lines(page: &PageRecord, opts: &LayoutOptions, style: &MissionStyle) -> Vec<String> {
    let mut lines = Vec::new();
    let header = &page.header;

    if header.has_title() {
        lines.push(align_center(&style.title_line, opts.columns));
        lines.push(String::new());
        lines.push(String::new());
    }
    if let Some(tape) = header.tape() {
        let tape_str = format!("Tape {tape}");
        let header_len = style.header_line.chars().count();
        let line = if header_len + tape_str.chars().count() + 1 <= opts.columns {
            let pad = opts.columns - header_len - tape_str.chars().count();
            format!("{}{}{}", style.header_line, " ".repeat(pad), tape_str)
        } else {
            style.header_line.clone()
        };
        lines.push(line);

        let page_label = header
            .page
            .map(|num| format!("Page {num}"))
            .unwrap_or_default();
        lines.push(align_right(&page_label, opts.columns));
        lines.push(String::new());
        lines.push(String::new());
    }

    lines
}

/// Compose a normal page: header block, then every body block through its
/// type-specific formatter, in source order.
pub fn build_page_lines(
    page: &PageRecord,
    opts: &LayoutOptions,
    style: &MissionStyle,
) -> Vec<String> {
    let mut lines = header_lines(page, opts, style);

    for block in &page.blocks {
        match block.kind {
            BlockKind::Comm => {
                lines.extend(format_comm(block, opts));
                lines.push(String::new());
            }
            BlockKind::Annotation => {
                if matches!(lines.last(), Some(last) if !last.is_empty()) {
                    lines.push(String::new());
                }
                for _ in 0..style.annotation_top_blank_lines {
                    lines.push(String::new());
                }
                lines.extend(format_annotation(&block.text, opts));
                lines.push(String::new());
                lines.push(String::new());
            }
            BlockKind::Meta => {
                lines.extend(format_meta(block, opts, style.end_of_tape_indent_col));
                lines.push(String::new());
            }
            BlockKind::Footer => {
                lines.extend(format_footer(&block.text, opts));
                lines.push(String::new());
            }
            BlockKind::Continuation | BlockKind::Untyped => {
                lines.extend(format_indented(&block.text, opts.continuation_col, opts));
                lines.push(String::new());
            }
        }
    }

    lines
}

/// Compose the body of a note page: centered heading, blank line, then every
/// block's text wrapped at the (narrower) note width and centered on the full
/// page width. Block types play no role here.
pub fn note_lines(page: &PageRecord, opts: &LayoutOptions, style: &MissionStyle) -> Vec<String> {
    let heading = style.note_heading.trim();
    let mut lines = vec![align_center(heading, opts.columns), String::new()];

    let block_columns = style.note_block_columns.min(opts.columns).max(1);
    for block in &page.blocks {
        let text = block.text.trim();
        if text.is_empty() {
            continue;
        }
        for wrapped in wrap(text, block_columns as isize, opts.space_len) {
            lines.push(align_center(&wrapped, opts.columns));
        }
    }
    lines
}

/// Compose the body of a centered rest-period page.
///
/// Blocks with the rest-period meta subtype are preferred; when none carry
/// it, every block's non-empty text is used. Lines are wrapped at full width
/// and left uncentered; the renderer centers them as a block.
pub fn rest_period_lines(page: &PageRecord, opts: &LayoutOptions) -> Vec<String> {
    let mut texts: Vec<&str> = page
        .blocks
        .iter()
        .filter(|block| block.meta_type == REST_PERIOD_TAG)
        .map(|block| block.text.trim())
        .filter(|text| !text.is_empty())
        .collect();
    if texts.is_empty() {
        texts = page
            .blocks
            .iter()
            .map(|block| block.text.trim())
            .filter(|text| !text.is_empty())
            .collect();
    }

    let mut lines = Vec::new();
    for text in texts {
        lines.extend(wrap(text, opts.columns as isize, opts.space_len));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Block, PageHeader};

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    fn style() -> MissionStyle {
        MissionStyle::default()
    }

    fn page_with_header(tape: Option<&str>, page: Option<i64>, is_title: bool) -> PageRecord {
        PageRecord {
            header: PageHeader {
                tape: tape.map(str::to_string),
                page,
                is_title: Some(is_title),
                page_type: None,
            },
            blocks: Vec::new(),
        }
    }

    fn rest_page(blocks: Vec<Block>) -> PageRecord {
        PageRecord {
            header: PageHeader {
                page: Some(200),
                page_type: Some("rest_period".to_string()),
                ..PageHeader::default()
            },
            blocks,
        }
    }

    #[test]
    fn test_header_title_page() {
        let page = page_with_header(None, Some(3), true);
        let lines = header_lines(&page, &opts(), &style());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("AIR-TO-GROUND"));
        assert!(lines[1].is_empty() && lines[2].is_empty());
    }

    #[test]
    fn test_header_tape_line_flush_right() {
        let page = page_with_header(Some("3/1"), Some(5), false);
        let lines = header_lines(&page, &opts(), &style());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].chars().count(), 80);
        assert!(lines[0].starts_with("(GOSS NET 1)"));
        assert!(lines[0].ends_with("Tape 3/1"));
        assert_eq!(lines[1].chars().count(), 80);
        assert!(lines[1].ends_with("Page 5"));
    }

    #[test]
    fn test_header_tape_line_too_wide_falls_back() {
        let mut narrow = opts();
        narrow.columns = 18;
        let page = page_with_header(Some("3/1"), Some(5), false);
        let lines = header_lines(&page, &narrow, &style());
        // "(GOSS NET 1)" + " " + "Tape 3/1" = 21 > 18, so the tape is dropped
        assert_eq!(lines[0], "(GOSS NET 1)");
    }

    #[test]
    fn test_header_absent_fields_emit_nothing() {
        let page = page_with_header(None, Some(9), false);
        assert!(header_lines(&page, &opts(), &style()).is_empty());
        let page = page_with_header(Some(""), Some(9), false);
        assert!(header_lines(&page, &opts(), &style()).is_empty());
    }

    #[test]
    fn test_variant_precedence_note_beats_rest_period() {
        let mut style = style();
        style.note_pages.insert(200);
        let page = rest_page(vec![]);
        assert_eq!(resolve_variant(&page, &style), PageVariant::Note);
    }

    #[test]
    fn test_rest_period_requires_tag() {
        let page = page_with_header(None, Some(7), false);
        assert!(!is_centered_rest_period_page(&page, &style()));
    }

    #[test]
    fn test_rest_period_disqualified_by_comm_block() {
        let page = rest_page(vec![Block {
            kind: BlockKind::Comm,
            text: "ROGER".to_string(),
            ..Block::default()
        }]);
        assert!(!is_centered_rest_period_page(&page, &style()));
        assert_eq!(resolve_variant(&page, &style()), PageVariant::Normal);
    }

    #[test]
    fn test_rest_period_comm_allowed_when_flag_cleared() {
        let mut style = style();
        style.rest_period_only_when_no_comm = false;
        let page = rest_page(vec![Block {
            kind: BlockKind::Comm,
            text: "ROGER".to_string(),
            ..Block::default()
        }]);
        assert!(is_centered_rest_period_page(&page, &style));
    }

    #[test]
    fn test_rest_period_centering_disabled() {
        let mut style = style();
        style.center_rest_period_text = false;
        assert!(!is_centered_rest_period_page(&rest_page(vec![]), &style));
    }

    #[test]
    fn test_rest_period_lines_prefer_marked_blocks() {
        let page = rest_page(vec![
            Block {
                kind: BlockKind::Meta,
                meta_type: "rest_period".to_string(),
                text: "CDR REST PERIOD".to_string(),
                ..Block::default()
            },
            Block {
                kind: BlockKind::Untyped,
                text: "UNRELATED".to_string(),
                ..Block::default()
            },
        ]);
        assert_eq!(rest_period_lines(&page, &opts()), vec!["CDR REST PERIOD"]);
    }

    #[test]
    fn test_rest_period_lines_fall_back_to_all_text() {
        let page = rest_page(vec![
            Block {
                text: "REST PERIOD CONTINUES".to_string(),
                ..Block::default()
            },
            Block {
                text: "".to_string(),
                ..Block::default()
            },
        ]);
        assert_eq!(
            rest_period_lines(&page, &opts()),
            vec!["REST PERIOD CONTINUES"]
        );
    }

    #[test]
    fn test_note_lines_heading_blank_then_centered_body() {
        let mut style = style();
        style.note_block_columns = 40;
        let mut page = page_with_header(None, Some(339), false);
        page.blocks.push(Block {
            text: "Times shown are ground elapsed time".to_string(),
            ..Block::default()
        });
        let lines = note_lines(&page, &opts(), &style);
        assert_eq!(lines[0], align_center("NOTE", 80));
        assert!(lines[1].is_empty());
        assert!(lines.len() > 2);
        // Body lines are centered against the full page width
        assert!(lines[2].starts_with(' '));
    }

    #[test]
    fn test_build_page_lines_comm_trailing_blank() {
        let mut page = page_with_header(Some("1/1"), Some(3), false);
        page.blocks.push(Block {
            kind: BlockKind::Comm,
            timestamp: "00 00 04".to_string(),
            speaker: "CDR".to_string(),
            text: "ROGER CLOCK".to_string(),
            ..Block::default()
        });
        let lines = build_page_lines(&page, &opts(), &style());
        // 4 header lines, 1 comm line, 1 trailing blank
        assert_eq!(lines.len(), 6);
        assert!(lines[4].contains("ROGER CLOCK"));
        assert!(lines[5].is_empty());
    }

    #[test]
    fn test_build_page_lines_annotation_blank_conventions() {
        let mut page = page_with_header(None, Some(3), false);
        page.blocks.push(Block {
            kind: BlockKind::Comm,
            timestamp: "00 00 04".to_string(),
            speaker: "CDR".to_string(),
            text: "ROGER".to_string(),
            ..Block::default()
        });
        page.blocks.push(Block {
            kind: BlockKind::Annotation,
            text: "BEGIN DAY 3".to_string(),
            ..Block::default()
        });
        let lines = build_page_lines(&page, &opts(), &style());
        // comm line, blank (comm convention), blank (annotation top), centered
        // annotation, two trailing blanks
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("ROGER"));
        assert!(lines[1].is_empty());
        assert!(lines[2].is_empty());
        assert!(lines[3].contains("BEGIN DAY 3"));
        assert!(lines[4].is_empty() && lines[5].is_empty());
    }

    #[test]
    fn test_build_page_lines_unknown_type_uses_continuation_indent() {
        let mut page = page_with_header(None, Some(3), false);
        page.blocks.push(Block {
            kind: BlockKind::Untyped,
            text: "STATIC".to_string(),
            ..Block::default()
        });
        let lines = build_page_lines(&page, &opts(), &style());
        assert_eq!(lines[0], format!("{}STATIC", " ".repeat(30)));
    }
}
