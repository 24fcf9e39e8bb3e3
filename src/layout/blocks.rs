//! Per-block-type formatting of transcript blocks into monospace lines.
//!
//! Each formatter returns the block's lines without surrounding blank lines;
//! the page composer owns the blank-line conventions between blocks.

use super::wrap::{align_center, wrap};
use crate::config::LayoutOptions;
use crate::transcript::Block;

/// Text a meta block must carry to be treated as a tape boundary.
const END_OF_TAPE_TEXT: &str = "END OF TAPE";

/// Meta subtype marking a tape boundary.
const END_OF_TAPE_META: &str = "end_of_tape";

/// Format a communication turn.
///
/// The prefix is built left to right: timestamp, padding to the speaker
/// column, speaker, padding to the text column, then an optional
/// `(location) ` parenthetical. The parenthetical may push the prefix past
/// the text column; the remaining wrap width shrinks accordingly. Wrapped
/// continuation lines are indented to the text column, not to the
/// parenthetical; the original documents carry that asymmetry.
pub fn format_comm(block: &Block, opts: &LayoutOptions) -> Vec<String> {
    let timestamp = block.timestamp.trim();
    let speaker = block.speaker.trim();
    let text = block.text.trim();

    let mut prefix = String::new();
    prefix.push_str(timestamp);
    pad_to_column(&mut prefix, opts.speaker_col);
    prefix.push_str(speaker);
    pad_to_column(&mut prefix, opts.text_col);
    if let Some(location) = block.location() {
        prefix.push_str(&format!("({location}) "));
    }

    let available = opts.columns as isize - prefix.chars().count() as isize;
    let wrapped = wrap(text, available, opts.space_len);
    if wrapped.is_empty() {
        return vec![prefix.trim_end().to_string()];
    }

    let mut lines = Vec::with_capacity(wrapped.len());
    lines.push(format!("{}{}", prefix, wrapped[0]));
    let continuation_prefix = " ".repeat(opts.text_col);
    for part in &wrapped[1..] {
        lines.push(format!("{continuation_prefix}{part}"));
    }
    lines
}

/// Format text indented to a fixed column, wrapped in the remaining width.
pub fn format_indented(text: &str, indent_col: usize, opts: &LayoutOptions) -> Vec<String> {
    let stripped = text.trim();
    let wrapped = wrap(
        stripped,
        opts.columns as isize - indent_col as isize,
        opts.space_len,
    );
    if wrapped.is_empty() {
        return vec![" ".repeat(indent_col)];
    }
    let prefix = " ".repeat(indent_col);
    wrapped
        .into_iter()
        .map(|line| format!("{prefix}{line}"))
        .collect()
}

/// Format an annotation: wrapped at full width, each line centered by its
/// own length.
pub fn format_annotation(text: &str, opts: &LayoutOptions) -> Vec<String> {
    wrap(text.trim(), opts.columns as isize, opts.space_len)
        .into_iter()
        .map(|line| align_center(&line, opts.columns))
        .collect()
}

/// Format a meta note.
///
/// Tape boundaries (`end_of_tape` subtype, or the literal END OF TAPE text)
/// indent to the configured end-of-tape column; all other meta notes use the
/// meta column.
pub fn format_meta(block: &Block, opts: &LayoutOptions, end_of_tape_indent_col: usize) -> Vec<String> {
    if block.meta_type == END_OF_TAPE_META || block.text.trim() == END_OF_TAPE_TEXT {
        format_indented(&block.text, end_of_tape_indent_col, opts)
    } else {
        format_indented(&block.text, opts.meta_col, opts)
    }
}

/// Format a footer line at the timestamp column.
///
/// Unlike [`format_indented`], an empty footer produces no lines at all.
pub fn format_footer(text: &str, opts: &LayoutOptions) -> Vec<String> {
    let wrapped = wrap(
        text.trim(),
        opts.columns as isize - opts.timestamp_col as isize,
        opts.space_len,
    );
    let prefix = " ".repeat(opts.timestamp_col);
    wrapped
        .into_iter()
        .map(|line| format!("{prefix}{line}"))
        .collect()
}

/// Pad a string with spaces up to the given column, if shorter.
fn pad_to_column(s: &mut String, col: usize) {
    let len = s.chars().count();
    if len < col {
        s.push_str(&" ".repeat(col - len));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::BlockKind;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    fn comm(timestamp: &str, speaker: &str, text: &str, location: Option<&str>) -> Block {
        Block {
            kind: BlockKind::Comm,
            timestamp: timestamp.to_string(),
            speaker: speaker.to_string(),
            text: text.to_string(),
            location: location.map(str::to_string),
            ..Block::default()
        }
    }

    #[test]
    fn test_comm_prefix_columns() {
        let block = comm("00 01 02", "CDR", "GO FOR LANDING", None);
        let lines = format_comm(&block, &opts());
        assert_eq!(lines.len(), 1);
        // Timestamp padded to the speaker column, speaker padded to the text column
        assert_eq!(&lines[0][..30], "00 01 02          CDR         ");
        assert_eq!(&lines[0][30..], "GO FOR LANDING");
    }

    #[test]
    fn test_comm_wraps_into_text_column_continuation() {
        let block = comm(
            "04 06 45",
            "CC",
            "ROGER TRANQUILITY WE COPY YOU ON THE GROUND YOU GOT A BUNCH OF GUYS ABOUT TO TURN BLUE",
            None,
        );
        let lines = format_comm(&block, &opts());
        assert!(lines.len() > 1);
        for line in &lines[1..] {
            assert!(line.starts_with(&" ".repeat(30)));
            assert!(!line[30..].starts_with(' '));
        }
    }

    #[test]
    fn test_comm_location_shrinks_wrap_width_but_not_indent() {
        let block = comm("00 00 04", "CC", "ROGER YOU ARE LOOKING GOOD HERE COPY THE HANDOVER AND THE DATA IS SOLID", Some("HOUSTON"));
        let lines = format_comm(&block, &opts());
        assert!(lines[0].contains("(HOUSTON) "));
        // Continuations fall back to the text column, not the parenthetical width
        assert!(lines.len() > 1);
        assert!(lines[1].starts_with(&" ".repeat(30)));
    }

    #[test]
    fn test_comm_empty_text_emits_trimmed_prefix() {
        let block = comm("00 01 02", "LMP", "", None);
        let lines = format_comm(&block, &opts());
        assert_eq!(lines, vec!["00 01 02          LMP".to_string()]);
    }

    #[test]
    fn test_comm_empty_location_is_ignored() {
        let block = comm("00 01 02", "CDR", "ROGER", Some(""));
        let lines = format_comm(&block, &opts());
        assert!(!lines[0].contains('('));
    }

    #[test]
    fn test_indented_empty_text_is_blank_indent() {
        let lines = format_indented("", 30, &opts());
        assert_eq!(lines, vec![" ".repeat(30)]);
    }

    #[test]
    fn test_indented_wraps_in_reduced_width() {
        let text = "THIS TRANSMISSION CONTINUES FROM THE PREVIOUS PAGE OF THE TRANSCRIPT WITHOUT A NEW TIMESTAMP";
        let lines = format_indented(text, 30, &opts());
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.starts_with(&" ".repeat(30)));
            assert!(line.chars().count() <= 80);
        }
    }

    #[test]
    fn test_annotation_centers_each_line() {
        let lines = format_annotation("BEGIN LUNAR REST PERIOD", &opts());
        assert_eq!(lines.len(), 1);
        let left_pad = lines[0].chars().take_while(|c| *c == ' ').count();
        assert_eq!(left_pad, (80 - "BEGIN LUNAR REST PERIOD".len()) / 2);
    }

    #[test]
    fn test_meta_end_of_tape_by_subtype() {
        let block = Block {
            kind: BlockKind::Meta,
            meta_type: "end_of_tape".to_string(),
            text: "END OF TAPE".to_string(),
            ..Block::default()
        };
        let lines = format_meta(&block, &opts(), 0);
        assert_eq!(lines, vec!["END OF TAPE".to_string()]);
    }

    #[test]
    fn test_meta_end_of_tape_by_text() {
        let block = Block {
            kind: BlockKind::Meta,
            text: "  END OF TAPE  ".to_string(),
            ..Block::default()
        };
        let lines = format_meta(&block, &opts(), 10);
        assert_eq!(lines, vec![format!("{}END OF TAPE", " ".repeat(10))]);
    }

    #[test]
    fn test_meta_other_uses_meta_column() {
        let block = Block {
            kind: BlockKind::Meta,
            text: "REST PERIOD".to_string(),
            meta_type: "rest_period".to_string(),
            ..Block::default()
        };
        let lines = format_meta(&block, &opts(), 0);
        assert_eq!(lines, vec![format!("{}REST PERIOD", " ".repeat(30))]);
    }

    #[test]
    fn test_footer_empty_text_yields_nothing() {
        assert!(format_footer("", &opts()).is_empty());
    }

    #[test]
    fn test_footer_starts_at_timestamp_column() {
        let lines = format_footer("Page 12 of 638", &opts());
        assert_eq!(lines, vec!["Page 12 of 638".to_string()]);
    }
}
