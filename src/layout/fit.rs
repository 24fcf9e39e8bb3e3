//! Vertical pagination: fit-to-page rescaling and line positioning.
//!
//! Each page is fitted independently. When fit-to-page is enabled and the
//! composed lines overrun the usable extent, line spacing shrinks so the
//! first line sits at the top margin and the last exactly at the bottom
//! margin; nothing is dropped. With fit-to-page off, overflow is truncated
//! silently at the base line height.

use crate::config::LayoutOptions;

/// A composed line with its baseline y offset on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Line text (possibly empty)
    pub text: String,
    /// Baseline y in points, measured from the page bottom
    pub y: f32,
}

/// The result of fitting one page's lines into the vertical extent.
#[derive(Debug, Clone)]
pub struct FittedPage {
    /// Lines with assigned baselines, top to bottom
    pub lines: Vec<PlacedLine>,
    /// Line height actually used
    pub line_height: f32,
    /// Number of lines dropped (only when fit-to-page is off)
    pub truncated: usize,
}

/// Fit composed lines into the page's usable vertical extent.
pub fn fit_page(lines: Vec<String>, opts: &LayoutOptions) -> FittedPage {
    let base_line_height = opts.base_line_height();
    let usable = opts.usable_height();
    let max_lines = (usable / base_line_height) as usize;

    let mut lines = lines;
    let mut line_height = base_line_height;
    let mut truncated = 0usize;

    if opts.fit_to_page && lines.len() > max_lines && lines.len() > 1 {
        line_height = usable / (lines.len() - 1) as f32;
        log::debug!(
            "fit-to-page: {} lines, line height {:.2} -> {:.2}",
            lines.len(),
            base_line_height,
            line_height
        );
    } else if lines.len() > max_lines {
        truncated = lines.len() - max_lines;
        lines.truncate(max_lines);
        log::debug!("truncated {truncated} overflow line(s)");
    }

    let top_y = opts.top_y();
    let placed = lines
        .into_iter()
        .enumerate()
        .map(|(row, text)| PlacedLine {
            text,
            y: top_y - row as f32 * line_height,
        })
        .collect();

    FittedPage {
        lines: placed,
        line_height,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(fit_to_page: bool) -> LayoutOptions {
        LayoutOptions {
            fit_to_page,
            ..LayoutOptions::default()
        }
    }

    fn numbered_lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_short_page_keeps_base_line_height() {
        let options = opts(true);
        let fitted = fit_page(numbered_lines(10), &options);
        assert_eq!(fitted.lines.len(), 10);
        assert_eq!(fitted.truncated, 0);
        assert!((fitted.line_height - options.base_line_height()).abs() < 1e-6);
        assert!((fitted.lines[0].y - options.top_y()).abs() < 1e-6);
    }

    #[test]
    fn test_overflow_rescales_without_dropping() {
        // Defaults: usable 696pt, base line height 12pt -> 58 lines fit
        let options = opts(true);
        let fitted = fit_page(numbered_lines(60), &options);
        assert_eq!(fitted.lines.len(), 60);
        assert_eq!(fitted.truncated, 0);
        assert!((fitted.line_height - 696.0 / 59.0).abs() < 1e-4);
        // Last line lands exactly on the bottom margin
        let last = fitted.lines.last().unwrap();
        assert!((last.y - options.bottom_margin_pt).abs() < 1e-3);
    }

    #[test]
    fn test_fit_invariant_content_height_within_extent() {
        let options = opts(true);
        for count in [59, 80, 120, 400] {
            let fitted = fit_page(numbered_lines(count), &options);
            let content_height = (fitted.lines.len() - 1) as f32 * fitted.line_height;
            assert!(content_height <= options.usable_height() + 1e-3);
            assert_eq!(fitted.lines.len(), count);
        }
    }

    #[test]
    fn test_overflow_truncates_when_fit_disabled() {
        let options = opts(false);
        let fitted = fit_page(numbered_lines(60), &options);
        assert_eq!(fitted.lines.len(), 58);
        assert_eq!(fitted.truncated, 2);
        assert!((fitted.line_height - options.base_line_height()).abs() < 1e-6);
    }

    #[test]
    fn test_single_overlong_line_is_never_rescaled() {
        // A one-line page cannot be spread between the margins
        let mut options = opts(true);
        options.page_height_pt = 70.0;
        options.top_margin_pt = 30.0;
        options.bottom_margin_pt = 30.0;
        // usable 10pt, base line height 12pt -> max_lines 0
        let fitted = fit_page(vec!["solo".to_string()], &options);
        assert_eq!(fitted.lines.len(), 0);
        assert_eq!(fitted.truncated, 1);
    }

    #[test]
    fn test_rows_step_down_by_line_height() {
        let options = opts(true);
        let fitted = fit_page(numbered_lines(5), &options);
        for pair in fitted.lines.windows(2) {
            let step = pair[0].y - pair[1].y;
            assert!((step - fitted.line_height).abs() < 1e-4);
        }
    }
}
