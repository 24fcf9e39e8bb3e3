//! Page selection: spec parsing and resolution across the two numbering
//! schemes.
//!
//! Requests can be phrased in output (PDF) numbering or in source numbering.
//! Output numbers convert to source numbers by subtracting a configured
//! offset. Resolution precedence: explicit output pages, output start/end
//! pair, explicit source pages, source start/end pair (end defaulting to the
//! highest known page). Requested pages absent from the source are dropped;
//! an empty result after filtering is fatal.

use crate::error::{Error, Result};
use crate::transcript::Transcript;

/// A page selection request, before resolution against the source data.
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    /// Explicit source page numbers
    pub pages: Vec<i64>,
    /// First source page for range selection
    pub page_start: i64,
    /// Last source page for range selection (None = maximum known)
    pub page_end: Option<i64>,
    /// Explicit output page numbers
    pub pdf_pages: Vec<i64>,
    /// First output page for range selection
    pub pdf_start: Option<i64>,
    /// Last output page for range selection (None = same as start)
    pub pdf_end: Option<i64>,
    /// Offset between output and source numbering
    pub pdf_offset: i64,
}

/// Parse a CSV page spec like `3,5,10-12` into page numbers.
///
/// Ranges are inclusive on both ends and may run downward (`12-10` yields
/// 12, 11, 10). Empty tokens are skipped; anything unparsable is an error.
pub fn parse_pages_spec(spec: &str) -> Result<Vec<i64>> {
    let mut pages = Vec::new();
    if spec.is_empty() {
        return Ok(pages);
    }

    for part in spec.split(',') {
        let token = part.trim();
        if token.is_empty() {
            continue;
        }
        // Split on the first '-' that isn't a leading sign
        let dash = token
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i);
        match dash {
            Some(split_at) => {
                let start = parse_page_number(&token[..split_at], token)?;
                let end = parse_page_number(&token[split_at + 1..], token)?;
                pages.extend(inclusive_range(start, end));
            }
            None => pages.push(parse_page_number(token, token)?),
        }
    }
    Ok(pages)
}

/// Resolve the effective ordered list of source page numbers to render.
pub fn resolve_selection(transcript: &Transcript, request: &SelectionRequest) -> Result<Vec<i64>> {
    let selected: Vec<i64> = if !request.pdf_pages.is_empty() {
        request
            .pdf_pages
            .iter()
            .map(|page| page - request.pdf_offset)
            .collect()
    } else if let Some(pdf_start) = request.pdf_start {
        let end = request.pdf_end.unwrap_or(pdf_start);
        inclusive_range(pdf_start, end)
            .into_iter()
            .map(|page| page - request.pdf_offset)
            .collect()
    } else if !request.pages.is_empty() {
        request.pages.clone()
    } else {
        let end = match request.page_end {
            Some(end) => end,
            None => transcript.max_page().ok_or(Error::EmptySelection)?,
        };
        inclusive_range(request.page_start, end)
    };

    let existing: Vec<i64> = selected
        .into_iter()
        .filter(|page| {
            let present = transcript.contains(*page);
            if !present {
                log::debug!("dropping requested page {page}: not in source data");
            }
            present
        })
        .collect();

    if existing.is_empty() {
        return Err(Error::EmptySelection);
    }
    log::info!(
        "selected {} page(s): {} .. {}",
        existing.len(),
        existing[0],
        existing[existing.len() - 1]
    );
    Ok(existing)
}

/// Inclusive range that runs downward when `end < start`.
fn inclusive_range(start: i64, end: i64) -> Vec<i64> {
    if end >= start {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    }
}

fn parse_page_number(text: &str, token: &str) -> Result<i64> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidPageSpec(token.to_string()))
}
