//! Greedy word wrapping and horizontal centering.
//!
//! Widths are in character cells; the face is monospace so cell counts map
//! directly to rendered width.

/// Wrap text into lines of at most `width` characters.
///
/// Words are split on whitespace runs and packed greedily, joined by
/// `space_len` spaces. A single word longer than `width` is emitted unsplit.
/// A non-positive `width` disables wrapping and returns the input unchanged;
/// degenerate column configuration is not an error here.
pub fn wrap(text: &str, width: isize, space_len: usize) -> Vec<String> {
    if width <= 0 {
        return vec![text.to_string()];
    }
    let width = width as usize;

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let joiner = " ".repeat(space_len);
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in words {
        let word_len = word.chars().count();
        let tentative_len = if current.is_empty() {
            word_len
        } else {
            current_len + space_len + word_len
        };
        if tentative_len <= width || current.is_empty() {
            current.push(word);
            current_len = tentative_len;
            continue;
        }
        lines.push(current.join(&joiner));
        current = vec![word];
        current_len = word_len;
    }

    if !current.is_empty() {
        lines.push(current.join(&joiner));
    }

    lines
}

/// Center a line within `width` characters by left-padding.
///
/// A line at least as wide as `width` is returned unchanged. The pad is
/// `floor((width - len) / 2)`, so the remainder lands on the right.
pub fn align_center(line: &str, width: usize) -> String {
    let len = line.chars().count();
    if len >= width {
        return line.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), line)
}

/// Right-justify a line within `width` characters by left-padding.
///
/// A line at least as wide as `width` is returned unchanged.
pub fn align_right(line: &str, width: usize) -> String {
    let len = line.chars().count();
    if len >= width {
        return line.to_string();
    }
    format!("{}{}", " ".repeat(width - len), line)
}
