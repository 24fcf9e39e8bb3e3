//! PDF content stream builder.
//!
//! Builds PDF content streams containing the text operators the transcript
//! renderer emits, according to PDF specification ISO 32000-1:2008 Section 9.

use crate::error::Result;
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone)]
pub enum ContentStreamOp {
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show text (Tj) - literal string
    ShowText(String),
}

/// Builder for PDF content streams.
///
/// Tracks text-object state so callers can interleave positioning calls
/// without emitting unbalanced BT/ET pairs.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    /// Operations in the stream
    operations: Vec<ContentStreamOp>,
    /// Current font name
    current_font: Option<String>,
    /// Current font size
    current_font_size: f32,
    /// Whether we're in a text object
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Set font for text operations.
    pub fn set_font(&mut self, font_name: &str, size: f32) -> &mut Self {
        if self.current_font.as_deref() != Some(font_name) || self.current_font_size != size {
            self.op(ContentStreamOp::SetFont(font_name.to_string(), size));
            self.current_font = Some(font_name.to_string());
            self.current_font_size = size;
        }
        self
    }

    /// Add text at a position.
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.op(ContentStreamOp::ShowText(text.to_string()));
        self
    }

    /// Whether any text has been added.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Build the content stream bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        for op in &self.operations {
            self.write_op(&mut buf, op)?;
            writeln!(buf)?;
        }

        Ok(buf)
    }

    /// Write a single operation to the buffer.
    fn write_op<W: Write>(&self, w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
        match op {
            ContentStreamOp::BeginText => write!(w, "BT"),
            ContentStreamOp::EndText => write!(w, "ET"),
            ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, size),
            ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
                write!(w, "{} {} {} {} {} {} Tm", a, b, c, d, e, f)
            }
            ContentStreamOp::ShowText(text) => {
                write!(w, "(")?;
                self.write_escaped_string(w, text)?;
                write!(w, ") Tj")
            }
        }
    }

    /// Write a string with PDF literal-string escaping.
    fn write_escaped_string<W: Write>(&self, w: &mut W, text: &str) -> std::io::Result<()> {
        for byte in text.bytes() {
            match byte {
                b'(' => write!(w, "\\(")?,
                b')' => write!(w, "\\)")?,
                b'\\' => write!(w, "\\\\")?,
                b'\n' => write!(w, "\\n")?,
                b'\r' => write!(w, "\\r")?,
                b'\t' => write!(w, "\\t")?,
                _ => w.write_all(&[byte])?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream() {
        let builder = ContentStreamBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.build().unwrap().is_empty());
    }

    #[test]
    fn test_text_emits_bt_tm_tj() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .set_font("F1", 10.0)
            .text("GO FOR LANDING", 38.5, 726.0);
        builder.end_text();

        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert!(content.contains("BT"));
        assert!(content.contains("/F1 10 Tf"));
        assert!(content.contains("1 0 0 1 38.5 726 Tm"));
        assert!(content.contains("(GO FOR LANDING) Tj"));
        assert!(content.contains("ET"));
    }

    #[test]
    fn test_begin_text_is_idempotent() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_text().begin_text();
        builder.end_text().end_text();

        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert_eq!(content.matches("BT").count(), 1);
        assert_eq!(content.matches("ET").count(), 1);
    }

    #[test]
    fn test_set_font_deduplicates() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .set_font("F1", 10.0)
            .text("a", 0.0, 0.0)
            .set_font("F1", 10.0)
            .text("b", 0.0, 0.0);

        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert_eq!(content.matches("Tf").count(), 1);
    }

    #[test]
    fn test_parentheses_are_escaped() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_text().set_font("F1", 10.0);
        builder.text("(GOSS NET 1)", 30.0, 726.0);
        builder.end_text();

        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert!(content.contains("(\\(GOSS NET 1\\)) Tj"));
    }
}
