//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer. One monospace font resource is
//! registered per document, either Base-14 Courier or an embedded TrueType
//! face.

use super::content_stream::ContentStreamBuilder;
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::fonts::{FontSource, BUILTIN_FONT_NAME};
use crate::object::Object;
use std::collections::HashMap;
use std::io::Write;

/// Resource name of the document font in content streams.
const FONT_RESOURCE: &str = "F1";

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            subject: None,
            creator: Some("transcript_press".to_string()),
            compress: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, content streams and the embedded font program are
    /// compressed using FlateDecode (zlib/deflate) to reduce file size.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data using Flate/Deflate compression.
///
/// Returns compressed bytes suitable for FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// A page being built.
pub struct PageBuilder<'a> {
    writer: &'a mut PdfWriter,
    page_index: usize,
}

impl<'a> PageBuilder<'a> {
    /// Add text to the page at the given position.
    pub fn add_text(&mut self, text: &str, x: f32, y: f32, font_size: f32) -> &mut Self {
        let page = &mut self.writer.pages[self.page_index];
        page.content_builder
            .begin_text()
            .set_font(FONT_RESOURCE, font_size)
            .text(text, x, y);
        self
    }

    /// Finish building this page and return to the writer.
    pub fn finish(self) -> &'a mut PdfWriter {
        let page = &mut self.writer.pages[self.page_index];
        page.content_builder.end_text();
        self.writer
    }
}

/// Internal page data.
struct PageData {
    width: f32,
    height: f32,
    content_builder: ContentStreamBuilder,
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, a single font resource, and
/// text content.
pub struct PdfWriter {
    config: PdfWriterConfig,
    font: FontSource,
    pages: Vec<PageData>,
    /// Object ID counter
    next_obj_id: u32,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new(font: FontSource) -> Self {
        Self::with_config(font, PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(font: FontSource, config: PdfWriterConfig) -> Self {
        Self {
            config,
            font,
            pages: Vec::new(),
            next_obj_id: 1,
        }
    }

    /// Allocate a new object ID.
    fn alloc_obj_id(&mut self) -> u32 {
        let id = self.next_obj_id;
        self.next_obj_id += 1;
        id
    }

    /// Add a page with the given dimensions in points.
    pub fn add_page(&mut self, width: f32, height: f32) -> PageBuilder<'_> {
        let page_index = self.pages.len();
        self.pages.push(PageData {
            width,
            height,
            content_builder: ContentStreamBuilder::new(),
        });
        PageBuilder {
            writer: self,
            page_index,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Build the font object graph.
    ///
    /// Base-14 Courier needs a single font dictionary. An embedded face adds
    /// a font descriptor and the FontFile2 stream.
    fn build_font_objects(&mut self) -> (u32, Vec<(u32, Object)>) {
        let font_id = self.alloc_obj_id();
        let mut objects = Vec::new();

        match self.font.clone() {
            FontSource::Builtin => {
                let font_obj = ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Font")),
                    ("Subtype", ObjectSerializer::name("Type1")),
                    ("BaseFont", ObjectSerializer::name(BUILTIN_FONT_NAME)),
                    ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
                ]);
                objects.push((font_id, font_obj));
            }
            FontSource::Embedded(font) => {
                let descriptor_id = self.alloc_obj_id();
                let file_id = self.alloc_obj_id();

                let widths: Vec<Object> = font
                    .widths()
                    .iter()
                    .map(|w| Object::Integer(*w as i64))
                    .collect();
                let font_obj = ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Font")),
                    ("Subtype", ObjectSerializer::name("TrueType")),
                    ("BaseFont", ObjectSerializer::name(&font.name)),
                    ("FirstChar", ObjectSerializer::integer(font.first_char() as i64)),
                    ("LastChar", ObjectSerializer::integer(font.last_char() as i64)),
                    ("Widths", Object::Array(widths)),
                    ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
                    ("FontDescriptor", ObjectSerializer::reference(descriptor_id, 0)),
                ]);
                objects.push((font_id, font_obj));

                let (llx, lly, urx, ury) = font.bbox;
                let descriptor_obj = ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("FontDescriptor")),
                    ("FontName", ObjectSerializer::name(&font.name)),
                    ("Flags", ObjectSerializer::integer(font.flags as i64)),
                    (
                        "FontBBox",
                        Object::Array(vec![
                            Object::Integer(llx as i64),
                            Object::Integer(lly as i64),
                            Object::Integer(urx as i64),
                            Object::Integer(ury as i64),
                        ]),
                    ),
                    ("ItalicAngle", ObjectSerializer::integer(0)),
                    ("Ascent", ObjectSerializer::integer(font.ascent as i64)),
                    ("Descent", ObjectSerializer::integer(font.descent as i64)),
                    ("CapHeight", ObjectSerializer::integer(font.cap_height as i64)),
                    ("StemV", ObjectSerializer::integer(font.stem_v as i64)),
                    ("FontFile2", ObjectSerializer::reference(file_id, 0)),
                ]);
                objects.push((descriptor_id, descriptor_obj));

                let raw = font.font_data().to_vec();
                let mut file_dict = HashMap::new();
                file_dict.insert("Length1".to_string(), Object::Integer(raw.len() as i64));
                let (file_bytes, compressed) = if self.config.compress {
                    match compress_data(&raw) {
                        Ok(compressed) => (compressed, true),
                        Err(_) => (raw, false),
                    }
                } else {
                    (raw, false)
                };
                file_dict.insert(
                    "Length".to_string(),
                    Object::Integer(file_bytes.len() as i64),
                );
                if compressed {
                    file_dict.insert(
                        "Filter".to_string(),
                        Object::Name("FlateDecode".to_string()),
                    );
                }
                objects.push((
                    file_id,
                    Object::Stream {
                        dict: file_dict,
                        data: bytes::Bytes::from(file_bytes),
                    },
                ));
            }
        }

        (font_id, objects)
    }

    /// Build the complete PDF document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let (font_id, font_objects) = self.build_font_objects();

        let font_resources = ObjectSerializer::dict(vec![(
            FONT_RESOURCE,
            ObjectSerializer::reference(font_id, 0),
        )]);

        let catalog_id = self.alloc_obj_id();
        let pages_id = self.alloc_obj_id();

        // Pre-allocate object IDs for all pages
        let page_count = self.pages.len();
        let mut page_ids: Vec<(u32, u32)> = Vec::with_capacity(page_count);
        for _ in 0..page_count {
            let page_id = self.alloc_obj_id();
            let content_id = self.alloc_obj_id();
            page_ids.push((page_id, content_id));
        }

        // Create page objects
        let mut page_refs: Vec<Object> = Vec::new();
        let mut page_objects: Vec<(u32, Object)> = Vec::new();

        for (i, page_data) in self.pages.iter().enumerate() {
            let (page_id, content_id) = page_ids[i];

            // Build content stream
            let raw_content = page_data.content_builder.build()?;

            // Optionally compress the content stream
            let (content_bytes, is_compressed) = if self.config.compress {
                match compress_data(&raw_content) {
                    Ok(compressed) => (compressed, true),
                    Err(_) => (raw_content, false), // Fall back to uncompressed on error
                }
            } else {
                (raw_content, false)
            };

            let mut content_dict = HashMap::new();
            content_dict.insert(
                "Length".to_string(),
                Object::Integer(content_bytes.len() as i64),
            );
            if is_compressed {
                content_dict.insert(
                    "Filter".to_string(),
                    Object::Name("FlateDecode".to_string()),
                );
            }

            // Page object
            let page_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(pages_id, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(0.0, 0.0, page_data.width as f64, page_data.height as f64),
                ),
                ("Contents", ObjectSerializer::reference(content_id, 0)),
                (
                    "Resources",
                    ObjectSerializer::dict(vec![("Font", font_resources.clone())]),
                ),
            ]);

            page_refs.push(ObjectSerializer::reference(page_id, 0));
            page_objects.push((page_id, page_obj));
            page_objects.push((
                content_id,
                Object::Stream {
                    dict: content_dict,
                    data: bytes::Bytes::from(content_bytes),
                },
            ));
        }

        // Pages object
        let pages_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            ("Kids", Object::Array(page_refs)),
            ("Count", ObjectSerializer::integer(page_count as i64)),
        ]);

        // Catalog object
        let catalog_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Pages", ObjectSerializer::reference(pages_id, 0)),
        ]);

        // Info object (optional metadata)
        let info_id = self.alloc_obj_id();
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", ObjectSerializer::string(title)));
        }
        if let Some(subject) = &self.config.subject {
            info_entries.push(("Subject", ObjectSerializer::string(subject)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", ObjectSerializer::string(creator)));
        }
        let info_obj = ObjectSerializer::dict(info_entries);

        // Write all objects
        // Catalog
        xref_offsets.push((catalog_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(catalog_id, 0, &catalog_obj));

        // Pages
        xref_offsets.push((pages_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(pages_id, 0, &pages_obj));

        // Font objects
        for (obj_id, obj) in &font_objects {
            xref_offsets.push((*obj_id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*obj_id, 0, obj));
        }

        // Page and content objects
        for (obj_id, obj) in &page_objects {
            xref_offsets.push((*obj_id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*obj_id, 0, obj));
        }

        // Info object
        xref_offsets.push((info_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(info_id, 0, &info_obj));

        // Write xref table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_obj_id)?;

        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;

        // Sort xref entries by object ID
        xref_offsets.sort_by_key(|(id, _)| *id);

        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        // Write trailer
        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(self.next_obj_id as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);

        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer));
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }

    /// Save the PDF to a file.
    pub fn save(self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.finish()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
