//! PDF writing module for generating the output document.
//!
//! ## Architecture
//!
//! ```text
//! positioned lines (x, y, text)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ContentStreamBuilder] (text operators → content stream bytes)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ```ignore
//! use transcript_press::fonts::FontSource;
//! use transcript_press::writer::PdfWriter;
//!
//! let mut writer = PdfWriter::new(FontSource::Builtin);
//! let mut page = writer.add_page(605.0, 756.0);
//! page.add_text("Tape 3/1", 38.5, 726.0, 10.0);
//! page.finish();
//! let bytes = writer.finish()?;
//! ```

mod content_stream;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PageBuilder, PdfWriter, PdfWriterConfig};
