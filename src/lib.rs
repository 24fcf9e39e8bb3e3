//! # transcript_press
//!
//! Reconstructs typewriter-style mission transcripts from structured JSON
//! into paginated monospace PDFs.
//!
//! ## Pipeline
//!
//! ```text
//! JSON pages ──► [transcript] ──► [layout::select] ──► page numbers
//!                                       │
//!                                       ▼
//!              [layout::compose] ──► monospace lines ──► [layout::fit]
//!                                       │
//!                                       ▼
//!                      [render] ──► (x, y, text) placements ──► [writer] ──► PDF
//! ```
//!
//! ## Core Features
//!
//! - Greedy word wrap with configurable inter-word spacing
//! - Fixed-column formatting for communication turns, annotations, meta
//!   notes, continuations, and footers
//! - Title/tape page headers with page-number remapping between source and
//!   output numbering
//! - Special page variants: centered note pages and rest-period pages
//! - Fit-to-page line spacing so overlong pages shrink instead of truncating
//! - Self-contained PDF output with Base-14 Courier or an embedded
//!   monospace TrueType face
//!
//! ## Quick Start
//!
//! ```ignore
//! use transcript_press::config::Settings;
//! use transcript_press::fonts::FontSource;
//! use transcript_press::layout::{resolve_selection, SelectionRequest};
//! use transcript_press::render::render_to_file;
//! use transcript_press::transcript::Transcript;
//!
//! let settings = Settings::default();
//! let transcript = Transcript::load("input/AS11_TEC_merged.json")?;
//! let selection = resolve_selection(
//!     &transcript,
//!     &SelectionRequest { page_start: 3, pdf_offset: 2, ..Default::default() },
//! )?;
//! render_to_file(
//!     &transcript,
//!     &selection,
//!     &settings.layout,
//!     &settings.style,
//!     &FontSource::Builtin,
//!     "output/AS11_TEC_full.pdf",
//! )?;
//! ```

pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod object;
pub mod render;
pub mod transcript;
pub mod writer;

pub use config::{LayoutOptions, MissionStyle, Settings};
pub use error::{Error, Result};
pub use transcript::Transcript;
