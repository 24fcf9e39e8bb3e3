//! The text-layout and pagination core.
//!
//! Pure functions from transcript data and layout options to monospace line
//! sequences and vertical positions:
//! - [`wrap`] - greedy word wrapping and centering
//! - [`blocks`] - per-block-type formatting
//! - [`compose`] - page variant resolution and full-page line assembly
//! - [`select`] - page selection across source and output numbering
//! - [`fit`] - fit-to-page rescaling and line positioning

pub mod blocks;
pub mod compose;
pub mod fit;
pub mod select;
pub mod wrap;

pub use compose::{build_page_lines, header_lines, resolve_variant, PageVariant};
pub use fit::{fit_page, FittedPage, PlacedLine};
pub use select::{parse_pages_spec, resolve_selection, SelectionRequest};
pub use wrap::{align_center, align_right, wrap};
