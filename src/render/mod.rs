//! Presentation layer: consumes classified records, emits display artifacts.
//!
//! The core never depends on anything here; rendering takes grouped records
//! plus an explicit set of excluded HAL ids and produces either an HTML
//! fragment or terminal text.

pub mod cite;
mod html;
mod text;

pub use cite::{parse_citation, CitationLink, ParsedCitation};
pub use html::render_html;
pub use text::{render_text, summary_table};
