//! Inline markup handling for tokenized policy text.
//!
//! Pandoc leaves HTML fragments (tables, spans) and markdown emphasis in
//! the tokenized policy. This module strips them from prose and reads the
//! row/cell structure of embedded tables. Markup is tokenized with
//! `html5ever`, which also decodes character references.

mod html;
mod table;
mod text;

pub use table::{extract_table, flatten_rows, table_boundary, TableBoundary};
pub use text::{collapse_whitespace, plain_text, strip_emphasis, strip_header_markers};
