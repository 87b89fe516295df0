//! Diff generation using the `similar` crate.
//!
//! Shows what a replacement did to a document, one line per block.

use similar::{Algorithm, TextDiff};

use super::document::Document;

/// Generate a unified diff between two renderings of a document.
pub fn document_diff(old: &Document, new: &Document) -> String {
    let old = old.to_string();
    let new = new.to_string();
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Patience)
        .diff_lines(&old, &new);

    diff.unified_diff().header("before", "after").to_string()
}
