//! Minimal in-memory block document.
//!
//! A document is a list of blocks, each with a type identifier and a single
//! text node, plus a selection inside one block. It is enough to drive rules
//! from the CLI and from tests; real editors implement [`EditorState`] over
//! their own models.

use std::fmt;

use super::{EditorState, Transform};
use crate::error::{ReplaceError, ReplaceResult};
use crate::rule::matcher::byte_offset;

/// A block with one text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: String,
    pub text: String,
}

impl Block {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }
}

/// Selection inside a single block, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub block: usize,
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    /// A collapsed selection.
    pub fn cursor(block: usize, offset: usize) -> Self {
        Self {
            block,
            anchor: offset,
            focus: offset,
        }
    }

    /// Whether anchor and focus coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The lower of anchor and focus.
    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }
}

/// Immutable document state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
    selection: Selection,
}

impl Document {
    /// Create a document. Selection offsets past the end of the block text
    /// are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::InvalidSelection`] if the selection points at
    /// a block that does not exist.
    pub fn new(blocks: Vec<Block>, selection: Selection) -> ReplaceResult<Self> {
        let Some(block) = blocks.get(selection.block) else {
            return Err(ReplaceError::InvalidSelection {
                block: selection.block,
                len: blocks.len(),
            });
        };
        let len = block.text.chars().count();
        let selection = Selection {
            block: selection.block,
            anchor: selection.anchor.min(len),
            focus: selection.focus.min(len),
        };
        Ok(Self { blocks, selection })
    }

    /// A single block document with the cursor at `offset`.
    pub fn single(kind: &str, text: &str, offset: usize) -> Self {
        let len = text.chars().count();
        Self {
            blocks: vec![Block::new(kind, text)],
            selection: Selection::cursor(0, offset.min(len)),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Return a copy with a different selection in the same block.
    #[must_use]
    pub fn with_selection(mut self, anchor: usize, focus: usize) -> Self {
        let len = self.start_text().chars().count();
        self.selection.anchor = anchor.min(len);
        self.selection.focus = focus.min(len);
        self
    }

    fn current(&self) -> &Block {
        &self.blocks[self.selection.block]
    }
}

/// Renders one line per block as `kind: text`, with `|` at the cursor.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i == self.selection.block && self.selection.is_collapsed() {
                let at = byte_offset(&block.text, self.selection.anchor);
                writeln!(
                    f,
                    "{}: {}|{}",
                    block.kind,
                    &block.text[..at],
                    &block.text[at..]
                )?;
            } else {
                writeln!(f, "{}: {}", block.kind, block.text)?;
            }
        }
        Ok(())
    }
}

impl EditorState for Document {
    type Transform = DocumentTransform;

    fn is_expanded(&self) -> bool {
        !self.selection.is_collapsed()
    }

    fn start_block_type(&self) -> &str {
        &self.current().kind
    }

    fn start_text(&self) -> &str {
        &self.current().text
    }

    fn start_offset(&self) -> usize {
        self.selection.start()
    }

    fn transform(&self) -> DocumentTransform {
        DocumentTransform { doc: self.clone() }
    }
}

/// Edits a private copy of a [`Document`]; the original is never touched.
#[derive(Debug, Clone)]
pub struct DocumentTransform {
    doc: Document,
}

impl DocumentTransform {
    fn block_mut(&mut self) -> &mut Block {
        let index = self.doc.selection.block;
        &mut self.doc.blocks[index]
    }
}

impl Transform for DocumentTransform {
    type State = Document;

    fn move_to_offsets(&mut self, start: usize, end: usize) -> &mut Self {
        let len = self.doc.start_text().chars().count();
        self.doc.selection.anchor = start.min(len);
        self.doc.selection.focus = end.min(len);
        self
    }

    fn delete(&mut self) -> &mut Self {
        let (start, end) = (self.doc.selection.start(), self.doc.selection.end());
        let block = self.block_mut();
        let from = byte_offset(&block.text, start);
        let to = byte_offset(&block.text, end);
        block.text.replace_range(from..to, "");
        self.doc.selection.anchor = start;
        self.doc.selection.focus = start;
        self
    }

    fn insert_text(&mut self, text: &str) -> &mut Self {
        if !self.doc.selection.is_collapsed() {
            self.delete();
        }
        let at = self.doc.selection.anchor;
        let block = self.block_mut();
        let from = byte_offset(&block.text, at);
        block.text.insert_str(from, text);
        let cursor = at + text.chars().count();
        self.doc.selection.anchor = cursor;
        self.doc.selection.focus = cursor;
        self
    }

    fn set_block_type(&mut self, kind: &str) -> &mut Self {
        kind.clone_into(&mut self.block_mut().kind);
        self
    }

    fn apply(self) -> Document {
        self.doc
    }
}
