//! Host editor interface.
//!
//! The rule engine never owns a document. It reads the cursor's text node
//! through [`EditorState`] and edits through a [`Transform`] handle that the
//! state hands out. [`document`] is a small in-memory implementation used by
//! the CLI and the tests.

pub mod diff;
pub mod document;

/// A host input event (`beforeinput` or `keydown`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputEvent {
    /// Text the event would insert, if any.
    pub data: Option<String>,
    default_prevented: bool,
}

impl InputEvent {
    /// An event carrying inserted text.
    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            data: Some(text.into()),
            default_prevented: false,
        }
    }

    /// Suppress the host's default handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a rule has claimed this event.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Extra data the host attaches to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputData {
    /// Normalized key name for key presses.
    pub key: Option<String>,
}

impl InputData {
    /// Data for a key press of `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }
}

/// Read access to the host editor state around the cursor.
///
/// Offsets are character offsets into the text node containing the start of
/// the selection.
pub trait EditorState: Sized {
    /// Edit handle produced by [`EditorState::transform`].
    type Transform: Transform<State = Self>;

    /// Whether the selection is a non-empty range.
    fn is_expanded(&self) -> bool;

    /// Type identifier of the block enclosing the selection start.
    fn start_block_type(&self) -> &str;

    /// Full text of the text node containing the selection start.
    fn start_text(&self) -> &str;

    /// Character offset of the selection start within [`start_text`](Self::start_text).
    fn start_offset(&self) -> usize;

    /// Open a transform scope on this state.
    fn transform(&self) -> Self::Transform;
}

/// A pending set of edits that becomes a new state on [`apply`](Self::apply).
///
/// Dropping a transform without applying it discards every edit.
pub trait Transform {
    type State;

    /// Select `start..end` (character offsets) in the current text node.
    fn move_to_offsets(&mut self, start: usize, end: usize) -> &mut Self;

    /// Delete the selected span, collapsing the selection to its start.
    fn delete(&mut self) -> &mut Self;

    /// Insert text at the cursor and move the cursor past it.
    fn insert_text(&mut self, text: &str) -> &mut Self;

    /// Change the type of the block containing the cursor.
    fn set_block_type(&mut self, kind: &str) -> &mut Self;

    /// Commit the edits, producing the new state.
    fn apply(self) -> Self::State;
}
