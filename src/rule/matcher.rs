//! Before/after window matching and deletion offsets.
//!
//! The text node containing the cursor is split at the cursor into a head
//! (everything before) and a tail (everything after). The `before` pattern
//! runs against the head and the `after` pattern against the tail. Capture
//! group 1 of each side is the span that gets deleted, so a pattern can look
//! at wider context (anchors, word boundaries) while only the shorthand
//! token itself is removed.
//!
//! All offsets are character offsets.

use std::fmt;

use regex::{Captures, Regex};

/// Which side of the cursor a pattern applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// One side's regex match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideMatch {
    /// The whole matched text.
    pub text: String,
    /// Capture group 1, if the pattern has one and it participated.
    pub capture: Option<String>,
}

impl SideMatch {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            text: caps[0].to_owned(),
            capture: caps.get(1).map(|m| m.as_str().to_owned()),
        }
    }

    /// Characters this side contributes to the deleted span.
    pub fn deleted_len(&self) -> usize {
        self.capture.as_deref().map_or(0, |c| c.chars().count())
    }
}

/// Combined before/after match. At least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub before: Option<SideMatch>,
    pub after: Option<SideMatch>,
}

/// The span to delete, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offsets {
    pub start: usize,
    pub end: usize,
}

/// Byte index of the `chars`-th character of `text`, clamped to its length.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Clamp a character offset to the length of `text`.
///
/// Hosts may report a cursor past the end of the node; both matching and
/// deletion treat it as sitting at the end.
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    cursor.min(text.chars().count())
}

/// Match `before` against the text left of the cursor and `after` against
/// the text right of it.
///
/// When both patterns are given, a side that matched is discarded unless the
/// other side matched too. Returns `None` when nothing is left.
pub fn get_matches(
    text: &str,
    cursor: usize,
    before: Option<&Regex>,
    after: Option<&Regex>,
) -> Option<MatchResult> {
    let split = byte_offset(text, cursor);
    let (head, tail) = text.split_at(split);

    let mut after_match =
        after.and_then(|re| re.captures(tail).map(|c| SideMatch::from_captures(&c)));
    let mut before_match =
        before.and_then(|re| re.captures(head).map(|c| SideMatch::from_captures(&c)));

    if before.is_some() && after.is_some() {
        if before_match.is_none() {
            after_match = None;
        }
        if after_match.is_none() {
            before_match = None;
        }
    }

    if before_match.is_none() && after_match.is_none() {
        return None;
    }

    Some(MatchResult {
        before: before_match,
        after: after_match,
    })
}

/// Compute the span to delete around `cursor`.
///
/// Only non-empty capture groups move the bounds; a side without a group
/// deletes nothing.
pub fn get_offsets(matches: &MatchResult, cursor: usize) -> Offsets {
    let mut start = cursor;
    let mut end = cursor;

    if let Some(before) = &matches.before {
        start = start.saturating_sub(before.deleted_len());
    }
    if let Some(after) = &matches.after {
        end += after.deleted_len();
    }

    Offsets { start, end }
}
