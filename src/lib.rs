//! `oa-autoreplace` — auto-replace rules for block-based rich-text editors.
//!
//! A rule turns typed shorthand into structured content: typing a space
//! after `-` at the start of a paragraph can turn the paragraph into a list
//! item, typing `**` after `**bold` can make the word bold. Each rule checks
//! a trigger, the block the cursor is in, and the text on either side of the
//! cursor, then deletes the matched shorthand and runs a transform.
//!
//! # Modules
//!
//! - `rule` — [`AutoReplace`] rules, their builder, and [`RuleSet`]
//! - `rule::normalize` — trigger and block scope predicates
//! - `rule::matcher` — before/after matching and deletion offsets
//! - `host` — the [`EditorState`] / [`Transform`] traits a host implements,
//!   plus a small in-memory [`Document`]
//! - `config` — JSON rule files with declarative actions
//!
//! # Architecture
//!
//! ```text
//! host event → AutoReplace::on_before_input / on_key_down
//!                 ├─ Trigger (normalize)
//!                 ├─ ScopeMatcher only_in / ignore_in (normalize)
//!                 ├─ get_matches → get_offsets (matcher)
//!                 └─ EditorState::transform → delete → callback → apply
//!                                                               ↓
//! host state  ←──────────────────────────────── Outcome::Replaced(state)
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod rule;

pub use config::RulesFile;
pub use error::{ReplaceError, ReplaceResult};
pub use host::document::Document;
pub use host::{EditorState, InputData, InputEvent, Transform};
pub use rule::matcher::{
    MatchResult, Offsets, SideMatch, clamp_cursor, get_matches, get_offsets,
};
pub use rule::normalize::{ScopeSpec, TriggerSpec, normalize_matcher, normalize_trigger};
pub use rule::{AutoReplace, AutoReplaceBuilder, EventKind, Outcome, RuleSet};
