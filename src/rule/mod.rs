//! Auto-replace rules.
//!
//! A rule watches input events. When its trigger fires and the text around
//! the cursor matches its `before`/`after` patterns, the captured shorthand is
//! deleted and the rule's transform callback writes the replacement.
//!
//! # Evaluation
//!
//! ```text
//! event ─→ trigger? ─→ collapsed? ─→ only_in? ─→ ignore_in? ─→ get_matches
//!   │          │ no         │ no         │ no         │ yes         │ none
//!   │          └────────────┴────────────┴────────────┴─────────────┴─→ Unchanged
//!   └─ all passed: prevent_default → get_offsets → move/delete
//!                  → transform callback → apply ─→ Replaced(state)
//! ```
//!
//! Both [`AutoReplace::on_before_input`] and [`AutoReplace::on_key_down`] run
//! the same evaluation; they only differ in which host event fired.

pub mod matcher;
pub mod normalize;

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{ReplaceError, ReplaceResult};
use crate::host::{EditorState, InputData, InputEvent, Transform};
use matcher::{MatchResult, Side, clamp_cursor, get_matches, get_offsets};
use normalize::{
    ScopeMatcher, ScopeSpec, Trigger, TriggerSpec, normalize_matcher, normalize_trigger,
};

/// Caller-supplied edit run after the matched span has been deleted.
pub type TransformFn<S> = dyn Fn(
        &mut <S as EditorState>::Transform,
        &InputEvent,
        &InputData,
        &MatchResult,
    ) -> anyhow::Result<()>
    + Send
    + Sync;

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<S> {
    /// The rule did not apply; the host keeps its current state.
    Unchanged,
    /// A replacement was applied, producing this state.
    Replaced(S),
}

impl<S> Outcome<S> {
    /// Whether a replacement was applied.
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }

    /// The new state, or `current` if nothing changed.
    pub fn unwrap_or(self, current: S) -> S {
        match self {
            Self::Unchanged => current,
            Self::Replaced(state) => state,
        }
    }
}

/// Host event kinds a rule listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    BeforeInput,
    KeyDown,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeInput => f.write_str("before_input"),
            Self::KeyDown => f.write_str("key_down"),
        }
    }
}

/// A configured, immutable auto-replace rule.
pub struct AutoReplace<S: EditorState> {
    name: Option<String>,
    trigger: Trigger,
    before: Option<Regex>,
    after: Option<Regex>,
    only_in: Option<ScopeMatcher>,
    ignore_in: Option<ScopeMatcher>,
    transform: Arc<TransformFn<S>>,
}

impl<S: EditorState> AutoReplace<S> {
    /// Start configuring a rule.
    pub fn builder() -> AutoReplaceBuilder<S> {
        AutoReplaceBuilder::default()
    }

    /// Label used in logs and rule files, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Handle a text insertion event.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::Transform`] if the transform callback fails.
    /// The host state is left as it was.
    pub fn on_before_input(
        &self,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        self.handle(EventKind::BeforeInput, event, data, state)
    }

    /// Handle a key press event.
    ///
    /// # Errors
    ///
    /// Same as [`AutoReplace::on_before_input`].
    pub fn on_key_down(
        &self,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        self.handle(EventKind::KeyDown, event, data, state)
    }

    /// Handle an event of the given kind.
    ///
    /// # Errors
    ///
    /// Same as [`AutoReplace::on_before_input`].
    pub fn handle(
        &self,
        kind: EventKind,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        if !self.trigger.matches(event, data) {
            trace!(rule = self.label(), event = %kind, "trigger did not fire");
            return Ok(Outcome::Unchanged);
        }
        self.replace(event, data, state)
    }

    /// Check selection, block scope and text patterns without editing.
    ///
    /// The trigger is not consulted.
    pub fn find_match(&self, state: &S) -> Option<MatchResult> {
        if state.is_expanded() {
            debug!(rule = self.label(), "selection is expanded");
            return None;
        }

        let kind = state.start_block_type();
        if self.only_in.as_ref().is_some_and(|m| !m.matches(kind)) {
            debug!(rule = self.label(), block = kind, "block not in only_in");
            return None;
        }
        if self.ignore_in.as_ref().is_some_and(|m| m.matches(kind)) {
            debug!(rule = self.label(), block = kind, "block in ignore_in");
            return None;
        }

        let text = state.start_text();
        let matches = get_matches(
            text,
            clamp_cursor(text, state.start_offset()),
            self.before.as_ref(),
            self.after.as_ref(),
        );
        if matches.is_none() {
            debug!(rule = self.label(), "text around cursor did not match");
        }
        matches
    }

    fn replace(
        &self,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        let Some(matches) = self.find_match(state) else {
            return Ok(Outcome::Unchanged);
        };

        event.prevent_default();

        let cursor = clamp_cursor(state.start_text(), state.start_offset());
        let offsets = get_offsets(&matches, cursor);
        trace!(rule = self.label(), ?matches, ?offsets, "matched");

        let mut transform = state.transform();
        transform.move_to_offsets(offsets.start, offsets.end).delete();

        (self.transform)(&mut transform, event, data, &matches)
            .map_err(|e| ReplaceError::Transform(e.into()))?;

        debug!(
            rule = self.label(),
            start = offsets.start,
            end = offsets.end,
            "replacement applied"
        );
        Ok(Outcome::Replaced(transform.apply()))
    }
}

impl<S: EditorState> Clone for AutoReplace<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            trigger: self.trigger.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            only_in: self.only_in.clone(),
            ignore_in: self.ignore_in.clone(),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<S: EditorState> fmt::Debug for AutoReplace<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoReplace")
            .field("name", &self.name)
            .field("before", &self.before.as_ref().map(Regex::as_str))
            .field("after", &self.after.as_ref().map(Regex::as_str))
            .field("only_in", &self.only_in.is_some())
            .field("ignore_in", &self.ignore_in.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AutoReplace`].
pub struct AutoReplaceBuilder<S: EditorState> {
    name: Option<String>,
    trigger: Option<TriggerSpec>,
    before: Option<Regex>,
    after: Option<Regex>,
    only_in: Option<ScopeSpec>,
    ignore_in: Option<ScopeSpec>,
    transform: Option<Arc<TransformFn<S>>>,
}

impl<S: EditorState> Default for AutoReplaceBuilder<S> {
    fn default() -> Self {
        Self {
            name: None,
            trigger: None,
            before: None,
            after: None,
            only_in: None,
            ignore_in: None,
            transform: None,
        }
    }
}

impl<S: EditorState> AutoReplaceBuilder<S> {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: impl Into<TriggerSpec>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Pattern for the text left of the cursor. Group 1 is deleted.
    #[must_use]
    pub fn before(mut self, pattern: Regex) -> Self {
        self.before = Some(pattern);
        self
    }

    /// Pattern for the text right of the cursor. Group 1 is deleted.
    #[must_use]
    pub fn after(mut self, pattern: Regex) -> Self {
        self.after = Some(pattern);
        self
    }

    #[must_use]
    pub fn only_in(mut self, scope: impl Into<ScopeSpec>) -> Self {
        self.only_in = Some(scope.into());
        self
    }

    #[must_use]
    pub fn ignore_in(mut self, scope: impl Into<ScopeSpec>) -> Self {
        self.ignore_in = Some(scope.into());
        self
    }

    #[must_use]
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut S::Transform, &InputEvent, &InputData, &MatchResult) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Normalize the configuration into a rule.
    ///
    /// # Errors
    ///
    /// - [`ReplaceError::MissingTransform`] / [`ReplaceError::MissingTrigger`]
    ///   when a required option is absent.
    /// - [`ReplaceError::TooManyCaptureGroups`] when a before/after pattern
    ///   has more than one capturing group.
    pub fn build(self) -> ReplaceResult<AutoReplace<S>> {
        let transform = self.transform.ok_or(ReplaceError::MissingTransform)?;
        let trigger = self
            .trigger
            .map(normalize_trigger)
            .ok_or(ReplaceError::MissingTrigger)?;

        check_capture_groups(Side::Before, self.before.as_ref())?;
        check_capture_groups(Side::After, self.after.as_ref())?;

        Ok(AutoReplace {
            name: self.name,
            trigger,
            before: self.before,
            after: self.after,
            only_in: self.only_in.map(normalize_matcher),
            ignore_in: self.ignore_in.map(normalize_matcher),
            transform,
        })
    }
}

fn check_capture_groups(side: Side, pattern: Option<&Regex>) -> ReplaceResult<()> {
    let Some(re) = pattern else {
        return Ok(());
    };
    // captures_len counts the implicit whole-match group.
    let count = re.captures_len() - 1;
    if count > 1 {
        return Err(ReplaceError::TooManyCaptureGroups { side, count });
    }
    Ok(())
}

/// An ordered stack of rules. The first rule that replaces wins.
pub struct RuleSet<S: EditorState> {
    rules: Vec<AutoReplace<S>>,
}

impl<S: EditorState> RuleSet<S> {
    /// An empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; it runs after every rule already in the set.
    pub fn push(&mut self, rule: AutoReplace<S>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AutoReplace<S>> {
        self.rules.iter()
    }

    /// # Errors
    ///
    /// Propagates the first transform failure.
    pub fn on_before_input(
        &self,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        self.dispatch(EventKind::BeforeInput, event, data, state)
    }

    /// # Errors
    ///
    /// Propagates the first transform failure.
    pub fn on_key_down(
        &self,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        self.dispatch(EventKind::KeyDown, event, data, state)
    }

    fn dispatch(
        &self,
        kind: EventKind,
        event: &mut InputEvent,
        data: &InputData,
        state: &S,
    ) -> ReplaceResult<Outcome<S>> {
        for rule in &self.rules {
            if let Outcome::Replaced(next) = rule.handle(kind, event, data, state)? {
                return Ok(Outcome::Replaced(next));
            }
        }
        Ok(Outcome::Unchanged)
    }
}

impl<S: EditorState> Default for RuleSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EditorState> FromIterator<AutoReplace<S>> for RuleSet<S> {
    fn from_iter<I: IntoIterator<Item = AutoReplace<S>>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<S: EditorState> fmt::Debug for RuleSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}
