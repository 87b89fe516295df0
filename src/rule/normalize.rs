//! Trigger and scope normalization.
//!
//! Rules accept triggers and block scopes in several shapes. Each shape is
//! collapsed into a single predicate type once, when the rule is built, so
//! event handling never branches on the shape again.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::host::{InputData, InputEvent};

/// Predicate over an input event.
pub type TriggerFn = dyn Fn(&InputEvent, &InputData) -> bool + Send + Sync;

/// Predicate over a block type identifier.
pub type ScopeFn = dyn Fn(&str) -> bool + Send + Sync;

/// The accepted trigger shapes.
#[derive(Clone)]
pub enum TriggerSpec {
    /// Fires when the event's inserted text matches the pattern. Empty text
    /// counts as no text.
    Pattern(Regex),
    /// Fires on a key name, or on inserted text when the event has no key.
    /// An empty key name counts as no key.
    Literal(String),
    /// Custom predicate, used as is.
    Predicate(Arc<TriggerFn>),
}

impl TriggerSpec {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&InputEvent, &InputData) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }
}

impl From<Regex> for TriggerSpec {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl From<&str> for TriggerSpec {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_owned())
    }
}

impl From<String> for TriggerSpec {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl fmt::Debug for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// The accepted block scope shapes for `only_in` / `ignore_in`.
#[derive(Clone)]
pub enum ScopeSpec {
    Predicate(Arc<ScopeFn>),
    List(Vec<String>),
    Single(String),
}

impl ScopeSpec {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }
}

impl From<&str> for ScopeSpec {
    fn from(s: &str) -> Self {
        Self::Single(s.to_owned())
    }
}

impl From<String> for ScopeSpec {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for ScopeSpec {
    fn from(list: Vec<String>) -> Self {
        Self::List(list)
    }
}

impl From<&[&str]> for ScopeSpec {
    fn from(list: &[&str]) -> Self {
        Self::List(list.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ScopeSpec {
    fn from(list: [&str; N]) -> Self {
        Self::from(&list[..])
    }
}

impl fmt::Debug for ScopeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Single(s) => f.debug_tuple("Single").field(s).finish(),
        }
    }
}

/// A normalized trigger.
#[derive(Clone)]
pub struct Trigger(Arc<TriggerFn>);

impl Trigger {
    pub fn matches(&self, event: &InputEvent, data: &InputData) -> bool {
        (self.0)(event, data)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger(..)")
    }
}

/// A normalized block scope.
#[derive(Clone)]
pub struct ScopeMatcher(Arc<ScopeFn>);

impl ScopeMatcher {
    pub fn matches(&self, block_type: &str) -> bool {
        (self.0)(block_type)
    }
}

impl fmt::Debug for ScopeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScopeMatcher(..)")
    }
}

fn inserted(event: &InputEvent) -> Option<&str> {
    event.data.as_deref().filter(|text| !text.is_empty())
}

/// Collapse a trigger spec into a predicate over `(event, data)`.
pub fn normalize_trigger(spec: TriggerSpec) -> Trigger {
    match spec {
        TriggerSpec::Pattern(re) => Trigger(Arc::new(move |event: &InputEvent, _: &InputData| {
            inserted(event).is_some_and(|text| re.is_match(text))
        })),
        TriggerSpec::Literal(literal) => {
            Trigger(Arc::new(move |event: &InputEvent, data: &InputData| {
                match data.key.as_deref().filter(|key| !key.is_empty()) {
                    Some(key) => key == literal,
                    None => inserted(event) == Some(literal.as_str()),
                }
            }))
        }
        TriggerSpec::Predicate(f) => Trigger(f),
    }
}

/// Collapse a scope spec into a predicate over a block type.
pub fn normalize_matcher(spec: ScopeSpec) -> ScopeMatcher {
    match spec {
        ScopeSpec::Predicate(f) => ScopeMatcher(f),
        ScopeSpec::List(list) => {
            ScopeMatcher(Arc::new(move |kind: &str| list.iter().any(|t| t == kind)))
        }
        ScopeSpec::Single(single) => ScopeMatcher(Arc::new(move |kind: &str| kind == single)),
    }
}
