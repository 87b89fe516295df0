//! Declarative rule files.
//!
//! A rule file is JSON with a `rules` array. Each rule names its trigger,
//! patterns and scopes the same way the builder does, plus an `action` that
//! stands in for a transform callback:
//!
//! ```json
//! { "rules": [
//!   { "name": "bullet", "trigger": " ", "before": "^(-)$",
//!     "onlyIn": ["paragraph"], "action": { "setBlock": "list-item" } },
//!   { "name": "arrow", "trigger": { "pattern": ">" }, "before": "(-)$",
//!     "action": { "insert": "→" } }
//! ] }
//! ```
//!
//! Shapes other than the ones documented on each field are rejected when the
//! file is parsed, and missing `trigger`/`action` are rejected when it is
//! built.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::error::{ReplaceError, ReplaceResult};
use crate::host::{EditorState, Transform};
use crate::rule::normalize::{ScopeSpec, TriggerSpec};
use crate::rule::{AutoReplace, RuleSet};

/// Trigger as written in a rule file: `" "` or `{ "pattern": "\\d" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TriggerConfig {
    Literal(String),
    Pattern(PatternTrigger),
}

/// Object form of a trigger. Keys other than `pattern` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternTrigger {
    pub pattern: String,
}

/// Block scope as written in a rule file: `"code"` or `["paragraph", "quote"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScopeConfig {
    Single(String),
    List(Vec<String>),
}

impl From<ScopeConfig> for ScopeSpec {
    fn from(scope: ScopeConfig) -> Self {
        match scope {
            ScopeConfig::Single(s) => Self::Single(s),
            ScopeConfig::List(list) => Self::List(list),
        }
    }
}

/// Edits applied after the matched span is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionConfig {
    /// New type for the block holding the cursor.
    #[serde(default)]
    pub set_block: Option<String>,
    /// Text inserted at the cursor.
    #[serde(default)]
    pub insert: Option<String>,
}

impl ActionConfig {
    fn run<T: Transform>(&self, transform: &mut T) {
        if let Some(kind) = &self.set_block {
            transform.set_block_type(kind);
        }
        if let Some(text) = &self.insert {
            transform.insert_text(text);
        }
    }
}

/// One rule in a rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger: Option<TriggerConfig>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub only_in: Option<ScopeConfig>,
    #[serde(default)]
    pub ignore_in: Option<ScopeConfig>,
    #[serde(default)]
    pub action: Option<ActionConfig>,
}

impl RuleConfig {
    /// Compile patterns and build the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::InvalidPattern`] for a pattern that does not
    /// compile, and any error from [`crate::rule::AutoReplaceBuilder::build`].
    pub fn build<S: EditorState>(&self) -> ReplaceResult<AutoReplace<S>> {
        let mut builder = AutoReplace::<S>::builder();

        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(trigger) = &self.trigger {
            builder = builder.trigger(match trigger {
                TriggerConfig::Literal(s) => TriggerSpec::Literal(s.clone()),
                TriggerConfig::Pattern(PatternTrigger { pattern }) => {
                    TriggerSpec::Pattern(compile("trigger", pattern)?)
                }
            });
        }
        if let Some(before) = &self.before {
            builder = builder.before(compile("before", before)?);
        }
        if let Some(after) = &self.after {
            builder = builder.after(compile("after", after)?);
        }
        if let Some(scope) = &self.only_in {
            builder = builder.only_in(scope.clone());
        }
        if let Some(scope) = &self.ignore_in {
            builder = builder.ignore_in(scope.clone());
        }
        if let Some(action) = &self.action {
            let action = action.clone();
            builder = builder.transform(move |transform, _, _, _| {
                action.run(transform);
                Ok(())
            });
        }

        builder.build()
    }
}

fn compile(field: &'static str, pattern: &str) -> ReplaceResult<Regex> {
    Regex::new(pattern).map_err(|source| ReplaceError::InvalidPattern {
        field,
        pattern: pattern.to_owned(),
        source,
    })
}

/// A parsed rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    pub rules: Vec<RuleConfig>,
}

impl RulesFile {
    /// Parse a rule file from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::Config`] if the JSON is malformed or a field
    /// has an unsupported shape.
    pub fn from_json(json: &str) -> ReplaceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a rule file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`RulesFile::from_json`].
    pub fn load(path: &Path) -> ReplaceResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_json(&json)?;
        info!(path = %path.display(), rules = file.rules.len(), "loaded rule file");
        Ok(file)
    }

    /// Build every rule, in file order.
    ///
    /// # Errors
    ///
    /// Fails on the first rule that does not build.
    pub fn build<S: EditorState>(&self) -> ReplaceResult<RuleSet<S>> {
        self.rules.iter().map(RuleConfig::build::<S>).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::document::Document;
    use crate::host::{InputData, InputEvent};

    #[test]
    fn test_parse_trigger_shapes() {
        let file = RulesFile::from_json(
            r#"{ "rules": [
                { "trigger": " " },
                { "trigger": { "pattern": "\\d" } }
            ] }"#,
        )
        .expect("should parse trigger shapes");
        assert_eq!(file.rules[0].trigger, Some(TriggerConfig::Literal(" ".into())));
        assert_eq!(
            file.rules[1].trigger,
            Some(TriggerConfig::Pattern(PatternTrigger {
                pattern: r"\d".into()
            }))
        );
    }

    #[test]
    fn test_parse_scope_shapes() {
        let file = RulesFile::from_json(
            r#"{ "rules": [ { "onlyIn": ["paragraph", "quote"], "ignoreIn": "code" } ] }"#,
        )
        .expect("should parse scope shapes");
        let rule = &file.rules[0];
        assert_eq!(
            rule.only_in,
            Some(ScopeConfig::List(vec!["paragraph".into(), "quote".into()]))
        );
        assert_eq!(rule.ignore_in, Some(ScopeConfig::Single("code".into())));
    }

    #[test]
    fn test_unsupported_shapes_rejected() {
        for json in [
            r#"{ "rules": [ { "trigger": 42 } ] }"#,
            r#"{ "rules": [ { "onlyIn": { "kind": "code" } } ] }"#,
            r#"{ "rules": [ { "triger": " " } ] }"#,
            r#"{ "rules": [ { "trigger": { "pattern": "x", "typo": 1 } } ] }"#,
        ] {
            let err = RulesFile::from_json(json).expect_err("should reject unsupported shape");
            assert!(matches!(err, ReplaceError::Config(_)), "{json}");
        }
    }

    #[test]
    fn test_missing_action_is_missing_transform() {
        let file = RulesFile::from_json(r#"{ "rules": [ { "trigger": " " } ] }"#)
            .expect("should parse rule without action");
        let err = file.build::<Document>().expect_err("should fail without action");
        assert!(matches!(err, ReplaceError::MissingTransform));
    }

    #[test]
    fn test_missing_trigger() {
        let file = RulesFile::from_json(r#"{ "rules": [ { "action": {} } ] }"#)
            .expect("should parse rule without trigger");
        let err = file.build::<Document>().expect_err("should fail without trigger");
        assert!(matches!(err, ReplaceError::MissingTrigger));
    }

    #[test]
    fn test_bad_pattern() {
        let file = RulesFile::from_json(
            r#"{ "rules": [ { "trigger": " ", "before": "(-", "action": {} } ] }"#,
        )
        .expect("should parse rule with bad pattern");
        let err = file.build::<Document>().expect_err("should fail on bad pattern");
        assert!(matches!(err, ReplaceError::InvalidPattern { field: "before", .. }));
    }

    #[test]
    fn test_action_runs() {
        let file = RulesFile::from_json(
            r#"{ "rules": [ {
                "trigger": " ", "before": "^(#)$",
                "action": { "setBlock": "heading-one", "insert": "" }
            } ] }"#,
        )
        .expect("should parse heading rule");
        let rules = file.build::<Document>().expect("should build heading rule");

        let state = Document::single("paragraph", "#", 1);
        let mut event = InputEvent::default();
        let doc = rules
            .on_key_down(&mut event, &InputData::key(" "), &state)
            .expect("should not error")
            .unwrap_or(state);
        assert_eq!(doc.start_block_type(), "heading-one");
        assert_eq!(doc.start_text(), "");
    }
}
