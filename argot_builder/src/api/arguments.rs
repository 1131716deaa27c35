use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::{MetaValue, Metadata, Scalar, Value};

/// A reference to a positional argument: by position or by declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKey<'k> {
    /// Zero-based position.
    Index(usize),
    /// The name of the matching [`ArgSpec`](./struct.ArgSpec.html).
    Name(&'k str),
}

impl From<usize> for ArgKey<'_> {
    fn from(value: usize) -> Self {
        ArgKey::Index(value)
    }
}

impl<'k> From<&'k str> for ArgKey<'k> {
    fn from(value: &'k str) -> Self {
        ArgKey::Name(value)
    }
}

/// The result of parsing a command line.
///
/// Holds the command name, the option values, the positional arguments and invocation metadata.
/// Serializes to a plain `{command, opts, args, meta}` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArguments {
    command: String,
    #[serde(rename = "opts")]
    options: IndexMap<String, Value>,
    args: IndexMap<String, String>,
    meta: Metadata,
    // Options supplied as `--no-NAME`; only meaningful before validation.
    #[serde(skip)]
    negated: BTreeSet<String>,
}

impl ParsedArguments {
    /// Create empty arguments for `command` (empty when no command is in use).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// The command name, or `""`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Set the command name.
    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    /// Every option value, in the order first supplied.
    pub fn opts(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    /// Get an option value.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{ParsedArguments, Value};
    ///
    /// let mut parsed = ParsedArguments::default();
    /// parsed.set_opt("port", 8080_i64);
    /// assert_eq!(parsed.get_opt("port").and_then(Value::as_int), Some(8080));
    /// assert_eq!(parsed.get_opt("host"), None);
    /// ```
    pub fn get_opt(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Get an option value, falling back to `default` when absent.
    pub fn get_opt_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.options.get(name).unwrap_or(default)
    }

    /// Whether the option is present.
    pub fn has_opt(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Set (replace) an option value.
    pub fn set_opt(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(name.into(), value.into());
    }

    /// Add an occurrence of an option; repeated occurrences coalesce into a `Value::Array`.
    pub(crate) fn push_opt(&mut self, name: &str, item: Scalar) {
        match self.options.get_mut(name) {
            Some(existing) => {
                let previous = std::mem::replace(existing, Value::Array(Vec::default()));
                *existing = previous.accumulate(item);
            }
            None => {
                self.options.insert(name.to_string(), Value::from(item));
            }
        }
    }

    /// Count one more occurrence of a counting flag (ex: `-vvv`).
    pub(crate) fn increment_opt(&mut self, name: &str) {
        let current = match self.options.get(name).and_then(Value::last_scalar) {
            Some(Scalar::Int(count)) => count,
            Some(Scalar::Str(count)) => count.trim().parse().unwrap_or(0),
            Some(Scalar::Bool(true)) => 1,
            Some(Scalar::Bool(false)) | None => 0,
        };
        self.options
            .insert(name.to_string(), Value::Int(current.saturating_add(1)));
    }

    pub(crate) fn take_opt(&mut self, name: &str) -> Option<Value> {
        self.options.shift_remove(name)
    }

    pub(crate) fn negate(&mut self, name: &str) {
        self.negated.insert(name.to_string());
    }

    pub(crate) fn is_negated(&self, name: &str) -> bool {
        self.negated.contains(name)
    }

    /// Every positional argument, keyed by declared name or by position, in supply order.
    pub fn args(&self) -> &IndexMap<String, String> {
        &self.args
    }

    /// Get a positional argument by declared name or by zero-based position.
    ///
    /// A position always resolves, even when the argument at that position was stored under its declared name.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::ParsedArguments;
    ///
    /// let mut parsed = ParsedArguments::default();
    /// parsed.add_arg("origin", Some("remote"));
    /// parsed.add_arg("main", None);
    /// assert_eq!(parsed.get_arg("remote"), Some("origin"));
    /// assert_eq!(parsed.get_arg(0), Some("origin"));
    /// assert_eq!(parsed.get_arg(1), Some("main"));
    /// assert_eq!(parsed.get_arg(2), None);
    /// ```
    pub fn get_arg<'k>(&self, key: impl Into<ArgKey<'k>>) -> Option<&str> {
        let value = match key.into() {
            ArgKey::Name(name) => self.args.get(name),
            ArgKey::Index(index) => self
                .args
                .get(&index.to_string())
                .or_else(|| self.args.get_index(index).map(|(_, value)| value)),
        };
        value.map(String::as_str)
    }

    /// Get a positional argument, falling back to `default` when absent.
    pub fn get_arg_or<'a, 'k>(&'a self, key: impl Into<ArgKey<'k>>, default: &'a str) -> &'a str {
        self.get_arg(key).unwrap_or(default)
    }

    /// Whether the positional argument is present.
    pub fn has_arg<'k>(&self, key: impl Into<ArgKey<'k>>) -> bool {
        self.get_arg(key).is_some()
    }

    /// Append a positional argument, under `name` or else under its position.
    pub fn add_arg(&mut self, value: impl Into<String>, name: Option<&str>) {
        let key = match name {
            Some(name) => name.to_string(),
            None => self.args.len().to_string(),
        };
        self.args.insert(key, value.into());
    }

    /// The invocation metadata.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Get a metadata entry.
    pub fn get_meta(&self, key: &str) -> Option<&MetaValue> {
        self.meta.get(key)
    }

    /// Set a metadata entry.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.meta.insert(key.into(), value.into());
    }

    /// Render as a JSON `{command, opts, args, meta}` object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "command": self.command,
            "opts": self.options,
            "args": self.args,
            "meta": self.meta,
        })
    }

    /// Split into the pieces the validator rebuilds from.
    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        IndexMap<String, Value>,
        IndexMap<String, String>,
        Metadata,
        BTreeSet<String>,
    ) {
        let ParsedArguments {
            command,
            options,
            args,
            meta,
            negated,
        } = self;
        (command, options, args, meta, negated)
    }

    pub(crate) fn from_parts(
        command: String,
        options: IndexMap<String, Value>,
        args: IndexMap<String, String>,
        meta: Metadata,
    ) -> Self {
        Self {
            command,
            options,
            args,
            meta,
            negated: BTreeSet::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn push_opt_accumulates() {
        let mut parsed = ParsedArguments::default();

        parsed.push_opt("header", Scalar::from("a"));
        assert_eq!(parsed.get_opt("header"), Some(&Value::from("a")));

        parsed.push_opt("header", Scalar::from("b"));
        parsed.push_opt("header", Scalar::from("c"));
        assert_eq!(
            parsed.get_opt("header"),
            Some(&Value::Array(vec![
                Scalar::from("a"),
                Scalar::from("b"),
                Scalar::from("c")
            ]))
        );
    }

    #[test]
    fn push_opt_keeps_first_supply_order() {
        let mut parsed = ParsedArguments::default();

        parsed.push_opt("b", Scalar::from(true));
        parsed.push_opt("a", Scalar::from(true));
        parsed.push_opt("b", Scalar::from(false));

        let keys: Vec<&str> = parsed.opts().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(Value::Int(2)), 3)]
    #[case(Some(Value::from("4")), 5)]
    #[case(Some(Value::from("x")), 1)]
    #[case(Some(Value::Bool(true)), 2)]
    #[case(Some(Value::Array(vec![Scalar::Int(1), Scalar::Int(6)])), 7)]
    fn increment_opt(#[case] initial: Option<Value>, #[case] expected: i64) {
        let mut parsed = ParsedArguments::default();
        if let Some(value) = initial {
            parsed.set_opt("v", value);
        }

        parsed.increment_opt("v");

        assert_eq!(parsed.get_opt("v"), Some(&Value::Int(expected)));
    }

    #[test]
    fn get_opt_or() {
        let mut parsed = ParsedArguments::default();
        parsed.set_opt("host", "localhost");
        let fallback = Value::from("example.com");

        assert_eq!(
            parsed.get_opt_or("host", &fallback),
            &Value::from("localhost")
        );
        assert_eq!(parsed.get_opt_or("port", &fallback), &fallback);
        assert!(parsed.has_opt("host"));
        assert!(!parsed.has_opt("port"));
    }

    #[test]
    fn args_by_name_and_index() {
        let mut parsed = ParsedArguments::default();
        parsed.add_arg("myrepo", Some("repo"));
        parsed.add_arg("extra", None);

        let keys: Vec<&str> = parsed.args().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["repo", "1"]);
        assert_eq!(parsed.get_arg("repo"), Some("myrepo"));
        assert_eq!(parsed.get_arg(0), Some("myrepo"));
        assert_eq!(parsed.get_arg(1), Some("extra"));
        assert_eq!(parsed.get_arg("1"), Some("extra"));
        assert_eq!(parsed.get_arg_or(5, "none"), "none");
        assert!(parsed.has_arg("repo"));
        assert!(!parsed.has_arg("branch"));
    }

    #[test]
    fn meta() {
        let mut parsed = ParsedArguments::default();
        parsed.set_meta("path", "/usr/bin/prog");

        assert_eq!(
            parsed.get_meta("path").and_then(MetaValue::as_text),
            Some("/usr/bin/prog")
        );
        assert_eq!(parsed.get_meta("filename"), None);
    }

    #[test]
    fn to_json() {
        let mut parsed = ParsedArguments::new("push");
        parsed.set_opt("force", true);
        parsed.set_opt(
            "header",
            Value::Array(vec![Scalar::from("a"), Scalar::from("b")]),
        );
        parsed.add_arg("myrepo", Some("repo"));
        parsed.set_meta("filename", "prog");

        assert_eq!(
            parsed.to_json(),
            serde_json::json!({
                "command": "push",
                "opts": {"force": true, "header": ["a", "b"]},
                "args": {"repo": "myrepo"},
                "meta": {"filename": "prog"},
            })
        );
    }

    #[test]
    fn negation_is_not_serialized() {
        let mut parsed = ParsedArguments::default();
        parsed.negate("color");

        assert!(parsed.is_negated("color"));
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!({"command": "", "opts": {}, "args": {}, "meta": {}})
        );
    }
}
