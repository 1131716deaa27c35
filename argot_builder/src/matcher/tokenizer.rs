use std::path::Path;

use crate::api::{ParsedArguments, SchemaRegistry};
use crate::constant::*;
use crate::matcher::model::OptionTypes;
use crate::model::{Scalar, ValueType};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Walks an argument vector into raw, unvalidated arguments.
///
/// Declared types only decide how many tokens an option consumes; values are stored as supplied
/// (`Scalar::Str`), except for flags and counters which are stored natively.
/// Declared options are stored under their long name, anything else under the key as written.
pub(crate) struct Tokenizer<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Tokenizer<'r> {
    pub(crate) fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Tokenize `argv`, where `argv[0]` is the invoked program path.
    pub(crate) fn tokenize(&self, argv: &[&str]) -> ParsedArguments {
        let mut parsed = ParsedArguments::default();
        let (path, mut tokens) = match argv.split_first() {
            Some((path, tokens)) => (*path, tokens),
            None => ("", argv),
        };
        parsed.set_meta(PATH_META, path);
        parsed.set_meta(FILENAME_META, filename(path));

        if self.registry.has_commands() {
            if let Some((command, remaining)) = tokens.split_first() {
                if !command.starts_with('-') {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Reading '{command}' as the command.");
                    }

                    parsed.set_command(*command);
                    tokens = remaining;
                }
            }
        }

        let schema = self.registry.get_schema(parsed.command());
        let types = OptionTypes::new(&schema);
        let mut cursor = Cursor { tokens, index: 0 };

        while let Some(token) = cursor.peek() {
            if token == END_OF_OPTIONS {
                cursor.advance();
                break;
            }

            if token == "--help" || token == "--?" || token == "-?" {
                cursor.advance();
                parsed.push_opt(HELP_NAME, Scalar::Bool(true));
            } else if let Some(body) = token.strip_prefix("--") {
                cursor.advance();
                long_option(&types, body, &mut cursor, &mut parsed);
            } else if is_option_like(token) {
                cursor.advance();
                let flags = &token[1..];
                let mut characters = flags.chars();

                match (characters.next(), characters.next()) {
                    (Some(key), None) => short_option(&types, key, &mut cursor, &mut parsed),
                    _ => bundle(&types, flags, &mut parsed),
                }
            } else {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token '{token}' ends option scanning.");
                }

                break;
            }
        }

        for token in cursor.remaining() {
            let name = schema
                .args()
                .get(parsed.args().len())
                .map(|arg| arg.name().to_string());
            parsed.add_arg(*token, name.as_deref());
        }

        parsed
    }
}

struct Cursor<'t> {
    tokens: &'t [&'t str],
    index: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    /// Consume the next token if `accept` agrees.
    fn take_if(&mut self, accept: impl Fn(&str) -> bool) -> Option<&'t str> {
        match self.peek() {
            Some(token) if accept(token) => {
                self.advance();
                Some(token)
            }
            _ => None,
        }
    }

    fn remaining(&self) -> &'t [&'t str] {
        &self.tokens[std::cmp::min(self.index, self.tokens.len())..]
    }
}

fn long_option(
    types: &OptionTypes,
    body: &str,
    cursor: &mut Cursor,
    parsed: &mut ParsedArguments,
) {
    let (key, inline) = match body.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (body, None),
    };
    let declared = types.long(key);
    let name = declared.map_or(key, |(name, _)| name);
    let value = match (inline, declared) {
        (Some(value), _) => Scalar::from(value),
        (None, Some((_, ValueType::Boolean))) => boolean_value(cursor),
        (None, Some(_)) => cursor
            .take_if(|token| !is_option_like(token))
            .map(Scalar::from)
            .unwrap_or_else(|| Scalar::Str(String::default())),
        (None, None) => match cursor.take_if(|token| !is_option_like(token)) {
            Some(token) => Scalar::from(token),
            None => {
                if negate(types, key, parsed) {
                    return;
                }

                Scalar::Bool(true)
            }
        },
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Long option '{name}' reads {value:?}.");
    }

    parsed.push_opt(name, value);
}

/// Apply `--no-NAME` to the declared option `NAME`, if there is one.
fn negate(types: &OptionTypes, key: &str, parsed: &mut ParsedArguments) -> bool {
    let Some((name, value_type)) = key
        .strip_prefix(NEGATION_PREFIX)
        .and_then(|negated| types.long(negated))
    else {
        return false;
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Negating '{name}'.");
    }

    parsed.push_opt(name, Scalar::Bool(false));
    if value_type != ValueType::Boolean {
        parsed.negate(name);
    }

    true
}

fn short_option(
    types: &OptionTypes,
    key: char,
    cursor: &mut Cursor,
    parsed: &mut ParsedArguments,
) {
    let raw = key.to_string();
    let (name, value_type) = types
        .short(key)
        .unwrap_or((raw.as_str(), ValueType::Boolean));

    let value = match value_type {
        ValueType::Boolean => boolean_value(cursor),
        _ => cursor
            .take_if(|token| !is_option_like(token))
            .map(Scalar::from)
            .unwrap_or_else(|| missing_value(value_type)),
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Short option '{name}' reads {value:?}.");
    }

    parsed.push_opt(name, value);
}

/// Walk combined short flags, ex: `-abc`, `-v3`, `-hlocalhost`.
fn bundle(types: &OptionTypes, flags: &str, parsed: &mut ParsedArguments) {
    let characters: Vec<char> = flags.chars().collect();
    let mut index = 0;

    while index < characters.len() {
        let key = characters[index];
        let rest = &characters[index + 1..];

        if key == HELP_SHORT {
            parsed.push_opt(HELP_NAME, Scalar::Bool(true));
            index += 1;
            continue;
        }

        let raw = key.to_string();
        let (name, value_type) = types
            .short(key)
            .unwrap_or((raw.as_str(), ValueType::Boolean));

        if rest.first() == Some(&'=') {
            parsed.push_opt(name, Scalar::Str(rest[1..].iter().collect()));
            break;
        }

        match value_type {
            ValueType::Boolean => match rest.first().copied() {
                Some(digit @ ('0' | '1')) => {
                    parsed.push_opt(name, Scalar::Bool(digit == '1'));
                    index += 2;
                }
                _ => {
                    parsed.push_opt(name, Scalar::Bool(true));
                    index += 1;
                }
            },
            ValueType::String => {
                parsed.push_opt(name, Scalar::Str(rest.iter().collect()));
                break;
            }
            ValueType::Integer => {
                let digits: String = rest.iter().take_while(|c| c.is_ascii_digit()).collect();

                if digits.is_empty() {
                    parsed.increment_opt(name);
                    index += 1;
                } else {
                    index += 1 + digits.len();
                    parsed.push_opt(name, Scalar::Str(digits));
                }
            }
        }
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Bundle '-{flags}' walked.");
    }
}

/// A flag is `true` unless followed by an explicit boolean literal, which is then consumed.
fn boolean_value(cursor: &mut Cursor) -> Scalar {
    match cursor.take_if(|token| STRICT_TRUE.contains(&token) || STRICT_FALSE.contains(&token)) {
        Some(literal) => Scalar::Bool(STRICT_TRUE.contains(&literal)),
        None => Scalar::Bool(true),
    }
}

fn missing_value(value_type: ValueType) -> Scalar {
    match value_type {
        ValueType::Boolean => Scalar::Bool(true),
        ValueType::Integer => Scalar::Int(1),
        ValueType::String => Scalar::Str(String::default()),
    }
}

fn is_option_like(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('-')
}

fn filename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ArgSpec, OptionSpec};
    use crate::model::{MetaValue, Metadata};
    use rstest::rstest;
    use serde_json::json;

    fn registry(commands: &[&str]) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        let wildcard = registry.select("*").unwrap();

        for (spec, declaration) in [
            ("host:h", "string"),
            ("port:P", "int"),
            ("enabled:e", "bool"),
            ("verbose:v", "int"),
            ("header:H", "string[]"),
        ] {
            wildcard.insert_option(
                OptionSpec::parse(spec, "", false, declaration, Metadata::default()).unwrap(),
            );
        }
        wildcard.push_arg(ArgSpec::new("repo", "", false));

        for command in commands {
            let schema = registry.select(command).unwrap();
            schema.insert_option(
                OptionSpec::parse("force:f", "", false, "bool", Metadata::default()).unwrap(),
            );
        }

        registry
    }

    fn tokenize(argv: &[&str]) -> ParsedArguments {
        let registry = registry(&[]);
        let mut tokens = vec!["prog"];
        tokens.extend_from_slice(argv);

        Tokenizer::new(&registry).tokenize(&tokens)
    }

    #[test]
    fn tokenize_empty() {
        // Setup
        let registry = registry(&[]);

        // Execute
        let parsed = Tokenizer::new(&registry).tokenize(empty::slice());

        // Verify
        assert_eq!(parsed.command(), "");
        assert!(parsed.opts().is_empty());
        assert!(parsed.args().is_empty());
        assert_eq!(parsed.get_meta(PATH_META), Some(&MetaValue::from("")));
        assert_eq!(parsed.get_meta(FILENAME_META), Some(&MetaValue::from("")));
    }

    #[rstest]
    #[case("prog", "prog")]
    #[case("./prog", "prog")]
    #[case("/usr/local/bin/prog", "prog")]
    fn tokenize_path(#[case] path: &str, #[case] expected: &str) {
        // Setup
        let registry = registry(&[]);

        // Execute
        let parsed = Tokenizer::new(&registry).tokenize(&[path]);

        // Verify
        assert_eq!(parsed.get_meta(PATH_META), Some(&MetaValue::from(path)));
        assert_eq!(
            parsed.get_meta(FILENAME_META),
            Some(&MetaValue::from(expected))
        );
    }

    #[rstest]
    #[case(vec!["--host=localhost"], json!({"host": "localhost"}))]
    #[case(vec!["--host", "localhost"], json!({"host": "localhost"}))]
    #[case(vec!["--host=a=b"], json!({"host": "a=b"}))]
    #[case(vec!["--host="], json!({"host": ""}))]
    #[case(vec!["--host"], json!({"host": ""}))]
    #[case(vec!["--host", "--port"], json!({"host": "", "port": ""}))]
    #[case(vec!["--port"], json!({"port": ""}))]
    #[case(vec!["--port", "8080"], json!({"port": "8080"}))]
    #[case(vec!["--port=-1"], json!({"port": "-1"}))]
    #[case(vec!["--h", "localhost"], json!({"host": "localhost"}))]
    #[case(vec!["--enabled"], json!({"enabled": true}))]
    #[case(vec!["--enabled", "false"], json!({"enabled": false}))]
    #[case(vec!["--enabled", "yes"], json!({"enabled": true}))]
    #[case(vec!["--enabled", "off"], json!({"enabled": false}))]
    #[case(vec!["--enabled=yes"], json!({"enabled": "yes"}))]
    #[case(vec!["--enabled=13"], json!({"enabled": "13"}))]
    #[case(vec!["--no-enabled"], json!({"enabled": false}))]
    #[case(vec!["--no-e"], json!({"enabled": false}))]
    #[case(vec!["--no-host"], json!({"host": false}))]
    #[case(vec!["--no-bogus"], json!({"no-bogus": true}))]
    #[case(vec!["--no-enabled", "foo"], json!({"no-enabled": "foo"}))]
    #[case(vec!["--no-enabled=false"], json!({"no-enabled": "false"}))]
    #[case(vec!["--no-enabled", "-e"], json!({"enabled": [false, true]}))]
    #[case(vec!["--bogus", "value"], json!({"bogus": "value"}))]
    #[case(vec!["--bogus", "--host", "x"], json!({"bogus": true, "host": "x"}))]
    fn tokenize_long(#[case] argv: Vec<&str>, #[case] expected: serde_json::Value) {
        // Execute
        let parsed = tokenize(&argv);

        // Verify
        assert_eq!(parsed.to_json()["opts"], expected);
        assert!(parsed.args().is_empty());
    }

    #[rstest]
    #[case(vec!["--enabled", "maybe"], json!({"enabled": true}), json!({"repo": "maybe"}))]
    #[case(vec!["--enabled", "TRUE"], json!({"enabled": true}), json!({"repo": "TRUE"}))]
    #[case(vec!["-e", "x"], json!({"enabled": true}), json!({"repo": "x"}))]
    #[case(vec!["-x", "y"], json!({"x": true}), json!({"repo": "y"}))]
    #[case(vec!["a", "--host", "x"], json!({}), json!({"repo": "a", "1": "--host", "2": "x"}))]
    #[case(vec!["--", "--host", "x"], json!({}), json!({"repo": "--host", "1": "x"}))]
    #[case(vec!["-", "x"], json!({}), json!({"repo": "-", "1": "x"}))]
    #[case(vec!["-h", "a", "b"], json!({"host": "a"}), json!({"repo": "b"}))]
    fn tokenize_positional(
        #[case] argv: Vec<&str>,
        #[case] expected_opts: serde_json::Value,
        #[case] expected_args: serde_json::Value,
    ) {
        // Execute
        let parsed = tokenize(&argv);

        // Verify
        assert_eq!(parsed.to_json()["opts"], expected_opts);
        assert_eq!(parsed.to_json()["args"], expected_args);
    }

    #[rstest]
    #[case(vec!["-h", "localhost"], json!({"host": "localhost"}))]
    #[case(vec!["-h"], json!({"host": ""}))]
    #[case(vec!["-h", "-e"], json!({"host": "", "enabled": true}))]
    #[case(vec!["-P"], json!({"port": 1}))]
    #[case(vec!["-P", "foo"], json!({"port": "foo"}))]
    #[case(vec!["-e"], json!({"enabled": true}))]
    #[case(vec!["-e", "0"], json!({"enabled": false}))]
    #[case(vec!["-e", "on"], json!({"enabled": true}))]
    #[case(vec!["-x"], json!({"x": true}))]
    #[case(vec!["-x", "no"], json!({"x": false}))]
    fn tokenize_short(#[case] argv: Vec<&str>, #[case] expected: serde_json::Value) {
        // Execute
        let parsed = tokenize(&argv);

        // Verify
        assert_eq!(parsed.to_json()["opts"], expected);
        assert!(parsed.args().is_empty());
    }

    #[rstest]
    #[case(vec!["-hlocalhost"], json!({"host": "localhost"}))]
    #[case(vec!["-h=localhost"], json!({"host": "localhost"}))]
    #[case(vec!["-eh"], json!({"enabled": true, "host": ""}))]
    #[case(vec!["-ehx"], json!({"enabled": true, "host": "x"}))]
    #[case(vec!["-e0"], json!({"enabled": false}))]
    #[case(vec!["-e1"], json!({"enabled": true}))]
    #[case(vec!["-e0x"], json!({"enabled": false, "x": true}))]
    #[case(vec!["-e=off"], json!({"enabled": "off"}))]
    #[case(vec!["-ex"], json!({"enabled": true, "x": true}))]
    #[case(vec!["-vv"], json!({"verbose": 2}))]
    #[case(vec!["-vvv"], json!({"verbose": 3}))]
    #[case(vec!["-v12"], json!({"verbose": "12"}))]
    #[case(vec!["-v12e"], json!({"verbose": "12", "enabled": true}))]
    #[case(vec!["-P8080"], json!({"port": "8080"}))]
    #[case(vec!["-Pv"], json!({"port": 1, "verbose": 1}))]
    #[case(vec!["-e?"], json!({"enabled": true, "help": true}))]
    fn tokenize_bundle(#[case] argv: Vec<&str>, #[case] expected: serde_json::Value) {
        // Execute
        let parsed = tokenize(&argv);

        // Verify
        assert_eq!(parsed.to_json()["opts"], expected);
        assert!(parsed.args().is_empty());
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["--?"])]
    #[case(vec!["-?"])]
    #[case(vec!["--host", "x", "--help"])]
    fn tokenize_help(#[case] argv: Vec<&str>) {
        // Execute
        let parsed = tokenize(&argv);

        // Verify
        assert_eq!(parsed.get_opt(HELP_NAME).and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn tokenize_accumulates() {
        // Execute
        let parsed = tokenize(&["--header=a", "--header", "b", "-H", "c", "-Hd"]);

        // Verify
        assert_eq!(
            parsed.to_json()["opts"],
            json!({"header": ["a", "b", "c", "d"]})
        );
    }

    #[test]
    fn tokenize_negated() {
        // Execute
        let parsed = tokenize(&["--no-host", "--no-enabled"]);

        // Verify
        assert!(parsed.is_negated("host"));
        assert!(!parsed.is_negated("enabled"));
    }

    #[rstest]
    #[case(vec!["push", "-f", "myrepo"], "push", json!({"force": true}), json!({"repo": "myrepo"}))]
    #[case(vec!["pull", "myrepo"], "pull", json!({}), json!({"repo": "myrepo"}))]
    #[case(vec!["-e", "push"], "", json!({"enabled": true}), json!({"repo": "push"}))]
    #[case(vec!["push", "-f", "0"], "push", json!({"force": false}), json!({}))]
    #[case(vec![], "", json!({}), json!({}))]
    fn tokenize_command(
        #[case] argv: Vec<&str>,
        #[case] expected_command: &str,
        #[case] expected_opts: serde_json::Value,
        #[case] expected_args: serde_json::Value,
    ) {
        // Setup
        let registry = registry(&["push"]);
        let mut tokens = vec!["prog"];
        tokens.extend(argv);

        // Execute
        let parsed = Tokenizer::new(&registry).tokenize(&tokens);

        // Verify
        assert_eq!(parsed.command(), expected_command);
        assert_eq!(parsed.to_json()["opts"], expected_opts);
        assert_eq!(parsed.to_json()["args"], expected_args);
    }

    #[test]
    fn tokenize_without_commands() {
        // Setup
        let registry = registry(&["db:*"]);

        // Execute
        let parsed = Tokenizer::new(&registry).tokenize(&["prog", "db:migrate"]);

        // Verify
        assert_eq!(parsed.command(), "");
        assert_eq!(parsed.get_arg("repo"), Some("db:migrate"));
    }
}
