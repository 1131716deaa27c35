use crate::api::{ArgSpec, CommandSchema, OptionSpec, SchemaRegistry};
use crate::constant::WILDCARD;
use crate::model::{MetaValue, Metadata};
use crate::parser::{ConfigError, ConsoleInterface, GeneralParser, Printer, UserInterface};

/// The command line definition.
///
/// Every call configures the *current* schema: the `*` wildcard schema (shared by every command)
/// until [`Cli::command`] selects another.
/// Configuration errors are deferred until [`Cli::build_parser`] (or [`Cli::build`]).
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{Cli, Value};
///
/// let parser = Cli::new()
///     .description("A tiny version control system.")
///     .opt("verbose:v", "Increase the logging.", false, "int")
///     .command("push")
///     .description("Send changes upstream.")
///     .opt("force:f", "Overwrite upstream.", false, "bool")
///     .arg("repo", "Where to push.", true)
///     .command("pull")
///     .description("Fetch changes.")
///     .build();
///
/// let parsed = parser.parse_tokens(&["vcs", "push", "-vf", "origin"]).unwrap();
/// assert_eq!(parsed.command(), "push");
/// assert_eq!(parsed.get_opt("verbose"), Some(&Value::Int(1)));
/// assert_eq!(parsed.get_opt("force"), Some(&Value::Bool(true)));
/// assert_eq!(parsed.get_arg("repo"), Some("origin"));
/// ```
#[derive(Debug, Clone)]
pub struct Cli {
    registry: SchemaRegistry,
    current: String,
    deferred_error: Option<ConfigError>,
    // Outer `None`: detect the terminal.
    terminal_width: Option<Option<usize>>,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Create a command line definition, with the `*` wildcard schema selected.
    pub fn new() -> Self {
        Self {
            registry: SchemaRegistry::new(),
            current: WILDCARD.to_string(),
            deferred_error: None,
            terminal_width: None,
        }
    }

    /// Select (creating on first use) the schema for a command-name pattern.
    ///
    /// A pattern without glob syntax (`*`, `?`, `[`) declares a command; once any command is declared,
    /// the first non-option token is read as the command name.
    /// Patterns with glob syntax (ex: `db:*`) contribute to every matching command.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::Cli;
    ///
    /// let cli = Cli::new()
    ///     .command("db:*")
    ///     .opt("database", "Which database.", false, "string")
    ///     .command("db:migrate")
    ///     .command("db:seed");
    ///
    /// assert!(cli.registry().has_command("db:seed"));
    /// assert!(cli.registry().get_schema("db:migrate").option("database").is_some());
    /// ```
    pub fn command(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();

        match self.registry.select(&pattern).map(|_| ()) {
            Ok(()) => self.current = pattern,
            Err(error) => self.defer(error),
        }

        self
    }

    /// Declare an option on the current schema, replacing any option with the same long name.
    ///
    /// * `name_spec`: `"long"` or `"long:s"` for a single character short alias.
    /// * `declaration`: `string`, `integer` or `boolean` (or `str`, `int`, `bool`), optionally suffixed with `[]`
    ///   to accumulate repeated occurrences into a sequence.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Cli, Scalar, Value};
    ///
    /// let parser = Cli::new()
    ///     .opt("header:H", "Extra headers.", false, "string[]")
    ///     .opt("retries", "Attempts.", false, "int")
    ///     .build();
    ///
    /// let parsed = parser.parse_tokens(&["prog", "-H", "a", "--header=b", "--retries", "3"]).unwrap();
    /// assert_eq!(
    ///     parsed.get_opt("header"),
    ///     Some(&Value::Array(vec![Scalar::from("a"), Scalar::from("b")]))
    /// );
    /// assert_eq!(parsed.get_opt("retries"), Some(&Value::Int(3)));
    /// ```
    pub fn opt(
        self,
        name_spec: &str,
        description: impl Into<String>,
        required: bool,
        declaration: &str,
    ) -> Self {
        self.opt_with_meta(
            name_spec,
            description,
            required,
            declaration,
            Metadata::default(),
        )
    }

    /// Declare an option carrying a metadata bag (see [`Cli::opt`]).
    pub fn opt_with_meta(
        mut self,
        name_spec: &str,
        description: impl Into<String>,
        required: bool,
        declaration: &str,
        meta: Metadata,
    ) -> Self {
        match OptionSpec::parse(name_spec, description, required, declaration, meta) {
            Ok(option) => self.current_schema().insert_option(option),
            Err(error) => self.defer(error),
        }

        self
    }

    /// Append a positional argument to the current schema.
    /// Arguments are matched in declaration order, and can be looked up by name once parsed.
    pub fn arg(mut self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let name = name.into();

        if name.is_empty() {
            self.defer(ConfigError::EmptyArgumentName);
        } else {
            self.current_schema()
                .push_arg(ArgSpec::new(name, description, required));
        }

        self
    }

    /// Document the current schema.
    /// If repeated, only the final description applies.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.current_schema().set_description(description.into());
        self
    }

    /// The description of the current schema.
    pub fn current_description(&self) -> &str {
        self.registry
            .schema(&self.current)
            .map(CommandSchema::description)
            .unwrap_or_default()
    }

    /// Attach a metadata entry to the current schema.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.current_schema().set_meta(key.into(), value.into());
        self
    }

    /// Fix the width the help is laid out for, instead of detecting the terminal.
    /// With `None`, descriptions are never wrapped.
    pub fn terminal_width(mut self, width: Option<usize>) -> Self {
        self.terminal_width = Some(width);
        self
    }

    /// The schemas declared so far.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    fn current_schema(&mut self) -> &mut CommandSchema {
        self.registry
            .select(&self.current)
            .expect("internal error - the current pattern is always registered")
    }

    fn defer(&mut self, error: ConfigError) {
        if self.deferred_error.is_none() {
            self.deferred_error = Some(error);
        }
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        let printer = match self.terminal_width {
            Some(width) => Printer::new(width),
            None => Printer::terminal(),
        };

        Ok(GeneralParser::new(self.registry, printer, user_interface))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and reports the first configuration error (ex: an unknown option type).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: an unknown option type).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[test]
    fn empty_build() {
        // Setup
        let cli = Cli::new();

        // Execute
        let parser = cli.build_parser().unwrap();

        // Verify
        assert!(!parser.registry().has_commands());
        parser.parse_tokens(empty::slice()).unwrap();
    }

    #[rstest]
    #[case(Cli::new().opt("name", "", false, "float"), ConfigError::InvalidType { name: "name".to_string(), declaration: "float".to_string() })]
    #[case(Cli::new().opt(":n", "", false, "string"), ConfigError::EmptyOptionName { spec: ":n".to_string() })]
    #[case(Cli::new().opt("name:nm", "", false, "string"), ConfigError::InvalidShortName { name: "name".to_string(), short: "nm".to_string() })]
    #[case(Cli::new().arg("", "", false), ConfigError::EmptyArgumentName)]
    #[case(Cli::new().command(""), ConfigError::EmptyPattern)]
    // Only the first error is reported.
    #[case(Cli::new().opt("a", "", false, "x").opt("b", "", false, "y"), ConfigError::InvalidType { name: "a".to_string(), declaration: "x".to_string() })]
    fn build_invalid(#[case] cli: Cli, #[case] expected: ConfigError) {
        // Execute
        let result = cli.build_parser();

        // Verify
        assert_eq!(result.err(), Some(expected));
    }

    #[test]
    fn build_invalid_pattern() {
        // Execute
        let result = Cli::new().command("[push").build_parser();

        // Verify
        assert_matches!(
            result.err(),
            Some(ConfigError::InvalidPattern { pattern, .. }) if pattern == "[push"
        );
    }

    #[test]
    fn opt_replaces() {
        // Setup
        let cli = Cli::new()
            .opt("port:p", "The port.", false, "string")
            .opt("port:P", "", true, "int");

        // Execute
        let option = cli.registry().schema("*").unwrap().option("port").unwrap();

        // Verify
        assert_eq!(option.short(), Some('P'));
        assert_eq!(option.description(), "");
        assert!(option.is_required());
        assert_eq!(option.type_label(), "integer");
    }

    #[test]
    fn command_selects() {
        // Setup
        let cli = Cli::new()
            .description("Global.")
            .opt("verbose:v", "", false, "int")
            .command("push")
            .description("Push.")
            .arg("repo", "", true)
            .command("*")
            .arg("extra", "", false);

        // Execute
        let wildcard = cli.registry().schema("*").unwrap();
        let push = cli.registry().schema("push").unwrap();

        // Verify
        assert_eq!(cli.current_description(), "Global.");
        assert_eq!(wildcard.description(), "Global.");
        assert_eq!(
            wildcard.args().iter().map(|a| a.name()).collect::<Vec<_>>(),
            vec!["extra"]
        );
        assert_eq!(push.description(), "Push.");
        assert!(push.option("verbose").is_none());
        assert_eq!(
            push.args().iter().map(|a| a.name()).collect::<Vec<_>>(),
            vec!["repo"]
        );
    }

    #[test]
    fn description_last_wins() {
        // Setup
        let cli = Cli::new().description("first").description("second");

        // Execute
        let description = cli.current_description();

        // Verify
        assert_eq!(description, "second");
    }

    #[test]
    fn meta() {
        // Setup
        let cli = Cli::new()
            .command("push")
            .meta("handler", "push_handler")
            .opt_with_meta(
                "force",
                "",
                false,
                "bool",
                Metadata::from([("inject".to_string(), MetaValue::from(true))]),
            );

        // Execute
        let push = cli.registry().schema("push").unwrap();

        // Verify
        assert_eq!(
            push.meta().get("handler"),
            Some(&MetaValue::from("push_handler"))
        );
        assert_eq!(
            push.option("force").unwrap().meta().get("inject"),
            Some(&MetaValue::Flag(true))
        );
    }

    #[test]
    fn build() {
        // Setup
        let interface = InMemoryInterface::default();
        let cli = Cli::new()
            .opt("host:h", "The host.", true, "string")
            .arg("path", "The path.", false)
            .terminal_width(None);

        // Execute
        let parser = cli
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        // Verify
        let parsed = parser.parse_tokens(&["prog", "-h", "x", "/tmp"]).unwrap();
        assert_eq!(parsed.get_opt("host"), Some(&Value::from("x")));
        assert_eq!(parsed.get_arg("path"), Some("/tmp"));

        assert_eq!(parser.parse_tokens(&["prog", "--help"]).unwrap_err(), 0);
        let message = interface.consume_message();
        assert_contains!(message, "usage: prog [<options>] [<args>]\n");
        assert_contains!(message, "  --host, -h   The host.            string   required");
    }
}
