use std::env;

use crate::api::{ParsedArguments, SchemaRegistry};
use crate::constant::HELP_NAME;
use crate::matcher::Tokenizer;
use crate::parser::base::ParseError;
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;
use crate::parser::validator::validate;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The configured command line parser.
/// Built via [`Cli::build`](./struct.Cli.html#method.build) or [`Cli::build_parser`](./struct.Cli.html#method.build_parser).
///
/// The schemas are frozen once built; a `GeneralParser` may be shared across threads to parse
/// different argument vectors concurrently.
pub struct GeneralParser {
    registry: SchemaRegistry,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl GeneralParser {
    pub(crate) fn new(
        registry: SchemaRegistry,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            registry,
            printer,
            user_interface,
        }
    }

    /// The schemas this parser validates against.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Parse the argument vector without printing anything.
    ///
    /// `argv[0]` is the invoked program path; the remaining tokens are parsed in two phases:
    /// 1. Tokenizing splits the tokens into the command, raw option values and positional arguments.
    /// 2. Validation coerces every option to its declared type and checks the command, required
    ///    options, required arguments and unrecognized options, collecting every failure.
    ///
    /// A help request (`--help`, `--?` or `-?`) skips validation and returns `Err(ParseError::HelpRequested)`.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Cli, ParseError, Value};
    ///
    /// let parser = Cli::new()
    ///     .opt("port:P", "The port.", false, "int")
    ///     .build();
    ///
    /// let parsed = parser.try_parse(&["prog", "-P", "8080"]).unwrap();
    /// assert_eq!(parsed.get_opt("port"), Some(&Value::Int(8080)));
    ///
    /// let error = parser.try_parse(&["prog", "-P", "x"]).unwrap_err();
    /// assert_eq!(error.exit_code(), 1);
    /// assert_eq!(
    ///     error.to_string(),
    ///     "The value of --port (-P) is not a valid integer.\n\nusage: prog [<options>]"
    /// );
    ///
    /// let help = parser.try_parse(&["prog", "--help"]).unwrap_err();
    /// assert!(matches!(help, ParseError::HelpRequested { .. }));
    /// ```
    pub fn try_parse(&self, argv: &[&str]) -> Result<ParsedArguments, ParseError> {
        let raw = Tokenizer::new(&self.registry).tokenize(argv);

        if raw.has_opt(HELP_NAME) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Help requested for command '{}'.", raw.command());
            }

            return Err(ParseError::HelpRequested {
                text: self.printer.help(&self.registry, &raw).join("\n"),
            });
        }

        let usage = self.printer.usage(&self.registry, &raw);
        validate(&self.registry, raw).map_err(|errors| ParseError::Invalid { errors, usage })
    }

    /// Parse the argument vector, printing help or errors on failure.
    ///
    /// Returns the conventional exit code on failure: `Err(0)` after help was displayed, `Err(1)` after errors were reported.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::Cli;
    ///
    /// let parser = Cli::new()
    ///     .opt("host:h", "The host.", true, "string")
    ///     .build();
    ///
    /// let parsed = parser.parse_tokens(&["prog", "-hlocalhost"]).unwrap();
    /// assert_eq!(parsed.get_opt("host").and_then(|v| v.as_str()), Some("localhost"));
    ///
    /// // Prints "Missing required option: host" and the usage line.
    /// assert_eq!(parser.parse_tokens(&["prog"]).unwrap_err(), 1);
    /// ```
    pub fn parse_tokens(&self, argv: &[&str]) -> Result<ParsedArguments, i32> {
        self.try_parse(argv).map_err(|error| {
            let exit_code = error.exit_code();

            match error {
                ParseError::HelpRequested { text } => self.user_interface.print(text),
                invalid => self.user_interface.print_error(invalid),
            }

            exit_code
        })
    }

    /// Parse the argument vector, either exiting or returning the failure.
    ///
    /// With `exit_on_failure`, help and errors are printed and the process exits (via [`std::process::exit`]),
    /// so an `Err` is never returned.
    /// Otherwise nothing is printed and the failure is returned for the caller to handle.
    pub fn parse_args(
        &self,
        argv: &[&str],
        exit_on_failure: bool,
    ) -> Result<ParsedArguments, ParseError> {
        if exit_on_failure {
            match self.parse_tokens(argv) {
                Ok(parsed) => Ok(parsed),
                Err(exit_code) => std::process::exit(exit_code),
            }
        } else {
            self.try_parse(argv)
        }
    }

    /// Parse the process arguments ([`env::args`]).
    ///
    /// If help is requested, it is displayed and the process exits with code `0`.
    /// If any error is found, every error is displayed and the process exits with code `1`.
    pub fn parse(&self) -> ParsedArguments {
        let argv: Vec<String> = env::args().collect();
        let tokens: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();

        match self.parse_tokens(&tokens) {
            Ok(parsed) => parsed,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }
}
