use thiserror::Error;

/// A programmer error in the command line configuration.
///
/// Raised by [`Cli::build_parser`](./struct.Cli.html#method.build_parser); never collected alongside user input errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The option type is not one of `string`, `integer`, `boolean` (or an alias, optionally suffixed with `[]`).
    #[error("Config error: invalid type '{declaration}' for option '{name}'.")]
    InvalidType {
        /// The option long name.
        name: String,
        /// The rejected type declaration.
        declaration: String,
    },

    /// The option name spec has no long name.
    #[error("Config error: option '{spec}' has an empty name.")]
    EmptyOptionName {
        /// The rejected name spec.
        spec: String,
    },

    /// The short name is longer than a single character.
    #[error("Config error: short name '{short}' of option '{name}' must be a single character.")]
    InvalidShortName {
        /// The option long name.
        name: String,
        /// The rejected short name.
        short: String,
    },

    /// The positional argument has no name.
    #[error("Config error: argument name cannot be empty.")]
    EmptyArgumentName,

    /// The command pattern is empty.
    #[error("Config error: command pattern cannot be empty.")]
    EmptyPattern,

    /// The command pattern is not a valid glob.
    #[error("Config error: invalid command pattern '{pattern}': {message}.")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the glob was rejected.
        message: String,
    },
}

/// The complete, ordered batch of validation failures for one parse.
///
/// Displays as one message per line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .0.join("\n"))]
pub struct ValidationErrors(pub(crate) Vec<String>);

impl ValidationErrors {
    /// The messages, in reporting order.
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Take ownership of the messages.
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

/// Why a parse did not produce arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// `--help` (or `-?`) was requested; carries the rendered help.
    #[error("{text}")]
    HelpRequested {
        /// The rendered help text.
        text: String,
    },

    /// The input failed validation.
    #[error("{errors}\n\n{usage}")]
    Invalid {
        /// Every validation failure.
        errors: ValidationErrors,
        /// The usage line for the resolved command.
        usage: String,
    },
}

impl ParseError {
    /// The conventional process exit code: `0` after help, `1` after a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ParseError::HelpRequested { .. } => 0,
            ParseError::Invalid { .. } => 1,
        }
    }
}
