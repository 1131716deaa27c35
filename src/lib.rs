//! `argot` is a getopt-style command line parser for Rust.
//!
//! Where most parsers bind the command line to Rust types at compile time, `argot` describes the command line as data:
//! a set of *schemas* (options, positional arguments and a description) registered against command-name patterns.
//! The design concerns are:
//! * *Getopt compatible syntax*:
//! Long options (`--host=x`, `--host x`), short options (`-h x`, `-hx`), short bundles (`-vvf`), `--no-` negation and the `--` terminator.
//! * *Sub-command paradigm*:
//! A command line may declare commands; the wildcard schema `*` (and any glob pattern) contributes to every matching command.
//! * *Batch validation*:
//! Parsing never stops at the first problem.
//! A user fixing one typo sees every other problem in the same run.
//! * *Dynamic values*:
//! Option values are typed `string`, `integer` or `boolean` (optionally as arrays), and handed back as [`Value`]s.
//! This suits dispatchers and frameworks which route the parsed command line by name.
//!
//! # Usage
//! ```no_run
//! use argot::Cli;
//!
//! fn main() {
//!     let parser = Cli::new()
//!         .description("Copy files to a remote host.")
//!         .opt("host:h", "The host to copy to.", true, "string")
//!         .opt("port:P", "The port to connect on.", false, "int")
//!         .opt("verbose:v", "Increase the logging (repeatable).", false, "int")
//!         .arg("source", "The file to copy.", true)
//!         .build();
//!
//!     let parsed = parser.parse();
//!     let host = parsed.get_opt("host").and_then(|v| v.as_str()).unwrap();
//!     let port = parsed.get_opt("port").and_then(|v| v.as_int()).unwrap_or(22);
//!     println!("{} -> {host}:{port}", parsed.get_arg("source").unwrap());
//! }
//! ```
//!
//! ```console
//! $ remote-copy --help
//! usage: remote-copy [<options>] <args>
//!
//! Copy files to a remote host.
//!
//! OPTIONS:
//!   --host, -h      The host to copy to.                 string    required
//!   --port, -P      The port to connect on.              integer
//!   --verbose, -v   Increase the logging (repeatable).   integer
//!   --help, -?      Display this help.
//!
//! ARGUMENTS:
//!   source          The file to copy.                              required
//!
//! $ remote-copy -hlocalhost -P 2222 -vv notes.txt
//! notes.txt -> localhost:2222
//!
//! $ remote-copy -P ssh
//! The value of --port (-P) is not a valid integer.
//! Missing required option: host
//! Missing required arg: source
//!
//! usage: remote-copy [<options>] <args>
//! ```
//!
//! # Schemas
//! Configure `argot` by starting with a [`Cli`].
//! Each call applies to the *current* schema, which starts as the wildcard schema `*`.
//! * [`Cli::opt`] declares an option from a name spec (`"long"` or `"long:s"`) and a type (`string`, `integer`, `boolean`, or the short forms `str`, `int`, `bool`).
//! Suffix the type with `[]` to collect every occurrence in supply order.
//! * [`Cli::arg`] declares the next positional argument.
//! Positional values are named by declaration order, and may be looked up by name or index.
//! * [`Cli::description`] documents the current schema.
//! * [`Cli::meta`] and [`Cli::opt_with_meta`] attach an open [`Metadata`] bag, which `argot` stores but never interprets.
//!
//! ### Commands
//! [`Cli::command`] selects the schema of a command-name pattern.
//! A pattern without glob syntax declares a command.
//! Once any command is declared, the first token (if it does not start with `-`) is read as the command name.
//!
//! When a command is resolved, its schema is merged from every matching pattern in registration order:
//! options accumulate (later declarations refine earlier ones), arguments are refined position by position, and the last description wins.
//!
//! ```no_run
//! use argot::Cli;
//!
//! let parser = Cli::new()
//!     .opt("verbose:v", "Increase the logging.", false, "int")
//!     .arg("repo", "The repository.", true)
//!     .command("push")
//!     .description("Send changes upstream.")
//!     .opt("force:f", "Overwrite upstream changes.", false, "bool")
//!     .command("pull")
//!     .description("Fetch upstream changes.")
//!     .build();
//!
//! let parsed = parser.parse();
//! match parsed.command() {
//!     "push" => println!("force: {:?}", parsed.get_opt("force")),
//!     _ => println!("{}", parsed.to_json()),
//! }
//! ```
//!
//! # Tokens
//! * `--name=value` always supplies `value` as text.
//! * `--name value` supplies the next token, unless it looks like an option (starts with `-`).
//! With nothing to consume, `--name` supplies an empty value, while `-n` supplies `""` or `1` by type.
//! Inside a bundle, an integer flag without digits counts its occurrences (`-vvv` is `3`).
//! Separate occurrences (`-v -v`) each supply `1`, so the last one wins.
//! * A boolean option only consumes the next token if it is a boolean literal (`1`, `0`, `true`, `false`, `on`, `off`, `yes`, `no`).
//! * `--no-name` sets the boolean option `name` to `false`, unless a value follows it (then `no-name` is just an unknown option).
//! * `--` stops option parsing; every remaining token is positional.
//! * `--help`, `--?` and `-?` request help, which skips validation.
//!
//! # Outcomes
//! [`GeneralParser::parse`] and [`GeneralParser::parse_tokens`] print help or errors and exit (`0` and `1` respectively).
//! [`GeneralParser::try_parse`] returns a [`ParseError`] instead, leaving the presentation to the caller.
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events for tokenizing, schema resolution and validation.
pub use argot_builder::*;
