use glob::Pattern;
use indexmap::IndexMap;

use crate::api::schema::{merge_schemas, CommandSchema};
use crate::constant::WILDCARD;
use crate::parser::ConfigError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Clone)]
struct RegisteredSchema {
    pattern: Pattern,
    schema: CommandSchema,
}

/// The command schemas of a command line, keyed by command-name pattern.
///
/// Patterns use shell glob syntax; the `*` wildcard schema always exists and applies to every command.
/// Populated through [`Cli`](./struct.Cli.html); read-only once the parser is built.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    // Insertion ordered, so the wildcard (registered first) merges before any specific command.
    schemas: IndexMap<String, RegisteredSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Create a registry holding only the empty wildcard schema.
    pub fn new() -> Self {
        let mut schemas = IndexMap::default();
        schemas.insert(
            WILDCARD.to_string(),
            RegisteredSchema {
                pattern: Pattern::new(WILDCARD).expect("internal error - wildcard is a valid glob"),
                schema: CommandSchema::default(),
            },
        );
        Self { schemas }
    }

    /// Select the schema for `pattern`, creating it on first reference.
    pub(crate) fn select(&mut self, pattern: &str) -> Result<&mut CommandSchema, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }

        if !self.schemas.contains_key(pattern) {
            let compiled = Pattern::new(pattern).map_err(|error| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: error.msg.to_string(),
            })?;
            self.schemas.insert(
                pattern.to_string(),
                RegisteredSchema {
                    pattern: compiled,
                    schema: CommandSchema::default(),
                },
            );
        }

        let registered = self
            .schemas
            .get_mut(pattern)
            .expect("internal error - schema was just registered");
        Ok(&mut registered.schema)
    }

    /// The schema registered under exactly `pattern`, without any merging.
    pub fn schema(&self, pattern: &str) -> Option<&CommandSchema> {
        self.schemas.get(pattern).map(|r| &r.schema)
    }

    /// Resolve the effective schema for a command name.
    ///
    /// Every schema whose pattern matches `command` is merged, in registration order, into a fresh schema.
    /// With no match, the result is empty.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::Cli;
    ///
    /// let cli = Cli::new()
    ///     .opt("verbose:v", "Be chatty.", false, "int")
    ///     .command("db:*")
    ///     .opt("database", "Which database.", true, "string")
    ///     .command("db:migrate")
    ///     .opt("steps", "How far to go.", false, "int");
    ///
    /// let schema = cli.registry().get_schema("db:migrate");
    /// let names: Vec<&str> = schema.options().map(|o| o.name()).collect();
    /// assert_eq!(names, vec!["database", "steps", "verbose"]);
    /// ```
    pub fn get_schema(&self, command: &str) -> CommandSchema {
        let mut resolved = CommandSchema::default();

        for (_pattern, registered) in &self.schemas {
            if registered.pattern.matches(command) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Command '{command}' matches schema pattern '{_pattern}'.");
                }

                resolved = merge_schemas(&resolved, &registered.schema);
            }
        }

        resolved
    }

    /// Whether a schema is registered under exactly `name`.
    pub fn has_command(&self, name: &str) -> bool {
        !name.is_empty() && self.schemas.contains_key(name)
    }

    /// Whether any concrete command is registered, ie: a pattern free of glob syntax.
    ///
    /// When true, the parser reads the first non-option token as the command name.
    pub fn has_commands(&self) -> bool {
        self.schemas.keys().any(|pattern| is_concrete(pattern))
    }

    /// The concrete commands with their schemas, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &CommandSchema)> {
        self.schemas
            .iter()
            .filter(|(pattern, _)| is_concrete(pattern))
            .map(|(pattern, registered)| (pattern.as_str(), &registered.schema))
    }
}

fn is_concrete(pattern: &str) -> bool {
    !pattern.contains(|c| matches!(c, '*' | '?' | '['))
}
