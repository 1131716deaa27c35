use std::collections::BTreeMap;

use crate::model::{merge_metadata, MetaValue, Metadata, ValueType};
use crate::parser::ConfigError;

/// The declaration of one option.
///
/// Created via [`Cli::opt`](./struct.Cli.html#method.opt).
/// The long name (and short alias) identify the option; everything else may be refined when schemas merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    name: String,
    short: Option<char>,
    description: String,
    required: bool,
    value_type: ValueType,
    is_array: bool,
    meta: Metadata,
}

impl OptionSpec {
    /// Build an option from a name spec (`"long"` or `"long:s"`) and a type declaration (ex: `"int[]"`).
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{OptionSpec, Metadata, ValueType};
    ///
    /// let spec = OptionSpec::parse("header:H", "Extra headers.", false, "string[]", Metadata::default()).unwrap();
    /// assert_eq!(spec.name(), "header");
    /// assert_eq!(spec.short(), Some('H'));
    /// assert_eq!(spec.value_type(), ValueType::String);
    /// assert!(spec.is_array());
    /// ```
    pub fn parse(
        name_spec: &str,
        description: impl Into<String>,
        required: bool,
        declaration: &str,
        meta: Metadata,
    ) -> Result<Self, ConfigError> {
        let (name, short) = match name_spec.split_once(':') {
            Some((name, short)) => (name, short),
            None => (name_spec, ""),
        };

        if name.is_empty() {
            return Err(ConfigError::EmptyOptionName {
                spec: name_spec.to_string(),
            });
        }

        let mut short_chars = short.chars();
        let short = match (short_chars.next(), short_chars.next()) {
            (None, _) => None,
            (Some(s), None) => Some(s),
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidShortName {
                    name: name.to_string(),
                    short: short.to_string(),
                });
            }
        };

        let (value_type, is_array) =
            ValueType::parse_declaration(declaration).ok_or_else(|| ConfigError::InvalidType {
                name: name.to_string(),
                declaration: declaration.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            short,
            description: description.into(),
            required,
            value_type,
            is_array,
            meta,
        })
    }

    /// The long name, used as `--name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short alias, used as `-s`.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The help description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the option must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The scalar type of the option's values.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the option accumulates repeated occurrences into a sequence.
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// The opaque metadata bag.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// The type as declared, ex: `integer` or `string[]`.
    pub fn type_label(&self) -> String {
        if self.is_array {
            format!("{}[]", self.value_type)
        } else {
            self.value_type.to_string()
        }
    }

    /// The flag as shown in messages: `--name` or `--name (-s)`.
    pub(crate) fn flag_label(&self) -> String {
        match self.short {
            Some(short) => format!("--{} (-{short})", self.name),
            None => format!("--{}", self.name),
        }
    }

    /// Refine this option with a later declaration of the same long name.
    /// Fields of `incoming` win (an empty description or absent short alias does not erase ours);
    /// metadata merges key-wise.
    pub(crate) fn merge(&self, incoming: &OptionSpec) -> OptionSpec {
        OptionSpec {
            name: self.name.clone(),
            short: incoming.short.or(self.short),
            description: if incoming.description.is_empty() {
                self.description.clone()
            } else {
                incoming.description.clone()
            },
            required: incoming.required,
            value_type: incoming.value_type,
            is_array: incoming.is_array,
            meta: merge_metadata(&self.meta, &incoming.meta),
        }
    }
}

/// The declaration of one positional argument slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    name: String,
    description: String,
    required: bool,
}

impl ArgSpec {
    /// Declare a positional argument.
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
        }
    }

    /// The name by which the parsed value can be looked up.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the argument must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// The options, arguments and description of one command (or of the `*` wildcard scope).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSchema {
    options: BTreeMap<String, OptionSpec>,
    args: Vec<ArgSpec>,
    description: String,
    meta: Metadata,
}

impl CommandSchema {
    /// The options, sorted by long name.
    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.values()
    }

    /// Look up an option by long name.
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(name)
    }

    /// Whether any options are declared.
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// The positional arguments, in declaration order.
    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    /// The description shown in help.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The opaque metadata bag.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub(crate) fn insert_option(&mut self, spec: OptionSpec) {
        self.options.insert(spec.name.clone(), spec);
    }

    pub(crate) fn push_arg(&mut self, arg: ArgSpec) {
        self.args.push(arg);
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_meta(&mut self, key: String, value: MetaValue) {
        self.meta.insert(key, value);
    }
}

/// Merge two schemas into a new one, `overlay` winning on collisions.
///
/// * Options with the same long name merge field by field; no option is ever dropped.
/// * Arguments with the same name are refined in place, others are appended after `base`'s.
/// * A non-empty `overlay` description replaces `base`'s (the last description wins).
/// * Metadata merges key-wise.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{merge_schemas, Cli};
///
/// let cli = Cli::new()
///     .opt("verbose:v", "Be chatty.", false, "int")
///     .command("push")
///     .opt("force:f", "Force it.", false, "bool");
/// let registry = cli.registry();
///
/// let merged = merge_schemas(registry.schema("*").unwrap(), registry.schema("push").unwrap());
/// let names: Vec<&str> = merged.options().map(|o| o.name()).collect();
/// assert_eq!(names, vec!["force", "verbose"]);
/// ```
pub fn merge_schemas(base: &CommandSchema, overlay: &CommandSchema) -> CommandSchema {
    let mut options = base.options.clone();

    for (name, incoming) in &overlay.options {
        let merged = match options.get(name) {
            Some(existing) => existing.merge(incoming),
            None => incoming.clone(),
        };
        options.insert(name.clone(), merged);
    }

    let mut args = base.args.clone();

    for incoming in &overlay.args {
        match args.iter_mut().find(|a| a.name == incoming.name) {
            Some(existing) => *existing = incoming.clone(),
            None => args.push(incoming.clone()),
        }
    }

    let description = if overlay.description.is_empty() {
        base.description.clone()
    } else {
        overlay.description.clone()
    };

    CommandSchema {
        options,
        args,
        description,
        meta: merge_metadata(&base.meta, &overlay.meta),
    }
}
