use indexmap::IndexMap;

use crate::api::{OptionSpec, ParsedArguments, SchemaRegistry};
use crate::constant::{COERCE_FALSE, COERCE_TRUE};
use crate::model::{Scalar, Value, ValueType};
use crate::parser::base::ValidationErrors;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Validate raw arguments against the schema resolved for their command.
///
/// Every problem is reported, in a stable order:
/// 1. an unknown command,
/// 2. per option (sorted by long name): type errors and misuse of the `--no-` prefix,
/// 3. missing required options,
/// 4. missing required arguments,
/// 5. unrecognized options.
///
/// On success, values carry their declared types and options appear in the order first supplied.
/// Validating an already validated result yields it unchanged.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{validate, Cli, ParsedArguments, Value};
///
/// let cli = Cli::new()
///     .opt("port:P", "The port.", true, "int");
///
/// let mut raw = ParsedArguments::default();
/// raw.set_opt("P", "8080");
/// let parsed = validate(cli.registry(), raw).unwrap();
/// assert_eq!(parsed.get_opt("port"), Some(&Value::Int(8080)));
///
/// let errors = validate(cli.registry(), ParsedArguments::default()).unwrap_err();
/// assert_eq!(errors.messages(), &["Missing required option: port"]);
/// ```
pub fn validate(
    registry: &SchemaRegistry,
    raw: ParsedArguments,
) -> Result<ParsedArguments, ValidationErrors> {
    let (command, mut options, args, meta, negated) = raw.into_parts();
    let schema = registry.get_schema(&command);
    let supplied_order: Vec<String> = options.keys().cloned().collect();
    let mut errors = Vec::default();
    let mut missing = Vec::default();
    let mut validated: Vec<(usize, String, Value)> = Vec::default();

    if !command.is_empty() && registry.has_commands() && !registry.has_command(&command) {
        errors.push(format!("Invalid command: {command}."));
    }

    for option in schema.options() {
        let mut keys = vec![option.name().to_string()];
        if let Some(short) = option.short() {
            keys.push(short.to_string());
        }

        let position = keys
            .iter()
            .filter_map(|key| supplied_order.iter().position(|supplied| supplied == key))
            .min();
        let supplied: Vec<Scalar> = keys
            .iter()
            .filter_map(|key| options.shift_remove(key))
            .flat_map(Value::into_scalars)
            .collect();

        let position = match position {
            Some(position) => position,
            None => {
                if option.is_required() {
                    missing.push(option.name().to_string());
                }
                continue;
            }
        };

        if option.value_type() != ValueType::Boolean && negated.contains(option.name()) {
            errors.push(format!(
                "Cannot apply the --no- prefix on the non boolean --{}.",
                option.name()
            ));
            continue;
        }

        match coerce_option(option, supplied) {
            Some(value) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Option '{}' validated as {value:?}.", option.name());
                }

                validated.push((position, option.name().to_string(), value));
            }
            None => errors.push(format!(
                "The value of {} is not a valid {}.",
                option.flag_label(),
                option.value_type()
            )),
        }
    }

    errors.extend(
        missing
            .into_iter()
            .map(|name| format!("Missing required option: {name}")),
    );

    for (position, arg) in schema.args().iter().enumerate() {
        let present = args.contains_key(arg.name()) || args.contains_key(&position.to_string());

        if arg.is_required() && !present {
            errors.push(format!("Missing required arg: {}", arg.name()));
        }
    }

    errors.extend(options.keys().map(|key| format!("Invalid option: {key}")));

    if !errors.is_empty() {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Validation failed with {} error(s).", errors.len());
        }

        return Err(ValidationErrors(errors));
    }

    validated.sort_by_key(|(position, _, _)| *position);
    let options: IndexMap<String, Value> = validated
        .into_iter()
        .map(|(_, name, value)| (name, value))
        .collect();

    Ok(ParsedArguments::from_parts(command, options, args, meta))
}

/// Array options coerce every occurrence; scalar options keep only the last one.
fn coerce_option(option: &OptionSpec, mut supplied: Vec<Scalar>) -> Option<Value> {
    if option.is_array() {
        supplied
            .into_iter()
            .map(|scalar| coerce(scalar, option.value_type()))
            .collect::<Option<Vec<Scalar>>>()
            .map(Value::Array)
    } else {
        supplied
            .pop()
            .and_then(|scalar| coerce(scalar, option.value_type()))
            .map(Value::from)
    }
}

/// Coerce a single value into `value_type`, or `None` when it is not a valid instance.
pub(crate) fn coerce(scalar: Scalar, value_type: ValueType) -> Option<Scalar> {
    match (value_type, scalar) {
        (ValueType::String, Scalar::Str(text)) => Some(Scalar::Str(text)),
        (ValueType::String, other) => Some(Scalar::Str(other.to_string())),
        (ValueType::Integer, Scalar::Int(number)) => Some(Scalar::Int(number)),
        (ValueType::Integer, Scalar::Str(text)) => parse_integer(&text).map(Scalar::Int),
        (ValueType::Integer, Scalar::Bool(_)) => None,
        (ValueType::Boolean, Scalar::Bool(flag)) => Some(Scalar::Bool(flag)),
        (ValueType::Boolean, Scalar::Int(0)) => Some(Scalar::Bool(false)),
        (ValueType::Boolean, Scalar::Int(1)) => Some(Scalar::Bool(true)),
        (ValueType::Boolean, Scalar::Int(_)) => None,
        (ValueType::Boolean, Scalar::Str(text)) => {
            if COERCE_TRUE.contains(&text.as_str()) {
                Some(Scalar::Bool(true))
            } else if COERCE_FALSE.contains(&text.as_str()) {
                Some(Scalar::Bool(false))
            } else {
                None
            }
        }
    }
}

/// Whole numbers parse directly; other numbers (ex: `2.5`, `1e3`) are truncated.
/// Anything outside the `i64` range is rejected rather than saturated.
fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();

    text.parse::<i64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .map(f64::trunc)
            // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
            .filter(|number| (i64::MIN as f64..i64::MAX as f64).contains(number))
            .map(|number| number as i64)
    })
}
