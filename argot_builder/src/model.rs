use serde::Serialize;
use std::collections::BTreeMap;

/// The scalar type declared for an option.
///
/// A declaration may additionally mark the option as an array (see [`ValueType::parse_declaration`]);
/// array-ness is tracked separately on the option, this enum only names the element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Any text, always valid.
    String,
    /// A whole number.
    Integer,
    /// A flag, `true` or `false`.
    Boolean,
}

impl ValueType {
    /// Parse a type declaration into its scalar type and array flag.
    ///
    /// Accepts `string`, `integer`, `boolean` and the aliases `str`, `int`, `bool` (case-insensitive),
    /// each optionally suffixed with `[]` to declare an array.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::ValueType;
    ///
    /// assert_eq!(ValueType::parse_declaration("Int[]"), Some((ValueType::Integer, true)));
    /// assert_eq!(ValueType::parse_declaration("bool"), Some((ValueType::Boolean, false)));
    /// assert_eq!(ValueType::parse_declaration("float"), None);
    /// ```
    pub fn parse_declaration(declaration: &str) -> Option<(ValueType, bool)> {
        let lowered = declaration.to_ascii_lowercase();
        let (base, is_array) = match lowered.strip_suffix("[]") {
            Some(base) => (base, true),
            None => (lowered.as_str(), false),
        };
        let value_type = match base {
            "string" | "str" => ValueType::String,
            "integer" | "int" => ValueType::Integer,
            "boolean" | "bool" => ValueType::Boolean,
            _ => return None,
        };

        Some((value_type, is_array))
    }

    /// The canonical name of this type, as used in user facing messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Str(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// The value of an option: a scalar, or an ordered sequence of scalars for repeated/array options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Ordered values, in the order they were supplied.
    Array(Vec<Scalar>),
}

impl Value {
    /// The text, if this is a `Value::Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The integer, if this is a `Value::Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The boolean, if this is a `Value::Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The items, if this is a `Value::Array`.
    pub fn as_array(&self) -> Option<&[Scalar]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Coalesce another occurrence into this value.
    /// A scalar becomes a two item sequence; a sequence is extended.
    pub(crate) fn accumulate(self, item: Scalar) -> Value {
        let mut items = self.into_scalars();
        items.push(item);
        Value::Array(items)
    }

    pub(crate) fn into_scalars(self) -> Vec<Scalar> {
        match self {
            Value::Str(value) => vec![Scalar::Str(value)],
            Value::Int(value) => vec![Scalar::Int(value)],
            Value::Bool(value) => vec![Scalar::Bool(value)],
            Value::Array(items) => items,
        }
    }

    pub(crate) fn last_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Str(value) => Some(Scalar::Str(value.clone())),
            Value::Int(value) => Some(Scalar::Int(*value)),
            Value::Bool(value) => Some(Scalar::Bool(*value)),
            Value::Array(items) => items.last().cloned(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Str(value) => Value::Str(value),
            Scalar::Int(value) => Value::Int(value),
            Scalar::Bool(value) => Value::Bool(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Scalar>> for Value {
    fn from(value: Vec<Scalar>) -> Self {
        Value::Array(value)
    }
}

/// An entry in an open metadata bag.
///
/// `argot` never interprets metadata; it is stored, merged and handed back to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Text entry.
    Text(String),
    /// Integer entry.
    Integer(i64),
    /// Boolean entry.
    Flag(bool),
    /// Nested list of entries.
    List(Vec<MetaValue>),
}

impl MetaValue {
    /// The text, if this is a `MetaValue::Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Integer(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Flag(value)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(value: Vec<MetaValue>) -> Self {
        MetaValue::List(value)
    }
}

/// String keyed metadata, kept in sorted key order.
pub type Metadata = BTreeMap<String, MetaValue>;

/// Merge `incoming` over `base`, key by key; incoming entries win.
pub(crate) fn merge_metadata(base: &Metadata, incoming: &Metadata) -> Metadata {
    let mut merged = base.clone();
    merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
