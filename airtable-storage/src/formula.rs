//! Airtable formulas used to filter the records of a list query.

use std::fmt::{Display, Formatter};

use serde_json::{Number, Value};

/// A scalar value compared in a [FilterFormula].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Text literal, rendered double-quoted.
    Text(String),
    /// Number literal.
    Number(Number),
    /// Boolean literal, rendered as `TRUE()` or `FALSE()`.
    Boolean(bool),
}

impl FilterValue {
    /// Convert a JSON value, only scalars are accepted.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::Bool(boolean) => Some(Self::Boolean(*boolean)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// JSON counterpart of the value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
            Self::Boolean(boolean) => Value::Bool(*boolean),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => {
                write!(f, "\"")?;
                for c in text.chars() {
                    if matches!(c, '"' | '\\') {
                        write!(f, "\\")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, "\"")
            }
            Self::Number(number) => write!(f, "{number}"),
            Self::Boolean(true) => write!(f, "TRUE()"),
            Self::Boolean(false) => write!(f, "FALSE()"),
        }
    }
}

/// Single field equality filter, rendered as `{field} = literal`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterFormula {
    field: String,
    value: FilterValue,
}

impl FilterFormula {
    /// Filter the records whose `field` equals `value`.
    pub fn field_equals<F: Into<String>, V: Into<FilterValue>>(field: F, value: V) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Name of the filtered field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Expected value of the filtered field.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }
}

impl Display for FilterFormula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for c in self.field.chars() {
            if matches!(c, '}' | '\\') {
                write!(f, "\\")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "}} = {}", self.value)
    }
}
