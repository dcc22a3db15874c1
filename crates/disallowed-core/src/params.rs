//! Literal argument values and per-position parameter constraints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A call argument as resolved by the analyzer.
///
/// Comparison is strict: `Int(42)` never equals `Str("42")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ArgValue {
    /// The `null` literal.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A string literal.
    Str(String),
    /// Not a scalar literal, or not resolvable.
    Unknown,
}

impl ArgValue {
    /// Converts a JSON value. Arrays and objects cannot be compared to a
    /// configured literal and become [`ArgValue::Unknown`].
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Unknown),
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Unknown,
        }
    }

    /// Converts a configured TOML value. Returns `None` for non-scalars.
    #[must_use]
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(Self::Bool(*b)),
            toml::Value::Integer(i) => Some(Self::Int(*i)),
            toml::Value::Float(f) => Some(Self::Float(*f)),
            toml::Value::String(s) => Some(Self::Str(s.clone())),
            toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    /// Returns true for anything but [`ArgValue::Unknown`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Strict literal equality. `Unknown` equals nothing, not even itself.
    ///
    /// Floats compare by value: `0.0` equals `-0.0` and `NaN` equals nothing.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn literal_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// Outcome of looking for forbidden values in the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenCheck {
    /// A configured position holds the forbidden literal.
    Hit {
        /// 1-based position.
        position: usize,
    },
    /// Every configured position is absent or holds a different literal.
    Clear,
    /// Some configured position could not be resolved to a literal.
    Unknown {
        /// 1-based position.
        position: usize,
    },
}

/// Literal values keyed by 1-based argument position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamConstraints {
    values: BTreeMap<usize, ArgValue>,
}

impl ParamConstraints {
    /// Creates an empty constraint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the value for a position.
    ///
    /// # Errors
    ///
    /// Returns an error for position 0 or an [`ArgValue::Unknown`] value.
    pub fn insert(&mut self, position: usize, value: ArgValue) -> Result<(), ModelError> {
        if position == 0 {
            return Err(ModelError::InvalidParamPosition {
                position: position.to_string(),
            });
        }
        if !value.is_known() {
            return Err(ModelError::UnsupportedParamValue {
                position,
                value: value.to_string(),
            });
        }
        self.values.insert(position, value);
        Ok(())
    }

    /// Builder-style [`ParamConstraints::insert`].
    ///
    /// # Errors
    ///
    /// See [`ParamConstraints::insert`].
    pub fn with(mut self, position: usize, value: ArgValue) -> Result<Self, ModelError> {
        self.insert(position, value)?;
        Ok(self)
    }

    /// Returns true if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(position, value)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ArgValue)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    /// Returns the value configured for a position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ArgValue> {
        self.values.get(&position)
    }

    /// True iff every configured position holds exactly the configured
    /// literal. Missing or unknown arguments fail.
    #[must_use]
    pub fn all_equal(&self, args: &[ArgValue]) -> bool {
        self.values.iter().all(|(position, expected)| {
            arg_at(args, *position).is_some_and(|actual| actual.literal_eq(expected))
        })
    }

    /// Looks for a configured position holding its forbidden literal.
    ///
    /// A hit anywhere wins over unknown values elsewhere.
    #[must_use]
    pub fn find_forbidden(&self, args: &[ArgValue]) -> ForbiddenCheck {
        let mut unknown = None;
        for (position, forbidden) in &self.values {
            match arg_at(args, *position) {
                Some(actual) if actual.literal_eq(forbidden) => {
                    return ForbiddenCheck::Hit {
                        position: *position,
                    };
                }
                Some(actual) if !actual.is_known() => {
                    unknown.get_or_insert(*position);
                }
                _ => {}
            }
        }
        match unknown {
            Some(position) => ForbiddenCheck::Unknown { position },
            None => ForbiddenCheck::Clear,
        }
    }
}

fn arg_at(args: &[ArgValue], position: usize) -> Option<&ArgValue> {
    position.checked_sub(1).and_then(|i| args.get(i))
}
