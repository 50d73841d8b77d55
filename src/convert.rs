//! String-to-value converters.
//!
//! Every raw setting arrives as a string. A [`Converter`] turns it into a
//! typed [`Value`], or signals [`Converted::Skip`] to have the setting treated
//! as if it had never been set.
//!
//! The built-in converters are selected by [`Kind`], a closed tag resolved
//! once when a spec is built. [`Kind::of`] picks the kind that matches an
//! example value, which is how templates infer conversions:
//!
//! | Example value | Kind | `"a,b"` becomes |
//! |---------------|------|-----------------|
//! | `Bool` | `Bool` | `true` (non-empty fallback) |
//! | `Integer` | `Integer` | `Null` (not a number) |
//! | `List` | `List` | `["a", "b"]` |
//! | `Tuple` | `Tuple` | `("a", "b")` |
//! | `Map` | `Dict` | `{"a": "", "b": ""}` |
//! | anything else | `Raw` | `"a,b"` |

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::value::{Table, Value};

#[cfg(feature = "url")]
pub mod url;

/// Strings accepted as `true` by [`bool`]. Case-sensitive.
const TRUE_STRINGS: [&str; 5] = ["1", "true", "t", "True", "TRUE"];
/// Strings accepted as `false` by [`bool`]. Case-sensitive.
const FALSE_STRINGS: [&str; 5] = ["0", "false", "f", "False", "FALSE"];

/// Target kind of a built-in conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Integer,
    List,
    Tuple,
    Dict,
    /// Identity: the raw string is kept as-is.
    Raw,
}

impl Kind {
    /// The kind whose output has the same shape as `example`.
    ///
    /// Strings, floats and nulls have no dedicated converter and map to `Raw`.
    pub fn of(example: &Value) -> Kind {
        match example {
            Value::Bool(_) => Kind::Bool,
            Value::Integer(_) => Kind::Integer,
            Value::List(_) => Kind::List,
            Value::Tuple(_) => Kind::Tuple,
            Value::Map(_) => Kind::Dict,
            Value::Null | Value::Float(_) | Value::String(_) => Kind::Raw,
        }
    }

    /// Run the built-in converter for this kind. Never fails.
    pub fn convert(self, raw: &str) -> Value {
        match self {
            Kind::Bool => Value::Bool(bool(raw)),
            Kind::Integer => Value::from(int(raw)),
            Kind::List => Value::List(list(raw)),
            Kind::Tuple => Value::Tuple(list(raw)),
            Kind::Dict => Value::Map(dict(raw)),
            Kind::Raw => Value::String(raw.to_string()),
        }
    }
}

/// Parse a boolean.
///
/// The literal true/false sets are matched exactly; anything else is `true`
/// when non-empty. Unrecognized input is not an error.
pub fn bool(raw: &str) -> bool {
    if TRUE_STRINGS.contains(&raw) {
        return true;
    }
    if FALSE_STRINGS.contains(&raw) {
        return false;
    }
    !raw.is_empty()
}

/// Truthiness of an already-typed value. Booleans pass through, strings go
/// through [`bool`], numbers are true when non-zero and containers when
/// non-empty.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => bool(s),
        Value::List(items) | Value::Tuple(items) => !items.is_empty(),
        Value::Map(t) => !t.is_empty(),
    }
}

/// Parse a base-10 integer, `None` when the input is not one.
///
/// Surrounding whitespace and a leading sign are allowed, and single `_`
/// may separate digits (`1_000`). Values outside the `i64` range are `None`.
pub fn int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let well_formed = !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_');
    if !well_formed {
        return None;
    }
    trimmed.replace('_', "").parse().ok()
}

/// Split on commas. The empty string is the empty list.
pub fn list(raw: &str) -> Vec<Value> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(Value::from).collect()
}

/// Parse `key=value` pairs separated by commas.
///
/// Each pair splits on its first `=`; a pair without one maps to `""`.
/// Later duplicates win.
pub fn dict(raw: &str) -> Table {
    if raw.is_empty() {
        return Table::new();
    }
    raw.split(',')
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), Value::from(v)),
            None => (pair.to_string(), Value::from("")),
        })
        .collect()
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Value(Value),
    /// Treat the setting as absent. Not the same as a null or empty value,
    /// which are still written.
    Skip,
}

impl Converted {
    pub fn value(v: impl Into<Value>) -> Self {
        Converted::Value(v.into())
    }
}

type CustomFn = dyn Fn(&str) -> Result<Converted, BoxError> + Send + Sync;

/// How a spec turns its raw string into a value.
#[derive(Clone)]
pub enum Converter {
    Kind(Kind),
    Custom(Arc<CustomFn>),
}

impl Converter {
    /// A caller-defined converter that may skip the setting or fail.
    ///
    /// Errors are not caught: they abort collection as
    /// [`CollectError::Convert`](crate::CollectError::Convert).
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Converted, BoxError> + Send + Sync + 'static,
    {
        Converter::Custom(Arc::new(f))
    }

    /// A caller-defined converter that always produces a value.
    pub fn map<F, V>(f: F) -> Self
    where
        F: Fn(&str) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Converter::custom(move |raw| Ok(Converted::Value(f(raw).into())))
    }

    pub fn apply(&self, raw: &str) -> Result<Converted, BoxError> {
        match self {
            Converter::Kind(kind) => Ok(Converted::Value(kind.convert(raw))),
            Converter::Custom(f) => f(raw),
        }
    }
}

impl From<Kind> for Converter {
    fn from(kind: Kind) -> Self {
        Converter::Kind(kind)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Converter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
