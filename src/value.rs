//! Structured values produced by collection.
//!
//! A collected configuration is a [`Table`]: string keys mapped to [`Value`]s,
//! where a value may itself be a nested [`Value::Map`]. Leaves carry the type
//! their converter produced, so `"42"` read through an integer spec lands as
//! [`Value::Integer`], not as a string.
//!
//! `Value` serializes like the JSON it resembles, which is also how a
//! collected table is turned into a typed struct (see [`from_table`]).
//! Going the other way, [`to_value`] captures any `Serialize` type as a
//! `Value` without passing through JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, SerializeTuple, Serializer};

use crate::error::CollectError;

mod ser;

pub use ser::{ValueError, to_value};

/// A mapping from setting names to values. Nested sections are [`Value::Map`].
pub type Table = BTreeMap<String, Value>;

/// A single collected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Present but without a valid value (e.g. an integer that failed to parse).
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    /// Same shape as `List`, kept apart so templates can ask for either.
    Tuple(Vec<Value>),
    Map(Table),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Items of a `List` or a `Tuple`.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Table> {
        match self {
            Value::Map(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<Table> {
        match self {
            Value::Map(t) => Some(t),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Map(t)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Numbers that fit `i64` become `Integer`, everything else `Float`.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tuple(items) => {
                let mut tuple = serializer.serialize_tuple(items.len())?;
                for item in items {
                    tuple.serialize_element(item)?;
                }
                tuple.end()
            }
            Value::Map(table) => {
                let mut map = serializer.serialize_map(Some(table.len()))?;
                for (k, v) in table {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => write_items(f, "[", items, "]"),
            Value::Tuple(items) => write_items(f, "(", items, ")"),
            Value::Map(table) => {
                write!(f, "{{")?;
                for (i, (k, v)) in table.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

/// Deserialize a collected table into a typed config.
///
/// Lists and tuples both map to sequences, `Null` maps to `None`, nested
/// tables map to nested structs. Keys missing from the table fall back to
/// whatever `#[serde(default)]` the target declares.
pub fn from_table<T: DeserializeOwned>(table: &Table) -> Result<T, CollectError> {
    let json =
        serde_json::to_value(table).map_err(|source| CollectError::Deserialize { source })?;
    serde_json::from_value(json).map_err(|source| CollectError::Deserialize { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::table;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn json_numbers_prefer_integer() {
        assert_eq!(Value::from(json!(42)), Value::Integer(42));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn json_object_becomes_nested_map() {
        let t = table(json!({"db": {"host": "x", "port": 1}}));
        let db = t["db"].as_map().unwrap();
        assert_eq!(db["host"].as_str(), Some("x"));
        assert_eq!(db["port"].as_integer(), Some(1));
    }

    #[test]
    fn option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::String("a".into()));
    }

    #[test]
    fn tuple_serializes_as_sequence() {
        let v = Value::Tuple(vec!["a".into(), "b".into()]);
        assert_eq!(serde_json::to_value(&v).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn null_serializes_as_json_null() {
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), json!(null));
    }

    #[test]
    fn display_distinguishes_list_and_tuple() {
        let items = vec![Value::from("a"), Value::from(1)];
        assert_eq!(Value::List(items.clone()).to_string(), r#"["a", 1]"#);
        assert_eq!(Value::Tuple(items).to_string(), r#"("a", 1)"#);
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: Option<u16>,
        #[serde(default)]
        tags: Vec<String>,
        db: Db,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Db {
        url: String,
    }

    #[test]
    fn from_table_fills_typed_struct() {
        let mut t = table(json!({"host": "0.0.0.0", "db": {"url": "pg://"}}));
        t.insert("port".into(), Value::Null);
        t.insert(
            "tags".into(),
            Value::Tuple(vec!["a".into(), "b".into()]),
        );
        let server: Server = from_table(&t).unwrap();
        assert_eq!(
            server,
            Server {
                host: "0.0.0.0".into(),
                port: None,
                tags: vec!["a".into(), "b".into()],
                db: Db { url: "pg://".into() },
            }
        );
    }

    #[test]
    fn from_table_reports_type_mismatch() {
        let t = table(json!({"host": 1, "db": {"url": "x"}}));
        let err = from_table::<Server>(&t).unwrap_err();
        assert!(matches!(err, CollectError::Deserialize { .. }));
    }
}
