//! The read → convert → write rule behind every collected setting.
//!
//! A [`Spec`] names one source key, an optional converter, and where the
//! result goes in the output table:
//!
//! ```ignore
//! Spec::new("DB_PORT").convert(Kind::Integer).write_to(["db", "port"])
//! ```
//!
//! reads `DB_PORT`, parses it as an integer, and produces
//! `{db = {port = 5432}}`. Specs hold no per-call state and can be reused
//! across sources.

use crate::convert::{Converted, Converter};
use crate::error::CollectError;
use crate::source::Source;
use crate::value::{Table, Value};

/// Where a spec writes its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteKey {
    /// A single top-level key.
    Key(String),
    /// A path into nested tables, outermost first.
    Path(Vec<String>),
}

impl WriteKey {
    pub fn segments(&self) -> Vec<&str> {
        match self {
            WriteKey::Key(k) => vec![k.as_str()],
            WriteKey::Path(p) => p.iter().map(String::as_str).collect(),
        }
    }

    /// Nest this key one level deeper under `head`.
    ///
    /// `"host"` under `"db"` becomes `["db", "host"]`.
    pub fn prepend(self, head: &str) -> WriteKey {
        let mut path = vec![head.to_string()];
        match self {
            WriteKey::Key(k) => path.push(k),
            WriteKey::Path(p) => path.extend(p),
        }
        WriteKey::Path(path)
    }
}

impl From<&str> for WriteKey {
    fn from(k: &str) -> Self {
        WriteKey::Key(k.to_string())
    }
}

impl From<String> for WriteKey {
    fn from(k: String) -> Self {
        WriteKey::Key(k)
    }
}

impl From<Vec<String>> for WriteKey {
    fn from(p: Vec<String>) -> Self {
        WriteKey::Path(p)
    }
}

impl From<&[&str]> for WriteKey {
    fn from(p: &[&str]) -> Self {
        WriteKey::Path(p.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for WriteKey {
    fn from(p: [&str; N]) -> Self {
        WriteKey::Path(p.iter().map(|s| s.to_string()).collect())
    }
}

/// What [`Spec::read`] found.
#[derive(Debug, Clone, PartialEq)]
pub enum Read {
    Value(Value),
    /// The key is not in the source.
    Absent,
    /// The converter asked for the setting to be ignored.
    Skip,
}

/// A single declarative rule: read `read_key`, convert, write to `write_key`.
#[derive(Debug, Clone)]
pub struct Spec {
    read_key: String,
    write_key: Option<WriteKey>,
    converter: Option<Converter>,
}

impl Spec {
    /// A spec that copies `read_key` verbatim to the same key.
    pub fn new(read_key: impl Into<String>) -> Self {
        Self {
            read_key: read_key.into(),
            write_key: None,
            converter: None,
        }
    }

    /// Write to a different key or a nested path (default: the read key).
    pub fn write_to(mut self, key: impl Into<WriteKey>) -> Self {
        self.write_key = Some(key.into());
        self
    }

    /// Convert the raw string before writing it.
    pub fn convert(mut self, converter: impl Into<Converter>) -> Self {
        self.converter = Some(converter.into());
        self
    }

    pub fn read_key(&self) -> &str {
        &self.read_key
    }

    /// The effective output key: the configured one, or the read key.
    pub fn write_key(&self) -> WriteKey {
        self.write_key
            .clone()
            .unwrap_or_else(|| WriteKey::Key(self.read_key.clone()))
    }

    pub fn converter(&self) -> Option<&Converter> {
        self.converter.as_ref()
    }

    /// Move the output one level deeper under `head`, keeping the read key.
    pub(crate) fn nest_under(mut self, head: &str) -> Self {
        self.write_key = Some(self.write_key().prepend(head));
        self
    }

    /// Look up and convert this spec's value.
    ///
    /// A missing key is [`Read::Absent`] and a skipping converter is
    /// [`Read::Skip`]; neither is an error. Converter failures are.
    pub fn read<S: Source + ?Sized>(&self, source: &S) -> Result<Read, CollectError> {
        let Some(raw) = source.get(&self.read_key)? else {
            return Ok(Read::Absent);
        };
        let Some(converter) = &self.converter else {
            return Ok(Read::Value(Value::String(raw)));
        };
        match converter.apply(&raw) {
            Ok(Converted::Value(v)) => Ok(Read::Value(v)),
            Ok(Converted::Skip) => Ok(Read::Skip),
            Err(source) => Err(CollectError::Convert {
                key: self.read_key.clone(),
                source,
            }),
        }
    }

    /// Wrap `value` in a table holding only this spec's output path.
    ///
    /// `["db", "host"]` with `"x"` gives `{db = {host = "x"}}`.
    pub fn write(&self, value: Value) -> Result<Table, CollectError> {
        let write_key = self.write_key();
        let segments = write_key.segments();
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(CollectError::EmptyWriteKey {
                key: self.read_key.clone(),
            });
        };

        let mut table = Table::new();
        table.insert(leaf.to_string(), value);
        for parent in parents.iter().rev() {
            let mut outer = Table::new();
            outer.insert(parent.to_string(), Value::Map(table));
            table = outer;
        }
        Ok(table)
    }
}
