//! Collectors: run specs against a source, or gather an object's members.
//!
//! [`Collector`] is the environment pipeline:
//!
//! 1. Generate specs from the template (if any), ordered by env var name
//! 2. Append explicit specs; one reading the same key replaces the generated one
//! 3. Read each spec from the source, skipping absent and skipped values
//! 4. Deep-merge each spec's output into the result
//! 5. Post-process keys (`key_lower`)
//!
//! [`from_object`] and [`from_module`] collect named members verbatim, with
//! no conversion, and share the same post-processing step.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CollectError;
use crate::generate::specs_from_table;
use crate::merge::deep_merge;
use crate::source::{ProcessEnv, Source};
use crate::spec::{Read, Spec};
use crate::value::{Table, Value, to_value};

/// Builder for collecting configuration from environment-like sources.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    specs: Vec<Spec>,
    defaults: Option<Table>,
    nested: bool,
    prefix: String,
    key_lower: bool,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one explicit spec. Specs run in the order they are added.
    pub fn spec(mut self, spec: Spec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Add several explicit specs.
    pub fn specs(mut self, specs: impl IntoIterator<Item = Spec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Derive specs from an example table (see [`specs_from_table`]).
    ///
    /// Can be combined with explicit specs; an explicit spec reading the
    /// same env var replaces the derived one.
    pub fn by_defaults(mut self, template: Table) -> Self {
        self.defaults = Some(template);
        self
    }

    /// Recurse into map-valued template entries (default: `false`).
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Prefix for env vars derived from the template, e.g. `"MYAPP_"`.
    /// Explicit specs are not affected.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Lower-case top-level result keys (default: `false`).
    pub fn key_lower(mut self, key_lower: bool) -> Self {
        self.key_lower = key_lower;
        self
    }

    /// Collect from the process environment.
    pub fn collect_environ(&self) -> Result<Table, CollectError> {
        self.collect_from(&ProcessEnv)
    }

    /// Collect from any flat source.
    pub fn collect_from<S: Source + ?Sized>(&self, source: &S) -> Result<Table, CollectError> {
        let mut generated = match &self.defaults {
            Some(template) => specs_from_table(template, &self.prefix, self.nested),
            None => BTreeMap::new(),
        };
        for spec in &self.specs {
            generated.remove(spec.read_key());
        }

        let mut result = Table::new();
        for spec in generated.values().chain(&self.specs) {
            let value = match spec.read(source)? {
                Read::Value(v) => v,
                Read::Absent => {
                    tracing::debug!(read_key = spec.read_key(), reason = "absent", "omitting spec");
                    continue;
                }
                Read::Skip => {
                    tracing::debug!(read_key = spec.read_key(), reason = "skip", "omitting spec");
                    continue;
                }
            };
            result = deep_merge(result, spec.write(value)?);
        }

        Ok(postprocess(result, self.key_lower))
    }
}

/// Collect `specs` from the process environment.
pub fn from_environ(specs: impl IntoIterator<Item = Spec>) -> Result<Table, CollectError> {
    Collector::new().specs(specs).collect_environ()
}

/// Options for [`from_object`] and [`from_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectOptions {
    /// Keep only all-uppercase names like `DEBUG` or `MAX_SIZE` (default: `true`).
    pub upper_only: bool,
    /// Lower-case top-level result keys (default: `false`).
    pub key_lower: bool,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            upper_only: true,
            key_lower: false,
        }
    }
}

/// Collect the public members of `obj` verbatim.
///
/// An object is anything that serializes to a map: a struct's fields, a
/// `HashMap`, a [`Table`]. Names starting with `_` are always dropped.
pub fn from_object<T: Serialize + ?Sized>(
    obj: &T,
    options: &ObjectOptions,
) -> Result<Table, CollectError> {
    let mut result = Table::new();
    for (name, value) in members(obj)? {
        if options.upper_only && !is_upper(&name) {
            continue;
        }
        if name.starts_with('_') {
            continue;
        }
        tracing::trace!(name = %name, "collected member");
        result.insert(name, value);
    }
    Ok(postprocess(result, options.key_lower))
}

fn members<T: Serialize + ?Sized>(obj: &T) -> Result<Table, CollectError> {
    match to_value(obj).map_err(CollectError::Serialize)? {
        Value::Map(table) => Ok(table),
        other => Err(CollectError::NotAnObject {
            found: other.type_name(),
        }),
    }
}

/// At least one cased character, and no lower-case ones.
fn is_upper(name: &str) -> bool {
    let mut cased = false;
    for c in name.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Named objects that [`from_module`] can resolve.
#[derive(Debug, Clone, Default)]
pub struct Modules {
    entries: BTreeMap<String, Table>,
}

impl Modules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `obj`'s members under `name`, replacing any earlier entry.
    pub fn register<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        obj: &T,
    ) -> Result<(), CollectError> {
        let table = members(obj)?;
        self.entries.insert(name.to_string(), table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// Resolve `name` in `modules` and collect it with [`from_object`].
///
/// An unknown name gives an empty table when `silent`, and
/// [`CollectError::ModuleNotFound`] otherwise.
pub fn from_module(
    modules: &Modules,
    name: &str,
    silent: bool,
    options: &ObjectOptions,
) -> Result<Table, CollectError> {
    match modules.get(name) {
        Some(table) => from_object(table, options),
        None if silent => {
            tracing::debug!(module = name, "module not found, returning empty config");
            Ok(Table::new())
        }
        None => Err(CollectError::ModuleNotFound(name.to_string())),
    }
}

/// Lower-cases top-level keys only; nested tables are left as they are.
fn postprocess(table: Table, key_lower: bool) -> Table {
    if !key_lower {
        return table;
    }
    table
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect()
}
