//! Derive specs from an example table instead of writing them by hand.
//!
//! Each template entry `(key, example)` yields a spec reading
//! `{PREFIX}{KEY}` and writing `key`, converted according to
//! [`Kind::of(example)`](Kind::of). With `nested` enabled, map-valued
//! entries are recursed into instead, compounding the prefix:
//!
//! | Template | Env var | Output |
//! |----------|---------|--------|
//! | `{port = 80}` | `PORT` | `port` (integer) |
//! | `{db = {host = ""}}` | `DB_HOST` | `db.host` (string) |
//! | `{db = {pool = {size = 1}}}` | `DB_POOL_SIZE` | `db.pool.size` (integer) |
//!
//! Without `nested`, `{db = {...}}` is a single `DB` spec parsed as a
//! `k=v,...` dict.

use std::collections::BTreeMap;

use crate::convert::Kind;
use crate::spec::Spec;
use crate::value::{Table, Value};

/// Build one spec per template entry, keyed by the env var it reads.
///
/// Entries whose key starts with `_` are ignored. The returned map lets a
/// caller replace or drop individual specs before collecting.
pub fn specs_from_table(template: &Table, prefix: &str, nested: bool) -> BTreeMap<String, Spec> {
    let mut specs = BTreeMap::new();

    for (key, example) in template {
        if key.starts_with('_') {
            continue;
        }

        match example {
            Value::Map(inner) if nested => {
                let inner_prefix = format!("{prefix}{}_", key.to_uppercase());
                for (read_key, spec) in specs_from_table(inner, &inner_prefix, true) {
                    specs.insert(read_key, spec.nest_under(key));
                }
            }
            _ => {
                let read_key = format!("{prefix}{}", key.to_uppercase());
                let kind = Kind::of(example);
                tracing::trace!(read_key = %read_key, write_key = %key, ?kind, "generated spec");
                let spec = Spec::new(read_key.clone())
                    .write_to(key.as_str())
                    .convert(kind);
                specs.insert(read_key, spec);
            }
        }
    }

    specs
}
