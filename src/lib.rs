//! Collect structured configuration from environment variables with small,
//! declarative read/convert/write rules.
//!
//! Environment variables are a flat bag of strings. Applications want typed,
//! nested settings. envspec bridges the two with [`Spec`]s: each one reads a
//! key, converts the raw string, and writes the result to a (possibly nested)
//! key path. The outputs of all specs are deep-merged into one [`Table`].
//!
//! ```ignore
//! use envspec::{Collector, Kind, Spec};
//!
//! let config = Collector::new()
//!     .spec(Spec::new("DB_HOST").write_to(["db", "host"]))
//!     .spec(Spec::new("DB_PORT").write_to(["db", "port"]).convert(Kind::Integer))
//!     .collect_environ()?;
//! // {db = {host = "localhost", port = 5432}}
//! ```
//!
//! # Specs from a template
//!
//! Writing one spec per setting gets old quickly. Hand [`Collector::by_defaults`]
//! an example table instead and specs are derived from it: each key is
//! upper-cased to find its env var, and the example value's type picks the
//! converter.
//!
//! ```ignore
//! let template = table(json!({"debug": false, "workers": 4, "db": {"host": "", "port": 5432}}));
//! let config = Collector::new().by_defaults(template).nested(true).collect_environ()?;
//! ```
//!
//! | Env var | Key | Converted with |
//! |---------|-----|----------------|
//! | `DEBUG` | `debug` | [`convert::bool`] |
//! | `WORKERS` | `workers` | [`convert::int`] |
//! | `DB_HOST` | `db.host` | identity |
//! | `DB_PORT` | `db.port` | [`convert::int`] |
//!
//! The template is an example, not a set of defaults: variables that are not
//! set are simply missing from the result, so the caller decides how to fill
//! them (e.g. by merging the result over its own defaults with
//! [`deep_merge`]).
//!
//! Explicit specs and a template can be combined. Derived specs run first;
//! an explicit spec reading the same variable replaces the derived one.
//!
//! # Absent, skipped, and null
//!
//! Three outcomes look alike but are kept apart:
//!
//! - **Absent**: the variable is not set. The spec contributes nothing.
//! - **Skip**: a converter returned [`Converted::Skip`] after looking at the
//!   value (a URL without a port, say). The spec contributes nothing.
//! - **Null**: [`convert::int`] could not parse the value. The key *is*
//!   written, with [`Value::Null`].
//!
//! Falsy values (`false`, `0`, `""`, `[]`) are ordinary values and are always
//! written. Genuine converter errors abort collection with
//! [`CollectError::Convert`].
//!
//! # Custom converters
//!
//! Any `Fn(&str) -> Result<Converted, BoxError>` works as a converter via
//! [`Converter::custom`]. With the `url` Cargo feature, the [`convert::url`]
//! module ships converters that extract a single component from a
//! connection string.
//!
//! # Objects and modules
//!
//! [`from_object`] gathers the members of anything that serializes to a map,
//! keeping only `UPPER_CASE` names by default, and never `_private` ones.
//! [`from_module`] does the same for an object registered by name in
//! [`Modules`], optionally tolerating unknown names.
//!
//! # Typed configs
//!
//! A collected table deserializes into any serde struct with
//! [`from_table`]:
//!
//! ```ignore
//! let server: ServerConfig = envspec::from_table(&config)?;
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`CollectError`]. With the `rich-errors`
//! feature it also implements `miette::Diagnostic`.

pub mod convert;
pub mod error;
pub mod value;

mod collect;
mod generate;
pub(crate) mod merge;
mod source;
mod spec;

#[cfg(test)]
mod fixtures;

pub use collect::{Collector, Modules, ObjectOptions, from_environ, from_module, from_object};
pub use convert::{Converted, Converter, Kind};
pub use error::{BoxError, CollectError};
pub use generate::specs_from_table;
pub use merge::deep_merge;
pub use source::{ProcessEnv, Source};
pub use spec::{Read, Spec, WriteKey};
pub use value::{Table, Value, from_table};
