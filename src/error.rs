use thiserror::Error;

use crate::value::ValueError;

/// Boxed error returned by custom converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum CollectError {
    #[error("Converter for '{key}' failed: {source}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envspec::convert),
            help("custom converters should return Converted::Skip to omit a value")
        )
    )]
    Convert { key: String, source: BoxError },

    #[error("Spec for '{key}' has an empty write key")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envspec::empty_write_key),
            help("pass at least one path segment to Spec::write_to()")
        )
    )]
    EmptyWriteKey { key: String },

    #[error("Expected an object with named members, found {found}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envspec::not_an_object)))]
    NotAnObject { found: &'static str },

    #[error("Failed to inspect object: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envspec::serialize)))]
    Serialize(#[source] ValueError),

    #[error("Module not found: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envspec::module_not_found),
            help("register the module with Modules::register() or pass silent = true")
        )
    )]
    ModuleNotFound(String),

    #[error("Failed to deserialize collected config: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envspec::deserialize)))]
    Deserialize { source: serde_json::Error },
}
