//! Flat string-keyed sources that specs read from.
//!
//! The process environment is the canonical source, but anything that can
//! answer "what is the value of `KEY`" works, so tests and callers can pass
//! synthetic data instead of `std::env::vars()`.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::CollectError;

/// A read-only mapping from string keys to string values.
pub trait Source {
    /// `Ok(None)` when the key is not set.
    fn get(&self, key: &str) -> Result<Option<String>, CollectError>;
}

/// The current process environment, read on every lookup.
///
/// Values that are not valid UTF-8 are decoded lossily, with invalid
/// sequences replaced by U+FFFD, so one stray variable never aborts a
/// collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, key: &str) -> Result<Option<String>, CollectError> {
        let Some(raw) = std::env::var_os(key) else {
            return Ok(None);
        };
        match raw.into_string() {
            Ok(value) => Ok(Some(value)),
            Err(raw) => {
                tracing::warn!(key, "environment value is not valid unicode, decoding lossily");
                Ok(Some(raw.to_string_lossy().into_owned()))
            }
        }
    }
}

impl<H: BuildHasher> Source for HashMap<String, String, H> {
    fn get(&self, key: &str) -> Result<Option<String>, CollectError> {
        Ok(HashMap::get(self, key).cloned())
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Result<Option<String>, CollectError> {
        Ok(BTreeMap::get(self, key).cloned())
    }
}

/// Pairs as produced by `std::env::vars()`. If a key repeats, the last pair wins.
impl Source for [(String, String)] {
    fn get(&self, key: &str) -> Result<Option<String>, CollectError> {
        Ok(self
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }
}

impl Source for Vec<(String, String)> {
    fn get(&self, key: &str) -> Result<Option<String>, CollectError> {
        Source::get(self.as_slice(), key)
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn get(&self, key: &str) -> Result<Option<String>, CollectError> {
        (**self).get(key)
    }
}
