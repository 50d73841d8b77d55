//! Collection against the real process environment.
//!
//! These tests mutate `std::env`, so they run serially.

use envspec::{Collector, Converted, Converter, Kind, Spec, Table, Value, from_environ};
use serde::Deserialize;
use serial_test::serial;

/// Sets variables for the duration of a test and removes them afterwards.
struct EnvGuard {
    keys: Vec<&'static str>,
}

impl EnvGuard {
    fn set(pairs: &[(&'static str, &str)]) -> Self {
        for (k, v) in pairs {
            // SAFETY: tests touching the environment are #[serial].
            unsafe { std::env::set_var(k, v) };
        }
        Self {
            keys: pairs.iter().map(|(k, _)| *k).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for k in &self.keys {
            // SAFETY: tests touching the environment are #[serial].
            unsafe { std::env::remove_var(k) };
        }
    }
}

fn template(json: serde_json::Value) -> Table {
    Value::from(json).into_map().unwrap()
}

#[test]
#[serial]
fn explicit_specs_from_process_env() {
    let _env = EnvGuard::set(&[("ENVSPEC_IT_PORT", "8080"), ("ENVSPEC_IT_HOST", "0.0.0.0")]);
    let config = from_environ([
        Spec::new("ENVSPEC_IT_PORT").write_to("port").convert(Kind::Integer),
        Spec::new("ENVSPEC_IT_HOST").write_to("host"),
        Spec::new("ENVSPEC_IT_UNSET").write_to("unset"),
    ])
    .unwrap();
    assert_eq!(config, template(serde_json::json!({"port": 8080, "host": "0.0.0.0"})));
}

#[test]
#[serial]
fn nested_template_with_prefix() {
    let _env = EnvGuard::set(&[
        ("ENVSPEC_IT_DB_HOST", "localhost"),
        ("ENVSPEC_IT_DB_PORT", "333"),
        ("ENVSPEC_IT_DEBUG", "t"),
    ]);
    let config = Collector::new()
        .by_defaults(template(serde_json::json!({
            "debug": false,
            "db": {"host": "", "port": 80, "options": {}}
        })))
        .nested(true)
        .prefix("ENVSPEC_IT_")
        .collect_environ()
        .unwrap();
    assert_eq!(
        config,
        template(serde_json::json!({
            "debug": true,
            "db": {"host": "localhost", "port": 333}
        }))
    );
}

#[test]
#[serial]
fn skipping_converter_leaves_key_out() {
    let _env = EnvGuard::set(&[("ENVSPEC_IT_MODE", "auto")]);
    let auto_means_unset = Converter::custom(|raw| {
        Ok(if raw == "auto" {
            Converted::Skip
        } else {
            Converted::value(raw)
        })
    });
    let config = from_environ([Spec::new("ENVSPEC_IT_MODE").convert(auto_means_unset)]).unwrap();
    assert!(config.is_empty());
}

#[cfg(unix)]
#[test]
#[serial]
fn non_unicode_value_is_decoded_lossily() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let key = "ENVSPEC_IT_LATIN1";
    // SAFETY: tests touching the environment are #[serial].
    unsafe { std::env::set_var(key, OsStr::from_bytes(b"caf\xe9")) };
    let _env = EnvGuard { keys: vec![key] };
    let _ok = EnvGuard::set(&[("ENVSPEC_IT_NEXT", "1")]);

    let config = from_environ([
        Spec::new(key).write_to("name"),
        Spec::new("ENVSPEC_IT_NEXT").write_to("next").convert(Kind::Integer),
    ])
    .unwrap();
    assert_eq!(config["name"], Value::from("caf\u{fffd}"));
    assert_eq!(config["next"], Value::Integer(1));
}

#[derive(Deserialize, Debug, PartialEq)]
struct AppConfig {
    #[serde(default = "default_workers")]
    workers: i64,
    tags: Vec<String>,
    db: DbConfig,
}

#[derive(Deserialize, Debug, PartialEq)]
struct DbConfig {
    host: String,
    port: Option<u16>,
}

fn default_workers() -> i64 {
    4
}

#[test]
#[serial]
fn collected_table_into_typed_struct() {
    let _env = EnvGuard::set(&[
        ("ENVSPEC_IT_TAGS", "a,b"),
        ("ENVSPEC_IT_DB_HOST", "db"),
        ("ENVSPEC_IT_DB_PORT", "not-a-number"),
    ]);
    let config = Collector::new()
        .by_defaults(template(serde_json::json!({
            "workers": 1,
            "tags": [],
            "db": {"host": "", "port": 0}
        })))
        .nested(true)
        .prefix("ENVSPEC_IT_")
        .collect_environ()
        .unwrap();
    let app: AppConfig = envspec::from_table(&config).unwrap();
    assert_eq!(
        app,
        AppConfig {
            workers: 4,
            tags: vec!["a".into(), "b".into()],
            db: DbConfig {
                host: "db".into(),
                port: None,
            },
        }
    );
}

#[cfg(feature = "url")]
#[test]
#[serial]
fn url_components_from_one_variable() {
    use envspec::convert::url;

    let _env = EnvGuard::set(&[("ENVSPEC_IT_REDIS_URL", "redis://cache.local/0")]);
    let config = from_environ([
        Spec::new("ENVSPEC_IT_REDIS_URL")
            .write_to(["redis", "host"])
            .convert(Converter::custom(url::host)),
        Spec::new("ENVSPEC_IT_REDIS_URL")
            .write_to(["redis", "port"])
            .convert(Converter::custom(url::port)),
    ])
    .unwrap();
    assert_eq!(config, template(serde_json::json!({"redis": {"host": "cache.local"}})));
}
