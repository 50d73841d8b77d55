#[cfg(test)]
pub mod test {
    use std::collections::HashMap;

    use serde::Serialize;

    use crate::value::{Table, Value};

    /// Build a `Table` from a JSON object literal.
    pub fn table(json: serde_json::Value) -> Table {
        match Value::from(json) {
            Value::Map(t) => t,
            other => panic!("fixture is not an object: {other}"),
        }
    }

    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// A synthetic environment.
    pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        vars(pairs).into_iter().collect()
    }

    // -- Fixture for object collection tests -----------------------------------

    /// Members with every naming style `from_object` has to sort through.
    #[derive(Serialize, Debug)]
    pub struct Settings {
        #[serde(rename = "FOO")]
        pub upper: i64,
        #[serde(rename = "foo")]
        pub lower: i64,
        #[serde(rename = "_FOO")]
        pub private_upper: i64,
        #[serde(rename = "_foo")]
        pub private_lower: i64,
        #[serde(rename = "MAX_SIZE")]
        pub max_size: i64,
        #[serde(rename = "Mixed")]
        pub mixed: i64,
    }

    impl Settings {
        pub fn sample() -> Self {
            Self {
                upper: 1,
                lower: 2,
                private_upper: 3,
                private_lower: 4,
                max_size: 10,
                mixed: 5,
            }
        }
    }

    #[test]
    fn table_fixture_builds_nested_maps() {
        let t = table(serde_json::json!({"a": {"b": 1}}));
        assert_eq!(t["a"].as_map().unwrap()["b"], Value::Integer(1));
    }
}
