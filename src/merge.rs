use crate::value::{Table, Value};

/// Fold `overlay` into `base` and return the combined table.
///
/// Keys holding a map on both sides are merged recursively, so sibling
/// settings survive. Any other collision is won by `overlay`, including a
/// scalar replacing a map or a map replacing a scalar.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, incoming) in overlay {
        let merged = match (base.remove(&key), incoming) {
            (Some(Value::Map(existing)), Value::Map(nested)) => {
                Value::Map(deep_merge(existing, nested))
            }
            (_, incoming) => incoming,
        };
        base.insert(key, merged);
    }
    base
}
