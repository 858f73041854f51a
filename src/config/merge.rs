//! Field-by-field merging of configuration tiers.
//!
//! Objects merge recursively; anything else in a higher tier replaces the
//! lower tier's value. A `null` leaves the lower value in place.

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// ```
/// use serde_json::json;
/// use timesheet_jiffy::config::deep_merge;
///
/// let base = json!({ "jiffy": { "user_id": 1, "zone": "America/Sao_Paulo" } });
/// let overlay = json!({ "jiffy": { "zone": "Europe/Lisbon" } });
/// assert_eq!(
///     deep_merge(base, overlay),
///     json!({ "jiffy": { "user_id": 1, "zone": "Europe/Lisbon" } })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers lowest-first.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}
