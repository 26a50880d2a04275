//! Convert dotted-key overrides into a nested settings layer.
//!
//! Each `("layout.materials", Value)` pair is expanded into the nested object
//! structure needed for deep-merge with the other settings layers.

use serde_json::{Map, Value};

/// Convert dotted-key overrides into a nested object.
///
/// `("layout.materials", "m/*.json")` becomes `{"layout": {"materials": "m/*.json"}}`
///
/// If multiple entries target the same key, the last one wins. An entry whose
/// path runs through an existing scalar replaces that scalar with an object.
pub fn overrides_to_layer(entries: &[(String, Value)]) -> Value {
    let mut root = Map::new();
    for (dotted_key, value) in entries {
        set_nested(&mut root, dotted_key, value.clone());
    }
    Value::Object(root)
}

fn set_nested(root: &mut Map<String, Value>, dotted_key: &str, value: Value) {
    let mut segments: Vec<&str> = dotted_key.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let slot = current
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made an object"),
        };
    }

    current.insert(leaf.to_string(), value);
}
