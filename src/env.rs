use serde_json::{Map, Value};

/// Build a settings layer from `{PREFIX}__*` environment variables.
///
/// `__` separates nesting levels, so `PROFILEGEN__LAYOUT__MATERIALS` sets
/// `layout.materials`. Segments are lowercased to match field names. Values
/// stay strings: every settings leaf is a path, a pattern or an extension.
pub fn env_to_layer(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Value {
    let needle = format!("{prefix}__");
    let mut layer = Map::new();
    for (key, value) in vars {
        match key.strip_prefix(&needle) {
            Some(rest) if !rest.is_empty() => set_path(&mut layer, rest, value),
            _ => {}
        }
    }
    Value::Object(layer)
}

fn set_path(layer: &mut Map<String, Value>, path: &str, value: String) {
    let mut segments: Vec<String> = path.split("__").map(str::to_lowercase).collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut node = layer;
    for segment in segments {
        let slot = node
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
        // a scalar already sits where a table is needed
        let Some(table) = slot.as_object_mut() else {
            return;
        };
        node = table;
    }
    node.insert(leaf, Value::String(value));
}
