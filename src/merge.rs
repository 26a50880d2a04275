//! Deep merge of structured configuration values.
//!
//! Objects merge key by key: if both sides hold an object for the same key the
//! merge recurses, otherwise the overlay's value wins. Key order follows the
//! base, with keys new to the overlay appended, so element order in emitted
//! XML stays stable.
//!
//! Arrays have two modes. [`ArrayMerge::Positional`] merges by index: the
//! overlapping indices are merged recursively and the overlay's surplus is
//! appended. This is what fragment composition uses, and it means two lists of
//! named entries are paired up by position, not by name. A later layer that
//! lists only `Heated Bed` will merge it into whatever sits at index 0. The
//! composer repairs the one collection where this matters (see
//! [`fold_temperature_controllers`](crate::compose::fold_temperature_controllers)).
//!
//! An object merged onto an array is appended to it. Compact XML stores a
//! lone element as an object and repeated ones as an array, so a fragment
//! that carries a single `temperatureController` adds to the list instead of
//! wiping it.
//!
//! [`ArrayMerge::Replace`] lets the overlay's array replace the base's
//! outright, which is what tool settings want.

use serde_json::Value;

/// How arrays present on both sides of a merge are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrayMerge {
    /// Merge overlapping indices recursively, append the overlay's remainder.
    #[default]
    Positional,
    /// The overlay's array wins.
    Replace,
}

/// Deep-merge `overlay` on top of `base`.
pub fn deep_merge(mut base: Value, overlay: Value, arrays: ArrayMerge) -> Value {
    merge_into(&mut base, overlay, arrays);
    base
}

/// In-place form of [`deep_merge`].
pub fn merge_into(base: &mut Value, overlay: Value, arrays: ArrayMerge) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_val) => merge_into(base_val, overlay_val, arrays),
                    None => {
                        base_map.insert(key, overlay_val);
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items))
            if arrays == ArrayMerge::Positional =>
        {
            for (i, overlay_item) in overlay_items.into_iter().enumerate() {
                match base_items.get_mut(i) {
                    Some(base_item) => merge_into(base_item, overlay_item, arrays),
                    None => base_items.push(overlay_item),
                }
            }
        }
        (Value::Array(base_items), overlay_val @ Value::Object(_))
            if arrays == ArrayMerge::Positional =>
        {
            base_items.push(overlay_val);
        }
        (slot, overlay_val) => *slot = overlay_val,
    }
}

/// Merge every layer in order, left to right, starting from an empty object.
pub fn merge_all<I>(layers: I, arrays: ArrayMerge) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Object(Default::default()), |acc, layer| {
            deep_merge(acc, layer, arrays)
        })
}
