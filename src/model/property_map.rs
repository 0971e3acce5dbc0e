//! PropertyMap: the key-value store on resources and concepts.

use std::collections::HashMap;
use super::Value;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;

/// True when `key` holds a non-null value. Absent and `Null` both count as
/// unset.
pub fn is_set(props: &PropertyMap, key: &str) -> bool {
    props.get(key).is_some_and(|v| !v.is_null())
}
