//! JSON encoding for structured request bodies.
//!
//! # Design
//! serde_json produces the encoding. With `omit_empty` set, object members
//! holding a default value are dropped before the bytes are written: `null`,
//! `false`, numeric zero, `""`, `[]` and `{}`. Pruning is recursive, so a
//! nested object that ends up with no members is dropped from its parent as
//! well. Array elements are never removed (that would shift positions), but
//! objects inside arrays are pruned. Member order follows serde's field
//! order.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Encoder policy for structured bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Leave out object members that hold an empty or default value.
    pub omit_empty: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { omit_empty: true }
    }
}

/// Encode `value` as compact JSON.
pub fn to_vec<T: Serialize + ?Sized>(value: &T, options: SerializeOptions) -> Result<Vec<u8>, Error> {
    if !options.omit_empty {
        return Ok(serde_json::to_vec(value)?);
    }
    let mut tree = serde_json::to_value(value)?;
    prune(&mut tree);
    Ok(serde_json::to_vec(&tree)?)
}

fn prune(value: &mut Value) {
    match value {
        Value::Object(members) => {
            for member in members.values_mut() {
                prune(member);
            }
            members.retain(|_, member| !is_empty(member));
        }
        Value::Array(items) => items.iter_mut().for_each(prune),
        _ => {}
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(members) => members.is_empty(),
    }
}
