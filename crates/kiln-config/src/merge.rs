//! Field-by-field configuration merging.
//!
//! Policy, applied recursively: a field present in the override replaces the
//! base value, unless both sides hold a structured mapping, in which case the
//! two mappings are merged. Lists are replaced wholesale. Fields absent from
//! the override leave the base untouched, so `merge({}, x) == x`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ConfigError, Result, value_kind};
use crate::node::ConfigNode;

/// Merge an override into `self`, override winning per leaf.
pub trait Merge {
    fn merge(&mut self, other: Self) -> Result<()>;
}

/// Merge `overrides` on top of `base` and return the result.
///
/// ```
/// use kiln_config::{ConfigNode, merge};
///
/// let base = ConfigNode { minify: Some(false), timing: Some(true), ..Default::default() };
/// let overrides = ConfigNode { minify: Some(true), ..Default::default() };
///
/// let merged = merge(base, overrides).unwrap();
/// assert_eq!(merged.minify, Some(true));
/// assert_eq!(merged.timing, Some(true));
/// ```
pub fn merge(mut base: ConfigNode, overrides: ConfigNode) -> Result<ConfigNode> {
    base.merge(overrides)?;
    Ok(base)
}

impl<V> Merge for IndexMap<String, V> {
    fn merge(&mut self, other: Self) -> Result<()> {
        // Existing keys keep their position; new keys are appended.
        for (key, value) in other {
            self.insert(key, value);
        }
        Ok(())
    }
}

pub(crate) fn replace<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

pub(crate) fn merge_nested<T: Merge>(slot: &mut Option<T>, value: Option<T>) -> Result<()> {
    let Some(update) = value else {
        return Ok(());
    };
    if let Some(base) = slot.as_mut() {
        base.merge(update)
    } else {
        *slot = Some(update);
        Ok(())
    }
}

/// Merge free-form tables (used for `runtime_config`).
///
/// A table on one side and a non-table on the other is a shape mismatch and
/// fails with [`ConfigError::MergeTypeMismatch`]; `null` on either side is
/// replaced without complaint.
pub fn merge_values(target: &mut Value, update: Value, path: &str) -> Result<()> {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                let child_path = format!("{path}.{key}");
                match target_map.get_mut(&key) {
                    Some(slot) => merge_values(slot, value, &child_path)?,
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (target_slot, update) if target_slot.is_null() || update.is_null() => {
            *target_slot = update;
            Ok(())
        }
        (target_slot, update) if target_slot.is_object() || update.is_object() => {
            Err(ConfigError::MergeTypeMismatch {
                field: path.to_string(),
                expected: value_kind(target_slot),
                found: value_kind(&update),
            })
        }
        (target_slot, update) => {
            *target_slot = update;
            Ok(())
        }
    }
}
