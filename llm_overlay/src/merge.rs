//! Pairwise structural merge of spec documents.
//!
//! Merging folds an ordered list of [`ServiceSpec`]s left to right; the
//! right-hand document always wins on conflicts. Each override is first
//! serialised — because every schema field skips its zero value, the
//! serialised form contains only the fields the override explicitly set and
//! is therefore the effective patch against a zero-valued document. The
//! patch is applied to the accumulator under the declared per-field merge
//! policies, and the accumulator is parsed back into the canonical schema
//! once at the end of the fold.

use serde_json::{Map, Value};
use tracing::debug;

use crate::result_ext::MalformedExt;
use crate::spec::strategy::{OBJECT, SERVICE_SPEC, Strategy};
use crate::spec::ServiceSpec;
use crate::ResolveResult;

/// Fold an ordered list of specs into one.
///
/// Merging a single spec returns it unchanged; an empty list yields the
/// zero spec. N-way merges equal iterated pairwise folding.
///
/// # Errors
///
/// Returns [`crate::ResolveError::Malformed`] when a document fails to
/// (de)serialise.
pub fn merge_specs<I>(specs: I) -> ResolveResult<ServiceSpec>
where
    I: IntoIterator<Item = ServiceSpec>,
{
    let mut iter = specs.into_iter();
    let Some(first) = iter.next() else {
        return Ok(ServiceSpec::default());
    };

    let mut acc = serde_json::to_value(&first).at_stage("serialise base spec")?;
    for (index, overlay) in iter.enumerate() {
        let patch = serde_json::to_value(&overlay).at_stage("serialise override spec")?;
        debug!(index = index + 1, patch = %patch, "applying overlay patch");
        apply(&SERVICE_SPEC, &mut acc, patch);
    }
    serde_json::from_value(acc).at_stage("parse merged spec")
}

/// Apply `patch` onto `base` under `strategy`.
///
/// `patch` values of `null` are ignored everywhere: an unset field never
/// erases accumulator state.
fn apply(strategy: &Strategy, base: &mut Value, patch: Value) {
    if patch.is_null() {
        return;
    }
    match strategy {
        Strategy::Scalar => *base = patch,
        Strategy::Object(_) => merge_object(strategy, base, patch),
        Strategy::Map(value_strategy) => merge_map(value_strategy, base, patch),
        Strategy::KeyedList { key, element } => merge_keyed_list(key, element, base, patch),
        Strategy::ReplaceList => {
            let replace = match &patch {
                Value::Array(items) => !items.is_empty(),
                _ => true,
            };
            if replace {
                *base = patch;
            }
        }
    }
}

/// Structural fallback for fields without a declared policy.
fn structural(patch: &Value) -> &'static Strategy {
    match patch {
        Value::Object(_) => &OBJECT,
        Value::Array(_) => &Strategy::ReplaceList,
        _ => &Strategy::Scalar,
    }
}

fn merge_object(strategy: &Strategy, base: &mut Value, patch: Value) {
    let Value::Object(entries) = patch else {
        *base = patch;
        return;
    };
    ensure_object(base);
    let Some(target) = base.as_object_mut() else {
        return;
    };
    for (key, value) in entries {
        if value.is_null() {
            continue;
        }
        let field_strategy = strategy.field(&key).unwrap_or_else(|| structural(&value));
        match target.get_mut(&key) {
            Some(existing) => apply(field_strategy, existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

fn merge_map(value_strategy: &Strategy, base: &mut Value, patch: Value) {
    let Value::Object(entries) = patch else {
        *base = patch;
        return;
    };
    ensure_object(base);
    let Some(target) = base.as_object_mut() else {
        return;
    };
    for (key, value) in entries {
        if value.is_null() {
            continue;
        }
        match target.get_mut(&key) {
            Some(existing) => apply(value_strategy, existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

fn merge_keyed_list(key: &str, element: &Strategy, base: &mut Value, patch: Value) {
    let Value::Array(items) = patch else {
        *base = patch;
        return;
    };
    if !base.is_array() {
        *base = Value::Array(Vec::new());
    }
    let Some(target) = base.as_array_mut() else {
        return;
    };
    for item in items {
        let position = item
            .get(key)
            .filter(|k| !k.is_null())
            .and_then(|k| target.iter().position(|b| b.get(key) == Some(k)));
        match position.and_then(|i| target.get_mut(i)) {
            Some(existing) => apply(element, existing, item),
            // Unmatched keys (or elements without the key field; the final
            // schema parse rejects genuinely invalid ones) append after the
            // preserved base order.
            None => target.push(item),
        }
    }
}

fn ensure_object(base: &mut Value) {
    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
}
