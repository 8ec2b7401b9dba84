//! Merge engine: folds ordered layers into one effective configuration
//!
//! Layers are applied strictly in input order; for any path two layers both
//! select, the later layer wins field-by-field. The per-field policy:
//!
//! - `languageOptions`: a top-level key whose value is a mapping (the
//!   globals table in particular) merges key-wise, with the later layer's
//!   per-key value overriding; any other value replaces wholesale.
//! - `rules`: a later directive fully replaces the earlier one for the same
//!   rule identifier, options included. Replacing a severity without options
//!   resets the options to empty.
//!
//! Every resolution starts from a fresh empty accumulator, so the result
//! depends only on the layer list's content and the queried path.

use crate::glob::normalize_path;
use crate::layer::{LanguageOptions, Layer, RuleDirective};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// The fully merged configuration applicable to one specific file path
///
/// Derived, cached, and never mutated after creation; a cached instance is
/// discarded only when the whole layer list is reloaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    /// Whether the path is globally excluded from all processing
    pub ignored: bool,

    /// Merged language options
    pub language_options: LanguageOptions,

    /// Merged rule directives
    pub rules: IndexMap<String, RuleDirective>,
}

impl EffectiveConfig {
    /// The configuration reported for a globally excluded path
    pub fn ignored_path() -> Self {
        Self {
            ignored: true,
            ..Self::default()
        }
    }
}

/// Fold the layers selecting `path` into one [`EffectiveConfig`]
///
/// A path matched by zero layers yields an empty configuration, not an
/// error. Ignore status is decided ahead of merging (see
/// [`crate::ignore::is_ignored`]); this function never marks a path ignored.
pub fn resolve(path: &str, layers: &[Layer]) -> EffectiveConfig {
    let path = normalize_path(path);
    let mut effective = EffectiveConfig::default();

    for layer in layers {
        if !layer.selects(&path) {
            continue;
        }
        trace!(layer = layer.id, path = %path, "applying layer");

        if let Some(options) = &layer.language_options {
            merge_language_options(&mut effective.language_options, options);
        }
        for (rule, directive) in &layer.rules {
            effective.rules.insert(rule.clone(), directive.clone());
        }
    }

    effective
}

/// Apply one layer's language options onto the accumulator
fn merge_language_options(accumulator: &mut LanguageOptions, layer: &LanguageOptions) {
    for (symbol, access) in &layer.globals {
        accumulator.globals.insert(symbol.clone(), *access);
    }

    for (key, value) in &layer.options {
        if let Some(incoming) = value.as_object() {
            if let Some(Value::Object(existing)) = accumulator.options.get_mut(key) {
                for (nested_key, nested_value) in incoming {
                    existing.insert(nested_key.clone(), nested_value.clone());
                }
                continue;
            }
        }
        accumulator.options.insert(key.clone(), value.clone());
    }
}
