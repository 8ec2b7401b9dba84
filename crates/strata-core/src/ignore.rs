//! Ignore resolution: global exclusions decided ahead of merging
//!
//! Ignore status is terminal: once any layer's `ignores` patterns match a
//! path, no later layer can re-include it, not even with an explicit
//! non-wildcard `files` match. The only way to carve exceptions out of an
//! ignore set is a `!`-negated pattern later in the same layer's list.

use crate::glob::normalize_path;
use crate::layer::Layer;
use tracing::trace;

/// Check whether `path` is globally excluded by any layer
///
/// Scans layers in order; the first layer whose `ignores` set matches wins.
/// For ignored paths the merge engine is never invoked and the effective
/// configuration reports `ignored = true` with empty rules and options.
pub fn is_ignored(path: &str, layers: &[Layer]) -> bool {
    let path = normalize_path(path);

    for layer in layers {
        if layer.excludes(&path) {
            trace!(layer = layer.id, path = %path, "path ignored");
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::RawLayer;
    use serde_json::json;

    fn layers(raw: serde_json::Value) -> Vec<Layer> {
        let raw: Vec<RawLayer> = serde_json::from_value(raw).unwrap();
        raw.iter()
            .enumerate()
            .map(|(id, layer)| Layer::normalize(id, layer, &()).unwrap())
            .collect()
    }

    #[test]
    fn test_ignored_path_detected() {
        let layers = layers(json!([{"ignores": ["dist/**", "**/*.generated.ts"]}]));
        assert!(is_ignored("dist/bundle.js", &layers));
        assert!(is_ignored("src/api.generated.ts", &layers));
        assert!(!is_ignored("src/app.ts", &layers));
    }

    #[test]
    fn test_ignore_is_terminal_across_layers() {
        // A later layer explicitly listing the exact file does not un-ignore it
        let layers = layers(json!([
            {"ignores": ["vendor/**"]},
            {"files": ["vendor/lib.ts"], "rules": {"semi": "error"}}
        ]));
        assert!(is_ignored("vendor/lib.ts", &layers));
    }

    #[test]
    fn test_negation_within_one_layer_re_includes() {
        let layers = layers(json!([{"ignores": ["dist/**", "!dist/types/*.d.ts"]}]));
        assert!(is_ignored("dist/bundle.js", &layers));
        assert!(!is_ignored("dist/types/api.d.ts", &layers));
    }

    #[test]
    fn test_negation_does_not_cross_layers() {
        let layers = layers(json!([
            {"ignores": ["dist/**"]},
            {"ignores": ["!dist/keep.ts"]}
        ]));
        // The second layer's negation cannot undo the first layer's ignore
        assert!(is_ignored("dist/keep.ts", &layers));
    }

    #[test]
    fn test_no_ignores_means_nothing_ignored() {
        let layers = layers(json!([{"files": ["**/*.ts"], "rules": {"semi": "warn"}}]));
        assert!(!is_ignored("dist/bundle.js", &layers));
    }
}
