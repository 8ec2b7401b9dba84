//! End-to-end tests for the composition pipeline: loader -> normalizer ->
//! ignore resolver -> merge engine -> cache, through the `ConfigResolver`
//! façade.

use serde_json::json;
use std::sync::Arc;
use strata_core::{
    ConfigResolver, InMemoryRegistry, LayerLoader, Preset, RawLayer, Severity,
};

fn raw_layers(value: serde_json::Value) -> Vec<RawLayer> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn determinism_same_path_same_bytes() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"languageOptions": {"ecmaVersion": "latest", "globals": {"process": "readonly"}}},
            {"files": ["**/*.ts"], "rules": {"quotes": ["warn", "double"], "semi": "error"}}
        ])),
        &(),
    )
    .unwrap();

    let first = serde_json::to_string(&*resolver.resolve("src/app.ts")).unwrap();
    let second = serde_json::to_string(&*resolver.resolve("src/app.ts")).unwrap();
    assert_eq!(first, second);

    // Also identical across a reload of the unchanged list (fresh cache)
    resolver
        .reload(
            &raw_layers(json!([
                {"languageOptions": {"ecmaVersion": "latest", "globals": {"process": "readonly"}}},
                {"files": ["**/*.ts"], "rules": {"quotes": ["warn", "double"], "semi": "error"}}
            ])),
            &(),
        )
        .unwrap();
    let third = serde_json::to_string(&*resolver.resolve("src/app.ts")).unwrap();
    assert_eq!(first, third);
}

#[test]
fn order_sensitivity() {
    let warn_then_error = json!([
        {"rules": {"quotes": "warn"}},
        {"rules": {"quotes": "error"}}
    ]);
    let resolver = ConfigResolver::load(&raw_layers(warn_then_error), &()).unwrap();
    assert_eq!(
        resolver.resolve("src/app.ts").rules["quotes"].severity,
        Severity::Error
    );

    let error_then_warn = json!([
        {"rules": {"quotes": "error"}},
        {"rules": {"quotes": "warn"}}
    ]);
    let resolver = ConfigResolver::load(&raw_layers(error_then_warn), &()).unwrap();
    assert_eq!(
        resolver.resolve("src/app.ts").rules["quotes"].severity,
        Severity::Warn
    );
}

#[test]
fn ignore_terminality() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"ignores": ["src-ssr/**"]},
            {"files": ["src-ssr/server.ts"], "rules": {"semi": "error"}}
        ])),
        &(),
    )
    .unwrap();

    let effective = resolver.resolve("src-ssr/server.ts");
    assert!(effective.ignored);
    assert!(effective.rules.is_empty());
}

#[test]
fn no_cross_path_leakage() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"files": ["src/**"], "rules": {"semi": "error"}},
            {"files": ["test/**"], "rules": {"quotes": "warn"}}
        ])),
        &(),
    )
    .unwrap();

    // Resolving one path first must not color the other
    let test_config = resolver.resolve("test/app.ts");
    let src_config = resolver.resolve("src/app.ts");

    assert!(src_config.rules.contains_key("semi"));
    assert!(!src_config.rules.contains_key("quotes"));
    assert!(test_config.rules.contains_key("quotes"));
    assert!(!test_config.rules.contains_key("semi"));
}

#[test]
fn empty_match_default() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([{"files": ["**/*.vue"], "rules": {"semi": "warn"}}])),
        &(),
    )
    .unwrap();

    let effective = resolver.resolve("README.md");
    assert!(!effective.ignored);
    assert!(effective.rules.is_empty());
    assert!(effective.language_options.is_empty());
}

#[test]
fn option_replacement_not_merge() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"rules": {"max-len": ["error", {"maxLen": 10}]}},
            {"rules": {"max-len": "off"}}
        ])),
        &(),
    )
    .unwrap();

    let directive = &resolver.resolve("src/app.ts").rules["max-len"];
    assert!(directive.is_off());
    assert!(directive.options.is_empty());
    assert_eq!(serde_json::to_value(directive).unwrap(), json!("off"));
}

#[test]
fn concrete_quotes_scenario() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"files": ["**/*.ts"], "rules": {"quotes": ["warn", "double"]}},
            {"files": ["src-pwa/*.ts"], "rules": {"quotes": "off"}}
        ])),
        &(),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&resolver.resolve("src-pwa/worker.ts").rules["quotes"]).unwrap(),
        json!("off")
    );
    assert_eq!(
        serde_json::to_value(&resolver.resolve("src/app.ts").rules["quotes"]).unwrap(),
        json!(["warn", "double"])
    );
}

#[test]
fn reload_isolation() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"rules": {"quotes": ["warn", "double"]}},
            {"languageOptions": {"globals": {"ga": "readonly"}}}
        ])),
        &(),
    )
    .unwrap();
    let before = resolver.resolve("src/app.ts");
    assert_eq!(before.rules["quotes"].severity, Severity::Warn);

    resolver
        .reload(&raw_layers(json!([{"rules": {"semi": "error"}}])), &())
        .unwrap();

    // Result reflects only the new list: no blend of old and new
    let after = resolver.resolve("src/app.ts");
    assert!(!after.rules.contains_key("quotes"));
    assert!(after.language_options.globals.is_empty());
    assert_eq!(after.rules["semi"].severity, Severity::Error);
}

#[test]
fn presets_spliced_under_layer_rules() {
    let mut registry = InMemoryRegistry::new();
    registry.insert(
        "js/recommended",
        Preset {
            rules: json!({"no-debugger": "error", "no-console": "warn"})
                .as_object()
                .unwrap()
                .clone(),
            extends: vec![],
        },
    );

    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"extends": ["js/recommended"], "rules": {"no-console": "off"}}
        ])),
        &registry,
    )
    .unwrap();

    let effective = resolver.resolve("src/app.ts");
    assert_eq!(effective.rules["no-debugger"].severity, Severity::Error);
    assert!(effective.rules["no-console"].is_off());
}

#[test]
fn loader_to_resolver_pipeline() {
    let layers = LayerLoader::from_yaml_str(
        r#"
- ignores: ["dist/**"]
- files: ["**/*.ts"]
  languageOptions:
    globals:
      process: readonly
  rules:
    quotes: ["warn", "double"]
- files: ["src-pwa/*.ts"]
  rules:
    quotes: "off"
"#,
    )
    .unwrap();

    let resolver = ConfigResolver::load(&layers, &()).unwrap();
    assert!(resolver.resolve("dist/bundle.js").ignored);
    assert!(resolver.resolve("src-pwa/worker.ts").rules["quotes"].is_off());
    assert_eq!(
        resolver.resolve("src/app.ts").rules["quotes"].severity,
        Severity::Warn
    );
}

#[test]
fn concurrent_resolution_single_result_per_path() {
    let resolver = Arc::new(
        ConfigResolver::load(
            &raw_layers(json!([{"files": ["**/*.ts"], "rules": {"semi": "error"}}])),
            &(),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || resolver.resolve("src/app.ts"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // Every caller observes the same cached instance
    for result in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], result));
    }
    assert_eq!(resolver.cached_paths(), 1);
}

#[test]
fn batch_resolution_matches_single_path_results() {
    let resolver = ConfigResolver::load(
        &raw_layers(json!([
            {"ignores": ["dist/**"]},
            {"files": ["**/*.ts"], "rules": {"semi": "warn"}}
        ])),
        &(),
    )
    .unwrap();

    let paths = ["src/a.ts", "src/b.ts", "dist/c.ts", "README.md"];
    let batch = resolver.resolve_all(&paths);

    assert_eq!(batch.len(), paths.len());
    for path in paths {
        assert_eq!(batch[path], resolver.resolve(path));
    }
    assert!(batch["dist/c.ts"].ignored);
    assert!(batch["README.md"].rules.is_empty());
}
