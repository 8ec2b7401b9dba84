//! Strata Core
//!
//! Configuration composition engine for rule-driven static-analysis tools.
//! Given an ordered list of partial, file-scoped configuration layers, this
//! crate deterministically computes the single effective configuration
//! (rule severities and options, language options, global declarations,
//! ignore status) that applies to any queried file path.
//!
//! The pieces outside this crate — the preset registry supplying named rule
//! bundles, the parser, the rule-evaluation engine, the CLI — are external
//! collaborators consumed only through their output.
//!
//! ```
//! use strata_core::{ConfigResolver, LayerLoader};
//!
//! let layers = LayerLoader::from_json_str(
//!     r#"[
//!         {"files": ["**/*.ts"], "rules": {"quotes": ["warn", "double"]}},
//!         {"files": ["src-pwa/*.ts"], "rules": {"quotes": "off"}}
//!     ]"#,
//! )
//! .unwrap();
//!
//! let resolver = ConfigResolver::load(&layers, &()).unwrap();
//! assert!(resolver.resolve("src-pwa/worker.ts").rules["quotes"].is_off());
//! ```

pub mod cache;
pub mod error;
pub mod glob;
pub mod ignore;
pub mod layer;
pub mod loader;
pub mod merge;
pub mod resolver;
pub mod result;

// Re-export commonly used types
pub use cache::EffectiveConfigCache;
pub use error::{ConfigError, ErrorKind};
pub use crate::glob::PatternSet;
pub use ignore::is_ignored;
pub use layer::{
    GlobalAccess, InMemoryRegistry, LanguageOptions, Layer, Preset, PresetRegistry, RawLayer,
    RuleDirective, Severity,
};
pub use loader::LayerLoader;
pub use merge::EffectiveConfig;
pub use resolver::ConfigResolver;
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strata=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
