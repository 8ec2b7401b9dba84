//! Glob matching for layer file scopes
//!
//! Layers select files through lists of glob strings. Matching is
//! case-sensitive and always operates on forward-slash paths; platform
//! separators are normalized before matching so the same layer list behaves
//! identically on every platform. Within one list, a leading `!` negates a
//! pattern: patterns are processed left-to-right, and a later negated match
//! removes the path from the selected set again.

use crate::error::ConfigError;
use crate::result::Result;
use glob::{MatchOptions, Pattern};

/// `*` and `?` stay within one path segment; `**` crosses segments.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Normalize a path for pattern matching
///
/// Converts platform separators to `/` and strips a leading `./`.
pub(crate) fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .map(str::to_string)
        .unwrap_or(normalized)
}

/// One compiled glob, possibly negated
#[derive(Debug, Clone)]
struct PatternEntry {
    pattern: Pattern,
    negated: bool,
}

/// An ordered list of compiled glob patterns
///
/// Compiled once at normalization time so malformed globs are rejected at
/// load and matching never fails afterwards.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    entries: Vec<PatternEntry>,
}

impl PatternSet {
    /// Compile a list of glob strings
    ///
    /// `layer` and `field` identify the offending entry in error messages.
    pub fn compile(layer: usize, field: &'static str, patterns: &[String]) -> Result<Self> {
        let mut entries = Vec::with_capacity(patterns.len());

        for raw in patterns {
            let (source, negated) = match raw.strip_prefix('!') {
                Some(rest) => (rest, true),
                None => (raw.as_str(), false),
            };

            if source.is_empty() {
                return Err(ConfigError::invalid_pattern(
                    layer,
                    field,
                    raw,
                    "empty pattern",
                ));
            }

            let pattern = Pattern::new(source)
                .map_err(|e| ConfigError::invalid_pattern(layer, field, raw, e.msg))?;

            entries.push(PatternEntry { pattern, negated });
        }

        Ok(Self { entries })
    }

    /// Whether this set contains no patterns at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether `path` is selected by this pattern list
    ///
    /// Returns `false` for an empty set; callers decide what an empty set
    /// means for their field (a layer with no `files` selects everything, a
    /// layer with no `ignores` ignores nothing).
    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_path(path);
        let mut selected = false;

        for entry in &self.entries {
            if entry.pattern.matches_with(&path, MATCH_OPTIONS) {
                selected = !entry.negated;
            }
        }

        selected
    }
}
