//! Layer types and normalization
//!
//! A raw layer is one loosely-typed configuration contribution as it arrives
//! from a config file or an embedding tool. Normalization turns it into an
//! immutable [`Layer`]: glob lists are compiled, rule directives and global
//! declarations are validated, and `extends` references are expanded through
//! a [`PresetRegistry`] so that merging only ever sees fully materialized
//! rule maps. Any malformed entry fails normalization with an error that
//! names the layer position, field, and offending value.

use crate::error::ConfigError;
use crate::glob::PatternSet;
use crate::result::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Disable the rule
    Off,
    /// Report a warning (doesn't fail the run)
    Warn,
    /// Report an error (fails the run)
    Error,
}

impl Severity {
    /// Parse a severity token
    ///
    /// Accepts the string tokens `"off"`, `"warn"`, `"error"` and their
    /// numeric aliases `0`, `1`, `2`.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "off" => Some(Self::Off),
                "warn" => Some(Self::Warn),
                "error" => Some(Self::Error),
                _ => None,
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(Self::Off),
                Some(1) => Some(Self::Warn),
                Some(2) => Some(Self::Error),
                _ => None,
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(token)
    }
}

/// A rule's severity plus its ordered rule-specific options
///
/// A later layer's directive for the same rule fully replaces an earlier
/// one, options included; there is no partial option merge.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDirective {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleDirective {
    /// Create a directive with a bare severity and no options
    pub fn severity(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// Parse a raw directive value
    ///
    /// Accepted shapes: a bare severity token, or a non-empty array whose
    /// first element is a severity token followed by option values.
    pub fn parse(layer: usize, rule: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let first = items.first().ok_or_else(|| {
                    ConfigError::invalid_rule_directive(layer, rule, "empty directive array")
                })?;
                let severity = Severity::from_value(first).ok_or_else(|| {
                    ConfigError::invalid_rule_directive(
                        layer,
                        rule,
                        format!("unrecognized severity token {first}"),
                    )
                })?;
                Ok(Self {
                    severity,
                    options: items[1..].to_vec(),
                })
            }
            other => {
                let severity = Severity::from_value(other).ok_or_else(|| {
                    ConfigError::invalid_rule_directive(
                        layer,
                        rule,
                        format!("unrecognized severity token {other}"),
                    )
                })?;
                Ok(Self::severity(severity))
            }
        }
    }

    /// Whether this directive disables the rule
    pub fn is_off(&self) -> bool {
        self.severity == Severity::Off
    }
}

impl Serialize for RuleDirective {
    /// Serialized in the flat-config wire shape: a bare severity token when
    /// there are no options, otherwise `[severity, option...]`.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        if self.options.is_empty() {
            self.severity.serialize(serializer)
        } else {
            let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
            seq.serialize_element(&self.severity)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

/// Access qualifier for a declared global symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    /// The symbol may be read but not assigned
    Readonly,
    /// The symbol may be read and assigned
    Writable,
    /// The symbol is not considered declared
    Off,
}

impl GlobalAccess {
    /// Parse a global access qualifier
    ///
    /// Booleans are legacy aliases: `true` is writable, `false` readonly.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "readonly" => Some(Self::Readonly),
                "writable" => Some(Self::Writable),
                "off" => Some(Self::Off),
                _ => None,
            },
            Value::Bool(true) => Some(Self::Writable),
            Value::Bool(false) => Some(Self::Readonly),
            _ => None,
        }
    }
}

/// Validated language options for one layer (and, merged, for one path)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LanguageOptions {
    /// Declared global symbols and their access qualifiers
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, GlobalAccess>,

    /// All other options (parsing mode flags etc.), kept verbatim
    #[serde(flatten)]
    pub options: IndexMap<String, Value>,
}

impl LanguageOptions {
    /// Validate a raw `languageOptions` mapping
    fn from_raw(layer: usize, raw: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut language_options = Self::default();

        for (key, value) in raw {
            if key == "globals" {
                let table = value.as_object().ok_or_else(|| {
                    ConfigError::invalid_language_option(layer, key, "expected a mapping")
                })?;
                for (symbol, access) in table {
                    let access = GlobalAccess::from_value(access).ok_or_else(|| {
                        ConfigError::invalid_language_option(
                            layer,
                            format!("globals.{symbol}"),
                            format!("unrecognized access qualifier {access}"),
                        )
                    })?;
                    language_options.globals.insert(symbol.clone(), access);
                }
            } else {
                language_options.options.insert(key.clone(), value.clone());
            }
        }

        Ok(language_options)
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty() && self.options.is_empty()
    }
}

/// One raw configuration contribution, as deserialized from a layer list
///
/// All fields are optional; the shape mirrors a flat, ordered configuration
/// list as consumed by a rule-driven static-analysis tool. Directive and
/// option values are deliberately loose (`serde_json::Value`) here — the
/// normalizer owns validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLayer {
    /// Glob patterns scoping this layer; absent means "all files"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Glob patterns marking paths as globally excluded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignores: Option<Vec<String>>,

    /// Language options (globals table, parsing mode flags)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_options: Option<serde_json::Map<String, Value>>,

    /// Rule identifier to directive mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<serde_json::Map<String, Value>>,

    /// Named presets whose rule entries are spliced in before `rules`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,
}

/// A named, externally-registered bundle of rule entries
#[derive(Debug, Clone, Default)]
pub struct Preset {
    /// Rule identifier to raw directive mapping
    pub rules: serde_json::Map<String, Value>,
    /// Presets this preset itself extends, applied before its own rules
    pub extends: Vec<String>,
}

/// Supplies named presets for `extends` resolution
///
/// The registry is an external collaborator; the engine only reads from it
/// during normalization. Layer lists that extend nothing can pass `&()`.
pub trait PresetRegistry {
    fn preset(&self, name: &str) -> Option<&Preset>;
}

/// The empty registry: every lookup fails
impl PresetRegistry for () {
    fn preset(&self, _name: &str) -> Option<&Preset> {
        None
    }
}

/// Simple map-backed preset registry
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    presets: HashMap<String, Preset>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preset under a name, replacing any previous entry
    pub fn insert(&mut self, name: impl Into<String>, preset: Preset) {
        self.presets.insert(name.into(), preset);
    }
}

impl PresetRegistry for InMemoryRegistry {
    fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }
}

/// One normalized, immutable configuration layer
#[derive(Debug, Clone)]
pub struct Layer {
    /// Position in the original ordered input; never reordered
    pub id: usize,
    files: PatternSet,
    ignores: PatternSet,
    /// Validated language options, if the layer carries any
    pub language_options: Option<LanguageOptions>,
    /// Fully materialized rule map (extends already spliced in)
    pub rules: IndexMap<String, RuleDirective>,
}

impl Layer {
    /// Validate and canonicalize one raw layer
    pub fn normalize(id: usize, raw: &RawLayer, registry: &dyn PresetRegistry) -> Result<Self> {
        let files = PatternSet::compile(id, "files", raw.files.as_deref().unwrap_or_default())?;
        let ignores =
            PatternSet::compile(id, "ignores", raw.ignores.as_deref().unwrap_or_default())?;

        let language_options = raw
            .language_options
            .as_ref()
            .map(|options| LanguageOptions::from_raw(id, options))
            .transpose()?;

        // Extended presets behave like earlier sub-layers spliced in at the
        // same position, so the layer's own entries override theirs.
        let mut rules = IndexMap::new();
        if let Some(names) = &raw.extends {
            let mut stack = Vec::new();
            for name in names {
                expand_preset(id, name, registry, &mut stack, &mut rules)?;
            }
        }
        if let Some(own) = &raw.rules {
            for (rule, value) in own {
                rules.insert(rule.clone(), RuleDirective::parse(id, rule, value)?);
            }
        }

        Ok(Self {
            id,
            files,
            ignores,
            language_options,
            rules,
        })
    }

    /// Whether this layer's `files` patterns select `path`
    ///
    /// A layer with no `files` patterns applies to every path.
    pub fn selects(&self, path: &str) -> bool {
        self.files.is_empty() || self.files.matches(path)
    }

    /// Whether this layer's `ignores` patterns exclude `path`
    pub fn excludes(&self, path: &str) -> bool {
        self.ignores.matches(path)
    }
}

/// Depth-first preset expansion with cycle detection
fn expand_preset(
    layer: usize,
    name: &str,
    registry: &dyn PresetRegistry,
    stack: &mut Vec<String>,
    rules: &mut IndexMap<String, RuleDirective>,
) -> Result<()> {
    if stack.iter().any(|visited| visited == name) {
        let chain = format!("{} -> {name}", stack.join(" -> "));
        return Err(ConfigError::cyclic_extends(layer, chain));
    }

    let preset = registry
        .preset(name)
        .ok_or_else(|| ConfigError::unresolved_extends(layer, name))?;

    stack.push(name.to_string());
    for sub in &preset.extends {
        expand_preset(layer, sub, registry, stack, rules)?;
    }
    for (rule, value) in &preset.rules {
        let directive = RuleDirective::parse(layer, &format!("{rule} (via '{name}')"), value)?;
        rules.insert(rule.clone(), directive);
    }
    stack.pop();

    Ok(())
}
