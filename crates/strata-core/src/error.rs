//! Error types for layer loading and normalization
//!
//! All errors are detected while a layer list is being loaded; once a
//! [`crate::ConfigResolver`] has been constructed, resolution itself has no
//! error path. A layer list containing any malformed entry fails the entire
//! load rather than being partially applied, since silently dropping a layer
//! could silently disable intended checks.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for configuration composition
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A glob string in `files` or `ignores` could not be compiled
    #[error("invalid glob pattern '{pattern}' in layer {layer} field '{field}': {reason}")]
    InvalidPattern {
        layer: usize,
        field: &'static str,
        pattern: String,
        reason: String,
    },

    /// A rule entry's severity token or option list is malformed
    #[error("invalid directive for rule '{rule}' in layer {layer}: {reason}")]
    InvalidRuleDirective {
        layer: usize,
        rule: String,
        reason: String,
    },

    /// A `languageOptions` entry could not be validated
    #[error("invalid language option '{option}' in layer {layer}: {reason}")]
    InvalidLanguageOption {
        layer: usize,
        option: String,
        reason: String,
    },

    /// An `extends` entry names a preset the registry does not know
    #[error("layer {layer} extends unknown preset '{preset}'")]
    UnresolvedExtends { layer: usize, preset: String },

    /// A preset transitively extends itself
    #[error("cyclic preset extension in layer {layer}: {chain}")]
    CyclicExtends { layer: usize, chain: String },

    /// A layer file could not be parsed
    #[error("failed to parse layer file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// File system I/O errors while reading a layer file
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Pattern,
    RuleDirective,
    LanguageOption,
    Extends,
    Parse,
    Io,
}

impl ConfigError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::InvalidPattern { .. } => ErrorKind::Pattern,
            ConfigError::InvalidRuleDirective { .. } => ErrorKind::RuleDirective,
            ConfigError::InvalidLanguageOption { .. } => ErrorKind::LanguageOption,
            ConfigError::UnresolvedExtends { .. } | ConfigError::CyclicExtends { .. } => {
                ErrorKind::Extends
            }
            ConfigError::ParseError { .. } => ErrorKind::Parse,
            ConfigError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Position of the layer the error was detected in, if any
    pub fn layer(&self) -> Option<usize> {
        match self {
            ConfigError::InvalidPattern { layer, .. }
            | ConfigError::InvalidRuleDirective { layer, .. }
            | ConfigError::InvalidLanguageOption { layer, .. }
            | ConfigError::UnresolvedExtends { layer, .. }
            | ConfigError::CyclicExtends { layer, .. } => Some(*layer),
            ConfigError::ParseError { .. } | ConfigError::Io { .. } => None,
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(
        layer: usize,
        field: &'static str,
        pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPattern {
            layer,
            field,
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid rule directive error
    pub fn invalid_rule_directive(
        layer: usize,
        rule: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRuleDirective {
            layer,
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid language option error
    pub fn invalid_language_option(
        layer: usize,
        option: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidLanguageOption {
            layer,
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create an unresolved extends error
    pub fn unresolved_extends(layer: usize, preset: impl Into<String>) -> Self {
        Self::UnresolvedExtends {
            layer,
            preset: preset.into(),
        }
    }

    /// Create a cyclic extends error
    pub fn cyclic_extends(layer: usize, chain: impl Into<String>) -> Self {
        Self::CyclicExtends {
            layer,
            chain: chain.into(),
        }
    }

    /// Create a parse error with path context
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
