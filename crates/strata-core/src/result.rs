//! Result type alias for configuration composition operations

use crate::error::ConfigError;

/// Standard Result type for configuration composition operations
pub type Result<T> = std::result::Result<T, ConfigError>;
