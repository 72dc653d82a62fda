//! Runtime configuration for user preferences
//!
//! Preferences are resolved once at startup from environment variables or a
//! TOML file and installed into the subsystems that consume them. Operational
//! limits stay in `constants`; nothing here weakens a compile-time bound.

use serde::{Deserialize, Serialize};
use std::env;

/// Log level preference for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Convert to the logging subsystem's LogLevel
    pub fn to_events_log_level(self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }

    /// Convert from the logging subsystem's LogLevel
    pub fn from_events_log_level(level: crate::logging::events::LogLevel) -> Self {
        match level {
            crate::logging::events::LogLevel::Error => LogLevel::Error,
            crate::logging::events::LogLevel::Warning => LogLevel::Warning,
            crate::logging::events::LogLevel::Info => LogLevel::Info,
            crate::logging::events::LogLevel::Debug => LogLevel::Debug,
        }
    }
}

/// User preferences for the logging subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Minimum level of events to emit
    pub min_log_level: LogLevel,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub use_structured_logging: bool,
    /// Emit per-request timing events
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: LogLevel::Info,
            use_structured_logging: false,
            log_performance_events: false,
        }
    }
}

impl LoggingPreferences {
    /// Resolve preferences from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            min_log_level: env::var(env_vars::LOG_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(defaults.min_log_level),
            use_structured_logging: env::var(env_vars::STRUCTURED_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.use_structured_logging),
            log_performance_events: env::var(env_vars::PERFORMANCE_EVENTS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_performance_events),
        }
    }
}

/// User preferences for the resolution engine itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePreferences {
    /// Default response format when a request carries no $format option
    pub default_format: String,
    /// Accept case-insensitive system option names ($FILTER, $Filter)
    pub lenient_option_names: bool,
    /// Logging preferences nested for TOML configuration files
    pub logging: LoggingPreferences,
}

impl Default for EnginePreferences {
    fn default() -> Self {
        Self {
            default_format: "atom".to_string(),
            lenient_option_names: false,
            logging: LoggingPreferences::default(),
        }
    }
}

impl EnginePreferences {
    /// Resolve preferences from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_format: env::var(env_vars::DEFAULT_FORMAT)
                .ok()
                .unwrap_or(defaults.default_format),
            lenient_option_names: env::var(env_vars::LENIENT_OPTION_NAMES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lenient_option_names),
            logging: LoggingPreferences::from_env(),
        }
    }

    /// Parse preferences from TOML configuration text
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid configuration: {}", e))
    }

    /// Serialize preferences back to TOML for diagnostics
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Serialization failed: {}", e))
    }
}

/// Parse a log level string (case-insensitive)
pub fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.to_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warning" | "warn" => Some(LogLevel::Warning),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Environment variable names for runtime preferences
pub mod env_vars {
    pub const LOG_LEVEL: &str = "ODQ_LOG_LEVEL";
    pub const STRUCTURED_LOGGING: &str = "ODQ_STRUCTURED_LOGGING";
    pub const PERFORMANCE_EVENTS: &str = "ODQ_PERFORMANCE_EVENTS";
    pub const DEFAULT_FORMAT: &str = "ODQ_DEFAULT_FORMAT";
    pub const LENIENT_OPTION_NAMES: &str = "ODQ_LENIENT_OPTION_NAMES";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("WARN"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("Info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_defaults() {
        let prefs = EnginePreferences::default();
        assert_eq!(prefs.default_format, "atom");
        assert!(!prefs.lenient_option_names);
        assert_eq!(prefs.logging.min_log_level, LogLevel::Info);
    }

    #[test]
    fn test_toml_round_trip() {
        let prefs = EnginePreferences {
            default_format: "json".to_string(),
            lenient_option_names: true,
            logging: LoggingPreferences {
                min_log_level: LogLevel::Debug,
                use_structured_logging: true,
                log_performance_events: false,
            },
        };

        let text = prefs.to_toml().unwrap();
        let parsed = EnginePreferences::from_toml(&text).unwrap();
        assert_eq!(parsed.default_format, "json");
        assert!(parsed.lenient_option_names);
        assert_eq!(parsed.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_toml_partial_configuration() {
        let parsed = EnginePreferences::from_toml("default_format = \"json\"").unwrap();
        assert_eq!(parsed.default_format, "json");
        assert!(!parsed.lenient_option_names);
        assert_eq!(parsed.logging.min_log_level, LogLevel::Info);
    }

    #[test]
    fn test_toml_rejects_garbage() {
        assert!(EnginePreferences::from_toml("default_format = [1, 2").is_err());
    }

    #[test]
    fn test_level_conversion_round_trip() {
        for level in [
            LogLevel::Error,
            LogLevel::Warning,
            LogLevel::Info,
            LogLevel::Debug,
        ] {
            assert_eq!(
                LogLevel::from_events_log_level(level.to_events_log_level()),
                level
            );
        }
    }
}
