//! Configuration access for the logging subsystem
//!
//! Compile-time buffer limits live in `config::constants`; user-tunable
//! preferences are installed once at startup and read here.

use crate::config::constants::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime logging preferences (once per process)
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Get minimum log level (user preference)
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Check if structured (JSON) logging is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Check if per-request timing events should be logged
pub fn log_performance_events() -> bool {
    get_runtime_preferences().log_performance_events
}

/// Get maximum log message length (compile-time constant)
pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate the logging configuration before first use
pub fn validate_config() -> Result<(), String> {
    if MAX_LOG_MESSAGE_LENGTH == 0 {
        return Err("MAX_LOG_MESSAGE_LENGTH must be non-zero".to_string());
    }
    Ok(())
}

/// Summarize effective configuration for diagnostics
pub fn get_config_summary() -> String {
    format!(
        "Logging config: min_level={}, structured={}, performance_events={}",
        get_min_log_level().as_str(),
        use_structured_logging(),
        log_performance_events()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_initialization() {
        // Defaults apply when no preferences were installed
        let level = get_min_log_level();
        assert!(level <= LogLevel::Debug);
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("min_level="));
        assert!(summary.contains("structured="));
    }
}
