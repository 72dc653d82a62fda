//! Global logging module for the URI resolution engine
//!
//! Provides thread-safe global logging with request-aware context, coded
//! error reporting, and a clean macro interface. Each in-flight resolution
//! installs a request context so every event it emits carries the request id
//! and raw URI text.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static REQUEST_CONTEXT: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
}

/// Context attached to every event emitted while a resolution is in flight
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Caller-assigned request identifier
    pub request_id: u64,
    /// Raw resource-path text as received (percent-decoded)
    pub raw_path: String,
}

impl RequestContext {
    pub fn new(request_id: u64, raw_path: &str) -> Self {
        Self {
            request_id,
            raw_path: raw_path.to_string(),
        }
    }

    /// One-line description for log context values
    pub fn describe(&self) -> String {
        format!("#{} {}", self.request_id, self.raw_path)
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    // Sanity-check the code registry before serving requests
    let test_codes = ["ERR001", "E100", "E120", "E140", "E160"];
    for &code in &test_codes {
        if codes::get_description(code) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    let event = events::LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );
    logging_service.log_event(event);

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// REQUEST CONTEXT MANAGEMENT
// ============================================================================

/// Set request context for current thread
pub fn set_request_context(context: RequestContext) {
    REQUEST_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Clear request context for current thread
pub fn clear_request_context() {
    REQUEST_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with request context installed
pub fn with_request_context<F, R>(context: RequestContext, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_request_context(context);
    let result = f();
    clear_request_context();
    result
}

/// Get current request context (used by macros)
pub fn get_current_request_context() -> Option<RequestContext> {
    REQUEST_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(req) = get_current_request_context() {
        event = event.with_context("request_id", &req.request_id.to_string());
        event = event.with_context("raw_path", &req.raw_path);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(req) = get_current_request_context() {
        event = event.with_context("request_id", &req.request_id.to_string());
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(req) = get_current_request_context() {
        event = event.with_context("request_id", &req.request_id.to_string());
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_management() {
        assert!(get_current_request_context().is_none());

        set_request_context(RequestContext::new(7, "Employees('1')/Team"));
        let context = get_current_request_context();
        assert!(context.is_some());
        assert_eq!(context.unwrap().request_id, 7);

        clear_request_context();
        assert!(get_current_request_context().is_none());
    }

    #[test]
    fn test_with_request_context() {
        let result = with_request_context(RequestContext::new(3, "Teams"), || {
            let context = get_current_request_context();
            assert!(context.is_some());
            assert_eq!(context.unwrap().raw_path, "Teams");
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_request_context().is_none());
    }

    #[test]
    fn test_request_context_describe() {
        let context = RequestContext::new(12, "Rooms('1')");
        assert_eq!(context.describe(), "#12 Rooms('1')");
    }

    #[test]
    fn test_safe_logging() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
        // Should not panic even if global logging is not initialized
    }
}
