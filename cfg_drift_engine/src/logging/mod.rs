//! Global logging module for the audit engine
//!
//! Provides thread-safe global logging with device-aware context and a
//! clean macro interface. Logging before initialization is a silent no-op,
//! so library consumers and tests never need to set it up.

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
#[cfg(feature = "logging")]
pub use service::FacadeLogger;
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Device currently under evaluation on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContext {
    pub device: String,
    pub category: Option<String>,
}

thread_local! {
    static DEVICE_CONTEXT: RefCell<Option<DeviceContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(logging_service.clone())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (host binaries and tests)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether debug events would be emitted (used by `log_debug!`)
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// DEVICE CONTEXT MANAGEMENT
// ============================================================================

/// Set device context for current thread
pub fn set_device_context(device: &str, category: Option<&str>) {
    let context = DeviceContext {
        device: device.to_string(),
        category: category.map(str::to_string),
    };

    DEVICE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Clear device context for current thread
pub fn clear_device_context() {
    DEVICE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with device context
pub fn with_device_context<F, R>(device: &str, category: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_device_context(device, category);
    let result = f();
    clear_device_context();
    result
}

/// Get current device context (used by macros)
pub fn get_current_device_context() -> Option<DeviceContext> {
    DEVICE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Attach context pairs plus the current device context, then emit
pub fn log_with_context(mut event: LogEvent, context: Vec<(&str, String)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    for (key, value) in context {
        event = event.with_context(key, &value);
    }

    if let Some(device_ctx) = get_current_device_context() {
        if !event.context.contains_key("device") {
            event = event.with_context("device", &device_ctx.device);
        }
        if let Some(category) = &device_ctx.category {
            if !event.context.contains_key("category") {
                event = event.with_context("category", category);
            }
        }
    }

    logger.log_event(event);
}

/// Safe error logging (falls back to stderr if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    format!(
        "=== Logging System Diagnostics ===\nInitialized: {}\n\n{}",
        is_initialized(),
        config::get_config_summary()
    )
}
