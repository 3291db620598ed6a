//! Global logging module for the monke front end
//!
//! Provides thread-safe global logging with per-thread source context
//! and a small macro interface.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::runtime::RuntimeConfig;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SOURCE_CONTEXT: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the current configuration
pub fn init_global_logging() -> Result<(), String> {
    install_service(service::create_configured_service())
}

/// Initialize global logging from a loaded runtime configuration; its
/// `[logging]` table becomes the process-wide preferences
pub fn init_global_logging_with_config(runtime: &RuntimeConfig) -> Result<(), String> {
    if is_initialized() {
        let message = "Global logger already initialized".to_string();
        safe_log_error(codes::system::INITIALIZATION_FAILURE, &message);
        return Err(message);
    }

    if config::init_runtime_preferences(runtime.logging.clone()).is_err()
        && config::get_runtime_preferences() != &runtime.logging
    {
        let message = "Logging preferences were pinned before initialization".to_string();
        safe_log_error(codes::system::INITIALIZATION_FAILURE, &message);
        return Err(message);
    }

    install_service(LoggingService::from_preferences(&runtime.logging))
}

fn install_service(logging_service: LoggingService) -> Result<(), String> {
    if let Err(e) = config::validate_config() {
        let message = format!("Configuration validation failed: {}", e);
        safe_log_error(codes::system::INITIALIZATION_FAILURE, &message);
        return Err(message);
    }

    let logging_service = Arc::new(logging_service);
    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    let event = LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    )
    .with_context("profile", crate::config::build_info::profile());
    logging_service.log_event(event);
    logging_service.log_event(LogEvent::debug(&config::get_config_summary()));

    Ok(())
}

/// Initialize with custom service (primarily for embedding and tests)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// SOURCE CONTEXT MANAGEMENT
// ============================================================================

/// Execute function with the given source file attached to every event
pub fn with_source_context<F, R>(path: PathBuf, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SOURCE_CONTEXT.with(|ctx| ctx.borrow_mut().replace(path));
    let result = f();
    SOURCE_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

/// Current source file for this thread, if any
pub fn get_current_source_context() -> Option<PathBuf> {
    SOURCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn attach_source_context(event: LogEvent) -> LogEvent {
    if !config::include_source_context() {
        return event;
    }

    match get_current_source_context() {
        Some(path) => event.with_context("source", &path.display().to_string()),
        None => event,
    }
}

/// Send an event to the global logger after attaching source context
pub fn dispatch(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_source_context(event));
    }
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

    dispatch(event);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event);
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Process-wide memory logger shared by every test that inspects events
#[cfg(test)]
pub(crate) fn test_memory_logger() -> Arc<MemoryLogger> {
    static MEMORY: OnceLock<Arc<MemoryLogger>> = OnceLock::new();

    MEMORY
        .get_or_init(|| {
            let memory = Arc::new(MemoryLogger::new());
            let service = LoggingService::new(memory.clone(), LogLevel::Info);
            assert!(
                init_global_logging_with_service(Arc::new(service)).is_ok(),
                "the memory logger must be the first global logger in the test binary"
            );
            memory
        })
        .clone()
}
