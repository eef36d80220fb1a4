// RUNTIME PREFERENCES (User Experience)

use crate::logging::events::LogLevel;
use std::env;

#[derive(Debug, Clone)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to print events below error level to the console
    pub enable_console_logging: bool,

    /// Minimum level emitted
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOG_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOG_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOG_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

impl LoggingPreferences {
    /// Preferences for interactive troubleshooting
    pub fn verbose() -> Self {
        Self {
            use_structured_logging: false,
            enable_console_logging: true,
            min_log_level: LogLevel::Debug,
        }
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const LOG_LEVEL: &str = "CFG_DRIFT_LOG_LEVEL";
    pub const LOG_STRUCTURED: &str = "CFG_DRIFT_LOG_STRUCTURED";
    pub const LOG_CONSOLE: &str = "CFG_DRIFT_LOG_CONSOLE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_preferences() {
        let prefs = LoggingPreferences::verbose();
        assert_eq!(prefs.min_log_level, LogLevel::Debug);
        assert!(prefs.enable_console_logging);
        assert!(!prefs.use_structured_logging);
    }
}
