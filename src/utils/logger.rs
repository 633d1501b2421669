use std::sync::atomic::AtomicU8;

use crate::bindings::LogLevel;

static MIN_LOG_LEVEL: AtomicU8 = AtomicU8::new(2);

/// Minimum level below which messages are discarded.
///
/// The ordering follows the Microsoft.Extensions.Logging convention: a
/// message is written when its level is at or above the configured minimum,
/// and `None` disables logging entirely.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LoggerLevel {
    Trace = 0,
    Debug = 1,
    Information = 2,
    Warning = 3,
    Error = 4,
    Critical = 5,
    None = 6,
}

pub struct Logger {}

impl Logger {
    pub fn set_minimum_level(new_level: LoggerLevel) {
        MIN_LOG_LEVEL.store(new_level as u8, std::sync::atomic::Ordering::Relaxed);
    }

    pub(crate) fn enabled(level: LoggerLevel) -> bool {
        let min = MIN_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed);
        min != LoggerLevel::None as u8 && level as u8 >= min
    }

    #[cfg(target_arch = "wasm32")]
    fn write(level: LogLevel, text: &str) {
        crate::bindings::jsLog(level, text);
    }

    // The JavaScript log sink does not exist on the host; unit tests still
    // exercise code paths that log.
    #[cfg(not(target_arch = "wasm32"))]
    fn write(level: LogLevel, text: &str) {
        eprintln!("[{:?}] {}", level, text);
    }

    pub fn trace(text: &str) {
        if Self::enabled(LoggerLevel::Trace) {
            Self::write(LogLevel::Trace, text);
        }
    }

    pub fn debug(text: &str) {
        if Self::enabled(LoggerLevel::Debug) {
            Self::write(LogLevel::Debug, text);
        }
    }

    pub fn info(text: &str) {
        if Self::enabled(LoggerLevel::Information) {
            Self::write(LogLevel::Information, text);
        }
    }

    pub fn warn(text: &str) {
        if Self::enabled(LoggerLevel::Warning) {
            Self::write(LogLevel::Warning, text);
        }
    }

    pub fn error(text: &str) {
        if Self::enabled(LoggerLevel::Error) {
            Self::write(LogLevel::Error, text);
        }
    }

    pub fn critical(text: &str) {
        if Self::enabled(LoggerLevel::Critical) {
            Self::write(LogLevel::Critical, text);
        }
    }

    pub fn lazy_trace(func: &dyn Fn() -> String) {
        if Self::enabled(LoggerLevel::Trace) {
            Self::write(LogLevel::Trace, &func());
        }
    }

    pub fn lazy_debug(func: &dyn Fn() -> String) {
        if Self::enabled(LoggerLevel::Debug) {
            Self::write(LogLevel::Debug, &func());
        }
    }

    pub fn lazy_info(func: &dyn Fn() -> String) {
        if Self::enabled(LoggerLevel::Information) {
            Self::write(LogLevel::Information, &func());
        }
    }

    pub fn lazy_warn(func: &dyn Fn() -> String) {
        if Self::enabled(LoggerLevel::Warning) {
            Self::write(LogLevel::Warning, &func());
        }
    }

    pub fn lazy_error(func: &dyn Fn() -> String) {
        if Self::enabled(LoggerLevel::Error) {
            Self::write(LogLevel::Error, &func());
        }
    }
}
