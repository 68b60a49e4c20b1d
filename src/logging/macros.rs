// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros for convenient call-site logging

/// Log a formatted message at an explicit level.
///
/// Captures the call site (`file!()`/`line!()`) and the identity/clock
/// sources into a record and dispatches it. The logger's minimum level
/// is checked first so filtered calls never pay for message formatting.
///
/// # Examples
/// ```ignore
/// log_event!(logger, Level::Warn, "queue depth {} over limit", depth);
/// ```
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        let logger = &$logger;
        let level = $level;
        if level >= logger.min_level() {
            let record = $crate::logging::Record::capture(level, file!(), line!())
                .with_message(format!($($arg)*));
            logger.log(level, &record);
        }
    }};
}

/// Log a formatted message with debug level
///
/// # Examples
/// ```ignore
/// log_debug!(logger, "parsed {} entries", count);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_event!($logger, $crate::logging::Level::Debug, $($arg)*)
    };
}

/// Log a formatted message with info level
///
/// # Examples
/// ```ignore
/// log_info!(logger, "listener ready on {}", addr);
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_event!($logger, $crate::logging::Level::Info, $($arg)*)
    };
}

/// Log a formatted message with warn level
///
/// # Examples
/// ```ignore
/// log_warn!(logger, "retrying after {} ms", backoff);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_event!($logger, $crate::logging::Level::Warn, $($arg)*)
    };
}

/// Log a formatted message with error level
///
/// # Examples
/// ```ignore
/// log_error!(logger, "failed to open {}: {}", path, err);
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_event!($logger, $crate::logging::Level::Error, $($arg)*)
    };
}

/// Log a formatted message with fatal level
///
/// # Examples
/// ```ignore
/// log_fatal!(logger, "unrecoverable state, shutting down");
/// ```
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_event!($logger, $crate::logging::Level::Fatal, $($arg)*)
    };
}
