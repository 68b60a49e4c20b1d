// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Embeddable diagnostics layer: a synchronous structured-logging core
//! and a typed configuration registry.
//!
//! The logging half compiles printf-like pattern templates into
//! fragment sequences ([`logging::Formatter`]) and dispatches records
//! through named, leveled loggers to shared console/file sinks. The
//! config half ([`config::ConfigRegistry`]) stores named settings
//! type-erased, hands them back typed via safe downcast, and
//! round-trips values through text.
//!
//! ```no_run
//! use diagkit::config::ConfigRegistry;
//! use diagkit::logging::LoggerRegistry;
//! use diagkit::log_info;
//!
//! let loggers = LoggerRegistry::new();
//! let logger = loggers.root();
//! log_info!(logger, "starting up");
//!
//! let settings = ConfigRegistry::with_diagnostics(loggers.root());
//! let port = settings.lookup_or_create("system.port", 8080u16, "listen port").unwrap();
//! log_info!(logger, "listening on {}", port.value());
//! ```

pub mod config;
pub mod logging;
pub mod util;

// Crate-root re-exports for the common surface
pub use config::{ConfigError, ConfigRegistry, ConfigVariable, TypedConfigVariable};
pub use logging::{
    ConsoleSink, FileSink, Formatter, Level, Logger, LoggerRegistry, Record, Sink,
};
