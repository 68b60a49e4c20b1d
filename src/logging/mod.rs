// Synchronous structured logging: pattern-compiled formatting and
// leveled logger/sink dispatch

mod level;
mod logger;
#[macro_use]
mod macros;
mod pattern;
mod record;
mod sink;

// Public exports
pub use level::{Level, UnknownLevelName};
pub use logger::{Logger, LoggerRegistry};
pub use pattern::{compile, Formatter, Fragment, DEFAULT_PATTERN, DEFAULT_TIMESTAMP_FORMAT};
pub use record::Record;
pub use sink::{ConsoleSink, FileSink, Sink};
