// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logger dispatch and the name->Logger registry

use super::sink::{ConsoleSink, Sink};
use super::{Formatter, Level, Record};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

/// Named, leveled dispatch point for log records.
///
/// A logger owns an ordered list of shared sinks and a default
/// formatter. Dispatch filters by the logger's minimum level, then
/// forwards the record to every sink in attachment order; each sink
/// applies its own threshold and formatter on top.
pub struct Logger {
    name: String,
    min_level: AtomicU8,
    formatter: RwLock<Arc<Formatter>>,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
}

impl Logger {
    /// Create a logger with the default pattern formatter, minimum
    /// level DEBUG, and no sinks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: AtomicU8::new(Level::Debug.as_u8()),
            formatter: RwLock::new(Arc::new(Formatter::default())),
            sinks: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_level(&self) -> Level {
        Level::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub fn set_min_level(&self, level: Level) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// The logger's current default formatter
    pub fn formatter(&self) -> Arc<Formatter> {
        Arc::clone(&self.formatter.read().unwrap())
    }

    /// Replace the default formatter.
    ///
    /// Affects this logger's fallback path and future attachments only;
    /// sinks that adopted the previous formatter keep their snapshot.
    pub fn set_formatter(&self, formatter: Arc<Formatter>) {
        *self.formatter.write().unwrap() = formatter;
    }

    /// Append a sink to the dispatch list.
    ///
    /// A sink arriving without its own formatter adopts a snapshot of
    /// this logger's current default; later `set_formatter` calls do
    /// not retouch it.
    pub fn add_sink(&self, sink: Arc<dyn Sink>) {
        if sink.formatter().is_none() {
            sink.set_formatter(self.formatter());
        }
        self.sinks.write().unwrap().push(sink);
    }

    /// Remove the first matching sink (by shared identity).
    ///
    /// Removing a sink that is not attached is a no-op.
    pub fn remove_sink(&self, sink: &Arc<dyn Sink>) {
        let mut sinks = self.sinks.write().unwrap();
        if let Some(position) = sinks.iter().position(|s| Arc::ptr_eq(s, sink)) {
            sinks.remove(position);
        }
    }

    /// Number of attached sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.read().unwrap().len()
    }

    /// Dispatch a record at `level`.
    ///
    /// Below the minimum level the record is dropped silently. The sink
    /// list is snapshotted under the read lock, then every sink is
    /// invoked in attachment order; sinks absorb their own I/O
    /// failures, so one failing sink cannot starve the rest.
    pub fn log(&self, level: Level, record: &Record) {
        if level < self.min_level() {
            return;
        }
        let sinks: Vec<Arc<dyn Sink>> = self.sinks.read().unwrap().clone();
        for sink in &sinks {
            sink.log(self, level, record);
        }
    }

    /// Dispatch at DEBUG
    pub fn debug(&self, record: &Record) {
        self.log(Level::Debug, record);
    }

    /// Dispatch at INFO
    pub fn info(&self, record: &Record) {
        self.log(Level::Info, record);
    }

    /// Dispatch at WARN
    pub fn warn(&self, record: &Record) {
        self.log(Level::Warn, record);
    }

    /// Dispatch at ERROR
    pub fn error(&self, record: &Record) {
        self.log(Level::Error, record);
    }

    /// Dispatch at FATAL
    pub fn fatal(&self, record: &Record) {
        self.log(Level::Fatal, record);
    }
}

/// Name->Logger directory.
///
/// Holds the conventional root logger (console-backed, so diagnostics
/// are visible with zero setup) and creates named loggers on demand.
/// Created loggers start with no sinks; callers attach what they need.
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
    root: Arc<Logger>,
}

impl LoggerRegistry {
    pub const ROOT_NAME: &str = "root";

    pub fn new() -> Self {
        let root = Arc::new(Logger::new(Self::ROOT_NAME));
        root.add_sink(Arc::new(ConsoleSink::new()));
        let mut loggers = HashMap::new();
        loggers.insert(Self::ROOT_NAME.to_string(), Arc::clone(&root));
        Self {
            loggers: RwLock::new(loggers),
            root,
        }
    }

    /// The root logger
    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Get the logger registered under `name`, creating it if absent
    pub fn get(&self, name: &str) -> Arc<Logger> {
        {
            let loggers = self.loggers.read().unwrap();
            if let Some(logger) = loggers.get(name) {
                return Arc::clone(logger);
            }
        }
        let mut loggers = self.loggers.write().unwrap();
        Arc::clone(
            loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new(name))),
        )
    }

    /// Number of registered loggers (including root)
    pub fn len(&self) -> usize {
        self.loggers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().unwrap().is_empty()
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::sync::Mutex;

    // Capturing sink for dispatch assertions
    struct ProbeSink {
        tag: &'static str,
        lines: Arc<Mutex<Vec<String>>>,
        invocations: AtomicU64,
        min_level: AtomicU8,
        formatter: RwLock<Option<Arc<Formatter>>>,
    }

    impl ProbeSink {
        fn new(tag: &'static str, lines: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                tag,
                lines,
                invocations: AtomicU64::new(0),
                min_level: AtomicU8::new(Level::Unknown.as_u8()),
                formatter: RwLock::new(None),
            })
        }

        fn invocations(&self) -> u64 {
            self.invocations.load(Ordering::Relaxed)
        }
    }

    impl Sink for ProbeSink {
        fn log(&self, logger: &Logger, level: Level, record: &Record) {
            if level < self.min_level() {
                return;
            }
            self.invocations.fetch_add(1, Ordering::Relaxed);
            let rendered = match self.formatter() {
                Some(formatter) => formatter.render(logger.name(), level, record),
                None => logger.formatter().render(logger.name(), level, record),
            };
            self.lines
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, rendered));
        }

        fn formatter(&self) -> Option<Arc<Formatter>> {
            self.formatter.read().unwrap().clone()
        }

        fn set_formatter(&self, formatter: Arc<Formatter>) {
            *self.formatter.write().unwrap() = Some(formatter);
        }

        fn min_level(&self) -> Level {
            Level::from_u8(self.min_level.load(Ordering::Relaxed))
        }

        fn set_min_level(&self, level: Level) {
            self.min_level.store(level.as_u8(), Ordering::Relaxed);
        }
    }

    fn record(message: &str) -> Record {
        Record::capture(Level::Info, file!(), line!()).with_message(message)
    }

    #[test]
    fn test_logger_defaults() {
        let logger = Logger::new("core");
        assert_eq!(logger.name(), "core");
        assert_eq!(logger.min_level(), Level::Debug);
        assert_eq!(logger.sink_count(), 0);
    }

    #[test]
    fn test_filtered_call_reaches_no_sink() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSink::new("a", Arc::clone(&lines));
        let logger = Logger::new("core");
        logger.add_sink(Arc::clone(&probe) as Arc<dyn Sink>);
        logger.set_min_level(Level::Warn);

        logger.info(&record("dropped"));

        assert_eq!(probe.invocations(), 0);
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_preserves_attachment_order() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let first = ProbeSink::new("first", Arc::clone(&lines));
        let second = ProbeSink::new("second", Arc::clone(&lines));
        let logger = Logger::new("core");
        logger.set_formatter(Arc::new(Formatter::new("%m")));
        logger.add_sink(first as Arc<dyn Sink>);
        logger.add_sink(second as Arc<dyn Sink>);

        logger.info(&record("hello"));

        let lines = lines.lock().unwrap();
        assert_eq!(*lines, vec!["first:hello", "second:hello"]);
    }

    #[test]
    fn test_remove_absent_sink_is_noop() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let attached = ProbeSink::new("attached", Arc::clone(&lines));
        let stranger = ProbeSink::new("stranger", Arc::clone(&lines));
        let logger = Logger::new("core");
        logger.set_formatter(Arc::new(Formatter::new("%m")));
        logger.add_sink(Arc::clone(&attached) as Arc<dyn Sink>);

        logger.remove_sink(&(stranger as Arc<dyn Sink>));
        assert_eq!(logger.sink_count(), 1);

        logger.info(&record("still delivered"));
        assert_eq!(attached.invocations(), 1);
    }

    #[test]
    fn test_remove_sink_stops_delivery() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSink::new("a", Arc::clone(&lines));
        let logger = Logger::new("core");
        let sink = Arc::clone(&probe) as Arc<dyn Sink>;
        logger.add_sink(Arc::clone(&sink));

        logger.info(&record("one"));
        logger.remove_sink(&sink);
        logger.info(&record("two"));

        assert_eq!(probe.invocations(), 1);
    }

    #[test]
    fn test_sink_adopts_formatter_snapshot_at_attach() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSink::new("a", Arc::clone(&lines));
        let logger = Logger::new("core");
        let original = Arc::new(Formatter::new("old %m"));
        logger.set_formatter(Arc::clone(&original));
        logger.add_sink(Arc::clone(&probe) as Arc<dyn Sink>);

        // Adoption happened at attach time
        assert!(Arc::ptr_eq(&probe.formatter().unwrap(), &original));

        // Replacing the logger's formatter does not retouch the sink
        logger.set_formatter(Arc::new(Formatter::new("new %m")));
        assert!(Arc::ptr_eq(&probe.formatter().unwrap(), &original));

        logger.info(&record("msg"));
        assert_eq!(*lines.lock().unwrap(), vec!["a:old msg"]);
    }

    #[test]
    fn test_sink_with_own_formatter_keeps_it() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSink::new("a", Arc::clone(&lines));
        let own = Arc::new(Formatter::new("own %m"));
        probe.set_formatter(Arc::clone(&own));

        let logger = Logger::new("core");
        logger.add_sink(Arc::clone(&probe) as Arc<dyn Sink>);
        assert!(Arc::ptr_eq(&probe.formatter().unwrap(), &own));
    }

    #[test]
    fn test_sink_attached_to_multiple_loggers() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSink::new("shared", Arc::clone(&lines));
        probe.set_formatter(Arc::new(Formatter::new("[%c] %m")));

        let alpha = Logger::new("alpha");
        let beta = Logger::new("beta");
        alpha.add_sink(Arc::clone(&probe) as Arc<dyn Sink>);
        beta.add_sink(Arc::clone(&probe) as Arc<dyn Sink>);

        alpha.info(&record("from alpha"));
        beta.info(&record("from beta"));

        let lines = lines.lock().unwrap();
        assert_eq!(
            *lines,
            vec!["shared:[alpha] from alpha", "shared:[beta] from beta"]
        );
    }

    #[test]
    fn test_level_helpers_dispatch_at_fixed_levels() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSink::new("a", Arc::clone(&lines));
        let logger = Logger::new("core");
        logger.set_formatter(Arc::new(Formatter::new("%p")));
        logger.add_sink(probe as Arc<dyn Sink>);

        let event = record("ignored");
        logger.debug(&event);
        logger.info(&event);
        logger.warn(&event);
        logger.error(&event);
        logger.fatal(&event);

        let lines = lines.lock().unwrap();
        assert_eq!(
            *lines,
            vec!["a:DEBUG", "a:INFO", "a:WARN", "a:ERROR", "a:FATAL"]
        );
    }

    #[test]
    fn test_registry_root_logger() {
        let registry = LoggerRegistry::new();
        let root = registry.root();
        assert_eq!(root.name(), "root");
        assert_eq!(root.sink_count(), 1);
        assert!(Arc::ptr_eq(&root, &registry.get("root")));
    }

    #[test]
    fn test_registry_lookup_or_create_identity() {
        let registry = LoggerRegistry::new();
        let first = registry.get("net");
        let second = registry.get("net");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 2); // root + net
    }

    #[test]
    fn test_registry_created_loggers_start_bare() {
        let registry = LoggerRegistry::new();
        assert_eq!(registry.get("storage").sink_count(), 0);
    }
}
