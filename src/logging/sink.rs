// SPDX-License-Identifier: Apache-2.0 OR MIT
// Output sinks: destinations for rendered log records

use super::logger::Logger;
use super::{Formatter, Level, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Destination for rendered log records.
///
/// Sinks are shared: one `Arc<dyn Sink>` may be attached to any number
/// of loggers, so all sink state sits behind its own guards. A sink
/// filters by its own minimum level, renders through its own formatter
/// when one is set (falling back to the dispatching logger's default),
/// and owns whatever I/O resource it writes to. Sink I/O failures stay
/// inside the sink; they never propagate into dispatch.
pub trait Sink: Send + Sync {
    /// Render and write one record, if `level` clears this sink's threshold
    fn log(&self, logger: &Logger, level: Level, record: &Record);

    /// This sink's own formatter, if one is set
    fn formatter(&self) -> Option<Arc<Formatter>>;

    /// Set this sink's own formatter
    fn set_formatter(&self, formatter: Arc<Formatter>);

    /// Minimum level this sink admits
    fn min_level(&self) -> Level;

    /// Set the minimum level this sink admits
    fn set_min_level(&self, level: Level);
}

/// Console sink (writes to the process's standard output)
pub struct ConsoleSink {
    min_level: AtomicU8,
    formatter: RwLock<Option<Arc<Formatter>>>,
}

impl ConsoleSink {
    /// Create a console sink that admits every level
    pub fn new() -> Self {
        Self {
            min_level: AtomicU8::new(Level::Unknown.as_u8()),
            formatter: RwLock::new(None),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn log(&self, logger: &Logger, level: Level, record: &Record) {
        if level < self.min_level() {
            return;
        }
        let rendered = match self.formatter() {
            Some(formatter) => formatter.render(logger.name(), level, record),
            None => logger.formatter().render(logger.name(), level, record),
        };
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(rendered.as_bytes());
        let _ = stdout.flush();
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

/// File sink (writes to an append-mode file handle it owns)
///
/// `new` attempts the initial open; a failed handle is non-fatal.
/// Writes while the handle is closed (or writes that fail) are dropped
/// and counted, so the condition is observable rather than silently
/// masked. `reopen` is the explicit recovery point.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
    min_level: AtomicU8,
    formatter: RwLock<Option<Arc<Formatter>>>,
    dropped_writes: AtomicU64,
}

impl FileSink {
    /// Create a file sink for `path`, attempting the initial open.
    ///
    /// Check `is_open` (or the `reopen` return value) to observe an
    /// initial open failure.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let sink = Self {
            path: path.into(),
            file: Mutex::new(None),
            min_level: AtomicU8::new(Level::Unknown.as_u8()),
            formatter: RwLock::new(None),
            dropped_writes: AtomicU64::new(0),
        };
        sink.reopen();
        sink
    }

    /// Close any open handle and reopen the configured path.
    ///
    /// Returns false if the open fails; the sink then drops writes
    /// until a later reopen succeeds.
    pub fn reopen(&self) -> bool {
        let mut file = self.file.lock().unwrap();
        *file = None;
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(handle) => {
                *file = Some(handle);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether the sink currently holds an open handle
    pub fn is_open(&self) -> bool {
        self.file.lock().unwrap().is_some()
    }

    /// Number of records dropped because the handle was closed or the
    /// write failed
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes.load(Ordering::Relaxed)
    }

    /// The path this sink writes to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn log(&self, logger: &Logger, level: Level, record: &Record) {
        if level < self.min_level() {
            return;
        }
        let rendered = match self.formatter() {
            Some(formatter) => formatter.render(logger.name(), level, record),
            None => logger.formatter().render(logger.name(), level, record),
        };
        let mut file = self.file.lock().unwrap();
        match file.as_mut() {
            Some(handle) => {
                if handle.write_all(rendered.as_bytes()).is_err() {
                    self.dropped_writes.fetch_add(1, Ordering::Relaxed);
                }
            }
            None => {
                self.dropped_writes.fetch_add(1, Ordering::Relaxed);
            }
        }
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
