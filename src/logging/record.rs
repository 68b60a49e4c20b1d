// SPDX-License-Identifier: Apache-2.0 OR MIT
// Log record: the captured context of one logging call site

use super::Level;
use crate::util;
use chrono::{DateTime, Local};

/// Context captured for a single logging call.
///
/// The message buffer is growable while the record is being built and
/// freezes once dispatch begins: `Logger::log` takes `&Record`, so no
/// writer can race the sinks reading it.
#[derive(Debug, Clone)]
pub struct Record {
    /// Source file of the call site; a `'static` literal from `file!()`,
    /// never owned or freed by the record
    file: &'static str,
    /// Source line of the call site
    line: u32,
    /// Milliseconds since process start
    elapsed_ms: u64,
    /// OS thread id of the calling thread
    thread_id: u32,
    /// Fiber/coroutine id (0 when the host has no such concept)
    fiber_id: u32,
    /// Wall-clock time the record was raised
    timestamp: DateTime<Local>,
    /// Level the record was raised at
    level: Level,
    /// Message buffer, written incrementally before dispatch
    message: String,
}

impl Record {
    /// Create a record with explicit context values
    pub fn new(
        file: &'static str,
        line: u32,
        elapsed_ms: u64,
        thread_id: u32,
        fiber_id: u32,
        timestamp: DateTime<Local>,
        level: Level,
    ) -> Self {
        Self {
            file,
            line,
            elapsed_ms,
            thread_id,
            fiber_id,
            timestamp,
            level,
            message: String::new(),
        }
    }

    /// Create a record for the current call site, stamping identity and
    /// clock sources at construction
    pub fn capture(level: Level, file: &'static str, line: u32) -> Self {
        Self::new(
            file,
            line,
            util::elapsed_ms(),
            util::thread_id(),
            util::fiber_id(),
            util::wall_now(),
            level,
        )
    }

    /// Set the message, consuming and returning the record
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Append text to the message buffer (valid before dispatch only;
    /// dispatch borrows the record immutably)
    pub fn append_message(&mut self, text: &str) {
        self.message.push_str(text);
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn thread_id(&self) -> u32 {
        self.thread_id
    }

    pub fn fiber_id(&self) -> u32 {
        self.fiber_id
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
