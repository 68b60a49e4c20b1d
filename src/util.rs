// SPDX-License-Identifier: Apache-2.0 OR MIT
// Identity and clock sources consumed by log records

use chrono::{DateTime, Local};
use std::sync::OnceLock;
use std::time::Instant;

/// Get current thread ID (truncated to u32)
pub fn thread_id() -> u32 {
    #[cfg(target_os = "linux")]
    {
        unsafe { libc::gettid() as u32 }
    }
    #[cfg(not(target_os = "linux"))]
    {
        // No stable numeric thread id off Linux; hash the opaque ThreadId
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish() as u32
    }
}

/// Get current fiber ID
///
/// This runtime has no fiber/coroutine concept; always 0.
#[inline]
pub fn fiber_id() -> u32 {
    0
}

/// Get milliseconds elapsed since the process-start baseline
///
/// The baseline is captured on first call, so the first caller
/// observes 0.
pub fn elapsed_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_millis() as u64
}

/// Get the current wall-clock time in the local timezone
pub fn wall_now() -> DateTime<Local> {
    Local::now()
}
