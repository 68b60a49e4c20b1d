// SPDX-License-Identifier: Apache-2.0 OR MIT
// Pattern template compiler and the fragment family it produces
//
// Template grammar:
//   %%     literal percent
//   %X     one-letter directive (see `fragment_for`)
//   %X{a}  directive with a free-form argument (timestamps only)
// Anything else accumulates into literal text. Compilation never
// fails: unknown directives and malformed argument braces become
// visible marker fragments in the output instead of errors.

use super::{Level, Record};
use std::fmt::Write;

/// Default strftime-style format for `%d` when no argument is given
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default full-line pattern
pub const DEFAULT_PATTERN: &str = "%d{%H:%M:%S %Y-%m-%d}%T%t%T%F%T[%p]%T[%c]%T<%f:%l>%T%m%n";

/// One renderable unit of a compiled pattern
///
/// Closed set; each variant carries only its own rendering
/// configuration and never mutates the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Verbatim text between directives (also error markers)
    Literal(String),
    /// `%m` - message body
    Message,
    /// `%p` - level name
    Level,
    /// `%r` - milliseconds since process start
    ElapsedMs,
    /// `%c` - name of the dispatching logger
    LoggerName,
    /// `%t` - thread id
    ThreadId,
    /// `%F` - fiber id
    FiberId,
    /// `%d` / `%d{fmt}` - timestamp with strftime-style format
    Timestamp(String),
    /// `%f` - source file
    File,
    /// `%l` - source line
    Line,
    /// `%n` - newline
    Newline,
    /// `%T` - tab
    Tab,
}

impl Fragment {
    /// Append this fragment's rendering of `record` to `out`
    fn render(&self, out: &mut String, logger_name: &str, level: Level, record: &Record) {
        match self {
            Fragment::Literal(text) => out.push_str(text),
            Fragment::Message => out.push_str(record.message()),
            Fragment::Level => out.push_str(level.as_str()),
            Fragment::ElapsedMs => {
                let _ = write!(out, "{}", record.elapsed_ms());
            }
            Fragment::LoggerName => out.push_str(logger_name),
            Fragment::ThreadId => {
                let _ = write!(out, "{}", record.thread_id());
            }
            Fragment::FiberId => {
                let _ = write!(out, "{}", record.fiber_id());
            }
            Fragment::Timestamp(format) => {
                let _ = write!(out, "{}", record.timestamp().format(format));
            }
            Fragment::File => out.push_str(record.file()),
            Fragment::Line => {
                let _ = write!(out, "{}", record.line());
            }
            Fragment::Newline => out.push('\n'),
            Fragment::Tab => out.push('\t'),
        }
    }
}

/// Map a one-letter directive code (and optional argument) to its fragment
fn fragment_for(code: char, arg: &str) -> Fragment {
    match code {
        'm' => Fragment::Message,
        'p' => Fragment::Level,
        'r' => Fragment::ElapsedMs,
        'c' => Fragment::LoggerName,
        't' => Fragment::ThreadId,
        'F' => Fragment::FiberId,
        'd' => Fragment::Timestamp(if arg.is_empty() {
            DEFAULT_TIMESTAMP_FORMAT.to_string()
        } else {
            arg.to_string()
        }),
        'f' => Fragment::File,
        'l' => Fragment::Line,
        'n' => Fragment::Newline,
        'T' => Fragment::Tab,
        other => Fragment::Literal(format!("<<error_format %{}>>", other)),
    }
}

/// Compile a pattern template into its ordered fragment sequence.
///
/// Never fails; see the module header for how malformed input degrades.
pub fn compile(pattern: &str) -> Vec<Fragment> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut fragments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    // A pending literal run always flushes before a directive fragment,
    // preserving template order.
    fn flush(literal: &mut String, fragments: &mut Vec<Fragment>) {
        if !literal.is_empty() {
            fragments.push(Fragment::Literal(std::mem::take(literal)));
        }
    }

    while i < chars.len() {
        if chars[i] != '%' {
            literal.push(chars[i]);
            i += 1;
            continue;
        }
        // %% escapes to a literal percent inside the current run
        if chars.get(i + 1) == Some(&'%') {
            literal.push('%');
            i += 2;
            continue;
        }
        let code = match chars.get(i + 1) {
            Some(&c) if c.is_ascii_alphabetic() => c,
            // Undirected percent (trailing, or followed by a non-letter):
            // the percent is dropped and scanning resumes after it
            _ => {
                i += 1;
                continue;
            }
        };
        if chars.get(i + 2) == Some(&'{') {
            match chars[i + 3..].iter().position(|&c| c == '}') {
                Some(offset) => {
                    let arg: String = chars[i + 3..i + 3 + offset].iter().collect();
                    flush(&mut literal, &mut fragments);
                    fragments.push(fragment_for(code, &arg));
                    i += 3 + offset + 1;
                }
                None => {
                    // Unterminated argument brace: emit the marker and stop
                    // at the fatal point; the malformed tail is not
                    // re-scanned as text
                    flush(&mut literal, &mut fragments);
                    fragments.push(Fragment::Literal("<<pattern_error>>".to_string()));
                    i = chars.len();
                }
            }
        } else {
            flush(&mut literal, &mut fragments);
            fragments.push(fragment_for(code, ""));
            i += 2;
        }
    }
    flush(&mut literal, &mut fragments);
    fragments
}

/// Renders records to text through a compiled pattern.
///
/// Compilation happens once here; the fragment sequence is immutable
/// afterward, so a `Formatter` is safely shared read-only behind an
/// `Arc` by any number of loggers and sinks.
#[derive(Debug)]
pub struct Formatter {
    pattern: String,
    fragments: Vec<Fragment>,
}

impl Formatter {
    /// Compile `pattern` into a formatter
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            fragments: compile(pattern),
        }
    }

    /// The template this formatter was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled fragment sequence, in template order
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Render a record: each fragment appends to one output buffer in
    /// template order. No I/O.
    pub fn render(&self, logger_name: &str, level: Level, record: &Record) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            fragment.render(&mut out, logger_name, level, record);
        }
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}
