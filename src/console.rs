//! Shared output channel for human-readable status lines.
//!
//! Every task writes through one [`OutputChannel`]. The mutex makes sure a line
//! is emitted whole. The bounded wait makes sure no task ever stalls on telemetry:
//! if the lock is not free within the timeout, the line is dropped and the
//! caller carries on.

use core::fmt::{self, Write as _};

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use embassy_time::{Duration, with_timeout};
use heapless::String;

use crate::config::LINE_CAPACITY;

/// Destination of complete status lines.
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

pub struct OutputChannel<M: RawMutex, W> {
    sink: Mutex<M, W>,
}

impl<M: RawMutex, W: LineSink> OutputChannel<M, W> {
    pub const fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Writes `line` if the channel can be locked within `timeout`.
    ///
    /// Returns `false` when the line was dropped. The lock is held only while
    /// the line is emitted.
    pub async fn try_write(&self, line: &str, timeout: Duration) -> bool {
        match with_timeout(timeout, self.sink.lock()).await {
            Ok(mut sink) => {
                sink.write_line(line);
                true
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("output channel busy, dropped a status line");
                false
            }
        }
    }
}

/// Formats a status line into a fixed buffer. Output past [`LINE_CAPACITY`]
/// bytes is cut off.
///
/// Format before calling [`OutputChannel::try_write`] rather than inside it:
/// `fmt::Arguments` is not `Send`, and keeping one alive across an await
/// would pin the caller to the thread-mode executor.
pub fn format_line(args: fmt::Arguments<'_>) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    let mut writer = Truncating {
        line: &mut line,
        truncated: false,
    };
    let _ = writer.write_fmt(args);
    if writer.truncated {
        #[cfg(feature = "defmt")]
        defmt::warn!("status line truncated to {} bytes", LINE_CAPACITY);
    }
    line
}

struct Truncating<'a> {
    line: &'a mut String<LINE_CAPACITY>,
    truncated: bool,
}

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.line.push(c).is_err() {
                self.truncated = true;
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

/// Emits lines over the defmt transport (RTT on the board).
#[cfg(feature = "defmt")]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl LineSink for DefmtSink {
    fn write_line(&mut self, line: &str) {
        defmt::println!("{=str}", line);
    }
}
