//! Kernel logging subsystem.
//!
//! Two front ends share one line format:
//!   - [`log`](fn@log) and the `klog::debug!` macro, for kernel code;
//!   - the [`log`] facade, once [`init`] has installed [`KernelLogger`],
//!     for library crates that shouldn't depend on the serial driver.
//!
//! Facade records go through the non-blocking serial path. A record logged
//! from a CPU exception handler must never wait on a lock the interrupted
//! code might be holding; on contention the line is dropped.
#![cfg_attr(not(test), no_std)]

use core::fmt;

/// Most verbose level the facade lets through.
pub const MAX_LEVEL: log::LevelFilter = log::LevelFilter::Debug;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => " INFO",
            Level::Warn => " WARN",
            Level::Error => "ERROR",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Level::Trace => "\x1b[90m", // Gray
            Level::Debug => "\x1b[36m", // Cyan
            Level::Info => "\x1b[32m",  // Green
            Level::Warn => "\x1b[33m",  // Yellow
            Level::Error => "\x1b[31m", // Red
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

/// Writes one complete log line: coloured level tag, message, newline.
pub fn write_line<W: fmt::Write>(out: &mut W, level: Level, args: fmt::Arguments) -> fmt::Result {
    out.write_fmt(format_args!(
        "{}[{}]\x1b[0m {}\n",
        level.color(),
        level.as_str(),
        args
    ))
}

/// Adapts a `write_fmt`-style function into a `fmt::Write`.
struct Emit<F: FnMut(fmt::Arguments) -> bool>(F);

impl<F: FnMut(fmt::Arguments) -> bool> fmt::Write for Emit<F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_fmt(format_args!("{}", s))
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result {
        if (self.0)(args) { Ok(()) } else { Err(fmt::Error) }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod backend {
    use core::fmt;

    pub fn init() {
        khal::serial::init();
    }

    pub fn write(args: fmt::Arguments) -> bool {
        khal::serial::write_fmt(args);
        true
    }

    pub fn try_write(args: fmt::Arguments) -> bool {
        khal::serial::try_write_fmt(args)
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
mod backend {
    use core::fmt;

    pub fn init() {}

    pub fn write(_args: fmt::Arguments) -> bool {
        false
    }

    pub fn try_write(_args: fmt::Arguments) -> bool {
        false
    }
}

/// `log` facade backend writing to COM1.
pub struct KernelLogger;

static LOGGER: KernelLogger = KernelLogger;

impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= MAX_LEVEL
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            try_log(record.level().into(), *record.args());
        }
    }

    fn flush(&self) {}
}

/// Initialize the kernel logger: sets up the serial port and installs
/// [`KernelLogger`] as the `log` backend. Calling it twice is harmless.
pub fn init() {
    backend::init();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(MAX_LEVEL);
    }
}

/// Log a message with a specific level
pub fn log(level: Level, args: fmt::Arguments) {
    let _ = write_line(&mut Emit(backend::write), level, args);
}

/// Log a message unless the serial port is busy. Returns whether it was written.
pub fn try_log(level: Level, args: fmt::Arguments) -> bool {
    write_line(&mut Emit(backend::try_write), level, args).is_ok()
}

/// Log at DEBUG level
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Debug, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_color_tag_and_reset() {
        let mut line = String::new();
        write_line(&mut line, Level::Error, format_args!("vector {}", 14)).unwrap();
        assert_eq!(line, "\x1b[31m[ERROR]\x1b[0m vector 14\n");
    }

    #[test]
    fn level_tags_are_aligned() {
        for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error] {
            assert_eq!(level.as_str().len(), 5);
        }
    }

    #[test]
    fn facade_levels_map_one_to_one() {
        assert_eq!(Level::from(log::Level::Error), Level::Error);
        assert_eq!(Level::from(log::Level::Warn), Level::Warn);
        assert_eq!(Level::from(log::Level::Info), Level::Info);
        assert_eq!(Level::from(log::Level::Debug), Level::Debug);
        assert_eq!(Level::from(log::Level::Trace), Level::Trace);
        assert!(Level::Error > Level::Trace);
    }

    use core::sync::atomic::{AtomicUsize, Ordering};

    static WRITES: AtomicUsize = AtomicUsize::new(0);

    fn busy(_args: fmt::Arguments) -> bool {
        false
    }

    fn counted(_args: fmt::Arguments) -> bool {
        WRITES.fetch_add(1, Ordering::SeqCst);
        true
    }

    #[test]
    fn emit_reports_a_dropped_write_as_error() {
        assert!(write_line(&mut Emit(busy), Level::Info, format_args!("x")).is_err());
    }

    #[test]
    fn emit_hands_over_the_whole_line_at_once() {
        assert!(write_line(&mut Emit(counted), Level::Info, format_args!("a{}b", 1)).is_ok());
        assert_eq!(WRITES.load(Ordering::SeqCst), 1);
    }
}
