//! File logging for htnview.
//!
//! The TUI owns the terminal, so log lines go to `~/.htnview/htnview.log`,
//! truncated on startup. The file stays open for the life of the process.
//!
//! Levels, quietest first:
//! - ERROR: failures that stop the viewer
//! - WARN: recoverable trouble (feed disconnects, malformed snapshots)
//! - INFO: startup, shutdown, connection events
//! - DEBUG: store and update traces
//! - TRACE: per-line feed traffic
//!
//! `--debug` or `HTNVIEW_DEBUG=1` raises the threshold to DEBUG.
//! `HTNVIEW_LOG=<level>` picks any level and wins over both.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

static SINK: OnceLock<Sink> = OnceLock::new();
static THRESHOLD: AtomicU8 = AtomicU8::new(Level::Info as u8);

struct Sink {
    path: PathBuf,
    file: Mutex<File>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

const LEVELS: [Level; 5] = [
    Level::Error,
    Level::Warn,
    Level::Info,
    Level::Debug,
    Level::Trace,
];

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVELS
            .iter()
            .copied()
            .find(|l| l.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown log level '{}'", s))
    }
}

/// Threshold from the CLI flag and environment.
fn startup_level(debug: bool) -> Level {
    if let Some(level) = std::env::var("HTNVIEW_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        return level;
    }

    let env_debug = std::env::var("HTNVIEW_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if debug || env_debug {
        Level::Debug
    } else {
        Level::Info
    }
}

/// Open `~/.htnview/htnview.log` and set the threshold.
pub fn init(debug: bool) -> io::Result<()> {
    let dir = dirs::home_dir()
        .map(|h| h.join(".htnview"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    std::fs::create_dir_all(&dir)?;
    init_at(&dir.join("htnview.log"), debug)
}

/// Log to an explicit file. Later calls only adjust the threshold.
pub fn init_at(path: &Path, debug: bool) -> io::Result<()> {
    set_threshold(startup_level(debug));

    if SINK.get().is_none() {
        let file = File::create(path)?;
        let _ = SINK.set(Sink {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        });
    }
    Ok(())
}

/// Path of the active log file, if logging was initialized.
pub fn log_path() -> Option<&'static Path> {
    SINK.get().map(|s| s.path.as_path())
}

pub fn set_threshold(level: Level) {
    THRESHOLD.store(level as u8, Ordering::Relaxed);
}

pub fn threshold() -> Level {
    let raw = THRESHOLD.load(Ordering::Relaxed) as usize;
    LEVELS[raw.min(LEVELS.len() - 1)]
}

pub fn enabled(level: Level) -> bool {
    level <= threshold()
}

/// Append one line. Used by the `hlog*` macros.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }
    let Some(sink) = SINK.get() else { return };

    if let Ok(mut file) = sink.file.lock() {
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] [{:<5}] {}", stamp, level, args);
    }
}

/// INFO line.
#[macro_export]
macro_rules! hlog {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! hlog_error {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! hlog_warn {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*))
    };
}

/// DEBUG line; dropped unless debug logging is on.
#[macro_export]
macro_rules! hlog_debug {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! hlog_trace {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Trace, format_args!($($arg)*))
    };
}
