//! A minimal `log` backend that writes to stderr.
//!
//! Stdout belongs to the console front end, so log records go to stderr
//! as `[LEVEL target] message`.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable holding the log level (`error` ... `trace`, or `off`)
pub const LOG_ENV: &str = "CHESS_LOG";

pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        StderrLogger { level }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name; unknown names fall back to `Info`.
#[must_use]
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the stderr logger at the level named by `CHESS_LOG`.
pub fn init() -> Result<(), SetLoggerError> {
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
