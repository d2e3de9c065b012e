use {
    chrono::Local,
    log::{LevelFilter, Log, Metadata, Record},
    std::io::Write,
};

/// A logger that writes leveled records to stderr.
///
/// Debug builds prefix every line with a timestamp and the source location,
/// release builds print only the level and the message.
pub struct StderrLogger {
    level: LevelFilter,
    detailed: bool,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            detailed: cfg!(debug_assertions),
        }
    }

    /// Force the detailed (timestamp + location) line format on or off.
    pub fn with_detailed_format(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Render one record the way it appears on stderr, without the newline.
    pub fn format(&self, record: &Record) -> String {
        if self.detailed {
            format!(
                "{} {} {}:{} {}",
                format_timestamp(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        } else {
            format!("{} {}", record.level(), record.args())
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        let mut stderr = std::io::stderr().lock();
        // nowhere left to report a failing stderr
        let _ = writeln!(stderr, "{line}");
    }

    fn flush(&self) {
        std::io::stderr().flush().ok();
    }
}

/// Format the current local time as YYYY-MM-DDTHH:MM:SS.
pub fn format_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Keeps the process logger alive for the session; dropping it flushes
/// any buffered output.
#[must_use = "dropping the guard tears the logger down immediately"]
pub struct LogGuard {
    _private: (),
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

/// Install a `StderrLogger` as the process logger.
///
/// Only the first call installs a logger; later calls keep the existing one
/// and still hand back a guard.
pub fn init_stderr_logger(level: LevelFilter) -> LogGuard {
    // set_logger needs a &'static reference, the logger lives for the process
    let logger: &'static StderrLogger = Box::leak(Box::new(StderrLogger::new(level)));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
    LogGuard { _private: () }
}
