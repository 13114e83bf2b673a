//! Logging diagnostics to the standard error stream.

use std::fmt::Display;

use chrono::Local;
use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Common interface for logging diagnostics.
pub trait Log: Sync + Send {
    /// Logs a message.
    fn log(&self, level: LogLevel, msg: String);
}

/// Additional convenience methods for logging.
pub trait LogExt {
    /// Logs an info message.
    fn info(&self, msg: impl Display);
    /// Logs an warning.
    fn warn(&self, msg: impl Display);
    /// Logs an error.
    fn err(&self, msg: impl Display);
}

impl<L: Log + ?Sized> LogExt for L {
    fn info(&self, msg: impl Display) {
        self.log(LogLevel::Info, msg.to_string())
    }

    fn warn(&self, msg: impl Display) {
        self.log(LogLevel::Warn, msg.to_string())
    }

    fn err(&self, msg: impl Display) {
        self.log(LogLevel::Error, msg.to_string())
    }
}

/// A logger that uses standard error stream to communicate with the user.
pub struct StdLog {
    program_name: String,
    /// Drops info messages, warnings and errors are still printed.
    pub quiet: bool,
}

impl StdLog {
    pub fn new() -> StdLog {
        StdLog {
            program_name: Self::program_name(),
            quiet: false,
        }
    }

    fn program_name() -> String {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
    }

    fn format(&self, level: LogLevel, msg: &str) -> String {
        let timestamp = Local::now();
        let level = match level {
            LogLevel::Info => style(" info:").for_stderr().green(),
            LogLevel::Warn => style("warn:").for_stderr().yellow(),
            LogLevel::Error => style("error:").for_stderr().red(),
        };
        format!(
            "{} {}: {} {}",
            style(timestamp.format(Self::TIMESTAMP_FMT))
                .for_stderr()
                .dim()
                .white(),
            style(&self.program_name).for_stderr().yellow(),
            level,
            msg
        )
    }

    const TIMESTAMP_FMT: &'static str = "[%Y-%m-%d %H:%M:%S.%3f]";
}

impl Log for StdLog {
    fn log(&self, level: LogLevel, msg: String) {
        if self.quiet && level == LogLevel::Info {
            return;
        }
        eprintln!("{}", self.format(level, &msg));
    }
}

impl Default for StdLog {
    fn default() -> Self {
        StdLog::new()
    }
}
