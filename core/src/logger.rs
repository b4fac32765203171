use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[90m",
            LogLevel::Info => "\x1b[37m",
            LogLevel::Warning => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[31;1m",
        }
    }
}

/// Diagnostics go to stderr so stdout carries only tool output.
pub struct Logger {
    use_colors: bool,
    min_level: LogLevel,
}

impl Logger {
    pub fn with_level(min_level: LogLevel) -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            min_level,
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S");

        if self.use_colors {
            eprintln!(
                "\x1b[90m[{}]\x1b[0m {}{}\x1b[0m",
                timestamp,
                level.color(),
                message
            );
        } else {
            eprintln!("[{}] {}: {}", timestamp, level.to_str(), message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        let logger = Logger::with_level(LogLevel::Warning);
        assert!(!logger.enabled(LogLevel::Debug));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warning));
        assert!(logger.enabled(LogLevel::Fatal));
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Warning.to_str(), "WARNING");
        assert!(LogLevel::Error > LogLevel::Info);
    }
}
