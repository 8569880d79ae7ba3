/// Severity of a log line; lower values are more important
///
/// `LoggerConfig::min_level` drops everything above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    /// Import/export totals
    Info = 2,
    /// Per-record decisions, opened per tag with `--debug-<tag>`
    Debug = 3,
    /// Header dumps and other bulk detail
    Verbose = 4,
}

impl LogLevel {
    /// Label printed in the level column
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
        }
    }
}
