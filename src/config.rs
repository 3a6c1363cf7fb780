//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Logging level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Warn
    }
}

impl LogLevel {
    /// Maps a `-v` count onto a level, starting from the default.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Configuration for one client invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary registry of descriptor files.
    pub registry_dir: PathBuf,
    /// Searched only when the registry holds no descriptors.
    pub fallback_dir: Option<PathBuf>,
    pub host: String,
    pub endpoint_path: String,
    pub timeout: Duration,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_dir: default_registry_dir(),
            fallback_dir: std::env::current_dir().ok(),
            host: "127.0.0.1".to_string(),
            endpoint_path: "/mcp".to_string(),
            timeout: DEFAULT_TIMEOUT,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Applies command-line overrides on top of the defaults.
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let mut config = Self::default();
        if let Some(dir) = &cli.registry_dir {
            config.registry_dir = dir.clone();
        }
        if let Some(secs) = cli.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        config.log_level = LogLevel::from_verbosity(cli.verbose);
        config
    }
}

/// `<system temp dir>/gemini/ide`, where IDE servers drop their descriptors.
pub fn default_registry_dir() -> PathBuf {
    std::env::temp_dir().join("gemini").join("ide")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
    }

    #[test]
    fn defaults_point_at_local_mcp_endpoint() {
        let config = Config::default();
        assert!(config.registry_dir.ends_with("gemini/ide"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.endpoint_path, "/mcp");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
