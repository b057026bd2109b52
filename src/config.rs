//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-timer")]
#[command(about = "A countdown timer served over a small HTTP API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Upper bound on the configured duration in seconds (unbounded if unset)
    #[arg(long)]
    pub max_duration: Option<u64>,

    /// File used to save the timer on shutdown and restore it on startup
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["countdown-timer"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
        assert_eq!(config.max_duration, None);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Config::try_parse_from(["countdown-timer", "--tick-ms", "0"]).is_err());
    }

    #[test]
    fn optional_settings() {
        let config = Config::try_parse_from([
            "countdown-timer",
            "-v",
            "--max-duration",
            "359999",
            "--state-file",
            "/tmp/timer.json",
        ])
        .unwrap();
        assert_eq!(config.max_duration, Some(359_999));
        assert_eq!(config.state_file, Some(PathBuf::from("/tmp/timer.json")));
        assert_eq!(config.log_level(), "debug");
    }
}
