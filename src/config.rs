use std::time::Duration;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::blocks::lang::Language;

/// Default address of the controller's HTTP interface.
pub const DEFAULT_DEVICE_URL: &str = "http://127.0.0.1:8000";

#[derive(Parser, Debug)]
#[command(name = "robo_lt_extension")]
#[command(about = "Exposes a fischertechnik ROBO LT controller to a block programming host")]
pub struct Config {
    /// Base URL of the controller's HTTP interface
    #[arg(long, env = "ROBO_LT_URL", default_value = DEFAULT_DEVICE_URL)]
    pub device_url: String,

    /// Milliseconds between two sensor polls
    #[arg(long, env = "ROBO_LT_POLL_MS", default_value_t = 55)]
    pub poll_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "ROBO_LT_TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Label language (en, de); defaults to the one in $LANG
    #[arg(long, env = "ROBO_LT_LANG")]
    pub lang: Option<Language>,

    /// Maximum log level (off, error, warn, info, debug, trace)
    #[arg(long, env = "ROBO_LT_LOG", default_value = "info")]
    pub log_level: LevelFilter,

    /// Print the block descriptor as JSON and exit
    #[arg(long)]
    pub describe: bool,
}

impl Config {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn language(&self) -> Language {
        self.lang.unwrap_or_else(|| {
            std::env::var("LANG")
                .map(|locale| Language::from_locale(&locale))
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["robo_lt_extension"]).unwrap();
        assert_eq!(config.poll_period(), Duration::from_millis(55));
        assert_eq!(config.timeout(), Duration::from_millis(1000));
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert!(!config.describe);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "robo_lt_extension",
            "--device-url",
            "http://10.0.0.7",
            "--poll-ms",
            "0",
            "--lang",
            "de",
            "--log-level",
            "debug",
            "--describe",
        ])
        .unwrap();
        assert_eq!(config.device_url, "http://10.0.0.7");
        assert_eq!(config.poll_period(), Duration::from_millis(1));
        assert_eq!(config.language(), Language::De);
        assert_eq!(config.log_level, LevelFilter::DEBUG);
        assert!(config.describe);
    }

    #[test]
    fn test_rejects_unknown_language() {
        assert!(Config::try_parse_from(["robo_lt_extension", "--lang", "xx"]).is_err());
    }
}
